//! Merge algorithm
//!
//! Keyed three-level join of two tab lists:
//! - tags match by name, except the static tags of both sides, which
//!   always match each other regardless of name
//! - groups inside matched tags match by name (unless duplicates are
//!   allowed)
//! - tabs inside matched groups are concatenated first-operand-first and
//!   deduplicated by url (unless duplicates are allowed)
//!
//! Flag conflicts resolve asymmetrically: `is_starred` keeps the first
//! operand's value, `is_locked` is the OR of both sides so a lock set on
//! either copy survives the merge. Unmatched entities from the second
//! operand are spliced in at the configured insert position, and the
//! result is normalized before it is returned.

use tracing::debug;

use tabvault_core::domain::{InsertPosition, TabGroup, TabStore, Tag};

use crate::options::MergeOptions;

/// Combines `src` into a copy of `dest` and returns the normalized result.
///
/// Pure: neither operand is mutated. Matched entities keep `dest`'s id
/// and creation time.
pub fn merge(dest: &TabStore, src: &TabStore, options: &MergeOptions) -> TabStore {
    let mut out = dest.clone();
    let mut pending: Vec<Tag> = Vec::new();

    for src_tag in &src.tags {
        let slot = if src_tag.is_static {
            out.tags.iter_mut().find(|t| t.is_static)
        } else {
            out.tags
                .iter_mut()
                .find(|t| !t.is_static && t.name == src_tag.name)
        };

        if let Some(dest_tag) = slot {
            merge_tag(dest_tag, src_tag, options);
        } else if let Some(prior) = pending
            .iter_mut()
            .find(|t| !src_tag.is_static && t.name == src_tag.name)
        {
            // Second operand carried duplicate tag names itself.
            merge_tag(prior, src_tag, options);
        } else {
            pending.push(src_tag.clone());
        }
    }

    splice_tags(&mut out.tags, pending, options.insert_position);
    out.normalize();

    debug!(
        tags = out.tags.len(),
        tabs = out.tab_count(),
        "merged tab lists"
    );
    out
}

fn merge_tag(dest: &mut Tag, src: &Tag, options: &MergeOptions) {
    dest.is_locked |= src.is_locked;

    let mut pending: Vec<TabGroup> = Vec::new();
    for src_group in &src.groups {
        let slot = if options.allow_duplicate_groups {
            None
        } else {
            dest.groups.iter_mut().find(|g| g.name == src_group.name)
        };

        if let Some(dest_group) = slot {
            merge_group(dest_group, src_group, options);
        } else if let Some(prior) = (!options.allow_duplicate_groups)
            .then(|| pending.iter_mut().find(|g| g.name == src_group.name))
            .flatten()
        {
            merge_group(prior, src_group, options);
        } else {
            pending.push(src_group.clone());
        }
    }

    splice_groups(&mut dest.groups, pending, options.insert_position);
}

fn merge_group(dest: &mut TabGroup, src: &TabGroup, options: &MergeOptions) {
    dest.is_locked |= src.is_locked;
    dest.tabs.extend(src.tabs.iter().cloned());
    if !options.allow_duplicate_tabs {
        dest.dedup_tabs();
    }
}

/// Splices unmatched tags in at the chosen end, keeping their relative
/// order. `Top` lands after the static tag; normalize re-pins it anyway.
fn splice_tags(tags: &mut Vec<Tag>, pending: Vec<Tag>, position: InsertPosition) {
    if pending.is_empty() {
        return;
    }
    match position {
        InsertPosition::Top => {
            let at = usize::from(tags.first().is_some_and(|t| t.is_static));
            tags.splice(at..at, pending);
        }
        InsertPosition::Bottom => tags.extend(pending),
    }
}

fn splice_groups(groups: &mut Vec<TabGroup>, pending: Vec<TabGroup>, position: InsertPosition) {
    if pending.is_empty() {
        return;
    }
    match position {
        InsertPosition::Top => {
            groups.splice(0..0, pending);
        }
        InsertPosition::Bottom => groups.extend(pending),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabvault_core::domain::Tab;

    fn group(name: &str, urls: &[&str]) -> TabGroup {
        let mut g = TabGroup::new(name);
        g.tabs = urls.iter().map(|u| Tab::new(*u, *u)).collect();
        g
    }

    fn tag(name: &str, groups: Vec<TabGroup>) -> Tag {
        let mut t = Tag::new(name);
        t.groups = groups;
        t
    }

    fn store(tags: Vec<Tag>) -> TabStore {
        let mut s = TabStore { tags };
        s.normalize();
        s
    }

    fn urls(store: &TabStore, tag_name: &str, group_name: &str) -> Vec<String> {
        store
            .tags
            .iter()
            .find(|t| t.name == tag_name)
            .unwrap()
            .groups
            .iter()
            .find(|g| g.name == group_name)
            .unwrap()
            .tabs
            .iter()
            .map(|t| t.url.clone())
            .collect()
    }

    #[test]
    fn test_merge_with_self_is_identity() {
        let s = store(vec![tag(
            "Work",
            vec![group("Proj", &["https://a", "https://b"])],
        )]);
        let merged = merge(&s, &s, &MergeOptions::default());
        assert_eq!(merged, s);
    }

    #[test]
    fn test_tab_union_keeps_first_occurrence_order() {
        let dest = store(vec![tag("Work", vec![group("Proj", &["u1", "u2"])])]);
        let src = store(vec![tag("Work", vec![group("Proj", &["u2", "u3"])])]);

        let merged = merge(&dest, &src, &MergeOptions::default());
        assert_eq!(urls(&merged, "Work", "Proj"), vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn test_same_named_groups_combine_into_one() {
        let dest = store(vec![tag("Work", vec![group("Proj", &["u1"])])]);
        let src = store(vec![tag("Work", vec![group("Proj", &["u2"])])]);

        let merged = merge(&dest, &src, &MergeOptions::default());
        let work = merged.tags.iter().find(|t| t.name == "Work").unwrap();
        assert_eq!(work.groups.len(), 1);
        assert_eq!(urls(&merged, "Work", "Proj"), vec!["u1", "u2"]);
    }

    #[test]
    fn test_allow_duplicate_groups_keeps_both() {
        let dest = store(vec![tag("Work", vec![group("Proj", &["u1"])])]);
        let src = store(vec![tag("Work", vec![group("Proj", &["u2"])])]);

        let options = MergeOptions {
            allow_duplicate_groups: true,
            ..Default::default()
        };
        let merged = merge(&dest, &src, &options);
        let work = merged.tags.iter().find(|t| t.name == "Work").unwrap();
        assert_eq!(work.groups.len(), 2);
    }

    #[test]
    fn test_allow_duplicate_tabs_keeps_repeats() {
        let dest = store(vec![tag("Work", vec![group("Proj", &["u1", "u2"])])]);
        let src = store(vec![tag("Work", vec![group("Proj", &["u2"])])]);

        let options = MergeOptions {
            allow_duplicate_tabs: true,
            ..Default::default()
        };
        let merged = merge(&dest, &src, &options);
        assert_eq!(urls(&merged, "Work", "Proj"), vec!["u1", "u2", "u2"]);
    }

    #[test]
    fn test_static_tags_match_regardless_of_name() {
        let mut dest = TabStore::bootstrap();
        dest.tags[0].groups[0].tabs.push(Tab::new("a", "https://a"));

        let mut renamed_static = Tag::staging();
        renamed_static.name = "Inbox".to_string();
        renamed_static.groups.push(group("Unnamed group", &["https://b"]));
        let src = TabStore {
            tags: vec![renamed_static],
        };

        let merged = merge(&dest, &src, &MergeOptions::default());
        assert_eq!(merged.tags.len(), 1);
        let staging = merged.static_tag().unwrap();
        assert_eq!(staging.name, dest.tags[0].name);
        assert_eq!(staging.groups.len(), 1);
        assert_eq!(staging.groups[0].tabs.len(), 2);
    }

    #[test]
    fn test_unmatched_tags_append_at_position() {
        let dest = store(vec![tag("Work", vec![])]);
        let src = store(vec![tag("Home", vec![]), tag("Play", vec![])]);

        let top = merge(&dest, &src, &MergeOptions::default());
        let names: Vec<_> = top.tags.iter().map(|t| t.name.as_str()).collect();
        // static tag pinned first, then the spliced block, then dest's tag
        assert_eq!(names[1..], ["Home", "Play", "Work"]);

        let options = MergeOptions {
            insert_position: InsertPosition::Bottom,
            ..Default::default()
        };
        let bottom = merge(&dest, &src, &options);
        let names: Vec<_> = bottom.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names[1..], ["Work", "Home", "Play"]);
    }

    #[test]
    fn test_lock_survives_from_either_side() {
        let mut dest = store(vec![tag("Work", vec![group("Proj", &["u1"])])]);
        let mut src = dest.clone();
        src.tags
            .iter_mut()
            .find(|t| t.name == "Work")
            .unwrap()
            .is_locked = true;
        src.tags
            .iter_mut()
            .find(|t| t.name == "Work")
            .unwrap()
            .groups[0]
            .is_locked = true;
        dest.tags
            .iter_mut()
            .find(|t| t.name == "Work")
            .unwrap()
            .is_starred = true;

        let merged = merge(&dest, &src, &MergeOptions::default());
        let work = merged.tags.iter().find(|t| t.name == "Work").unwrap();
        assert!(work.is_locked);
        assert!(work.groups[0].is_locked);
        assert!(work.is_starred);
    }

    #[test]
    fn test_starred_flag_keeps_first_operand_value() {
        let dest = store(vec![tag("Work", vec![group("Proj", &["u1"])])]);
        let mut src = dest.clone();
        src.tags
            .iter_mut()
            .find(|t| t.name == "Work")
            .unwrap()
            .groups[0]
            .is_starred = true;

        let merged = merge(&dest, &src, &MergeOptions::default());
        let work = merged.tags.iter().find(|t| t.name == "Work").unwrap();
        assert!(!work.groups[0].is_starred);
    }

    #[test]
    fn test_result_is_normalized() {
        // Second operand brings a starred group that splices in at the
        // top of an existing tag; the starred prefix must still hold.
        let mut starred = group("Pinned", &["u9"]);
        starred.is_starred = true;
        let dest = store(vec![tag("Work", vec![group("Plain", &["u1"])])]);
        let src = store(vec![tag("Work", vec![starred])]);

        let options = MergeOptions {
            insert_position: InsertPosition::Bottom,
            ..Default::default()
        };
        let merged = merge(&dest, &src, &options);
        for t in &merged.tags {
            assert!(t.starred_prefix_holds());
        }
        let work = merged.tags.iter().find(|t| t.name == "Work").unwrap();
        assert_eq!(work.groups[0].name, "Pinned");
    }
}
