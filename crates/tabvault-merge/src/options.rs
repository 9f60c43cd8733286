//! Merge policy knobs

use serde::{Deserialize, Serialize};

use tabvault_core::domain::InsertPosition;

/// Policy flags controlling how two tab lists are combined
///
/// Mirrors the merge section of the configuration file; the orchestrator
/// builds one of these per run from the loaded config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Keep same-named groups as distinct entries instead of combining
    /// their tab lists.
    pub allow_duplicate_groups: bool,
    /// Keep same-url tabs; when false the first occurrence wins.
    pub allow_duplicate_tabs: bool,
    /// Where unmatched entities from the second operand land.
    pub insert_position: InsertPosition,
}
