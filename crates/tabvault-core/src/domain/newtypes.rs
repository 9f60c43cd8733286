//! Identifier newtypes for the tab list hierarchy
//!
//! Ids are locally generated random tokens. They are **not** globally unique
//! across devices: two stores synced through a remote may carry colliding
//! ids, which is why the merge engine matches entities by name/url rather
//! than by id.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            /// Wraps an existing id token (e.g. parsed from a remote payload).
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_id! {
    /// Identifier of a [`Tag`](super::tab_list::Tag)
    TagId
}

define_id! {
    /// Identifier of a [`TabGroup`](super::tab_list::TabGroup)
    GroupId
}

define_id! {
    /// Identifier of a [`Tab`](super::tab_list::Tab)
    TabId
}
