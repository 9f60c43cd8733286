//! Domain entities and value objects
//!
//! Pure business logic with no I/O dependencies. The tab list hierarchy
//! (`TabStore` -> `Tag` -> `TabGroup` -> `Tab`) lives in [`tab_list`],
//! soft-delete semantics in [`recycle_bin`], and per-target sync metadata
//! in [`sync`].

pub mod errors;
pub mod newtypes;
pub mod recycle_bin;
pub mod sync;
pub mod tab_list;

pub use errors::DomainError;
pub use recycle_bin::{DeletedItem, RecycleBin};
pub use sync::{
    Credential, FailureReason, RemoteTarget, SyncHistory, SyncOutcome, SyncResultItem, SyncStatus,
    SyncTargetConfig, SyncType,
};
pub use tab_list::{
    GroupUpdate, InsertPosition, RemoveOutcome, Tab, TabGroup, TabStore, TabUpdate, Tag, TagUpdate,
};
