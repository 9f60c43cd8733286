//! Port definitions (trait seams for adapters)
//!
//! Following the ports & adapters pattern:
//! - [`state_repository`] - persistence of the tab list, recycle bin, and
//!   per-target sync metadata (driven port)
//! - [`remote_store`] - remote text-blob storage: gist APIs, WebDAV
//!   (driven port)

pub mod remote_store;
pub mod state_repository;

pub use remote_store::{RemoteError, RemoteStore};
pub use state_repository::StateRepository;
