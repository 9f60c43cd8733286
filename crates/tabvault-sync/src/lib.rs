//! Tabvault Sync - orchestration of remote synchronization
//!
//! Provides:
//! - [`SyncOrchestrator`] - runs one sync flow per call, guards against
//!   concurrent runs per target, and records every attempt in the
//!   bounded per-target history
//! - [`DefaultRemoteFactory`] - builds the right remote adapter from a
//!   target's persisted credential
//! - [`AutoSyncScheduler`] - single re-armable timer driving periodic
//!   auto syncs

pub mod factory;
pub mod orchestrator;
pub mod scheduler;

pub use factory::{DefaultRemoteFactory, RemoteStoreFactory};
pub use orchestrator::{SyncOrchestrator, SyncStartOutcome};
pub use scheduler::AutoSyncScheduler;
