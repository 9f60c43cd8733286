//! Tabvault Store - tab list service and persistence adapters
//!
//! Provides:
//! - [`TabManager`] - the application service over the tab list and the
//!   recycle bin; every mutation persists a full snapshot
//! - [`MemoryStateRepository`] - in-memory key-value persistence adapter
//! - [`RecycleSweeper`] - background task that purges expired recycle
//!   bin entries

pub mod manager;
pub mod memory;
pub mod sweeper;

pub use manager::TabManager;
pub use memory::MemoryStateRepository;
pub use sweeper::RecycleSweeper;
