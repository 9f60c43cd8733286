//! Tabvault Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Tab`, `TabGroup`, `Tag`, `TabStore`, `RecycleBin`,
//!   sync metadata (`SyncResultItem`, `SyncStatus`, `SyncTargetConfig`)
//! - **Port definitions** - Traits for adapters: `StateRepository`, `RemoteStore`
//! - **Configuration** - Typed config with YAML loading and defaults
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O. Ports define
//! trait interfaces that adapter crates implement. The store, merge, remote,
//! and sync crates build on these seams.

pub mod config;
pub mod domain;
pub mod ports;
