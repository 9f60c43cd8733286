//! Tabvault Merge - Pure tab-list merge engine
//!
//! Combines two tab-list snapshots into one. The engine is a pure
//! function: no I/O, no clock, no persistence. Callers choose direction
//! by argument order (the first argument's flags and ordering win ties),
//! so the same engine serves pull-merge and push-merge.

pub mod engine;
pub mod options;

pub use engine::merge;
pub use options::MergeOptions;
