//! Aggregation of translation block ranges into per-address counts.
//!
//! This module transforms parsed trace ranges into:
//! - An address -> execution count table (for line mapping)
//! - Address coverage statistics (for logging)

pub mod address_counts;
pub mod metrics;

// Re-export main types and functions
pub use address_counts::{aggregate, AddressCountTable, AddressRange};
pub use metrics::{calculate_address_stats, AddressStats};
