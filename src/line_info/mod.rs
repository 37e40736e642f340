//! Address to source line mapping.
//!
//! The report serializer only needs a [`LineCountTable`]. How it is obtained
//! is behind the [`LineMapper`] trait so tests can supply canned tables
//! without a binary carrying debug information.

pub mod dwarf;

pub use dwarf::DwarfLineMapper;

use crate::aggregator::AddressCountTable;
use crate::utils::error::LineMapError;
use std::collections::BTreeMap;
use std::path::Path;

/// Source path -> (line number -> execution count)
///
/// Ordered maps keep files sorted by path and lines ascending, so anything
/// serialized from this table is reproducible.
pub type LineCountTable = BTreeMap<String, BTreeMap<u32, u64>>;

/// Resolves aggregated address counts to per-line counts
pub trait LineMapper {
    /// Map every instrumented line of `binary_path` to its execution count
    ///
    /// Lines that are instrumented but never executed appear with count 0.
    /// An empty table means the binary has no usable debug information.
    fn resolve(
        &self,
        addr_counts: &AddressCountTable,
        binary_path: &Path,
    ) -> Result<LineCountTable, LineMapError>;
}
