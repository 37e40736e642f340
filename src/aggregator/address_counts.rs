//! Per-address execution counts built from translation block ranges.
//!
//! A translation block `[start, end)` executed `n` times adds `n` to every
//! address it spans. Blocks overlap freely, both inside one trace file and
//! across trace files, and every contribution is summed.
//!
//! Example: "0x1000..0x1010 x2" and "0x1008..0x1020 x3" leave 0x1008 at 5.

use crate::utils::diagnostics::{Diagnostic, DiagnosticSink};
use log::debug;
use std::collections::HashMap;

/// One translation block observed in one trace file
///
/// **Public** - produced by the trace parser, consumed by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    /// First address covered by the block
    pub start: u64,

    /// One past the last covered address
    pub end: u64,

    /// Number of times the block executed
    pub hit_count: u64,
}

impl AddressRange {
    /// Create a new range
    pub fn new(start: u64, end: u64, hit_count: u64) -> Self {
        Self {
            start,
            end,
            hit_count,
        }
    }

    /// Number of addresses in `[start, end)`; zero for degenerate or inverted ranges
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cumulative execution count per instruction address
///
/// **Public** - handed to the line mapper
#[derive(Debug, Clone, Default)]
pub struct AddressCountTable {
    counts: HashMap<u64, u64>,
    ranges_observed: usize,
}

impl AddressCountTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `hit_count` to every address in `[start, end)`
    ///
    /// Degenerate ranges are a no-op. Inverted ranges are reported to the
    /// sink and otherwise ignored.
    pub fn add_range(&mut self, range: AddressRange, sink: &mut dyn DiagnosticSink) {
        self.ranges_observed += 1;

        if range.start > range.end {
            sink.report(Diagnostic::InvalidRange {
                start: range.start,
                end: range.end,
            });
            return;
        }

        if range.is_empty() {
            return;
        }

        for addr in range.start..range.end {
            let count = self.counts.entry(addr).or_insert(0);
            *count = count.saturating_add(range.hit_count);
        }
    }

    /// Add every range of a sequence
    pub fn add_ranges<I>(&mut self, ranges: I, sink: &mut dyn DiagnosticSink)
    where
        I: IntoIterator<Item = AddressRange>,
    {
        for range in ranges {
            self.add_range(range, sink);
        }
    }

    /// Execution count of an address (0 if never executed)
    pub fn get(&self, addr: u64) -> u64 {
        self.counts.get(&addr).copied().unwrap_or(0)
    }

    /// Number of distinct addresses with an entry
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no address was covered by any range
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of ranges fed into the table, including no-op ones
    pub fn ranges_observed(&self) -> usize {
        self.ranges_observed
    }

    /// Iterate `(address, count)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&addr, &count)| (addr, count))
    }
}

/// Aggregate a sequence of ranges into a fresh table
///
/// **Public** - main entry point for address aggregation
///
/// # Arguments
/// * `ranges` - Ranges from any number of trace files
/// * `sink` - Receives diagnostics for malformed ranges
///
/// # Returns
/// Table mapping each covered address to the sum of the hit counts of
/// every range containing it. An empty table means no coverage data.
pub fn aggregate<I>(ranges: I, sink: &mut dyn DiagnosticSink) -> AddressCountTable
where
    I: IntoIterator<Item = AddressRange>,
{
    let mut table = AddressCountTable::new();
    table.add_ranges(ranges, sink);

    debug!(
        "Aggregated {} ranges into {} addresses",
        table.ranges_observed(),
        table.len()
    );

    table
}
