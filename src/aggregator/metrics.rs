//! Summary statistics over an aggregated address table.
//!
//! Only used for logging; the report itself is built from line counts.

use super::address_counts::AddressCountTable;

/// Address coverage statistics
///
/// **Public** - returned from calculate_address_stats
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressStats {
    /// Ranges fed into the table
    pub ranges_observed: usize,

    /// Distinct addresses executed at least once
    pub unique_addresses: usize,

    /// Sum of all per-address counts
    pub total_hits: u64,

    /// Highest count seen at a single address
    pub max_hits: u64,

    /// Lowest and highest covered address
    pub address_span: Option<(u64, u64)>,
}

/// Calculate address statistics
///
/// **Public** - provides summary statistics
pub fn calculate_address_stats(table: &AddressCountTable) -> AddressStats {
    let mut stats = AddressStats {
        ranges_observed: table.ranges_observed(),
        unique_addresses: table.len(),
        ..Default::default()
    };

    for (addr, count) in table.iter() {
        stats.total_hits = stats.total_hits.saturating_add(count);
        stats.max_hits = stats.max_hits.max(count);
        stats.address_span = Some(match stats.address_span {
            Some((lo, hi)) => (lo.min(addr), hi.max(addr)),
            None => (addr, addr),
        });
    }

    stats
}

impl AddressStats {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        let span = match self.address_span {
            Some((lo, hi)) => format!("{lo:#x}..={hi:#x}"),
            None => "none".to_string(),
        };
        format!(
            "Ranges: {} | Addresses: {} | Total hits: {} | Max: {} | Span: {}",
            self.ranges_observed, self.unique_addresses, self.total_hits, self.max_hits, span
        )
    }
}
