//! tbcov
//!
//! Line coverage reports from translation block execution traces.
//!
//! A dynamic analysis run leaves `tbcoverage-*.json` files recording which
//! translation blocks of the target executed. This crate sums them into
//! per-address counts, maps addresses to source lines through the binary's
//! DWARF line tables and writes an LCOV `coverage.info` that `genhtml` can
//! turn into HTML.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install tbcov
//! tbcov lcov --project ./projects/my-target --html
//! ```

pub mod aggregator;
pub mod commands;
pub mod line_info;
pub mod output;
pub mod parser;
pub mod utils;
