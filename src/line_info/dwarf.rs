//! DWARF-backed line mapper.
//!
//! Walks every row of the binary's line tables. Each row names a
//! (file, line) pair and the address where that line's code starts; the
//! line is instrumented, and it was executed as often as that address was.

use super::{LineCountTable, LineMapper};
use crate::aggregator::AddressCountTable;
use crate::utils::error::LineMapError;
use addr2line::Context;
use log::{debug, info};
use std::path::Path;

type Reader = addr2line::gimli::EndianReader<addr2line::gimli::RunTimeEndian, std::rc::Rc<[u8]>>;

/// Line mapper reading DWARF line tables with `addr2line`
#[derive(Debug, Default, Clone, Copy)]
pub struct DwarfLineMapper;

impl DwarfLineMapper {
    pub fn new() -> Self {
        Self
    }

    fn load_context(binary_path: &Path) -> Result<Option<Context<Reader>>, LineMapError> {
        debug!("Loading binary for line mapping: {}", binary_path.display());

        let file_data = std::fs::read(binary_path).map_err(|source| LineMapError::ReadFailed {
            path: binary_path.to_path_buf(),
            source,
        })?;
        let obj = object::File::parse(&*file_data)?;

        let context = Context::new(&obj).ok();

        if context.is_none() {
            info!("No debug information (DWARF) found in {}. Line coverage will be empty.", binary_path.display());
            info!("Tip: Compile the target with -g so its line tables are available.");
        }

        Ok(context)
    }
}

impl LineMapper for DwarfLineMapper {
    fn resolve(
        &self,
        addr_counts: &AddressCountTable,
        binary_path: &Path,
    ) -> Result<LineCountTable, LineMapError> {
        let mut table = LineCountTable::new();

        let Some(context) = Self::load_context(binary_path)? else {
            return Ok(table);
        };

        let mut rows = 0usize;
        let mut matched = 0usize;

        for (addr, _len, location) in context.find_location_range(0, u64::MAX)? {
            let (Some(file), Some(line)) = (location.file, location.line) else {
                continue;
            };
            // Line 0 marks compiler-generated code with no source line
            if line == 0 {
                continue;
            }

            rows += 1;
            let count = addr_counts.get(addr);
            if count != 0 {
                matched += 1;
            }

            let entry = table
                .entry(file.to_string())
                .or_default()
                .entry(line)
                .or_insert(0);
            *entry = entry.saturating_add(count);
        }

        debug!(
            "Line tables: {} rows over {} files, {} rows executed; {} traced addresses had no row",
            rows,
            table.len(),
            matched,
            addr_counts.len().saturating_sub(matched)
        );

        Ok(table)
    }
}
