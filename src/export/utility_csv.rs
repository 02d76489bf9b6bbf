//! CSV export of a utility store
//!
//! One row per state-action entry, sorted by state then action, so two
//! exports of the same table diff cleanly.

use std::{io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, q_learning::UtilityStore, types::Action};

/// A single row in the utility CSV export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityExportRecord {
    pub bird_y: i32,
    pub gap_center: i32,
    pub pipe_distance: i32,
    pub action: Action,
    pub utility_value: f64,
    pub visit_count: u64,
}

/// Exporter for utility CSV files
pub struct UtilityCsvExporter;

impl UtilityCsvExporter {
    /// Rows for every entry with at least `min_visits` visits
    pub fn records(store: &UtilityStore, min_visits: u64) -> Vec<UtilityExportRecord> {
        store
            .sorted_entries()
            .into_iter()
            .filter(|(_, entry)| entry.visit_count >= min_visits)
            .map(|(key, entry)| UtilityExportRecord {
                bird_y: key.state.bird_y,
                gap_center: key.state.gap_center,
                pipe_distance: key.state.pipe_distance,
                action: key.action,
                utility_value: entry.utility_value,
                visit_count: entry.visit_count,
            })
            .collect()
    }

    /// Write rows to any writer, header first
    ///
    /// # Returns
    /// Number of rows written
    pub fn write<W: Write>(store: &UtilityStore, min_visits: u64, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let records = Self::records(store, min_visits);
        for record in &records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(records.len())
    }

    /// Export the store to a CSV file
    pub fn export(store: &UtilityStore, min_visits: u64, path: &Path) -> Result<usize> {
        let file = std::fs::File::create(path).map_err(|source| crate::Error::Io {
            operation: format!("create CSV file {path:?}"),
            source,
        })?;
        Self::write(store, min_visits, file)
    }
}
