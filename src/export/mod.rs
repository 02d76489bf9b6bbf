//! Export functionality for analysis
//!
//! Currently supports CSV export of a learned utility store.

mod utility_csv;

pub use utility_csv::{UtilityCsvExporter, UtilityExportRecord};
