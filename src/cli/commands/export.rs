//! Export command - Dump a saved utility table for analysis

use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{adapters::MsgPackRepository, export::UtilityCsvExporter, ports::UtilityRepository};

#[derive(Parser, Debug)]
#[command(about = "Export a saved utility table")]
pub struct ExportArgs {
    /// Saved utility table (MessagePack)
    pub input: PathBuf,

    /// Output file path
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Export format
    #[arg(long, short = 'f', value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Skip entries visited fewer times than this
    #[arg(long, default_value_t = 0)]
    pub min_visits: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format, one row per state-action entry
    Csv,
    /// JSON array of the same rows
    Json,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let snapshot = MsgPackRepository::new()
        .load(&args.input)
        .with_context(|| format!("Failed to load utility table from {}", args.input.display()))?;
    let store = snapshot.to_store()?;

    let rows = match args.format {
        ExportFormat::Csv => UtilityCsvExporter::export(&store, args.min_visits, &args.output)?,
        ExportFormat::Json => {
            let records = UtilityCsvExporter::records(&store, args.min_visits);
            let file = File::create(&args.output).with_context(|| {
                format!("Failed to create output file {}", args.output.display())
            })?;
            serde_json::to_writer_pretty(BufWriter::new(file), &records)?;
            records.len()
        }
    };

    println!(
        "Exported {rows} of {} entries to {}",
        store.len(),
        args.output.display()
    );
    Ok(())
}
