use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::{RunStatus, RunSummary, load_config, write_output, write_run_manifest};
use crate::cli::ExtractArgs;
use crate::error::Outcome;
use crate::extract::InvoiceExtractor;
use crate::model::invoice_table;
use crate::reader::build_reader;

pub fn run(args: ExtractArgs, config_path: Option<&Path>) -> Result<()> {
    let started = Utc::now();

    let mut config = load_config(config_path, &args.reader)?;
    if let Some(rows_after) = args.rows_after {
        config.extract.rows_after = rows_after;
    }
    if let Some(line_scale) = args.line_scale {
        config.extract.line_scale = line_scale;
    }
    if args.no_item_price {
        config.extract.item_price = false;
    }

    let reader = build_reader(&config.reader)?;
    let extractor = InvoiceExtractor::new(config.extract.clone())?;

    info!(
        pdf = %args.pdf.display(),
        reader = reader.name(),
        rows_after = config.extract.rows_after,
        line_scale = config.extract.line_scale,
        "starting invoice extraction"
    );

    let mut warnings = Vec::new();
    let (status, row_count) = match extractor.extract_document(reader.as_ref(), &args.pdf)? {
        Outcome::NoData => {
            warn!(pdf = %args.pdf.display(), "no matching data found");
            warnings.push("no anchor rows matched; nothing written".to_string());
            (RunStatus::NoData, 0)
        }
        Outcome::Rows(records) => {
            let table = invoice_table(&records, config.extract.item_price);
            write_output(&table, &args.output)?;
            info!(records = records.len(), "invoice extraction completed");
            (RunStatus::Completed, records.len())
        }
    };

    if let Some(manifest_path) = &args.output.manifest_path {
        write_run_manifest(
            manifest_path,
            RunSummary {
                command: "extract",
                started,
                reader: reader.name(),
                inputs: &[("invoice", args.pdf.as_path())],
                status,
                row_count,
                output_path: match status {
                    RunStatus::Completed => args.output.output.as_deref(),
                    RunStatus::NoData => None,
                },
                warnings,
            },
        )?;
    }

    Ok(())
}
