use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use super::{RunStatus, RunSummary, load_config, write_output, write_run_manifest};
use crate::cli::ReconcileArgs;
use crate::reader::build_reader;
use crate::reconcile::reconcile_documents;

pub fn run(args: ReconcileArgs, config_path: Option<&Path>) -> Result<()> {
    let started = Utc::now();

    let config = load_config(config_path, &args.reader)?;
    let reader = build_reader(&config.reader)?;

    info!(
        parent_1 = %args.parent_1.display(),
        parent_2 = %args.parent_2.display(),
        child = %args.child.display(),
        reader = reader.name(),
        "starting manifest reconciliation"
    );

    let table = reconcile_documents(
        reader.as_ref(),
        [args.parent_1.as_path(), args.parent_2.as_path()],
        &args.child,
    )
    .context("manifest reconciliation failed")?;

    write_output(&table, &args.output)?;
    info!(rows = table.row_count(), "manifest reconciliation completed");

    if let Some(manifest_path) = &args.output.manifest_path {
        write_run_manifest(
            manifest_path,
            RunSummary {
                command: "reconcile",
                started,
                reader: reader.name(),
                inputs: &[
                    ("parent_1", args.parent_1.as_path()),
                    ("parent_2", args.parent_2.as_path()),
                    ("child", args.child.as_path()),
                ],
                status: RunStatus::Completed,
                row_count: table.row_count(),
                output_path: args.output.output.as_deref(),
                warnings: Vec::new(),
            },
        )?;
    }

    Ok(())
}
