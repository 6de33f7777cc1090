use std::env;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::cli::{OutputArgs, ReaderArgs};
use crate::config::{PipelineConfig, ReaderConfig};
use crate::export::{ExportFormat, write_table};
use crate::model::{InputEntry, RunManifest};
use crate::table::Table;
use crate::util::{rfc3339, run_id, sha256_file, write_json_pretty};

pub mod extract;
pub mod inspect;
pub mod reconcile;

fn load_config(config_path: Option<&Path>, reader_args: &ReaderArgs) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load_or_default(config_path)?;
    apply_reader_args(&mut config.reader, reader_args);
    Ok(config)
}

fn apply_reader_args(reader: &mut ReaderConfig, args: &ReaderArgs) {
    if let Some(kind) = args.reader {
        reader.kind = kind;
    }
    if let Some(command) = &args.reader_command {
        reader.command = Some(command.clone());
    }
}

fn write_output(table: &Table, output: &OutputArgs) -> Result<()> {
    let path = output.output.as_deref();
    let format = output
        .format
        .or_else(|| path.map(ExportFormat::from_path))
        .unwrap_or(ExportFormat::Csv);

    write_table(table, path, format)?;
    if let Some(path) = path {
        info!(path = %path.display(), rows = table.row_count(), "wrote result table");
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum RunStatus {
    Completed,
    NoData,
}

impl RunStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::NoData => "no_data",
        }
    }
}

struct RunSummary<'a> {
    command: &'a str,
    started: DateTime<Utc>,
    reader: &'a str,
    inputs: &'a [(&'a str, &'a Path)],
    status: RunStatus,
    row_count: usize,
    output_path: Option<&'a Path>,
    warnings: Vec<String>,
}

fn write_run_manifest(path: &Path, summary: RunSummary<'_>) -> Result<()> {
    let inputs = summary
        .inputs
        .iter()
        .map(|(role, input)| {
            Ok(InputEntry {
                role: role.to_string(),
                path: input.display().to_string(),
                sha256: sha256_file(input)?,
            })
        })
        .collect::<Result<Vec<InputEntry>>>()?;

    let manifest = RunManifest {
        manifest_version: 1,
        run_id: run_id(summary.command, summary.started),
        command: env::args().collect::<Vec<String>>().join(" "),
        status: summary.status.as_str().to_string(),
        started_at: rfc3339(summary.started),
        finished_at: rfc3339(Utc::now()),
        reader: summary.reader.to_string(),
        inputs,
        row_count: summary.row_count,
        output_path: summary.output_path.map(|path| path.display().to_string()),
        warnings: summary.warnings,
    };

    write_json_pretty(path, &manifest)?;
    info!(path = %path.display(), run_id = %manifest.run_id, "wrote run manifest");
    Ok(())
}
