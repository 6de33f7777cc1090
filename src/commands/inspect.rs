use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::InspectArgs;
use crate::model::CellGrid;
use crate::reader::build_reader;
use crate::util::write_json_pretty;

#[derive(Debug, Serialize)]
struct GridDump<'a> {
    table: usize,
    row_count: usize,
    column_count: usize,
    rows: &'a [Vec<String>],
}

pub fn run(args: InspectArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, &args.reader)?;
    let reader = build_reader(&config.reader)?;
    let line_scale = args.line_scale.unwrap_or(config.extract.line_scale);

    let grids = if args.first_tables {
        reader.read_first_tables(&args.pdf)
    } else {
        reader.read_lattice(&args.pdf, line_scale)
    }
    .with_context(|| format!("failed to read tables from {}", args.pdf.display()))?;

    info!(
        pdf = %args.pdf.display(),
        reader = reader.name(),
        tables = grids.len(),
        first_tables = args.first_tables,
        "read tables"
    );

    let dump = dump_grids(&grids);
    match &args.output {
        Some(path) => {
            write_json_pretty(path, &dump)?;
            info!(path = %path.display(), "wrote grid dump");
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)
                .context("failed to write grid dump to stdout")?;
            writeln!(stdout).context("failed to write grid dump to stdout")?;
        }
    }

    Ok(())
}

fn dump_grids(grids: &[CellGrid]) -> Vec<GridDump<'_>> {
    grids
        .iter()
        .enumerate()
        .map(|(table, grid)| GridDump {
            table,
            row_count: grid.row_count(),
            column_count: grid.column_count(),
            rows: grid.rows(),
        })
        .collect()
}
