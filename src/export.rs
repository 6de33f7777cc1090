use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;

use crate::error::PipelineError;
use crate::table::Table;
use crate::util::ensure_directory;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json { Self::Json } else { Self::Csv }
    }
}

pub fn write_table(
    table: &Table,
    path: Option<&Path>,
    format: ExportFormat,
) -> Result<(), PipelineError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                ensure_directory(parent).map_err(|err| PipelineError::write(path, format!("{err:#}")))?;
            }
            let file = File::create(path).map_err(|err| PipelineError::write(path, err))?;
            write_to(table, file, format).map_err(|err| PipelineError::write(path, err))
        }
        None => write_to(table, io::stdout().lock(), format)
            .map_err(|err| PipelineError::write(Path::new("<stdout>"), err)),
    }
}

fn write_to<W: Write>(table: &Table, writer: W, format: ExportFormat) -> io::Result<()> {
    match format {
        ExportFormat::Csv => write_csv(table, writer),
        ExportFormat::Json => write_json(table, writer),
    }
}

fn write_csv<W: Write>(table: &Table, writer: W) -> io::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.columns())?;
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))?;
    }
    csv_writer.flush()
}

fn write_json<W: Write>(table: &Table, mut writer: W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, table)?;
    writer.write_all(b"\n")?;
    writer.flush()
}
