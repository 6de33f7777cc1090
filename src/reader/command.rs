use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::{TableReader, parse_grid_json};
use crate::model::CellGrid;

#[derive(Debug, Clone)]
pub struct CommandReader {
    program: String,
    args: Vec<String>,
}

impl CommandReader {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    fn run(&self, pdf_path: &Path, flavor: &str, line_scale: Option<u32>) -> Result<Vec<CellGrid>> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg("--flavor").arg(flavor);
        if let Some(line_scale) = line_scale {
            command.arg("--line-scale").arg(line_scale.to_string());
        }
        command.arg(pdf_path);

        debug!(program = %self.program, flavor, pdf = %pdf_path.display(), "running table extractor");

        let output = command.output().with_context(|| {
            format!(
                "failed to execute {} for {}",
                self.program,
                pdf_path.display()
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} returned non-zero exit status for {}: {}",
                self.program,
                pdf_path.display(),
                stderr.trim()
            );
        }

        parse_grid_json(&output.stdout)
            .with_context(|| format!("{} produced invalid grid JSON", self.program))
    }
}

impl TableReader for CommandReader {
    fn name(&self) -> &'static str {
        "command"
    }

    fn read_lattice(&self, path: &Path, line_scale: u32) -> Result<Vec<CellGrid>> {
        self.run(path, "lattice", Some(line_scale))
    }

    fn read_first_tables(&self, path: &Path) -> Result<Vec<CellGrid>> {
        self.run(path, "first-table", None)
    }
}
