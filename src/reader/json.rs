use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::{TableReader, parse_grid_json};
use crate::model::CellGrid;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonGridReader;

impl JsonGridReader {
    fn load(&self, path: &Path) -> Result<Vec<CellGrid>> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        parse_grid_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}

impl TableReader for JsonGridReader {
    fn name(&self) -> &'static str {
        "json"
    }

    fn read_lattice(&self, path: &Path, _line_scale: u32) -> Result<Vec<CellGrid>> {
        self.load(path)
    }

    fn read_first_tables(&self, path: &Path) -> Result<Vec<CellGrid>> {
        self.load(path)
    }
}
