use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use serde::Deserialize;

use crate::config::ReaderConfig;
use crate::error::PipelineError;
use crate::model::CellGrid;

mod command;
mod json;
mod pdftotext;

pub use command::CommandReader;
pub use json::JsonGridReader;
pub use pdftotext::PdftotextReader;

pub trait TableReader: Send + Sync {
    fn name(&self) -> &'static str;

    fn read_lattice(&self, path: &Path, line_scale: u32) -> Result<Vec<CellGrid>>;

    fn read_first_tables(&self, path: &Path) -> Result<Vec<CellGrid>>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderKind {
    Pdftotext,
    Command,
    Json,
}

pub fn build_reader(config: &ReaderConfig) -> Result<Box<dyn TableReader>, PipelineError> {
    match config.kind {
        ReaderKind::Pdftotext => Ok(Box::new(PdftotextReader::new()?)),
        ReaderKind::Json => Ok(Box::new(JsonGridReader)),
        ReaderKind::Command => {
            let program = config.command.clone().ok_or_else(|| {
                PipelineError::Config("reader kind 'command' requires reader.command".to_string())
            })?;
            Ok(Box::new(CommandReader::new(program, config.args.clone())))
        }
    }
}

fn parse_grid_json(raw: &[u8]) -> serde_json::Result<Vec<CellGrid>> {
    serde_json::from_slice(raw)
}
