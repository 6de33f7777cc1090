use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::PipelineError;
use crate::reader::ReaderKind;

pub const DEFAULT_ROWS_AFTER: usize = 4;
pub const DEFAULT_LINE_SCALE: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub marks: usize,
    pub commodity: usize,
    pub item_price: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            marks: 1,
            commodity: 12,
            item_price: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub rows_after: usize,
    pub line_scale: u32,
    pub columns: ColumnLayout,
    pub item_price: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            rows_after: DEFAULT_ROWS_AFTER,
            line_scale: DEFAULT_LINE_SCALE,
            columns: ColumnLayout::default(),
            item_price: true,
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.line_scale == 0 {
            return Err(PipelineError::Config(
                "line_scale must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub kind: ReaderKind,
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            kind: ReaderKind::Pdftotext,
            command: None,
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extract: ExtractConfig,
    pub reader: ReaderConfig,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            PipelineError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        let config: PipelineConfig = toml::from_str(&raw).map_err(|err| {
            PipelineError::Config(format!("failed to parse {}: {err}", path.display()))
        })?;
        config.extract.validate()?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, PipelineError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
