use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;

use tracing::{debug, info};

use crate::config::{ColumnLayout, ExtractConfig};
use crate::error::{Outcome, PipelineError};
use crate::model::{CellGrid, InvoiceRecord};
use crate::reader::TableReader;

mod rules;
#[cfg(test)]
mod tests;

pub use rules::FieldRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceColumn {
    Marks,
    Commodity,
    ItemPrice,
}

impl InvoiceColumn {
    pub fn index(self, layout: &ColumnLayout) -> usize {
        match self {
            Self::Marks => layout.marks,
            Self::Commodity => layout.commodity,
            Self::ItemPrice => layout.item_price,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvoiceExtractor {
    rules: FieldRules,
    config: ExtractConfig,
}

impl InvoiceExtractor {
    pub fn new(config: ExtractConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            rules: FieldRules::new()?,
            config,
        })
    }

    pub fn extract_document(
        &self,
        reader: &dyn TableReader,
        path: &Path,
    ) -> Result<Outcome<Vec<InvoiceRecord>>, PipelineError> {
        let grids = reader
            .read_lattice(path, self.config.line_scale)
            .map_err(|err| PipelineError::processing(path, format!("{err:#}")))?;

        info!(
            path = %path.display(),
            reader = reader.name(),
            tables = grids.len(),
            "read lattice tables"
        );

        let records = self.extract(&grids);
        if records.is_empty() {
            return Ok(Outcome::NoData);
        }
        Ok(Outcome::Rows(records))
    }

    pub fn extract(&self, grids: &[CellGrid]) -> Vec<InvoiceRecord> {
        let mut records = Vec::new();

        for (grid_index, grid) in grids.iter().enumerate() {
            for window in self.anchor_windows(grid) {
                debug!(
                    table = grid_index,
                    start = window.start,
                    end = window.end,
                    "extracting anchor window"
                );
                records.push(self.record_for_window(grid, window));
            }
        }

        records
    }

    pub fn anchor_windows(&self, grid: &CellGrid) -> Vec<Range<usize>> {
        grid.rows()
            .iter()
            .enumerate()
            .filter(|(_, cells)| self.rules.is_anchor_row(cells))
            .map(|(start, _)| {
                let end = start
                    .saturating_add(self.config.rows_after)
                    .saturating_add(1)
                    .min(grid.row_count());
                start..end
            })
            .collect()
    }

    fn record_for_window(&self, grid: &CellGrid, window: Range<usize>) -> InvoiceRecord {
        let marks_text = self.rules.normalize_marks(
            window_values(grid, &window, InvoiceColumn::Marks.index(&self.config.columns)),
        );
        let (container_mark, description) = self.rules.parse_marks_and_description(&marks_text);

        let commodity_text = self.column_text(grid, &window, InvoiceColumn::Commodity);
        let (commodity_code, gross_mass) =
            self.rules.parse_commodity_and_gross_mass(&commodity_text);

        let item_price = self.config.item_price.then(|| {
            let price_text = self.column_text(grid, &window, InvoiceColumn::ItemPrice);
            let excluded = if gross_mass.is_empty() {
                HashSet::new()
            } else {
                HashSet::from([gross_mass.as_str()])
            };
            self.rules
                .item_price(&price_text, &commodity_text, &excluded)
        });

        InvoiceRecord {
            container_mark,
            description,
            commodity_code,
            gross_mass,
            item_price,
        }
    }

    fn column_text(&self, grid: &CellGrid, window: &Range<usize>, column: InvoiceColumn) -> String {
        window_values(grid, window, column.index(&self.config.columns))
            .filter(|value| !value.trim().is_empty())
            .collect::<Vec<&str>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

fn window_values<'a>(
    grid: &'a CellGrid,
    window: &Range<usize>,
    column: usize,
) -> impl Iterator<Item = &'a str> {
    window
        .clone()
        .filter_map(move |row| grid.cell(row, column))
}
