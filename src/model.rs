use serde::{Deserialize, Serialize};

use crate::table::Table;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct CellGrid {
    rows: Vec<Vec<String>>,
    column_count: usize,
}

impl CellGrid {
    pub fn new(mut rows: Vec<Vec<String>>) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(column_count, String::new());
        }
        Self { rows, column_count }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<String>>> for CellGrid {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

impl From<CellGrid> for Vec<Vec<String>> {
    fn from(grid: CellGrid) -> Self {
        grid.rows
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceRecord {
    pub container_mark: String,
    pub description: String,
    pub commodity_code: String,
    pub gross_mass: String,
    pub item_price: Option<String>,
}

pub const INVOICE_COLUMNS: [&str; 5] = [
    "Marks & Nosof Packages",
    "Description",
    "Commodity_Code",
    "Gross_Mass",
    "Item_Price",
];

pub fn invoice_table(records: &[InvoiceRecord], with_item_price: bool) -> Table {
    let width = if with_item_price { 5 } else { 4 };
    let mut table = Table::new(INVOICE_COLUMNS[..width].iter().map(|name| name.to_string()));

    for record in records {
        let mut row = vec![
            Some(record.container_mark.clone()),
            Some(record.description.clone()),
            Some(record.commodity_code.clone()),
            Some(record.gross_mass.clone()),
        ];
        if with_item_price {
            row.push(Some(record.item_price.clone().unwrap_or_default()));
        }
        table.push_row(row);
    }

    table
}

#[derive(Debug, Clone, Serialize)]
pub struct InputEntry {
    pub role: String,
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub command: String,
    pub status: String,
    pub started_at: String,
    pub finished_at: String,
    pub reader: String,
    pub inputs: Vec<InputEntry>,
    pub row_count: usize,
    pub output_path: Option<String>,
    pub warnings: Vec<String>,
}
