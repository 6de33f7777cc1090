use std::fmt;

use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowType {
    Master,
    Baby,
}

impl RowType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Baby => "Baby",
        }
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn secondary_ids(cell: Option<&str>) -> Vec<String> {
    cell.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn expand_row(
    row: &[Option<String>],
    key_index: usize,
    secondary: &[String],
) -> Vec<(Vec<Option<String>>, RowType)> {
    let mut expanded = Vec::with_capacity(secondary.len() + 1);
    expanded.push((row.to_vec(), RowType::Master));

    for id in secondary {
        let mut baby = row.to_vec();
        if let Some(cell) = baby.get_mut(key_index) {
            *cell = Some(id.clone());
        }
        expanded.push((baby, RowType::Baby));
    }

    expanded
}

pub fn expand_table(
    joined: &Table,
    key: &str,
    secondary_column: &str,
    type_column: &str,
) -> Table {
    let mut columns = joined.columns().to_vec();
    let type_index = match joined.column_index(type_column) {
        Some(index) => index,
        None => {
            columns.push(type_column.to_string());
            columns.len() - 1
        }
    };
    let key_index = joined.column_index(key);
    let secondary_index = joined.column_index(secondary_column);

    let mut rows = Vec::new();
    for row in joined.rows() {
        let ids = secondary_ids(secondary_index.and_then(|index| row[index].as_deref()));
        let copies = match key_index {
            Some(key_index) => expand_row(row, key_index, &ids),
            None => vec![(row.clone(), RowType::Master)],
        };

        for (mut cells, row_type) in copies {
            cells.resize(columns.len(), None);
            cells[type_index] = Some(row_type.as_str().to_string());
            rows.push(cells);
        }
    }

    Table::from_parts(columns, rows)
}
