use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::CellGrid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_headed_grid(grid: &CellGrid) -> Self {
        let Some((header, body)) = grid.rows().split_first() else {
            return Self::default();
        };

        let mut table = Self::new(unique_headers(header));
        for row in body {
            table.push_row(row.iter().cloned().map(Some).collect());
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(index) => {
                self.columns[index] = to.to_string();
                true
            }
            None => false,
        }
    }

    pub fn add_column(&mut self, name: &str, fill: Option<String>) {
        if self.has_column(name) {
            return;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
    }

    pub fn set_column_values(&mut self, name: &str, values: Vec<Option<String>>) {
        self.add_column(name, None);
        let Some(index) = self.column_index(name) else {
            return;
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value;
        }
    }

    pub fn map_cells(&mut self, transform: impl Fn(&str) -> String) {
        for cell in self.rows.iter_mut().flatten().flatten() {
            *cell = transform(cell);
        }
    }

    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let mut combined = Table::default();

        for table in tables {
            for column in &table.columns {
                combined.add_column(column, None);
            }
            let positions = table
                .columns
                .iter()
                .map(|column| combined.column_index(column))
                .collect::<Vec<Option<usize>>>();

            for row in table.rows {
                let mut merged = vec![None; combined.columns.len()];
                for (value, position) in row.into_iter().zip(&positions) {
                    if let Some(index) = position {
                        merged[*index] = value;
                    }
                }
                combined.rows.push(merged);
            }
        }

        combined
    }

    pub fn index_by(&self, column: &str) -> HashMap<&str, Vec<usize>> {
        let mut index = HashMap::<&str, Vec<usize>>::new();
        let Some(position) = self.column_index(column) else {
            return index;
        };

        for (row_index, row) in self.rows.iter().enumerate() {
            if let Some(key) = row[position].as_deref() {
                index.entry(key).or_default().push(row_index);
            }
        }
        index
    }

    pub fn project(&self, order: &[&str]) -> Table {
        let kept = order
            .iter()
            .filter_map(|name| self.column_index(name).map(|index| (*name, index)))
            .collect::<Vec<(&str, usize)>>();

        Table {
            columns: kept.iter().map(|(name, _)| name.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| kept.iter().map(|(_, index)| row[*index].clone()).collect())
                .collect(),
        }
    }

    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Table {
        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }
}

fn unique_headers(header: &[String]) -> Vec<String> {
    let mut seen = HashSet::<String>::new();
    header
        .iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut suffix = 0;
            while seen.contains(&candidate) {
                suffix += 1;
                candidate = format!("{name}_{suffix}");
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> CellGrid {
        CellGrid::new(
            rows.iter()
                .map(|row| row.iter().map(|value| value.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn duplicate_headers_keep_every_cell() {
        let table = Table::from_headed_grid(&grid(&[
            &["HAWB\nNumber", "", "Origin", ""],
            &["X1", "left", "CMB", "right"],
        ]));

        assert_eq!(table.columns(), ["HAWB\nNumber", "", "Origin", "_1"]);
        assert_eq!(table.value(0, ""), Some("left"));
        assert_eq!(table.value(0, "_1"), Some("right"));
    }

    #[test]
    fn duplicate_header_suffix_skips_names_already_taken() {
        let table = Table::from_headed_grid(&grid(&[&["Pcs", "Pcs_1", "Pcs"], &["1", "2", "3"]]));

        assert_eq!(table.columns(), ["Pcs", "Pcs_1", "Pcs_2"]);
        assert_eq!(table.value(0, "Pcs_2"), Some("3"));
    }

    #[test]
    fn concat_fills_missing_columns_with_none() {
        let first = Table::from_headed_grid(&grid(&[&["HAWB", "Pcs"], &["X1", "2"]]));
        let second = Table::from_headed_grid(&grid(&[&["Origin", "HAWB"], &["CMB", "X2"]]));

        let combined = Table::concat([first, second]);

        assert_eq!(combined.columns(), ["HAWB", "Pcs", "Origin"]);
        assert_eq!(combined.value(0, "Origin"), None);
        assert_eq!(combined.value(1, "HAWB"), Some("X2"));
        assert_eq!(combined.value(1, "Pcs"), None);
    }
}
