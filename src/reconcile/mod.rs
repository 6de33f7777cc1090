use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{ManifestSide, PipelineError};
use crate::reader::TableReader;
use crate::table::Table;

mod expand;
mod join;

pub use expand::expand_table;
pub use join::left_join;

pub const JOIN_KEY: &str = "HAWB";
pub const ORIGIN: &str = "Origin";
pub const SECONDARY: &str = "secondary";
pub const TYPE: &str = "Type";

const PARENT_HAWB_HEADER: &str = "HAWB\nNumber";
const CHILD_HAWB_HEADER: &str = "HAWB\nShipment";
const CHILD_SECONDARY_HEADER: &str = "Secondary Tracking Numbers";

pub const CANONICAL_COLUMNS: [&str; 13] = [
    "Origin",
    "#",
    "HAWB",
    "Pcs",
    "Weight",
    "Shipper Details",
    "Dest",
    "Bill\nTerm",
    "Consignee Details",
    "Description\nof Goods",
    "Total\nValue",
    "Total\nValue(LKR)",
    "Type",
];

pub fn read_manifest(reader: &dyn TableReader, path: &Path) -> Result<Table, PipelineError> {
    let grids = reader
        .read_first_tables(path)
        .map_err(|err| PipelineError::processing(path, format!("{err:#}")))?;

    let table = Table::concat(grids.iter().map(Table::from_headed_grid));
    if table.is_empty() {
        warn!(path = %path.display(), "no tables found in manifest");
    }
    debug!(path = %path.display(), columns = ?table.columns(), "manifest columns");
    Ok(table)
}

pub fn reconcile_documents(
    reader: &dyn TableReader,
    parents: [&Path; 2],
    child: &Path,
) -> Result<Table, PipelineError> {
    let parent_1 = read_manifest(reader, parents[0])?;
    let parent_2 = read_manifest(reader, parents[1])?;
    let child = read_manifest(reader, child)?;
    reconcile(parent_1, parent_2, child)
}

pub fn reconcile(parent_1: Table, parent_2: Table, child: Table) -> Result<Table, PipelineError> {
    let mut parent = Table::concat([parent_1, parent_2]);
    if parent.is_empty() {
        return Err(PipelineError::NoParentData);
    }
    let mut child = child;
    if child.is_empty() {
        warn!("child manifest produced no data; proceeding with parent rows only");
    }

    parent.map_cells(clean_cell);
    child.map_cells(clean_cell);

    alias_parent_headers(&mut parent);
    alias_child_headers(&mut child);

    if !parent.has_column(JOIN_KEY) {
        return Err(PipelineError::SchemaMismatch {
            side: ManifestSide::Parent,
            column: JOIN_KEY,
        });
    }
    if !child.is_empty() && !child.has_column(JOIN_KEY) {
        return Err(PipelineError::SchemaMismatch {
            side: ManifestSide::Child,
            column: JOIN_KEY,
        });
    }

    let mut joined = left_join(&parent, &child, JOIN_KEY);
    repair_joined(&mut joined, &parent);

    let expanded = expand_table(&joined, JOIN_KEY, SECONDARY, TYPE);
    let output = expanded.project(&CANONICAL_COLUMNS);

    info!(
        parent_rows = parent.row_count(),
        child_rows = child.row_count(),
        joined_rows = joined.row_count(),
        output_rows = output.row_count(),
        "reconciled manifests"
    );

    Ok(output)
}

pub fn clean_cell(value: &str) -> String {
    value.replace("\\n", " ").trim().to_string()
}

pub fn alias_parent_headers(parent: &mut Table) {
    parent.rename_column(PARENT_HAWB_HEADER, JOIN_KEY);

    if parent.has_column(ORIGIN) {
        return;
    }
    let candidates = parent
        .columns()
        .iter()
        .filter(|name| name.to_lowercase().contains("origin"))
        .cloned()
        .collect::<Vec<String>>();
    match candidates.as_slice() {
        [only] => {
            debug!(column = %only, "aliasing origin column");
            parent.rename_column(only, ORIGIN);
        }
        [] => {}
        _ => warn!(candidates = ?candidates, "ambiguous origin columns left unrenamed"),
    }
}

pub fn alias_child_headers(child: &mut Table) {
    child.rename_column(CHILD_HAWB_HEADER, JOIN_KEY);
    child.rename_column(CHILD_SECONDARY_HEADER, SECONDARY);
}

fn repair_joined(joined: &mut Table, parent: &Table) {
    if !joined.has_column(ORIGIN) {
        if parent.has_column(ORIGIN) {
            let mut origin_by_key = HashMap::<&str, Option<&str>>::new();
            for row in 0..parent.row_count() {
                if let Some(key) = parent.value(row, JOIN_KEY) {
                    origin_by_key
                        .entry(key)
                        .or_insert_with(|| parent.value(row, ORIGIN));
                }
            }

            let values = (0..joined.row_count())
                .map(|row| {
                    joined
                        .value(row, JOIN_KEY)
                        .and_then(|key| origin_by_key.get(key).copied().flatten())
                        .map(ToOwned::to_owned)
                })
                .collect::<Vec<Option<String>>>();
            joined.set_column_values(ORIGIN, values);
        } else {
            warn!("no origin column in parent manifests; output will omit it");
        }
    }

    if !joined.has_column(SECONDARY) {
        joined.add_column(SECONDARY, Some(String::new()));
    }
}
