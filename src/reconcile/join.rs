use crate::table::Table;

pub const PARENT_SUFFIX: &str = "_parent";
pub const CHILD_SUFFIX: &str = "_child";

pub fn left_join(parent: &Table, child: &Table, key: &str) -> Table {
    let Some(parent_key) = parent.column_index(key) else {
        return parent.clone();
    };
    let Some(child_key) = child.column_index(key) else {
        return parent.clone();
    };

    let child_columns = child
        .columns()
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != child_key)
        .collect::<Vec<(usize, &String)>>();

    let mut columns = parent
        .columns()
        .iter()
        .map(|name| {
            if name != key && child.has_column(name) {
                format!("{name}{PARENT_SUFFIX}")
            } else {
                name.clone()
            }
        })
        .collect::<Vec<String>>();
    columns.extend(child_columns.iter().map(|(_, name)| {
        if parent.has_column(name) {
            format!("{name}{CHILD_SUFFIX}")
        } else {
            name.to_string()
        }
    }));

    let child_index = child.index_by(key);
    let mut rows = Vec::with_capacity(parent.row_count());

    for parent_row in parent.rows() {
        let matches = parent_row[parent_key]
            .as_deref()
            .and_then(|value| child_index.get(value));

        match matches {
            Some(child_rows) => {
                for child_row in child_rows {
                    let mut row = parent_row.clone();
                    row.extend(
                        child_columns
                            .iter()
                            .map(|(index, _)| child.rows()[*child_row][*index].clone()),
                    );
                    rows.push(row);
                }
            }
            None => {
                let mut row = parent_row.clone();
                row.resize(columns.len(), None);
                rows.push(row);
            }
        }
    }

    Table::from_parts(columns, rows)
}
