//! Column-wise tables and the records zipped out of them.
//!
//! Flattened dumps yield one column at a time. A [`Table`] collects those
//! columns and forces them to the row count of the primary column, so every
//! [`Record`] has exactly one cell per column.

use serde::{Deserialize, Serialize};

use crate::SENTINEL;

/// A named list of raw cells recovered from one column of a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pads with [`SENTINEL`] or truncates so the column holds exactly `rows`
    /// cells.
    pub fn fit_to(&mut self, rows: usize) {
        self.cells.resize_with(rows, || SENTINEL.to_string());
    }
}

/// Columns of one table, all with the primary column's row count.
///
/// # Examples
///
/// ```
/// use sitedump_core::{Column, Table};
///
/// let domains = Column::new("domain", vec!["a.com".into(), "b.net".into()]);
/// let ranks = Column::new("global_rank", vec!["#12".into()]);
/// let table = Table::assemble(domains, vec![ranks]);
///
/// assert_eq!(table.row_count(), 2);
/// let second = table.record(1).unwrap();
/// assert_eq!(second.index, 2);
/// assert_eq!(second.cells, vec!["b.net", "-"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Zips `primary` with the remaining columns.
    ///
    /// The primary column alone fixes the row count; every other column is
    /// padded with the sentinel or truncated to match.
    pub fn assemble(primary: Column, rest: Vec<Column>) -> Self {
        let rows = primary.len();
        let mut columns = Vec::with_capacity(rest.len() + 1);
        columns.push(primary);
        for mut column in rest {
            column.fit_to(rows);
            columns.push(column);
        }
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn header(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    /// Returns the record at zero-based `row`.
    pub fn record(&self, row: usize) -> Option<Record> {
        if row >= self.rows {
            return None;
        }
        let cells = self
            .columns
            .iter()
            .map(|column| column.cells[row].clone())
            .collect();
        Some(Record {
            index: row + 1,
            cells,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.rows).filter_map(|row| self.record(row))
    }
}

/// One row of a [`Table`]: a 1-based index plus one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub index: usize,
    pub cells: Vec<String>,
}

impl Record {
    /// Returns the cell at `position`, or the sentinel when out of range.
    pub fn cell(&self, position: usize) -> &str {
        self.cells.get(position).map_or(SENTINEL, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, cells: &[&str]) -> Column {
        Column::new(name, cells.iter().map(|cell| cell.to_string()).collect())
    }

    #[test]
    fn test_primary_column_fixes_row_count() {
        let table = Table::assemble(
            column("domain", &["a.com", "b.net", "c.org"]),
            vec![
                column("industry", &["Shopping"]),
                column("rank", &["#1", "#2", "#3", "#4", "#5"]),
            ],
        );

        assert_eq!(table.row_count(), 3);
        for column in table.columns() {
            assert_eq!(column.len(), 3, "column {} not fitted", column.name);
        }
        assert_eq!(table.column("industry").unwrap().cells[2], SENTINEL);
        assert_eq!(table.column("rank").unwrap().cells[2], "#3");
    }

    #[test]
    fn test_records_are_one_based() {
        let table = Table::assemble(column("domain", &["a.com", "b.net"]), Vec::new());
        let indices: Vec<usize> = table.records().map(|record| record.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(table.record(2).is_none());
    }

    #[test]
    fn test_empty_primary_yields_empty_table() {
        let table = Table::assemble(column("domain", &[]), vec![column("rank", &["#1"])]);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.records().count(), 0);
        assert!(table.column("rank").unwrap().is_empty());
    }

    #[test]
    fn test_record_cell_out_of_range_is_sentinel() {
        let record = Record {
            index: 1,
            cells: vec!["a.com".to_string()],
        };
        assert_eq!(record.cell(0), "a.com");
        assert_eq!(record.cell(4), SENTINEL);
    }

    #[test]
    fn test_header_lists_columns_in_order() {
        let table = Table::assemble(
            column("domain", &["a.com"]),
            vec![column("industry", &[]), column("change", &[])],
        );
        assert_eq!(table.header(), vec!["domain", "industry", "change"]);
    }
}
