use std::cmp::Ordering;
use std::collections::HashMap;

/// The content of a single cell, as read from or written to a spreadsheet.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    /// A blank cell. This is also how missing values (nulls) are represented.
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A date or a time, as an Excel serial number.
    DateTime(f64),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Cell {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Cell {
        Cell::Number(x)
    }
}

/// A rectangular table with named columns.
///
/// Invariant: every row has exactly as many cells as there are columns.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Table {
        let mut t = Table::new(columns);
        for row in rows {
            t.push_row(row);
        }
        t
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there is no row, even if the table has columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All the cells of a column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Adds a row. Short rows are padded with empty cells, extra cells are dropped.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Inserts a column at the given position, with the same value on every row.
    pub fn insert_column(&mut self, idx: usize, name: &str, fill: Cell) {
        let idx = idx.min(self.columns.len());
        self.columns.insert(idx, name.to_string());
        for row in self.rows.iter_mut() {
            row.insert(idx, fill.clone());
        }
    }

    /// Appends a column, with the same value on every row.
    pub fn push_column(&mut self, name: &str, fill: Cell) {
        self.insert_column(self.columns.len(), name, fill);
    }

    /// Removes a column by name. Returns false if there was no such column.
    pub fn remove_column(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(idx) => {
                self.columns.remove(idx);
                for row in self.rows.iter_mut() {
                    row.remove(idx);
                }
                true
            }
            None => false,
        }
    }

    pub fn rename_column(&mut self, idx: usize, name: &str) {
        if let Some(c) = self.columns.get_mut(idx) {
            *c = name.to_string();
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(c) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *c = cell;
        }
    }

    /// Stable sort of the rows.
    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Vec<Cell>, &Vec<Cell>) -> Ordering,
    {
        self.rows.sort_by(compare);
    }

    /// Row-wise concatenation.
    ///
    /// The columns of the result are the union of all the columns, in order of
    /// first appearance. A cell is empty when its table did not have that column.
    pub fn concat(tables: &[&Table]) -> Table {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for t in tables {
            for c in t.columns.iter() {
                if !positions.contains_key(c) {
                    positions.insert(c.clone(), columns.len());
                    columns.push(c.clone());
                }
            }
        }

        let mut res = Table::new(columns);
        for t in tables {
            let mapping: Vec<usize> = t.columns.iter().map(|c| positions[c]).collect();
            for row in t.rows.iter() {
                let mut new_row = vec![Cell::Empty; res.columns.len()];
                for (cell, pos) in row.iter().zip(mapping.iter()) {
                    new_row[*pos] = cell.clone();
                }
                res.rows.push(new_row);
            }
        }
        res
    }
}
