//! In-memory tabular model shared by ingestion and aggregation.
//!
//! A [`Table`] is an ordered list of rows under a header of named columns.
//! Column lookups are exact: no trimming, no case folding.

use std::collections::HashMap;

/// A single raw cell value as it arrived from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date, time or duration value, rendered as ISO-like text. Never numeric.
    Date(String),
}

impl Cell {
    /// Renders the cell as an opaque grouping key.
    ///
    /// Text is kept verbatim, so `"Ana"` and `"Ana "` are distinct keys.
    /// Integral floats print without a fractional part (`1234.0` → `"1234"`).
    pub fn as_key(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) | Cell::Date(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

static EMPTY: Cell = Cell::Empty;

/// Rows of cells under a common header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Builds a table from an already-normalised header and its rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from a raw header row as read from a sheet.
    ///
    /// Blank header cells become `Unnamed: <index>` and repeated names get
    /// `.1`, `.2`, ... suffixes in order of appearance.
    pub fn from_raw_header(header: &[Cell], rows: Vec<Vec<Cell>>) -> Self {
        Self::new(normalize_header(header), rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column whose name equals `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `(row, col)`; cells past the end of a short row read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

fn normalize_header(header: &[Cell]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut columns = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = if cell.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            cell.as_key()
        };

        let mut name = base.clone();
        if let Some(&last) = seen.get(&base) {
            let mut suffix = last;
            loop {
                suffix += 1;
                name = format!("{base}.{suffix}");
                if !seen.contains_key(&name) {
                    break;
                }
            }
            seen.insert(base, suffix);
        }
        seen.insert(name.clone(), 0);
        columns.push(name);
    }

    columns
}
