//! Spreadsheet ingestion: turns an uploaded file into a [`Table`].
//!
//! The parser is picked from the file extension. Only the first worksheet
//! is read and its first row is taken as the header.

use calamine::{Data, DataType, Reader, Xls, Xlsx, open_workbook_from_rs};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

use crate::error::ReadError;
use crate::table::{Cell, Table};

/// A file as received from the user: its original name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Lowercase extension of the file name, without the dot.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default()
    }
}

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Legacy binary `.xls`.
    Xls,
    /// OOXML `.xlsx` / `.xlsm`.
    Xlsx,
    Csv,
}

impl SourceFormat {
    pub fn detect(upload: &Upload) -> Option<Self> {
        match upload.extension().as_str() {
            "xls" => Some(SourceFormat::Xls),
            "xlsx" | "xlsm" => Some(SourceFormat::Xlsx),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

/// Parses an upload into a table.
///
/// # Errors
///
/// Returns a [`ReadError`] for unknown extensions, corrupt files, and
/// workbooks without any worksheet.
pub fn read_table(upload: &Upload) -> Result<Table, ReadError> {
    let format = SourceFormat::detect(upload).ok_or_else(|| ReadError::Unsupported {
        name: upload.name.clone(),
    })?;

    let table = match format {
        SourceFormat::Xls => read_workbook::<Xls<Cursor<Vec<u8>>>>(upload)?,
        SourceFormat::Xlsx => read_workbook::<Xlsx<Cursor<Vec<u8>>>>(upload)?,
        SourceFormat::Csv => read_csv(&upload.bytes)?,
    };

    debug!(
        name = %upload.name,
        ?format,
        columns = table.columns().len(),
        rows = table.len(),
        "Table read"
    );
    Ok(table)
}

fn read_workbook<R>(upload: &Upload) -> Result<Table, ReadError>
where
    R: Reader<Cursor<Vec<u8>>>,
    calamine::Error: From<R::Error>,
{
    let mut workbook: R =
        open_workbook_from_rs(Cursor::new(upload.bytes.clone())).map_err(calamine::Error::from)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReadError::NoWorksheet {
            name: upload.name.clone(),
        })?
        .map_err(calamine::Error::from)?;

    let mut rows = range.rows();
    let header: Vec<Cell> = rows
        .next()
        .map(|r| r.iter().map(to_cell).collect())
        .unwrap_or_default();
    let body = rows.map(|r| r.iter().map(to_cell).collect()).collect();

    Ok(Table::from_raw_header(&header, body))
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::String(s) => Cell::from(s.as_str()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::DateTime(_) => Cell::Date(
            data.as_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| data.to_string()),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Date(s.clone()),
    }
}

fn read_csv(bytes: &[u8]) -> Result<Table, ReadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = rdr.records();
    let header: Vec<Cell> = match records.next() {
        Some(record) => record?.iter().map(Cell::from).collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        rows.push(record?.iter().map(Cell::from).collect());
    }

    Ok(Table::from_raw_header(&header, rows))
}
