// src/io/history.rs
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{FireError, Result};

/// Cell spellings read as an empty measurement (the usual dataframe
/// defaults).
const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Where the sensor table comes from.
#[derive(Debug, Clone)]
pub enum TableSource {
    Path(PathBuf),
    /// CSV text, e.g. an uploaded file
    Bytes(Vec<u8>),
}

impl From<PathBuf> for TableSource {
    fn from(path: PathBuf) -> Self {
        TableSource::Path(path)
    }
}

impl From<&Path> for TableSource {
    fn from(path: &Path) -> Self {
        TableSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for TableSource {
    fn from(bytes: Vec<u8>) -> Self {
        TableSource::Bytes(bytes)
    }
}

/// Time-ordered sensor readings.
///
/// The first CSV column is an identifier (a timestamp or sequence number) and
/// is kept as text. Every other column is a numeric measurement; `None` marks
/// an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorHistory {
    id_column: String,
    measurement_names: Vec<String>,
    ids: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl SensorHistory {
    /// Build a history from parts. Every row must have one cell per
    /// measurement column.
    pub fn new(
        id_column: impl Into<String>,
        measurement_names: Vec<String>,
        ids: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        if ids.len() != rows.len() {
            return Err(FireError::TableRead(format!(
                "{} identifiers for {} rows",
                ids.len(),
                rows.len()
            )));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != measurement_names.len())
        {
            return Err(FireError::TableRead(format!(
                "row {} has {} measurements, expected {}",
                i + 1,
                row.len(),
                measurement_names.len()
            )));
        }
        Ok(Self {
            id_column: id_column.into(),
            measurement_names,
            ids,
            rows,
        })
    }

    pub fn from_source(source: TableSource) -> Result<Self> {
        match source {
            TableSource::Path(path) => Self::from_path(path),
            TableSource::Bytes(bytes) => Self::from_reader(bytes.as_slice()),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            FireError::TableRead(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    /// Parse CSV with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut header_iter = headers.iter();
        let id_column = header_iter
            .next()
            .ok_or_else(|| FireError::TableRead("table has no header row".to_string()))?
            .to_string();
        let measurement_names: Vec<String> = header_iter.map(str::to_string).collect();

        let mut ids = Vec::new();
        let mut rows = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let mut cells = record.iter();
            ids.push(cells.next().unwrap_or_default().to_string());

            let row = cells
                .zip(&measurement_names)
                .map(|(cell, column)| parse_cell(cell, column, line + 2))
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        log::debug!(
            "Read sensor table: {} rows, {} measurement columns",
            rows.len(),
            measurement_names.len()
        );

        Self::new(id_column, measurement_names, ids, rows)
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn measurement_names(&self) -> &[String] {
        &self.measurement_names
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_cell(cell: &str, column: &str, line: usize) -> Result<Option<f64>> {
    if MISSING_TOKENS.contains(&cell) {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        FireError::TableRead(format!(
            "non-numeric value {:?} in column {:?} at line {}",
            cell, column, line
        ))
    })
}
