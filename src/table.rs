//! Rectangular in-memory table with named columns.

use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;

use crate::{error::LookupError, io_utils};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    /// Stored column-major; every column has `row_count` cells.
    columns: Vec<Vec<String>>,
    row_count: usize,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        let columns = vec![Vec::new(); headers.len()];
        Self {
            headers,
            columns,
            row_count: 0,
        }
    }

    /// Builds a table from rows; short rows are padded with empty cells and
    /// extra cells are dropped.
    pub fn from_rows<I>(headers: Vec<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        let mut cells = row.into_iter();
        for column in &mut self.columns {
            column.push(cells.next().unwrap_or_default());
        }
        self.row_count += 1;
    }

    pub fn read(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        if !path.exists() {
            return Err(LookupError::InputNotFound(path.to_path_buf()).into());
        }
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)
            .with_context(|| format!("Reading headers from {path:?}"))?;
        let mut table = Self::new(headers);
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
            if record.len() > table.headers.len() {
                bail!(
                    "Row {} has {} field(s) but the header has {}",
                    row_idx + 2,
                    record.len(),
                    table.headers.len()
                );
            }
            let decoded = io_utils::decode_record(&record, encoding)
                .with_context(|| format!("Decoding row {}", row_idx + 2))?;
            table.push_row(decoded);
        }
        Ok(table)
    }

    pub fn write(&self, path: &Path, delimiter: u8) -> Result<()> {
        let mut writer = io_utils::open_csv_writer_to_path(path, delimiter)?;
        self.write_to(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Flushing output file {path:?}"))?;
        Ok(())
    }

    pub fn write_to<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<()> {
        writer
            .write_record(&self.headers)
            .context("Writing output headers")?;
        for row_idx in 0..self.row_count {
            writer
                .write_record(self.columns.iter().map(|column| column[row_idx].as_str()))
                .with_context(|| format!("Writing output row {}", row_idx + 2))?;
        }
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.column_index(name).and_then(|idx| self.column_at(idx))
    }

    pub fn column_at(&self, index: usize) -> Option<&[String]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Like [`Table::column`] but reports the available headers when absent.
    pub fn require_column(&self, name: &str) -> Result<&[String], LookupError> {
        self.column(name).ok_or_else(|| LookupError::ColumnNotFound {
            column: name.to_string(),
            available: self.headers.clone(),
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Assigns `values` to the column called `name`, replacing it in place when
    /// it exists and appending it otherwise. Missing cells become empty.
    pub fn set_column<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut cells = values
            .into_iter()
            .map(|value| match value {
                Some(value) => value.into(),
                None => String::new(),
            })
            .take(self.row_count)
            .collect::<Vec<String>>();
        cells.resize(self.row_count, String::new());
        match self.column_index(name) {
            Some(idx) => self.columns[idx] = cells,
            None => {
                self.headers.push(name.to_string());
                self.columns.push(cells);
            }
        }
    }
}
