use crate::error::{Result, SoilError};
use crate::models::Table;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Reads whitespace-delimited soil tables (no header row)
pub struct TableReader {
    use_mmap: bool,
}

impl TableReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read a table whose columns are named by `names`, in file order
    pub fn read_table(&self, path: &Path, names: &[String]) -> Result<Table> {
        let table = if self.use_mmap {
            self.read_table_mmap(path, names)?
        } else {
            self.read_table_buffered(path, names)?
        };

        debug!(
            path = %path.display(),
            rows = table.n_rows(),
            columns = table.n_columns(),
            "read soil table"
        );
        Ok(table)
    }

    fn read_table_buffered(&self, path: &Path, names: &[String]) -> Result<Table> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut table = Table::new(names.to_vec());
        let mut row = Vec::with_capacity(names.len());

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            self.parse_line(&line, idx + 1, path, names.len(), &mut row)?;
            if !row.is_empty() {
                table.push_row(&row)?;
            }
        }

        Ok(table)
    }

    fn read_table_mmap(&self, path: &Path, names: &[String]) -> Result<Table> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Table::new(names.to_vec()));
        }
        let mmap = unsafe { Mmap::map(&file)? };
        let content = std::str::from_utf8(&mmap)
            .map_err(|e| SoilError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;

        let mut table = Table::new(names.to_vec());
        let mut row = Vec::with_capacity(names.len());

        for (idx, line) in content.lines().enumerate() {
            self.parse_line(line, idx + 1, path, names.len(), &mut row)?;
            if !row.is_empty() {
                table.push_row(&row)?;
            }
        }

        Ok(table)
    }

    /// Parse one line into `row`; blank lines leave `row` empty
    fn parse_line(
        &self,
        line: &str,
        line_number: usize,
        path: &Path,
        expected: usize,
        row: &mut Vec<f64>,
    ) -> Result<()> {
        row.clear();

        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| {
                SoilError::InvalidFormat(format!(
                    "{}:{}: invalid number '{}'",
                    path.display(),
                    line_number,
                    token
                ))
            })?;
            row.push(value);
        }

        if !row.is_empty() && row.len() != expected {
            return Err(SoilError::InvalidFormat(format!(
                "{}:{}: expected {} columns, found {}",
                path.display(),
                line_number,
                expected,
                row.len()
            )));
        }

        Ok(())
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}
