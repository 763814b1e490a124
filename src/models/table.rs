use crate::error::{Result, SoilError};
use crate::utils::constants::GRID_COLUMNS;

/// Column-major numeric table read from one soil file
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    pub fn new(names: Vec<String>) -> Self {
        let columns = vec![Vec::new(); names.len()];
        Self { names, columns }
    }

    pub fn push_row(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.names.len() {
            return Err(SoilError::InvalidFormat(format!(
                "Row has {} values, table has {} columns",
                row.len(),
                self.names.len()
            )));
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(*value);
        }
        Ok(())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
    }

    pub fn require_column(&self, name: &str) -> Result<&[f64]> {
        self.column(name)
            .ok_or_else(|| SoilError::MissingData(format!("Table has no '{}' column", name)))
    }

    /// Columns other than the `i, j, x, y` geometry columns
    pub fn data_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .zip(&self.columns)
            .filter(|(name, _)| !GRID_COLUMNS.contains(&name.as_str()))
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}
