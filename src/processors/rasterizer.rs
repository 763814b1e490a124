use crate::error::{Result, SoilError};
use crate::models::{Raster, RasterAttrs, Table};
use crate::utils::constants::{COL_I, COL_J, COL_X, COL_Y};
use ndarray::Array3;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Converts `i, j, x, y` soil tables into single-layer rasters, one per data column
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
    keep_columns: Option<HashSet<String>>,
    drop_columns: Option<HashSet<String>>,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only columns in this list are rasterized
    pub fn with_keep_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Columns in this list are skipped
    pub fn with_drop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    fn keeps(&self, column: &str) -> bool {
        let kept = self.keep_columns.as_ref().map_or(true, |k| k.contains(column));
        let dropped = self.drop_columns.as_ref().map_or(false, |d| d.contains(column));
        kept && !dropped
    }

    /// Rasterize every kept data column of `table` as layer `layer`
    ///
    /// Row `(i, j)` lands in cell `(i - 1, j - 1)`, so the table's row order does
    /// not matter, but the grid must be complete: `max(i)` and `max(j)` must equal
    /// the number of distinct `y` and `x` values and every cell must appear once.
    pub fn rasterize(
        &self,
        table: &Table,
        descriptions: &HashMap<String, String>,
        layer: u32,
        source: &Path,
    ) -> Result<BTreeMap<String, Raster>> {
        if table.is_empty() {
            return Err(SoilError::MissingData(format!(
                "{} contains no rows",
                source.display()
            )));
        }

        let rows_i = grid_indices(table.require_column(COL_I)?, COL_I, source)?;
        let rows_j = grid_indices(table.require_column(COL_J)?, COL_J, source)?;
        let y = unique_sorted(table.require_column(COL_Y)?);
        let x = unique_sorted(table.require_column(COL_X)?);

        let n_i = rows_i.iter().copied().max().unwrap_or(0);
        let n_j = rows_j.iter().copied().max().unwrap_or(0);
        if (n_i, n_j) != (y.len(), x.len()) {
            return Err(SoilError::ShapeMismatch {
                context: format!("{} grid extent (max i, max j) vs distinct (y, x)", source.display()),
                expected: (y.len(), x.len()),
                found: (n_i, n_j),
            });
        }
        if table.n_rows() != n_i * n_j {
            return Err(SoilError::ShapeMismatch {
                context: format!("{} has {} rows for the grid", source.display(), table.n_rows()),
                expected: (n_i, n_j),
                found: (table.n_rows() / n_j.max(1), n_j),
            });
        }

        let cells = cell_positions(&rows_i, &rows_j, n_j, source)?;

        let mut rasters = BTreeMap::new();
        for (column, values) in table.data_columns() {
            if !self.keeps(column) {
                continue;
            }

            let mut grid = vec![0.0; n_i * n_j];
            for (&cell, &value) in cells.iter().zip(values) {
                grid[cell] = value;
            }

            let attrs = RasterAttrs {
                description: descriptions.get(column).cloned(),
                filenames: vec![source.to_path_buf()],
            };
            let data = Array3::from_shape_vec((n_i, n_j, 1), grid)?;
            let raster = Raster::new(data, y.clone(), x.clone(), vec![layer], attrs)?;
            rasters.insert(column.to_string(), raster);
        }

        Ok(rasters)
    }
}

/// 1-based grid indices stored as floats in the table
fn grid_indices(values: &[f64], name: &str, source: &Path) -> Result<Vec<usize>> {
    values
        .iter()
        .enumerate()
        .map(|(row, &v)| {
            if v >= 1.0 && v.fract() == 0.0 {
                Ok(v as usize)
            } else {
                Err(SoilError::InvalidFormat(format!(
                    "{} row {}: '{}' must be a positive integer, got {}",
                    source.display(),
                    row + 1,
                    name,
                    v
                )))
            }
        })
        .collect()
}

fn unique_sorted(values: &[f64]) -> Vec<f64> {
    let mut unique = values.to_vec();
    unique.sort_by(|a, b| a.total_cmp(b));
    unique.dedup();
    unique
}

/// Flat row-major cell of every table row; each cell must be hit exactly once
fn cell_positions(rows_i: &[usize], rows_j: &[usize], n_j: usize, source: &Path) -> Result<Vec<usize>> {
    let mut seen = vec![false; rows_i.len()];
    let mut cells = Vec::with_capacity(rows_i.len());

    for (&i, &j) in rows_i.iter().zip(rows_j) {
        let cell = (i - 1) * n_j + (j - 1);
        if seen[cell] {
            return Err(SoilError::InvalidFormat(format!(
                "{}: grid cell (i={}, j={}) appears more than once",
                source.display(),
                i,
                j
            )));
        }
        seen[cell] = true;
        cells.push(cell);
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source() -> PathBuf {
        PathBuf::from("COS_RAWL.layer.1")
    }

    /// Table with `n_y` rows of latitude and `n_x` columns of longitude
    fn synthetic_table(n_y: usize, n_x: usize, shuffle: bool) -> Table {
        let names = ["i", "j", "x", "y", "porosity", "k_sat"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut table = Table::new(names);
        let mut cells: Vec<(usize, usize)> = (1..=n_y)
            .flat_map(|i| (1..=n_x).map(move |j| (i, j)))
            .collect();
        if shuffle {
            cells.reverse();
        }
        for (i, j) in cells {
            let x = -125.0 + j as f64 * 0.125;
            let y = 25.0 + i as f64 * 0.125;
            let value = (i * 100 + j) as f64;
            table
                .push_row(&[i as f64, j as f64, x, y, value, -value])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_shape_follows_distinct_coordinates() {
        let rasterizer = Rasterizer::new();
        for n_y in 1..=4 {
            for n_x in 1..=5 {
                let table = synthetic_table(n_y, n_x, false);
                let rasters = rasterizer
                    .rasterize(&table, &HashMap::new(), 1, &source())
                    .unwrap();

                assert_eq!(rasters.len(), 2);
                for raster in rasters.values() {
                    assert_eq!(raster.shape(), (n_y, n_x, 1));
                    assert_eq!(raster.y().len(), n_y);
                    assert_eq!(raster.x().len(), n_x);
                }
            }
        }
    }

    #[test]
    fn test_row_order_does_not_matter() {
        let rasterizer = Rasterizer::new();
        let ordered = rasterizer
            .rasterize(&synthetic_table(3, 4, false), &HashMap::new(), 2, &source())
            .unwrap();
        let reversed = rasterizer
            .rasterize(&synthetic_table(3, 4, true), &HashMap::new(), 2, &source())
            .unwrap();

        assert_eq!(ordered["porosity"].data(), reversed["porosity"].data());
        assert_eq!(ordered["porosity"].data()[[2, 3, 0]], 304.0);
        assert_eq!(ordered["porosity"].layers(), &[2]);
    }

    #[test]
    fn test_keep_and_drop_filters_combine() {
        let table = synthetic_table(2, 2, false);
        let mut descriptions = HashMap::new();
        descriptions.insert("porosity".to_string(), "Porosity".to_string());

        let kept = Rasterizer::new()
            .with_keep_columns(["porosity", "k_sat"])
            .with_drop_columns(["k_sat"])
            .rasterize(&table, &descriptions, 1, &source())
            .unwrap();

        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["porosity"]);
        assert_eq!(kept["porosity"].attrs.description.as_deref(), Some("Porosity"));
        assert_eq!(kept["porosity"].attrs.filenames, vec![source()]);
    }

    #[test]
    fn test_no_data_left_in_place() {
        let names = ["i", "j", "x", "y", "b"].iter().map(|s| s.to_string()).collect();
        let mut table = Table::new(names);
        table.push_row(&[1.0, 1.0, 0.0, 0.0, -9.99]).unwrap();

        let rasters = Rasterizer::new()
            .rasterize(&table, &HashMap::new(), 1, &source())
            .unwrap();
        assert_eq!(rasters["b"].data()[[0, 0, 0]], -9.99);
    }

    #[test]
    fn test_incomplete_grid_fails() {
        let names = ["i", "j", "x", "y", "b"].iter().map(|s| s.to_string()).collect();
        let mut table = Table::new(names);
        table.push_row(&[1.0, 1.0, 0.0, 0.0, 1.0]).unwrap();
        table.push_row(&[1.0, 2.0, 1.0, 0.0, 1.0]).unwrap();
        table.push_row(&[2.0, 1.0, 0.0, 1.0, 1.0]).unwrap();

        let result = Rasterizer::new().rasterize(&table, &HashMap::new(), 1, &source());
        assert!(matches!(result, Err(SoilError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_duplicate_cell_fails() {
        let names = ["i", "j", "x", "y", "b"].iter().map(|s| s.to_string()).collect();
        let mut table = Table::new(names);
        table.push_row(&[1.0, 1.0, 0.0, 0.0, 1.0]).unwrap();
        table.push_row(&[1.0, 1.0, 1.0, 0.0, 1.0]).unwrap();
        table.push_row(&[1.0, 2.0, 0.0, 1.0, 1.0]).unwrap();
        table.push_row(&[2.0, 2.0, 1.0, 1.0, 1.0]).unwrap();

        let result = Rasterizer::new().rasterize(&table, &HashMap::new(), 1, &source());
        assert!(matches!(result, Err(SoilError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_geometry_column_fails() {
        let mut table = Table::new(vec!["i".to_string(), "j".to_string(), "b".to_string()]);
        table.push_row(&[1.0, 1.0, 2.0]).unwrap();

        let result = Rasterizer::new().rasterize(&table, &HashMap::new(), 1, &source());
        assert!(matches!(result, Err(SoilError::MissingData(_))));
    }
}
