use crate::error::{Result, SoilError};
use crate::models::{Raster, RasterAttrs};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use ndarray::{Array2, Array3, Axis};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads pre-gridded ASCII matrices, one file per soil layer
pub struct GridReader;

impl GridReader {
    /// Stack `paths` along the layer axis in the given order; layers are numbered from 1
    pub fn read_grid(paths: &[PathBuf], y: &[f64], x: &[f64]) -> Result<Raster> {
        let mut data = Array3::<f64>::zeros((y.len(), x.len(), paths.len()));

        for (idx, path) in paths.iter().enumerate() {
            let matrix = Self::read_matrix(path)?;
            if matrix.dim() != (y.len(), x.len()) {
                return Err(SoilError::ShapeMismatch {
                    context: path.display().to_string(),
                    expected: (y.len(), x.len()),
                    found: matrix.dim(),
                });
            }
            data.index_axis_mut(Axis(2), idx).assign(&matrix);
            debug!(path = %path.display(), layer = idx + 1, "loaded grid layer");
        }

        let layers = (1..=paths.len() as u32).collect();
        let attrs = RasterAttrs {
            description: None,
            filenames: paths.to_vec(),
        };

        Raster::new(data, y.to_vec(), x.to_vec(), layers, attrs)
    }

    /// Read a whitespace/newline-delimited numeric matrix
    pub fn read_matrix(path: &Path) -> Result<Array2<f64>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut values = Vec::new();
        let mut n_rows = 0;
        let mut n_cols = None;

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let before = values.len();

            for token in line.split_whitespace() {
                values.push(token.parse::<f64>().map_err(|_| {
                    SoilError::InvalidFormat(format!(
                        "{}:{}: invalid number '{}'",
                        path.display(),
                        idx + 1,
                        token
                    ))
                })?);
            }

            let width = values.len() - before;
            if width == 0 {
                continue;
            }
            match n_cols {
                None => n_cols = Some(width),
                Some(expected) if expected != width => {
                    return Err(SoilError::InvalidFormat(format!(
                        "{}:{}: ragged row with {} values, expected {}",
                        path.display(),
                        idx + 1,
                        width,
                        expected
                    )));
                }
                Some(_) => {}
            }
            n_rows += 1;
        }

        Ok(Array2::from_shape_vec((n_rows, n_cols.unwrap_or(0)), values)?)
    }
}
