use crate::error::{Result, SoilError};
use ndarray::{Array3, ArrayView2, Axis};
use serde::Serialize;
use std::path::PathBuf;

/// Attributes carried alongside a raster's values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RasterAttrs {
    pub description: Option<String>,
    pub filenames: Vec<PathBuf>,
}

/// Values over (y, x, layer) with their coordinate axes
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    data: Array3<f64>,
    y: Vec<f64>,
    x: Vec<f64>,
    layers: Vec<u32>,
    pub attrs: RasterAttrs,
}

impl Raster {
    pub fn new(
        data: Array3<f64>,
        y: Vec<f64>,
        x: Vec<f64>,
        layers: Vec<u32>,
        attrs: RasterAttrs,
    ) -> Result<Self> {
        let (ny, nx, nl) = data.dim();
        if (ny, nx) != (y.len(), x.len()) {
            return Err(SoilError::ShapeMismatch {
                context: "raster coordinates".to_string(),
                expected: (y.len(), x.len()),
                found: (ny, nx),
            });
        }
        if nl != layers.len() {
            return Err(SoilError::InvalidFormat(format!(
                "Raster has {} layers but {} layer labels",
                nl,
                layers.len()
            )));
        }

        Ok(Self {
            data,
            y,
            x,
            layers,
            attrs,
        })
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn layers(&self) -> &[u32] {
        &self.layers
    }

    /// (len(y), len(x), len(layers))
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    /// 2-D (y, x) slice at layer position `idx` (not the layer label)
    pub fn layer(&self, idx: usize) -> Option<ArrayView2<'_, f64>> {
        (idx < self.n_layers()).then(|| self.data.index_axis(Axis(2), idx))
    }

    pub fn same_grid(&self, other: &Raster) -> bool {
        self.y == other.y && self.x == other.x
    }

    /// Replace every value exactly equal to `sentinel` with NaN, returning the count replaced
    pub fn mask_value(&mut self, sentinel: f64) -> usize {
        let mut replaced = 0;
        self.data.mapv_inplace(|v| {
            if v == sentinel {
                replaced += 1;
                f64::NAN
            } else {
                v
            }
        });
        replaced
    }
}
