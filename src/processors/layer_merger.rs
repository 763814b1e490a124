use crate::error::{Result, SoilError};
use crate::models::{Raster, RasterAttrs};
use ndarray::{concatenate, Axis};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Accumulates single-layer rasters keyed by `(variable, layer)` and merges them per variable
#[derive(Debug, Default)]
pub struct LayerMerger {
    pending: BTreeMap<(String, u32), Raster>,
}

impl LayerMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, layer: u32, raster: Raster) -> Result<()> {
        let key = (name.to_string(), layer);
        if self.pending.contains_key(&key) {
            let path = raster.attrs.filenames.first().cloned().unwrap_or_default();
            return Err(SoilError::DuplicateLayer {
                name: name.to_string(),
                layer,
                path,
            });
        }
        self.pending.insert(key, raster);
        Ok(())
    }

    /// Concatenate each variable's layers in ascending layer order, consuming the accumulator
    pub fn merge(self) -> Result<BTreeMap<String, Raster>> {
        let mut grouped: BTreeMap<String, Vec<Raster>> = BTreeMap::new();
        // BTreeMap iteration is already ordered by (name, layer)
        for ((name, _layer), raster) in self.pending {
            grouped.entry(name).or_default().push(raster);
        }

        let mut merged = BTreeMap::new();
        for (name, parts) in grouped {
            debug!(variable = %name, layers = parts.len(), "concatenating layers");
            let raster = concat_layers(&name, parts)?;
            merged.insert(name, raster);
        }

        Ok(merged)
    }
}

/// Concatenate rasters along the layer axis in the given order
pub fn concat_layers(name: &str, parts: Vec<Raster>) -> Result<Raster> {
    let first = parts
        .first()
        .ok_or_else(|| SoilError::MissingData(format!("No layers to concatenate for {}", name)))?;

    if let Some(other) = parts.iter().find(|p| !first.same_grid(p)) {
        let (ny, nx, _) = other.shape();
        return Err(SoilError::ShapeMismatch {
            context: format!("layers of {} do not share one grid", name),
            expected: (first.y().len(), first.x().len()),
            found: (ny, nx),
        });
    }

    let y = first.y().to_vec();
    let x = first.x().to_vec();
    let description = first.attrs.description.clone();

    let views: Vec<_> = parts.iter().map(|p| p.data().view()).collect();
    let data = concatenate(Axis(2), &views)?;

    let layers: Vec<u32> = parts.iter().flat_map(|p| p.layers().iter().copied()).collect();
    let filenames: Vec<PathBuf> = parts
        .iter()
        .flat_map(|p| p.attrs.filenames.iter().cloned())
        .collect();

    Raster::new(
        data,
        y,
        x,
        layers,
        RasterAttrs {
            description,
            filenames,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn single_layer(layer: u32, value: f64) -> Raster {
        Raster::new(
            Array3::from_elem((2, 2, 1), value),
            vec![30.0, 31.0],
            vec![-90.0, -89.0],
            vec![layer],
            RasterAttrs {
                description: Some("Porosity".to_string()),
                filenames: vec![PathBuf::from(format!("COS_RAWL.layer.{}", layer))],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_merge_orders_by_layer_index() -> Result<()> {
        let mut merger = LayerMerger::new();
        for layer in [3, 1, 2] {
            merger.add("COS_RAWL_porosity", layer, single_layer(layer, layer as f64 * 10.0))?;
        }

        let merged = merger.merge()?;
        let raster = &merged["COS_RAWL_porosity"];

        assert_eq!(raster.shape(), (2, 2, 3));
        assert_eq!(raster.layers(), &[1, 2, 3]);
        for (idx, expected) in [10.0, 20.0, 30.0].iter().enumerate() {
            assert!(raster.layer(idx).unwrap().iter().all(|v| v == expected));
        }
        assert_eq!(
            raster.attrs.filenames,
            vec![
                PathBuf::from("COS_RAWL.layer.1"),
                PathBuf::from("COS_RAWL.layer.2"),
                PathBuf::from("COS_RAWL.layer.3"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_variables_merge_independently() -> Result<()> {
        let mut merger = LayerMerger::new();
        merger.add("HYD_CLAP_b", 1, single_layer(1, 1.0))?;
        merger.add("COS_RAWL_porosity", 2, single_layer(2, 2.0))?;
        merger.add("COS_RAWL_porosity", 1, single_layer(1, 1.0))?;

        let merged = merger.merge()?;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["HYD_CLAP_b"].n_layers(), 1);
        assert_eq!(merged["COS_RAWL_porosity"].n_layers(), 2);
        Ok(())
    }

    #[test]
    fn test_duplicate_layer_is_rejected() -> Result<()> {
        let mut merger = LayerMerger::new();
        merger.add("COS_RAWL_porosity", 1, single_layer(1, 1.0))?;

        let result = merger.add("COS_RAWL_porosity", 1, single_layer(1, 2.0));
        assert!(matches!(result, Err(SoilError::DuplicateLayer { layer: 1, .. })));
        Ok(())
    }

    #[test]
    fn test_mismatched_grids_fail() {
        let other = Raster::new(
            Array3::zeros((1, 2, 1)),
            vec![30.0],
            vec![-90.0, -89.0],
            vec![2],
            RasterAttrs::default(),
        )
        .unwrap();

        let result = concat_layers("x", vec![single_layer(1, 1.0), other]);
        assert!(matches!(result, Err(SoilError::ShapeMismatch { .. })));
    }
}
