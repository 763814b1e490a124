use crate::models::{Dataset, Raster};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableStatistics {
    pub shape: (usize, usize, usize),
    pub layers: Vec<u32>,
    pub valid_cells: usize,
    pub missing_cells: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub description: Option<String>,
}

impl VariableStatistics {
    pub fn from_raster(raster: &Raster) -> Self {
        let mut valid_cells = 0;
        let mut missing_cells = 0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut sum = 0.0;

        for &value in raster.data().iter() {
            if value.is_nan() {
                missing_cells += 1;
                continue;
            }
            valid_cells += 1;
            sum += value;
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
        }

        Self {
            shape: raster.shape(),
            layers: raster.layers().to_vec(),
            valid_cells,
            missing_cells,
            min,
            max,
            mean: (valid_cells > 0).then(|| sum / valid_cells as f64),
            description: raster.attrs.description.clone(),
        }
    }

    pub fn missing_fraction(&self) -> f64 {
        let total = self.valid_cells + self.missing_cells;
        if total == 0 {
            0.0
        } else {
            self.missing_cells as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetSummary {
    pub variables: BTreeMap<String, VariableStatistics>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let variables = dataset
            .iter()
            .map(|(name, raster)| (name.to_string(), VariableStatistics::from_raster(raster)))
            .collect();
        Self { variables }
    }

    pub fn total_missing(&self) -> usize {
        self.variables.values().map(|v| v.missing_cells).sum()
    }

    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Soil Dataset Summary:\n  Variables: {}\n  Missing cells: {}\n",
            self.variables.len(),
            self.total_missing()
        );

        for (name, stats) in &self.variables {
            let (ny, nx, nl) = stats.shape;
            summary.push_str(&format!(
                "  {}: {}x{}x{} (y, x, layer), {:.1}% missing",
                name,
                ny,
                nx,
                nl,
                stats.missing_fraction() * 100.0
            ));
            if let (Some(min), Some(max), Some(mean)) = (stats.min, stats.max, stats.mean) {
                summary.push_str(&format!(", min={:.4}, max={:.4}, mean={:.4}", min, max, mean));
            }
            if let Some(description) = &stats.description {
                summary.push_str(&format!(" [{}]", description));
            }
            summary.push('\n');
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RasterAttrs;
    use ndarray::array;

    #[test]
    fn test_statistics_skip_missing_cells() {
        let raster = Raster::new(
            array![[[1.0, 3.0]], [[f64::NAN, 5.0]]],
            vec![0.0, 1.0],
            vec![0.0],
            vec![1, 2],
            RasterAttrs {
                description: Some("Porosity".to_string()),
                filenames: vec![],
            },
        )
        .unwrap();

        let stats = VariableStatistics::from_raster(&raster);
        assert_eq!(stats.shape, (2, 1, 2));
        assert_eq!(stats.valid_cells, 3);
        assert_eq!(stats.missing_cells, 1);
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(5.0));
        assert_eq!(stats.mean, Some(3.0));
        assert!((stats.missing_fraction() - 0.25).abs() < 1e-12);

        let mut dataset = Dataset::new();
        dataset.insert("COS_RAWL_porosity", raster);
        let summary = DatasetSummary::from_dataset(&dataset);
        let text = summary.display_summary();
        assert!(text.contains("COS_RAWL_porosity: 2x1x2"));
        assert!(text.contains("[Porosity]"));
        assert_eq!(summary.total_missing(), 1);
    }

    #[test]
    fn test_all_missing_variable() {
        let raster = Raster::new(
            array![[[f64::NAN]]],
            vec![0.0],
            vec![0.0],
            vec![1],
            RasterAttrs::default(),
        )
        .unwrap();

        let stats = VariableStatistics::from_raster(&raster);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.min, None);
        assert_eq!(stats.missing_fraction(), 1.0);
    }
}
