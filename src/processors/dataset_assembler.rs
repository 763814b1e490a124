use crate::models::{Dataset, Raster};
use crate::utils::constants::NO_DATA;
use tracing::info;

/// Builds the final dataset and swaps the no-data sentinel for NaN
pub struct DatasetAssembler {
    no_data: f64,
}

impl DatasetAssembler {
    pub fn new() -> Self {
        Self { no_data: NO_DATA }
    }

    pub fn with_no_data(no_data: f64) -> Self {
        Self { no_data }
    }

    pub fn assemble<I>(&self, rasters: I) -> Dataset
    where
        I: IntoIterator<Item = (String, Raster)>,
    {
        let mut dataset: Dataset = rasters.into_iter().collect();
        self.mask_no_data(&mut dataset);
        dataset
    }

    /// Replace every value equal to the sentinel with NaN; running it again changes nothing
    pub fn mask_no_data(&self, dataset: &mut Dataset) -> usize {
        let replaced = dataset.mask_value(self.no_data);
        info!(
            variables = dataset.len(),
            replaced,
            sentinel = self.no_data,
            "masked no-data values"
        );
        replaced
    }
}

impl Default for DatasetAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RasterAttrs;
    use ndarray::array;

    fn raster(values: [f64; 4]) -> Raster {
        let data = array![[[values[0]], [values[1]]], [[values[2]], [values[3]]]];
        Raster::new(data, vec![0.0, 1.0], vec![0.0, 1.0], vec![1], RasterAttrs::default()).unwrap()
    }

    #[test]
    fn test_assemble_masks_sentinel() {
        let assembler = DatasetAssembler::new();
        let dataset = assembler.assemble(vec![
            ("COS_RAWL_porosity".to_string(), raster([0.4, -9.99, 0.3, 0.2])),
            ("TXDM1".to_string(), raster([-9.99, -9.99, 1.0, 2.0])),
        ]);

        assert_eq!(dataset.len(), 2);
        let porosity = dataset.get("COS_RAWL_porosity").unwrap().data();
        assert!(porosity[[0, 1, 0]].is_nan());
        assert_eq!(porosity[[1, 0, 0]], 0.3);
        let texture = dataset.get("TXDM1").unwrap().data();
        assert_eq!(texture.iter().filter(|v| v.is_nan()).count(), 2);
    }

    #[test]
    fn test_masking_is_idempotent() {
        let assembler = DatasetAssembler::new();
        let mut dataset = assembler.assemble(vec![(
            "HYD_CLAP_b".to_string(),
            raster([-9.99, 4.0, f64::NAN, -9.0]),
        )]);
        let once: Vec<u64> = dataset.get("HYD_CLAP_b").unwrap().data().iter().map(|v| v.to_bits()).collect();

        assert_eq!(assembler.mask_no_data(&mut dataset), 0);
        let twice: Vec<u64> = dataset.get("HYD_CLAP_b").unwrap().data().iter().map(|v| v.to_bits()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_sentinel() {
        let assembler = DatasetAssembler::with_no_data(-9999.0);
        let dataset = assembler.assemble(vec![("v".to_string(), raster([-9999.0, -9.99, 0.0, 1.0]))]);
        let data = dataset.get("v").unwrap().data();
        assert!(data[[0, 0, 0]].is_nan());
        assert_eq!(data[[0, 1, 0]], -9.99);
    }
}
