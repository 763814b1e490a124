use crate::models::Raster;
use std::collections::BTreeMap;

/// Named rasters produced by one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    variables: BTreeMap<String, Raster>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, raster: Raster) -> Option<Raster> {
        self.variables.insert(name.into(), raster)
    }

    pub fn get(&self, name: &str) -> Option<&Raster> {
        self.variables.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Raster)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Replace `sentinel` with NaN in every raster; returns the total count replaced
    pub fn mask_value(&mut self, sentinel: f64) -> usize {
        self.variables
            .values_mut()
            .map(|raster| raster.mask_value(sentinel))
            .sum()
    }

    /// Total number of cells across all rasters
    pub fn cell_count(&self) -> usize {
        self.variables.values().map(|r| r.data().len()).sum()
    }
}

impl FromIterator<(String, Raster)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (String, Raster)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}
