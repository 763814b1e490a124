use crate::error::{Result, SoilError};
use crate::models::{Dataset, Raster, SoilFamily, SoilMetadata};
use crate::processors::{DatasetAssembler, FileGroups, LayerMerger, Rasterizer};
use crate::readers::{GridReader, TableReader};
use crate::utils::filename::layer_index;
use crate::utils::progress::ProgressReporter;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Coordinate axes shared by every raster of one run
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxes {
    pub y: Vec<f64>,
    pub x: Vec<f64>,
}

impl GridAxes {
    fn of(raster: &Raster) -> Self {
        Self {
            y: raster.y().to_vec(),
            x: raster.x().to_vec(),
        }
    }
}

/// Drives tables and grids of the selected families into one dataset
pub struct SoilProcessor {
    metadata: SoilMetadata,
    table_reader: TableReader,
    rasterizer: Rasterizer,
    assembler: DatasetAssembler,
    grid: Option<GridAxes>,
}

impl SoilProcessor {
    pub fn new(metadata: SoilMetadata) -> Self {
        Self {
            metadata,
            table_reader: TableReader::new(),
            rasterizer: Rasterizer::new(),
            assembler: DatasetAssembler::new(),
            grid: None,
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Rasterizer) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.table_reader = TableReader::with_mmap(use_mmap);
        self
    }

    pub fn with_assembler(mut self, assembler: DatasetAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Use these axes for gridded families instead of deriving them from the tables
    pub fn with_grid(mut self, y: Vec<f64>, x: Vec<f64>) -> Self {
        self.grid = Some(GridAxes { y, x });
        self
    }

    /// Process `families` (all known families when `None`) from `groups`
    pub fn process(
        &self,
        groups: &FileGroups,
        families: Option<&[SoilFamily]>,
        progress: Option<&ProgressReporter>,
    ) -> Result<Dataset> {
        let mut selected: Vec<SoilFamily> = families
            .map(|f| f.to_vec())
            .unwrap_or_else(|| SoilFamily::ALL.to_vec());
        selected.sort();
        selected.dedup();

        info!(
            dir = %groups.dir().display(),
            families = ?selected.iter().map(|f| f.name()).collect::<Vec<_>>(),
            "processing soil families"
        );

        let mut merger = LayerMerger::new();
        let mut provider_grid: Option<GridAxes> = None;
        let mut fallback_grid: Option<GridAxes> = None;

        for family in selected.iter().copied().filter(|f| f.is_tabular()) {
            let files = groups.files(family);
            if files.is_empty() {
                warn!(family = %family, "no files found, skipping family");
                continue;
            }
            if let Some(p) = progress {
                p.set_message(&format!("Reading {} tables...", family));
            }

            let schema = family.schema().ok_or_else(|| {
                SoilError::Config(format!("No metadata schema for family {}", family))
            })?;
            let names = self.metadata.column_names(schema)?;
            let descriptions = self.metadata.descriptions(schema)?;

            for path in files {
                let layer = layer_index(path)?;
                let table = self.table_reader.read_table(path, &names)?;
                let rasters = self.rasterizer.rasterize(&table, &descriptions, layer, path)?;

                for (column, raster) in rasters {
                    if family.provides_grid() && provider_grid.is_none() {
                        provider_grid = Some(GridAxes::of(&raster));
                    }
                    if fallback_grid.is_none() {
                        fallback_grid = Some(GridAxes::of(&raster));
                    }
                    merger.add(&format!("{}_{}", family.name(), column), layer, raster)?;
                }

                debug!(family = %family, layer, path = %path.display(), "rasterized table");
                if let Some(p) = progress {
                    p.increment(1);
                }
            }
        }

        let grid = self.grid.clone().or(provider_grid).or(fallback_grid);
        let mut rasters = merger.merge()?;

        for family in selected.iter().copied().filter(|f| !f.is_tabular()) {
            let files = groups.files(family);
            if files.is_empty() {
                warn!(family = %family, "no files found, skipping family");
                continue;
            }
            if let Some(p) = progress {
                p.set_message(&format!("Reading {} grids...", family));
            }

            let axes = grid.as_ref().ok_or_else(|| {
                SoilError::MissingData(format!(
                    "No grid axes for {}: process a tabular family first or supply the grid",
                    family
                ))
            })?;
            let paths = Self::order_by_layer(family, files)?;
            let raster = GridReader::read_grid(&paths, &axes.y, &axes.x)?;

            debug!(family = %family, layers = raster.n_layers(), "loaded gridded family");
            if let Some(p) = progress {
                p.increment(paths.len() as u64);
            }
            rasters.insert(family.name().to_string(), raster);
        }

        let dataset = self.assembler.assemble(rasters);
        info!(variables = dataset.len(), "assembled soil dataset");
        Ok(dataset)
    }

    /// Sort a family's files by layer index, rejecting repeated indices
    fn order_by_layer(family: SoilFamily, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut indexed = files
            .iter()
            .map(|p| Ok((layer_index(p)?, p.clone())))
            .collect::<Result<Vec<(u32, PathBuf)>>>()?;
        indexed.sort();

        if let Some(pair) = indexed.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(SoilError::DuplicateLayer {
                name: family.name().to_string(),
                layer: pair[1].0,
                path: pair[1].1.clone(),
            });
        }

        Ok(indexed.into_iter().map(|(_, p)| p).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnSpec;
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    fn metadata() -> SoilMetadata {
        let cols = |data: &[&str]| {
            ["i", "j", "x", "y"]
                .iter()
                .chain(data)
                .map(|c| ColumnSpec::new(*c, format!("{} description", c)))
                .collect::<Vec<_>>()
        };
        let mut schemas = HashMap::new();
        schemas.insert("COS_HYD".to_string(), cols(&["porosity", "k_sat"][..]));
        schemas.insert("SOIL_LAYERS".to_string(), cols(&["texture_class"][..]));
        SoilMetadata::new(schemas)
    }

    fn write_lines(dir: &Path, name: &str, lines: &[&str]) {
        let mut file = File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    /// 2 x 3 grid: i along y, j along x
    fn write_cos_layer(dir: &Path, layer: u32, porosity: f64) {
        let mut lines = Vec::new();
        for i in 1..=2 {
            for j in 1..=3 {
                let k_sat = if i == 1 && j == 1 { -9.99 } else { layer as f64 };
                lines.push(format!(
                    "{} {} {} {} {} {}",
                    i,
                    j,
                    -100.0 + j as f64,
                    40.0 + i as f64,
                    porosity,
                    k_sat
                ));
            }
        }
        let lines: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        write_lines(dir, &format!("COS_RAWL.layer.{}", layer), &lines);
    }

    #[test]
    fn test_tabular_and_gridded_families() -> Result<()> {
        let dir = TempDir::new()?;
        write_cos_layer(dir.path(), 2, 0.2);
        write_cos_layer(dir.path(), 1, 0.1);
        write_lines(dir.path(), "NLDAS_TXDM1.02", &["5 5 5", "6 6 6"]);
        write_lines(dir.path(), "NLDAS_TXDM1.01", &["1 2 3", "4 5 -9.99"]);

        let groups = FileGroups::scan(dir.path())?;
        let dataset = SoilProcessor::new(metadata()).process(&groups, None, None)?;

        let names: Vec<&str> = dataset.names().collect();
        assert_eq!(names, vec!["COS_RAWL_k_sat", "COS_RAWL_porosity", "TXDM1"]);

        let porosity = dataset.get("COS_RAWL_porosity").unwrap();
        assert_eq!(porosity.shape(), (2, 3, 2));
        assert_eq!(porosity.layers(), &[1, 2]);
        assert_eq!(porosity.data()[[1, 2, 0]], 0.1);
        assert_eq!(porosity.data()[[1, 2, 1]], 0.2);
        assert_eq!(
            porosity.attrs.description.as_deref(),
            Some("porosity description")
        );

        let k_sat = dataset.get("COS_RAWL_k_sat").unwrap();
        assert!(k_sat.data()[[0, 0, 0]].is_nan());
        assert!(k_sat.data()[[0, 0, 1]].is_nan());

        let texture = dataset.get("TXDM1").unwrap();
        assert_eq!(texture.shape(), (2, 3, 2));
        assert_eq!(texture.y(), porosity.y());
        assert_eq!(texture.data()[[0, 2, 0]], 3.0);
        assert!(texture.data()[[1, 2, 0]].is_nan());
        assert_eq!(texture.data()[[1, 0, 1]], 6.0);
        Ok(())
    }

    #[test]
    fn test_gridded_family_without_grid_fails() -> Result<()> {
        let dir = TempDir::new()?;
        write_lines(dir.path(), "PCNTS.1", &["1 2", "3 4"]);

        let groups = FileGroups::scan(dir.path())?;
        let result = SoilProcessor::new(metadata()).process(&groups, Some(&[SoilFamily::Pcnts]), None);
        assert!(matches!(result, Err(SoilError::MissingData(_))));

        let dataset = SoilProcessor::new(metadata())
            .with_grid(vec![0.0, 1.0], vec![0.0, 1.0])
            .process(&groups, Some(&[SoilFamily::Pcnts]), None)?;
        assert_eq!(dataset.get("PCNTS").unwrap().shape(), (2, 2, 1));
        Ok(())
    }

    #[test]
    fn test_repeated_layer_index_fails() -> Result<()> {
        let dir = TempDir::new()?;
        write_lines(dir.path(), "SOILTEXT.1", &["1"]);
        write_lines(dir.path(), "SOILTEXT.01", &["2"]);

        let groups = FileGroups::scan(dir.path())?;
        let result = SoilProcessor::new(metadata())
            .with_grid(vec![0.0], vec![0.0])
            .process(&groups, Some(&[SoilFamily::SoilText]), None);
        assert!(matches!(result, Err(SoilError::DuplicateLayer { layer: 1, .. })));
        Ok(())
    }

    #[test]
    fn test_missing_families_are_skipped() -> Result<()> {
        let dir = TempDir::new()?;
        let groups = FileGroups::scan(dir.path())?;

        let dataset = SoilProcessor::new(metadata()).process(&groups, None, None)?;
        assert!(dataset.is_empty());
        Ok(())
    }
}
