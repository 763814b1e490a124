use crate::error::{Result, SoilError};
use crate::models::SoilMetadata;
use config::{Config, File, FileFormat};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Loads the soil metadata YAML (`schema -> [[column, description], ...]`)
pub struct MetadataReader;

impl MetadataReader {
    pub fn read_metadata(path: &Path) -> Result<SoilMetadata> {
        if !path.exists() {
            return Err(SoilError::Config(format!(
                "Soil metadata file not found: {}",
                path.display()
            )));
        }

        let source = File::from(path).format(FileFormat::Yaml).required(true);
        let metadata = Self::build(Config::builder().add_source(source).build()?)?;

        info!(
            path = %path.display(),
            schemas = ?metadata.schema_names(),
            "loaded soil metadata"
        );
        Ok(metadata)
    }

    pub fn parse_metadata(yaml: &str) -> Result<SoilMetadata> {
        let config = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?;
        Self::build(config)
    }

    fn build(config: Config) -> Result<SoilMetadata> {
        let raw: HashMap<String, Vec<Vec<String>>> = config.try_deserialize().map_err(|e| {
            SoilError::Config(format!("Malformed soil metadata: {}", e))
        })?;
        SoilMetadata::from_pairs(raw)
    }
}
