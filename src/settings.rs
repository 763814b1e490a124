use crate::error::Result;
use crate::utils::constants::{
    ASC_SOILS_DIR, BIN_DIR, DEFAULT_ROW_GROUP_SIZE, DEFAULT_SOIL_DIR, LISTING_CACHE_FILE,
    SETTINGS_ENV_PREFIX, SOIL_DATA_ENV, SOIL_META_FILE, SOIL_URL,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Runtime settings: defaults, then an optional config file, then environment overrides
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    pub data_dir: PathBuf,

    #[validate(url)]
    pub soil_url: String,

    pub meta_file: PathBuf,

    #[validate(range(min = 1))]
    pub row_group_size: usize,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("data_dir", DEFAULT_SOIL_DIR)?
            .set_default("soil_url", SOIL_URL)?
            .set_default("meta_file", SOIL_META_FILE)?
            .set_default("row_group_size", DEFAULT_ROW_GROUP_SIZE as i64)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(SETTINGS_ENV_PREFIX).try_parsing(true))
            .set_override_option("data_dir", std::env::var(SOIL_DATA_ENV).ok())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn with_meta_file(mut self, meta_file: PathBuf) -> Self {
        self.meta_file = meta_file;
        self
    }

    /// ASCII soil files
    pub fn soils_dir(&self) -> PathBuf {
        self.data_dir.join(ASC_SOILS_DIR)
    }

    /// Binary soil parameter files
    pub fn bin_dir(&self) -> PathBuf {
        self.data_dir.join(BIN_DIR)
    }

    pub fn listing_cache(&self) -> PathBuf {
        self.data_dir.join(LISTING_CACHE_FILE)
    }
}
