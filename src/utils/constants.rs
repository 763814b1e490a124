/// Remote archive
pub const SOIL_URL: &str = "https://ldas.gsfc.nasa.gov/nldas/NLDASsoils.php";
pub const ARCHIVE_PREFIX: &str = "/nldas/";

/// Soil files and family schemas
pub const SOIL_META_FILE: &str = "soil_meta_data.yml";
pub const SCHEMA_COS_HYD: &str = "COS_HYD";
pub const SCHEMA_SOIL_LAYERS: &str = "SOIL_LAYERS";
pub const BIN_EXTENSION: &str = ".bin";

/// Directory layout
pub const SOIL_DATA_ENV: &str = "SOIL_DATA";
pub const DEFAULT_SOIL_DIR: &str = "nldas_soil_inputs";
pub const BIN_DIR: &str = "bin";
pub const ASC_SOILS_DIR: &str = "asc/soils";
pub const LISTING_CACHE_FILE: &str = "NLDASsoils.json";

/// Environment prefix for settings overrides
pub const SETTINGS_ENV_PREFIX: &str = "NLDAS_SOILS";

/// Table columns that carry grid geometry rather than data
pub const COL_I: &str = "i";
pub const COL_J: &str = "j";
pub const COL_X: &str = "x";
pub const COL_Y: &str = "y";
pub const GRID_COLUMNS: [&str; 4] = [COL_I, COL_J, COL_X, COL_Y];

/// Sentinel used by the source files for missing measurements
pub const NO_DATA: f64 = -9.99;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
