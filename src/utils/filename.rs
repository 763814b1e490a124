use crate::error::{Result, SoilError};
use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Infer the soil layer index from a file name suffix
///
/// The final dot-separated segment must be a digit string, e.g.
/// `COS_RAWL.layer.3 -> 3` or `NLDAS.TXDM1.07 -> 7`.
pub fn layer_index(path: &Path) -> Result<u32> {
    let filename = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| SoilError::LayerIndex(path.display().to_string()))?;

    let suffix = filename.rsplit('.').next().unwrap_or_default();
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) || suffix == filename {
        return Err(SoilError::LayerIndex(format!(
            "{} (expected a numeric suffix such as '.1')",
            filename
        )));
    }

    match suffix.parse::<u32>() {
        Ok(0) => Err(SoilError::LayerIndex(format!(
            "{} (layer indices start at 1)",
            filename
        ))),
        Ok(index) => Ok(index),
        Err(_) => Err(SoilError::LayerIndex(filename.to_string())),
    }
}

/// Generate default Parquet filename with format: nldas-soils-{YYMMDD}.parquet
pub fn generate_default_parquet_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("nldas-soils-{:02}{:02}{:02}.parquet", year, month, day);
    PathBuf::from("output").join(filename)
}
