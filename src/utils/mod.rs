pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{generate_default_parquet_filename, layer_index};
pub use progress::ProgressReporter;
