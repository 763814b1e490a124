pub mod dataset;
pub mod family;
pub mod metadata;
pub mod raster;
pub mod table;

pub use dataset::Dataset;
pub use family::{FamilyKind, SoilFamily};
pub use metadata::{ColumnSpec, SoilMetadata};
pub use raster::{Raster, RasterAttrs};
pub use table::Table;
