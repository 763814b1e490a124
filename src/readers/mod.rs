pub mod grid_reader;
pub mod metadata_reader;
pub mod table_reader;

pub use grid_reader::GridReader;
pub use metadata_reader::MetadataReader;
pub use table_reader::TableReader;
