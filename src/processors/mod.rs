pub mod dataset_assembler;
pub mod dataset_summary;
pub mod file_grouper;
pub mod layer_merger;
pub mod rasterizer;
pub mod soil_processor;

pub use dataset_assembler::DatasetAssembler;
pub use dataset_summary::{DatasetSummary, VariableStatistics};
pub use file_grouper::FileGroups;
pub use layer_merger::{concat_layers, LayerMerger};
pub use rasterizer::Rasterizer;
pub use soil_processor::{GridAxes, SoilProcessor};
