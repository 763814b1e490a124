use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nldas-soils")]
#[command(about = "Download and assemble NLDAS soil parameter grids")]
#[command(version)]
pub struct Cli {
    /// Without a subcommand the archive is downloaded and then processed
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror the NLDAS soil archive into the data directory
    Download {
        #[arg(short, long, help = "Data directory [default: $SOIL_DATA or nldas_soil_inputs]")]
        data_dir: Option<PathBuf>,
    },

    /// Parse downloaded ASCII soil files into a layered dataset
    Process {
        #[arg(short, long, help = "Data directory [default: $SOIL_DATA or nldas_soil_inputs]")]
        data_dir: Option<PathBuf>,

        #[arg(short, long, help = "Soil metadata YAML [default: soil_meta_data.yml]")]
        meta_file: Option<PathBuf>,

        #[arg(short, long = "family", help = "Soil family to process (repeatable, default all)")]
        families: Vec<String>,

        #[arg(long = "keep-column", help = "Only rasterize these table columns")]
        keep_columns: Vec<String>,

        #[arg(long = "drop-column", help = "Skip these table columns")]
        drop_columns: Vec<String>,

        #[arg(
            short,
            long,
            help = "Export to Parquet [default path: output/nldas-soils-{YYMMDD}.parquet]",
            num_args = 0..=1,
            default_missing_value = ""
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value = "false", help = "Read tables through memory maps")]
        mmap: bool,
    },

    /// Display information about an exported Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}
