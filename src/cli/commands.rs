use crate::cli::args::{Cli, Commands};
use crate::download::{Downloader, HttpTransport};
use crate::error::{Result, SoilError};
use crate::models::{Dataset, SoilFamily};
use crate::processors::{DatasetSummary, FileGroups, Rasterizer, SoilProcessor};
use crate::readers::MetadataReader;
use crate::settings::Settings;
use crate::utils::filename::generate_default_parquet_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, Level};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_ref())?;
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        None => {
            download(&settings)?;
            let dataset = process(&settings, &[], &[], &[], false)?;
            println!("\n{}", DatasetSummary::from_dataset(&dataset).display_summary());
        }

        Some(Commands::Download { data_dir }) => {
            let settings = override_data_dir(settings, data_dir);
            let paths = download(&settings)?;
            println!("{} soil files available in {}", paths.len(), settings.data_dir.display());
        }

        Some(Commands::Process {
            data_dir,
            meta_file,
            families,
            keep_columns,
            drop_columns,
            output_file,
            compression,
            mmap,
        }) => {
            let mut settings = override_data_dir(settings, data_dir);
            if let Some(meta_file) = meta_file {
                settings = settings.with_meta_file(meta_file);
            }

            // Fail on a bad compression name before parsing anything
            let writer = ParquetWriter::new()
                .with_compression(&compression)?
                .with_row_group_size(settings.row_group_size);

            let dataset = process(&settings, &families, &keep_columns, &drop_columns, mmap)?;
            println!("\n{}", DatasetSummary::from_dataset(&dataset).display_summary());

            if let Some(output_file) = output_file {
                let output_file = if output_file.as_os_str().is_empty() {
                    generate_default_parquet_filename()
                } else {
                    output_file
                };
                if let Some(parent) = output_file.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                println!("Writing dataset to {}...", output_file.display());
                writer.write_dataset(&dataset, &output_file)?;
                let file_info = writer.get_file_info(&output_file)?;
                println!("\n{}", file_info.summary());
            }
        }

        Some(Commands::Info { file }) => {
            println!("Analyzing Parquet file: {}", file.display());
            let file_info = ParquetWriter::new().get_file_info(&file)?;
            println!("\n{}", file_info.summary());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber may already be installed when run() is called more than once
    if let Err(e) = installed {
        debug!(error = %e, "keeping the existing tracing subscriber");
    }
    Ok(())
}

fn override_data_dir(settings: Settings, data_dir: Option<PathBuf>) -> Settings {
    match data_dir {
        Some(dir) => settings.with_data_dir(dir),
        None => settings,
    }
}

fn download(settings: &Settings) -> Result<Vec<PathBuf>> {
    let downloader = Downloader::new(
        HttpTransport::new(),
        &settings.soil_url,
        &settings.data_dir,
        settings.listing_cache(),
    );

    let progress = ProgressReporter::new_spinner("Downloading soil files...", false);
    let paths = downloader.download_all(Some(&progress))?;
    progress.finish_with_message(&format!("{} soil files ready", paths.len()));

    info!(
        soils_dir = %settings.soils_dir().display(),
        bin_dir = %settings.bin_dir().display(),
        "soil archive layout"
    );
    Ok(paths)
}

fn process(
    settings: &Settings,
    families: &[String],
    keep_columns: &[String],
    drop_columns: &[String],
    mmap: bool,
) -> Result<Dataset> {
    let families = families
        .iter()
        .map(|name| {
            SoilFamily::from_name(name)
                .ok_or_else(|| SoilError::Config(format!("Unknown soil family: {}", name)))
        })
        .collect::<Result<Vec<_>>>()?;

    let metadata = MetadataReader::read_metadata(&settings.meta_file)?;
    let groups = FileGroups::scan(&settings.soils_dir())?;
    info!(
        dir = %settings.soils_dir().display(),
        files = groups.total_files(),
        "found soil files"
    );

    let mut rasterizer = Rasterizer::new();
    if !keep_columns.is_empty() {
        rasterizer = rasterizer.with_keep_columns(keep_columns.iter().cloned());
    }
    if !drop_columns.is_empty() {
        rasterizer = rasterizer.with_drop_columns(drop_columns.iter().cloned());
    }

    let processor = SoilProcessor::new(metadata)
        .with_rasterizer(rasterizer)
        .with_mmap(mmap);

    let selected = (!families.is_empty()).then_some(families.as_slice());
    let progress = ProgressReporter::new(
        groups.selected_files(selected) as u64,
        "Processing soil files...",
        false,
    );
    let dataset = processor.process(&groups, selected, Some(&progress))?;
    progress.finish_with_message(&format!("Assembled {} variables", dataset.len()));

    Ok(dataset)
}
