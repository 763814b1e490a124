use clap::Parser;
use nldas_soils::cli::{run, Cli};
use nldas_soils::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
