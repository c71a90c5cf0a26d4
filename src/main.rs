mod args;
mod compose;
mod config;
mod error;
mod geometry;
mod grid;
mod namedays;
mod render;

use std::path::PathBuf;
use std::process;

use flexi_logger::{FileSpec, Logger};
use structopt::StructOpt;

use args::Args;
use config::Config;
use error::{Error, ErrorKind};
use namedays::NameDayTable;
use render::pdf::PdfAssembler;

fn main() {
    let args = Args::from_args();

    if let Err(err) = run(args) {
        eprintln!("magpie: {}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file.clone())?)
            .print_message();
    }

    logger.start()?;

    if args.year < 1 {
        return Err(Error::new(ErrorKind::InvalidArgument, "year must be positive").into());
    }

    let config = Config::load(args.configfile.as_deref())?;

    let names = match &args.names {
        Some(path) => {
            let table = NameDayTable::from_file(path)?;
            log::info!("loaded {} name-day entries", table.len());
            Some(table)
        }
        None => None,
    };

    let mut assembler = PdfAssembler::new(
        &config,
        args.year,
        args.images.as_deref(),
        args.font.as_deref(),
    )?;

    let pages = compose::compose_year(args.year, &config, names.as_ref(), &assembler)?;
    for page in &pages {
        assembler.render_page(page, &config.labels);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("calendar-{}.pdf", args.year)));
    assembler.save(&output)?;

    Ok(())
}
