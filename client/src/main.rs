use std::{path::PathBuf, process::exit};

use clap::Parser;
use log::error;
use photogrid_lib::{
    config::Config,
    gallery::GridLayout,
    logging::{level_from_verbosity, setup_logger},
    router::GALLERY_PATH,
};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to open first, e.g. /photos or /photos/<id>
    #[arg(long, default_value = GALLERY_PATH)]
    start: String,
    /// Override the photo api location (UNSPLASH_API_URL)
    #[arg(long)]
    api_url: Option<String>,
    /// Cards per gallery row
    #[arg(long, default_value_t = 4)]
    columns: usize,
    /// Gallery rows on screen
    #[arg(long, default_value_t = 3)]
    rows: usize,
    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// More output, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logger(level_from_verbosity(args.verbose), args.log_file.as_deref()) {
        eprintln!("unable to set up logging: {}", e);
        exit(1);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    let config = match args.api_url.as_deref() {
        Some(url) => match config.with_base_url(url) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                exit(1);
            }
        },
        None => config,
    };

    let layout = GridLayout::new(args.columns, args.rows);
    if let Err(e) = photogrid_lib::run(config, layout, &args.start).await {
        error!("gallery stopped unexpectedly: {}", e);
        exit(1);
    }
}
