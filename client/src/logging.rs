use std::path::Path;

use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Map the number of `-v` flags onto a log level.
pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger.
///
/// With a log file everything goes there uncoloured, otherwise to stderr so it
/// stays apart from the rendered view on stdout.
pub fn setup_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let base = fern::Dispatch::new()
        .level(level)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("handlebars", LevelFilter::Warn);

    let output = match log_file {
        Some(path) => fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .chain(fern::log_file(path)?),
        None => {
            let colors = ColoredLevelConfig::new()
                .error(Color::Red)
                .warn(Color::Yellow)
                .info(Color::Green)
                .debug(Color::Blue)
                .trace(Color::BrightBlack);

            fern::Dispatch::new()
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "{} [{}] [{}] {}",
                        chrono::Local::now().format("%H:%M:%S"),
                        colors.color(record.level()),
                        record.target(),
                        message
                    ))
                })
                .chain(std::io::stderr())
        }
    };

    base.chain(output).apply()?;
    Ok(())
}
