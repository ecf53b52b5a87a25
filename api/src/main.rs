use std::{env, net::SocketAddr, process::exit};

use fern::colors::{Color, ColoredLevelConfig};
use log::{error, info, LevelFilter};
use photogrid_stub_api_lib::{catalog::Catalog, webserver::WebServer};

const DEFAULT_ADDR: &str = "127.0.0.1:3030";
const DEFAULT_CATALOG_SIZE: usize = 60;

fn setup_logger() -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Info)
        .level_for("photogrid_stub_api", LevelFilter::Debug)
        .level_for("photogrid_stub_api_lib", LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    if let Err(e) = setup_logger() {
        eprintln!("unable to set up logging: {}", e);
        exit(1);
    }

    let address: SocketAddr = match env::var("STUB_API_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
    {
        Ok(a) => a,
        Err(e) => {
            error!("STUB_API_ADDR is not a socket address: {}", e);
            exit(1);
        }
    };

    let catalog_size = match env::var("STUB_CATALOG_SIZE") {
        Ok(size) => match size.parse() {
            Ok(size) => size,
            Err(e) => {
                error!("STUB_CATALOG_SIZE is not a number: {}", e);
                exit(1);
            }
        },
        Err(_) => DEFAULT_CATALOG_SIZE,
    };

    let mut builder = WebServer::builder()
        .address(address)
        .catalog(Catalog::generate(catalog_size));
    match env::var("STUB_ACCESS_KEY") {
        Ok(key) => builder = builder.access_key(key),
        Err(_) => info!("STUB_ACCESS_KEY not set, accepting client_id=stub-access-key"),
    }

    builder.build().run().await;
}
