pub mod config;
pub mod detail;
pub mod error;
pub mod gallery;
pub mod lifetime;
pub mod logging;
pub mod media;
pub mod render;
pub mod router;
pub mod session;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use log::info;
use tokio::io::{stdin, stdout, BufReader};

use crate::{
    config::Config,
    gallery::GridLayout,
    media::UnsplashClient,
    session::Session,
};

/// Run an interactive gallery session on stdin/stdout against the configured api.
pub async fn run(
    config: Config,
    layout: GridLayout,
    start: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("using photo api at {}", config.api_base_url);

    let client = Arc::new(UnsplashClient::new(config.clone()));
    let session = Session::new(client, config, layout, start)?;
    session.run(BufReader::new(stdin()), stdout()).await?;

    Ok(())
}
