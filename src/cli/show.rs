use clap::Subcommand;
use gsheet_client::config::CREDENTIALS_ENV;
use gsheet_client::{Config, Result};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show configuration path and credentials location
    Paths,
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ShowResource::Paths => show_paths(),
        }
    }
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;
    info!(path = ?config_path, "Config path");

    match std::env::var_os(CREDENTIALS_ENV) {
        Some(path) => info!(path = ?path, "Credentials path"),
        None => info!("Credentials path not set; export {}", CREDENTIALS_ENV),
    }

    Ok(())
}
