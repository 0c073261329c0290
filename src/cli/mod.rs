mod id;
mod permissions;
mod pull;
mod push;
mod show;

use clap::{Parser, Subcommand};
use gsheet_client::{Config, GsheetClient, Result};
use std::path::PathBuf;

pub use push::PushArgs;
pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "gsheet-client")]
#[command(about = "Read and write Google Sheets worksheets as CSV", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Service account key file, overriding the gs_credentials variable
    #[arg(long, global = true, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Id { name } => id::execute(&self.connect().await?, name).await,
            Commands::Pull {
                name,
                index,
                output,
            } => pull::execute(&self.connect().await?, name, *index, output.as_deref()).await,
            Commands::Push(args) => push::execute(&self.connect().await?, args).await,
            Commands::Permissions { name } => {
                permissions::execute(&self.connect().await?, name).await
            }
            Commands::Show { resource } => resource.execute().await,
        }
    }

    async fn connect(&self) -> Result<GsheetClient<gsheet_client::sheets::SheetsClient>> {
        let config = Config::load(self.credentials.clone())?;
        GsheetClient::connect(&config).await
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the identifier of a spreadsheet
    Id {
        /// Spreadsheet name
        name: String,
    },
    /// Read a worksheet and write it out as CSV
    Pull {
        /// Spreadsheet name
        name: String,
        /// Zero-based worksheet position
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Upload a CSV file to a worksheet, creating the spreadsheet if needed
    Push(PushArgs),
    /// List who a spreadsheet is shared with
    Permissions {
        /// Spreadsheet name
        name: String,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
}
