use gsheet_client::sheets::SheetsClient;
use gsheet_client::{GsheetClient, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

pub async fn execute(
    client: &GsheetClient<SheetsClient>,
    name: &str,
    index: usize,
    output: Option<&Path>,
) -> Result<()> {
    let frame = client.read_worksheet(name, index).await?;

    match output {
        Some(path) => {
            frame.to_csv(File::create(path)?, false)?;
            info!(path = ?path, rows = frame.len(), "Worksheet saved");
        }
        None => frame.to_csv(io::stdout().lock(), false)?,
    }

    Ok(())
}
