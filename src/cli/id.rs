use gsheet_client::sheets::SheetsClient;
use gsheet_client::{GsheetClient, Result};

pub async fn execute(client: &GsheetClient<SheetsClient>, name: &str) -> Result<()> {
    let id = client.resolve_identifier(name).await?;
    println!("{}", id);

    Ok(())
}
