use gsheet_client::sheets::SheetsClient;
use gsheet_client::{GsheetClient, Result};
use tracing::info;

pub async fn execute(client: &GsheetClient<SheetsClient>, name: &str) -> Result<()> {
    for grant in client.permissions(name).await? {
        info!(
            perm_type = %grant.perm_type,
            role = %grant.role,
            target = grant.target.as_deref().unwrap_or("-"),
            "Permission"
        );
    }

    Ok(())
}
