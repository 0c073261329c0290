use clap::Args;
use gsheet_client::sheets::SheetsClient;
use gsheet_client::{DataFrame, GsheetClient, PermissionType, Result, Role, ShareRequest};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Spreadsheet name
    pub name: String,
    /// Worksheet name
    pub worksheet: String,
    /// CSV file with a header row
    #[arg(long, short)]
    pub input: PathBuf,
    /// Use this CSV column as the row labels
    #[arg(long)]
    pub index_column: Option<String>,
    /// Share the spreadsheet with this address (repeatable)
    #[arg(long = "share-with", value_name = "EMAIL")]
    pub share_with: Vec<String>,
    #[arg(long, value_enum)]
    pub perm_type: Option<PermissionType>,
    #[arg(long, value_enum)]
    pub role: Option<Role>,
    /// Notification email body
    #[arg(long)]
    pub message: Option<String>,
    /// Don't send notification emails
    #[arg(long)]
    pub no_notify: bool,
}

impl PushArgs {
    pub fn share_request(&self) -> ShareRequest {
        ShareRequest {
            targets: self.share_with.clone(),
            perm_type: self.perm_type,
            role: self.role,
            message: self.message.clone(),
            notify: self.no_notify.then_some(false),
        }
    }
}

pub async fn execute(client: &GsheetClient<SheetsClient>, args: &PushArgs) -> Result<()> {
    let mut frame = DataFrame::from_csv(File::open(&args.input)?)?;
    if let Some(column) = &args.index_column {
        frame = frame.set_index(column)?;
    }

    let outcome = client
        .write_worksheet(&frame, &args.name, &args.worksheet, &args.share_request())
        .await?;

    info!(
        url = %outcome.spreadsheet.url,
        rows = outcome.rows_written,
        created = outcome.spreadsheet_created,
        "Upload completed"
    );

    Ok(())
}
