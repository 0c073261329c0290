use super::WriteOutcome;
use crate::config::{Config, SharingConfig};
use crate::error::{NotFound, Result};
use crate::models::{DataFrame, FromSheetRows, Grant, ShareRequest, ToSheetRows};
use crate::sheets::requests::grid_size;
use crate::sheets::{SheetOperations, SheetsClient, SpreadsheetRef, WorksheetRef};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Reads and writes worksheets of spreadsheets addressed by name.
///
/// Holds one authenticated session for its lifetime. Calls are meant to be
/// issued one at a time.
pub struct GsheetClient<S> {
    service: S,
    sharing: SharingConfig,
}

impl GsheetClient<SheetsClient> {
    /// Authenticate with the configured service account key.
    pub async fn connect(config: &Config) -> Result<Self> {
        let service = SheetsClient::new(&config.credentials_path).await?;
        Ok(Self::with_service(service, config.sharing.clone()))
    }
}

impl<S> GsheetClient<S>
where
    S: SheetOperations + Sync,
{
    pub fn with_service(service: S, sharing: SharingConfig) -> Self {
        Self { service, sharing }
    }

    /// Return the stable identifier of the spreadsheet named `name`.
    #[instrument(name = "Resolving spreadsheet", skip(self))]
    pub async fn resolve_identifier(&self, name: &str) -> Result<String> {
        Ok(self.service.open_spreadsheet(name).await?.id)
    }

    /// Read the worksheet at zero-based `index`, using its first row as
    /// column headers.
    #[instrument(name = "Reading worksheet", skip(self))]
    pub async fn read_worksheet(&self, name: &str, index: usize) -> Result<DataFrame> {
        let spreadsheet = self.service.open_spreadsheet(name).await?;

        let worksheet = self
            .service
            .list_worksheets(&spreadsheet.id)
            .await?
            .into_iter()
            .find(|w| w.index == index)
            .ok_or_else(|| NotFound::Worksheet {
                spreadsheet: name.to_string(),
                index,
            })?;

        let values = self.service.read_values(&spreadsheet.id, &worksheet).await?;
        let frame = DataFrame::from_sheet_rows(&values)?;
        debug!(rows = frame.len(), title = %worksheet.title, "Read worksheet");

        Ok(frame)
    }

    /// Write `frame` to `worksheet_name`, row labels included as the first
    /// column, replacing whatever the worksheet held.
    ///
    /// The spreadsheet is created when no spreadsheet has this name. Any
    /// other failure to open it is returned as is. A non-empty `share`
    /// request grants access once the data is written; a failure part way
    /// leaves the remote state as it was at that point.
    #[instrument(name = "Uploading frame", skip(self, frame, share), fields(rows = frame.len()))]
    pub async fn write_worksheet(
        &self,
        frame: &DataFrame,
        spreadsheet_name: &str,
        worksheet_name: &str,
        share: &ShareRequest,
    ) -> Result<WriteOutcome> {
        frame.check_row_names()?;

        let (spreadsheet, spreadsheet_created) =
            self.open_or_create(spreadsheet_name, worksheet_name).await?;

        let rows = frame.to_sheet_rows(true);
        let (worksheet, worksheet_added) = self
            .ensure_worksheet(&spreadsheet, worksheet_name, &rows)
            .await?;

        self.service
            .replace_values(&spreadsheet.id, &worksheet, rows)
            .await?;
        info!(
            spreadsheet = spreadsheet_name,
            worksheet = worksheet_name,
            "Frame uploaded"
        );

        let shared_with = self.share(&spreadsheet, share).await?;

        Ok(WriteOutcome {
            spreadsheet,
            spreadsheet_created,
            worksheet_created: spreadsheet_created || worksheet_added,
            rows_written: frame.len(),
            shared_with,
        })
    }

    /// Permissions currently granted on the spreadsheet named `name`.
    #[instrument(name = "Fetching permissions", skip(self))]
    pub async fn permissions(&self, name: &str) -> Result<Vec<Grant>> {
        let spreadsheet = self.service.open_spreadsheet(name).await?;
        self.service.list_permissions(&spreadsheet.id).await
    }

    async fn open_or_create(
        &self,
        name: &str,
        worksheet_name: &str,
    ) -> Result<(SpreadsheetRef, bool)> {
        match self.service.open_spreadsheet(name).await {
            Ok(spreadsheet) => Ok((spreadsheet, false)),
            Err(e) if e.is_spreadsheet_not_found() => {
                let spreadsheet = self
                    .service
                    .create_spreadsheet(name, worksheet_name)
                    .await?;
                info!(id = %spreadsheet.id, "Created spreadsheet");
                Ok((spreadsheet, true))
            }
            Err(e) => Err(e),
        }
    }

    async fn ensure_worksheet(
        &self,
        spreadsheet: &SpreadsheetRef,
        title: &str,
        rows: &[Vec<Value>],
    ) -> Result<(WorksheetRef, bool)> {
        let existing = self
            .service
            .list_worksheets(&spreadsheet.id)
            .await?
            .into_iter()
            // Tab titles are unique regardless of case
            .find(|w| w.title.to_lowercase() == title.to_lowercase());

        match existing {
            Some(worksheet) => {
                debug!(sheet_id = worksheet.sheet_id, "Found existing worksheet");
                Ok((worksheet, false))
            }
            None => {
                let (row_count, column_count) = grid_size(rows);
                let worksheet = self
                    .service
                    .add_worksheet(&spreadsheet.id, title, row_count, column_count)
                    .await?;
                debug!(sheet_id = worksheet.sheet_id, "Added worksheet");
                Ok((worksheet, true))
            }
        }
    }

    async fn share(
        &self,
        spreadsheet: &SpreadsheetRef,
        request: &ShareRequest,
    ) -> Result<Vec<Grant>> {
        if request.is_empty() {
            return Ok(Vec::new());
        }

        let plan = request.plan(&self.sharing);
        for grant in &plan.grants {
            self.service
                .share(&spreadsheet.id, grant, plan.notify, plan.message.as_deref())
                .await?;
        }

        let targets: Vec<&str> = plan
            .grants
            .iter()
            .map(|g| g.target.as_deref().unwrap_or("anyone"))
            .collect();
        info!("Spreadsheet shared with {}", targets.join(", "));

        Ok(plan.grants)
    }
}
