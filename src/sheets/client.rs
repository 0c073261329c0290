use super::auth::{AUTH_SCOPES, create_and_verify_authenticator};
use super::requests;
use super::{SheetOperations, SpreadsheetRef, WorksheetRef};
use crate::error::{AppError, NotFound, Result};
use crate::models::{Grant, Role};
use async_trait::async_trait;
use google_drive3::api::DriveHub;
use google_sheets4::api::{BatchUpdateSpreadsheetRequest, ClearValuesRequest, Sheets, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, instrument};

/// Google Sheets v4 and Drive v3 bindings for [`SheetOperations`].
pub struct SheetsClient {
    sheets: Sheets<HttpsConnector<HttpConnector>>,
    drive: DriveHub<HttpsConnector<HttpConnector>>,
}

impl SheetsClient {
    /// Create a new SheetsClient authenticated as the service account in
    /// `credentials_path`
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(credentials_path: &Path) -> Result<Self> {
        let auth = create_and_verify_authenticator(credentials_path).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            sheets: Sheets::new(client.clone(), auth.clone()),
            drive: DriveHub::new(client, auth),
        })
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        batch_update: BatchUpdateSpreadsheetRequest,
        action: &str,
    ) -> Result<google_sheets4::api::BatchUpdateSpreadsheetResponse> {
        let (_, response) = self
            .sheets
            .spreadsheets()
            .batch_update(batch_update, spreadsheet_id)
            .add_scopes(AUTH_SCOPES)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to {}: {}", action, e)))?;

        Ok(response)
    }
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Finding spreadsheet", skip(self))]
    async fn open_spreadsheet(&self, name: &str) -> Result<SpreadsheetRef> {
        let query = requests::name_query(name);

        let (_, file_list) = self
            .drive
            .files()
            .list()
            .q(&query)
            .spaces("drive")
            .supports_all_drives(true)
            .include_items_from_all_drives(true)
            .page_size(1)
            .add_scopes(AUTH_SCOPES)
            .doit()
            .await
            .map_err(|e| AppError::Drive(format!("Failed to search spreadsheet: {}", e)))?;

        let id = file_list
            .files
            .and_then(|files| files.into_iter().next())
            .and_then(|file| file.id)
            .ok_or_else(|| NotFound::Spreadsheet {
                name: name.to_string(),
            })?;
        debug!(%id, "Found spreadsheet");

        Ok(SpreadsheetRef {
            url: requests::spreadsheet_url(&id),
            id,
            name: name.to_string(),
        })
    }

    #[instrument(name = "Creating spreadsheet", skip(self))]
    async fn create_spreadsheet(
        &self,
        name: &str,
        worksheet_title: &str,
    ) -> Result<SpreadsheetRef> {
        let (_, result) = self
            .sheets
            .spreadsheets()
            .create(requests::new_spreadsheet(name, worksheet_title))
            .add_scopes(AUTH_SCOPES)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to create spreadsheet: {}", e)))?;

        let id = result
            .spreadsheet_id
            .ok_or_else(|| AppError::Sheets("Created spreadsheet has empty ID".to_string()))?;
        let url = result
            .spreadsheet_url
            .unwrap_or_else(|| requests::spreadsheet_url(&id));

        Ok(SpreadsheetRef {
            id,
            name: name.to_string(),
            url,
        })
    }

    #[instrument(name = "Listing worksheets", skip(self))]
    async fn list_worksheets(&self, spreadsheet_id: &str) -> Result<Vec<WorksheetRef>> {
        let (_, spreadsheet) = self
            .sheets
            .spreadsheets()
            .get(spreadsheet_id)
            .include_grid_data(false)
            .add_scopes(AUTH_SCOPES)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to get spreadsheet: {}", e)))?;

        let mut worksheets: Vec<WorksheetRef> = spreadsheet
            .sheets
            .unwrap_or_default()
            .iter()
            .filter_map(|sheet| sheet.properties.as_ref())
            .filter_map(requests::worksheet_from_properties)
            .collect();
        worksheets.sort_by_key(|w| w.index);

        Ok(worksheets)
    }

    #[instrument(name = "Adding worksheet", skip(self))]
    async fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: usize,
        columns: usize,
    ) -> Result<WorksheetRef> {
        let batch_update = BatchUpdateSpreadsheetRequest {
            requests: Some(vec![requests::add_sheet_request(title, rows, columns)]),
            ..Default::default()
        };

        let response = self
            .batch_update(spreadsheet_id, batch_update, "add worksheet")
            .await?;

        response
            .replies
            .and_then(|replies| replies.into_iter().next())
            .and_then(|reply| reply.add_sheet)
            .and_then(|add_sheet| add_sheet.properties)
            .as_ref()
            .and_then(requests::worksheet_from_properties)
            .ok_or_else(|| {
                AppError::Sheets("Failed to get sheet properties from add response".to_string())
            })
    }

    #[instrument(name = "Fetching worksheet values", skip(self, worksheet), fields(title = %worksheet.title))]
    async fn read_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetRef,
    ) -> Result<Vec<Vec<Value>>> {
        let range = requests::sheet_range(&worksheet.title);
        let (_, response) = self
            .sheets
            .spreadsheets()
            .values_get(spreadsheet_id, &range)
            .date_time_render_option("FORMATTED_STRING")
            .major_dimension("ROWS")
            .value_render_option("UNFORMATTED_VALUE")
            .add_scopes(AUTH_SCOPES)
            .doit()
            .await
            .map_err(|e| {
                AppError::Sheets(format!(
                    "Failed to read worksheet '{}': {}",
                    worksheet.title, e
                ))
            })?;

        Ok(response.values.unwrap_or_default())
    }

    #[instrument(name = "Writing worksheet values", skip(self, worksheet, rows), fields(title = %worksheet.title))]
    async fn replace_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<()> {
        let range = requests::sheet_range(&worksheet.title);
        self.sheets
            .spreadsheets()
            .values_clear(ClearValuesRequest::default(), spreadsheet_id, &range)
            .add_scopes(AUTH_SCOPES)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to clear worksheet: {}", e)))?;

        let (row_count, column_count) = requests::grid_size(&rows);
        let resize = BatchUpdateSpreadsheetRequest {
            requests: Some(vec![requests::resize_request(
                worksheet.sheet_id,
                row_count,
                column_count,
            )]),
            ..Default::default()
        };
        self.batch_update(spreadsheet_id, resize, "resize worksheet")
            .await?;
        debug!(row_count, column_count, "Resized worksheet");

        let data_range = requests::top_left_cell(&worksheet.title);
        let value_range = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(data_range.clone()),
            values: Some(rows),
        };

        self.sheets
            .spreadsheets()
            .values_update(value_range, spreadsheet_id, &data_range)
            .value_input_option("RAW")
            .add_scopes(AUTH_SCOPES)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to write values: {}", e)))?;

        Ok(())
    }

    #[instrument(name = "Sharing spreadsheet", skip(self, message), fields(target = ?grant.target))]
    async fn share(
        &self,
        spreadsheet_id: &str,
        grant: &Grant,
        notify: bool,
        message: Option<&str>,
    ) -> Result<()> {
        let mut call = self
            .drive
            .permissions()
            .create(requests::permission(grant), spreadsheet_id)
            .supports_all_drives(true)
            .send_notification_email(notify)
            .transfer_ownership(grant.role == Role::Owner)
            .add_scopes(AUTH_SCOPES);

        if let Some(message) = message.filter(|_| notify) {
            call = call.email_message(message);
        }

        call.doit()
            .await
            .map_err(|e| AppError::Drive(format!("Failed to share spreadsheet: {}", e)))?;

        Ok(())
    }

    #[instrument(name = "Listing permissions", skip(self))]
    async fn list_permissions(&self, spreadsheet_id: &str) -> Result<Vec<Grant>> {
        let (_, permission_list) = self
            .drive
            .permissions()
            .list(spreadsheet_id)
            .supports_all_drives(true)
            .param("fields", "permissions(id,type,role,emailAddress,domain)")
            .add_scopes(AUTH_SCOPES)
            .doit()
            .await
            .map_err(|e| AppError::Drive(format!("Failed to list permissions: {}", e)))?;

        let grants = permission_list
            .permissions
            .unwrap_or_default()
            .iter()
            .filter_map(|permission| {
                let grant = requests::grant_from_permission(permission);
                if grant.is_none() {
                    debug!(id = ?permission.id, role = ?permission.role, "Skipping permission");
                }
                grant
            })
            .collect();

        Ok(grants)
    }
}
