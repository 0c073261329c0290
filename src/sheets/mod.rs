mod auth;
mod client;
pub(crate) mod requests;

pub use auth::AUTH_SCOPES;
pub use client::SheetsClient;

use crate::error::Result;
use crate::models::Grant;
use async_trait::async_trait;
use serde_json::Value;

/// A spreadsheet file, resolved from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetRef {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// A tab within a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetRef {
    pub sheet_id: i32,
    pub title: String,
    /// Zero-based position among the spreadsheet's tabs.
    pub index: usize,
    pub row_count: i32,
    pub column_count: i32,
}

/// Remote calls the spreadsheet client is built on.
///
/// Every call goes to the remote service; nothing is cached between calls.
#[async_trait]
pub trait SheetOperations {
    /// Fails with `NotFound::Spreadsheet` when no spreadsheet has this name.
    async fn open_spreadsheet(&self, name: &str) -> Result<SpreadsheetRef>;

    /// Create a spreadsheet whose only tab is `worksheet_title`.
    async fn create_spreadsheet(
        &self,
        name: &str,
        worksheet_title: &str,
    ) -> Result<SpreadsheetRef>;

    /// Tabs ordered by position.
    async fn list_worksheets(&self, spreadsheet_id: &str) -> Result<Vec<WorksheetRef>>;

    async fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: usize,
        columns: usize,
    ) -> Result<WorksheetRef>;

    async fn read_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetRef,
    ) -> Result<Vec<Vec<Value>>>;

    /// Clear the tab, fit its grid to `rows`, and write them from A1.
    async fn replace_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<()>;

    async fn share(
        &self,
        spreadsheet_id: &str,
        grant: &Grant,
        notify: bool,
        message: Option<&str>,
    ) -> Result<()>;

    async fn list_permissions(&self, spreadsheet_id: &str) -> Result<Vec<Grant>>;
}
