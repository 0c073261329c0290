use crate::error::{AppError, NotFound, Result};
use crate::models::Grant;
use crate::sheets::{SheetOperations, SpreadsheetRef, WorksheetRef};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// In-memory spreadsheet service.
#[derive(Clone, Default)]
pub(crate) struct MockSheets {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    spreadsheets: Vec<MockSpreadsheet>,
    next_id: u32,
    open_error: Option<AppError>,
    share_error: Option<AppError>,
    notifications: Vec<(bool, Option<String>)>,
}

struct MockSpreadsheet {
    reference: SpreadsheetRef,
    worksheets: Vec<(WorksheetRef, Vec<Vec<Value>>)>,
    permissions: Vec<Grant>,
}

impl MockState {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn insert(&mut self, name: &str) -> &mut MockSpreadsheet {
        let id = format!("sheet-{}", self.next_id());
        self.spreadsheets.push(MockSpreadsheet {
            reference: SpreadsheetRef {
                url: format!("https://docs.google.com/spreadsheets/d/{}", id),
                id,
                name: name.to_string(),
            },
            worksheets: Vec::new(),
            permissions: Vec::new(),
        });
        self.spreadsheets.last_mut().unwrap()
    }

    fn add_worksheet(&mut self, spreadsheet_id: &str, title: &str) -> Result<WorksheetRef> {
        let sheet_id = self.next_id() as i32;
        let spreadsheet = self.by_id(spreadsheet_id)?;
        let worksheet = WorksheetRef {
            sheet_id,
            title: title.to_string(),
            index: spreadsheet.worksheets.len(),
            row_count: 1000,
            column_count: 26,
        };
        spreadsheet.worksheets.push((worksheet.clone(), Vec::new()));
        Ok(worksheet)
    }

    fn by_id(&mut self, id: &str) -> Result<&mut MockSpreadsheet> {
        self.spreadsheets
            .iter_mut()
            .find(|s| s.reference.id == id)
            .ok_or_else(|| AppError::Sheets(format!("Requested entity was not found: {}", id)))
    }
}

impl MockSheets {
    /// Add a spreadsheet holding `worksheets` in order, returning its ID.
    pub(crate) fn seed(&self, name: &str, worksheets: &[(&str, Vec<Vec<Value>>)]) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.insert(name).reference.id.clone();
        for (title, values) in worksheets {
            let worksheet = state.add_worksheet(&id, title).unwrap();
            let spreadsheet = state.by_id(&id).unwrap();
            spreadsheet.worksheets[worksheet.index].1 = values.clone();
        }
        id
    }

    pub(crate) fn fail_open(&self, error: AppError) {
        self.state.lock().unwrap().open_error = Some(error);
    }

    pub(crate) fn fail_share(&self, error: AppError) {
        self.state.lock().unwrap().share_error = Some(error);
    }

    pub(crate) fn spreadsheet_count(&self) -> usize {
        self.state.lock().unwrap().spreadsheets.len()
    }

    pub(crate) fn worksheet_titles(&self, name: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .spreadsheets
            .iter()
            .find(|s| s.reference.name == name)
            .map(|s| s.worksheets.iter().map(|(w, _)| w.title.clone()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn notifications(&self) -> Vec<(bool, Option<String>)> {
        self.state.lock().unwrap().notifications.clone()
    }
}

#[async_trait]
impl SheetOperations for MockSheets {
    async fn open_spreadsheet(&self, name: &str) -> Result<SpreadsheetRef> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.open_error.take() {
            return Err(error);
        }

        state
            .spreadsheets
            .iter()
            .find(|s| s.reference.name == name)
            .map(|s| s.reference.clone())
            .ok_or_else(|| {
                NotFound::Spreadsheet {
                    name: name.to_string(),
                }
                .into()
            })
    }

    async fn create_spreadsheet(
        &self,
        name: &str,
        worksheet_title: &str,
    ) -> Result<SpreadsheetRef> {
        let mut state = self.state.lock().unwrap();
        let reference = state.insert(name).reference.clone();
        state.add_worksheet(&reference.id, worksheet_title)?;
        Ok(reference)
    }

    async fn list_worksheets(&self, spreadsheet_id: &str) -> Result<Vec<WorksheetRef>> {
        let mut state = self.state.lock().unwrap();
        let spreadsheet = state.by_id(spreadsheet_id)?;
        Ok(spreadsheet.worksheets.iter().map(|(w, _)| w.clone()).collect())
    }

    async fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        _rows: usize,
        _columns: usize,
    ) -> Result<WorksheetRef> {
        self.state
            .lock()
            .unwrap()
            .add_worksheet(spreadsheet_id, title)
    }

    async fn read_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetRef,
    ) -> Result<Vec<Vec<Value>>> {
        let mut state = self.state.lock().unwrap();
        let spreadsheet = state.by_id(spreadsheet_id)?;
        Ok(spreadsheet.worksheets[worksheet.index].1.clone())
    }

    async fn replace_values(
        &self,
        spreadsheet_id: &str,
        worksheet: &WorksheetRef,
        rows: Vec<Vec<Value>>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let spreadsheet = state.by_id(spreadsheet_id)?;
        spreadsheet.worksheets[worksheet.index].1 = rows;
        Ok(())
    }

    async fn share(
        &self,
        spreadsheet_id: &str,
        grant: &Grant,
        notify: bool,
        message: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.share_error.take() {
            return Err(error);
        }

        state
            .notifications
            .push((notify, message.map(str::to_string)));
        state.by_id(spreadsheet_id)?.permissions.push(grant.clone());
        Ok(())
    }

    async fn list_permissions(&self, spreadsheet_id: &str) -> Result<Vec<Grant>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.by_id(spreadsheet_id)?.permissions.clone())
    }
}
