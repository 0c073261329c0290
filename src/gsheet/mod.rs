mod client;
#[cfg(test)]
mod mocks;

pub use client::GsheetClient;

use crate::models::Grant;
use crate::sheets::SpreadsheetRef;

/// What a write did, in place of a printed confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub spreadsheet: SpreadsheetRef,
    pub spreadsheet_created: bool,
    pub worksheet_created: bool,
    /// Data rows, excluding the header row.
    pub rows_written: usize,
    pub shared_with: Vec<Grant>,
}

impl WriteOutcome {
    pub fn is_shared(&self) -> bool {
        !self.shared_with.is_empty()
    }
}
