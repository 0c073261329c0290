//! Read and write Google Sheets worksheets as tabular data, authenticated
//! with a service account.

pub mod config;
pub mod error;
pub mod gsheet;
pub mod models;
pub mod sheets;

pub use config::Config;
pub use error::{AppError, NotFound, Result};
pub use gsheet::{GsheetClient, WriteOutcome};
pub use models::{DataFrame, Grant, PermissionType, Role, ShareRequest};
