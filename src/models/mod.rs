pub mod frame;
pub mod share;

pub use frame::{DataFrame, FromSheetRows, ToSheetRows};
pub use share::{Grant, PermissionType, Role, SharePlan, ShareRequest};
