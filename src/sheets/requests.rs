use super::WorksheetRef;
use crate::models::{Grant, PermissionType};
use google_drive3::api::Permission;
use google_sheets4::FieldMask;
use google_sheets4::api::{
    AddSheetRequest, GridProperties, Request, Sheet, SheetProperties, Spreadsheet,
    SpreadsheetProperties, UpdateSheetPropertiesRequest,
};
use serde_json::Value;

pub(crate) const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

pub(crate) fn spreadsheet_url(id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{}", id)
}

/// Drive query matching live spreadsheets with exactly this name.
pub(crate) fn name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!(
        "name='{}' and mimeType='{}' and trashed=false",
        escaped, SPREADSHEET_MIME_TYPE
    )
}

/// A1 range covering a whole tab.
pub(crate) fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

pub(crate) fn top_left_cell(title: &str) -> String {
    format!("{}!A1", sheet_range(title))
}

/// Grid dimensions for `rows`, never smaller than one cell.
pub(crate) fn grid_size(rows: &[Vec<Value>]) -> (usize, usize) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (rows.len().max(1), width.max(1))
}

pub(crate) fn new_spreadsheet(name: &str, worksheet_title: &str) -> Spreadsheet {
    Spreadsheet {
        properties: Some(SpreadsheetProperties {
            title: Some(name.to_string()),
            ..Default::default()
        }),
        sheets: Some(vec![Sheet {
            properties: Some(SheetProperties {
                title: Some(worksheet_title.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

pub(crate) fn add_sheet_request(title: &str, rows: usize, columns: usize) -> Request {
    Request {
        add_sheet: Some(AddSheetRequest {
            properties: Some(SheetProperties {
                title: Some(title.to_string()),
                sheet_type: Some("GRID".to_string()),
                grid_properties: Some(GridProperties {
                    row_count: Some(clamp_dimension(rows)),
                    column_count: Some(clamp_dimension(columns)),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        }),
        ..Default::default()
    }
}

pub(crate) fn resize_request(sheet_id: i32, rows: usize, columns: usize) -> Request {
    Request {
        update_sheet_properties: Some(UpdateSheetPropertiesRequest {
            properties: Some(SheetProperties {
                sheet_id: Some(sheet_id),
                grid_properties: Some(GridProperties {
                    row_count: Some(clamp_dimension(rows)),
                    column_count: Some(clamp_dimension(columns)),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            fields: Some(FieldMask::new(&[
                "gridProperties.rowCount",
                "gridProperties.columnCount",
            ])),
        }),
        ..Default::default()
    }
}

fn clamp_dimension(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

pub(crate) fn worksheet_from_properties(props: &SheetProperties) -> Option<WorksheetRef> {
    let grid = props.grid_properties.as_ref();
    Some(WorksheetRef {
        sheet_id: props.sheet_id?,
        title: props.title.clone()?,
        index: usize::try_from(props.index.unwrap_or(0)).ok()?,
        row_count: grid.and_then(|g| g.row_count).unwrap_or(0),
        column_count: grid.and_then(|g| g.column_count).unwrap_or(0),
    })
}

pub(crate) fn permission(grant: &Grant) -> Permission {
    let mut permission = Permission {
        type_: Some(grant.perm_type.as_str().to_string()),
        role: Some(grant.role.as_str().to_string()),
        ..Default::default()
    };

    match grant.perm_type {
        PermissionType::User | PermissionType::Group => {
            permission.email_address = grant.target.clone();
        }
        PermissionType::Domain => permission.domain = grant.target.clone(),
        PermissionType::Anyone => {}
    }

    permission
}

/// `None` for permission kinds this client doesn't model, such as shared
/// drive organizers.
pub(crate) fn grant_from_permission(permission: &Permission) -> Option<Grant> {
    let perm_type: PermissionType = permission.type_.as_deref()?.parse().ok()?;
    let role = permission.role.as_deref()?.parse().ok()?;
    let target = match perm_type {
        PermissionType::User | PermissionType::Group => permission.email_address.clone(),
        PermissionType::Domain => permission.domain.clone(),
        PermissionType::Anyone => None,
    };

    Some(Grant {
        perm_type,
        role,
        target,
    })
}
