//! Request input validation.

use rsheets_domain::SpreadsheetRef;

/// Resolves the `spreadsheet` / `spreadsheetId` selector pair into a
/// reference.
///
/// Exactly one of the two must be present: `spreadsheet` carries a
/// configured symbolic name, `spreadsheetId` a raw identifier.
pub fn selector_to_ref(
    spreadsheet: Option<&str>,
    spreadsheet_id: Option<&str>,
) -> Result<SpreadsheetRef, String> {
    match (spreadsheet, spreadsheet_id) {
        (Some(_), Some(_)) => {
            Err("exactly one of 'spreadsheet' or 'spreadsheetId' must be provided, got both"
                .to_string())
        }
        (None, None) => {
            Err("exactly one of 'spreadsheet' or 'spreadsheetId' must be provided".to_string())
        }
        (Some(alias), None) if alias.trim().is_empty() => {
            Err("'spreadsheet' cannot be empty".to_string())
        }
        (None, Some(id)) if id.trim().is_empty() => {
            Err("'spreadsheetId' cannot be empty".to_string())
        }
        (Some(alias), None) => Ok(SpreadsheetRef::Alias(alias.to_string())),
        (None, Some(id)) => Ok(SpreadsheetRef::Id(id.to_string())),
    }
}

/// A range must be a non-empty A1-notation string.
pub fn validate_range(range: &str) -> Result<(), String> {
    if range.trim().is_empty() {
        return Err("'range' cannot be empty".to_string());
    }
    Ok(())
}

/// Values must carry at least one row, and every row at least one cell.
pub fn validate_values(values: &[Vec<String>]) -> Result<(), String> {
    if values.is_empty() {
        return Err("'values' must contain at least one row".to_string());
    }
    for (index, row) in values.iter().enumerate() {
        if row.is_empty() {
            return Err(format!("'values' row {index} must contain at least one cell"));
        }
    }
    Ok(())
}
