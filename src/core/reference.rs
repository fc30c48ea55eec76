//! Reference list extraction from the configuration workbook.

use crate::core::xlsx;
use crate::domain::model::ReferenceList;
use crate::utils::error::Result;

pub const REFERENCE_SHEET: &str = "Dictionary";

/// Pulls ObjectIDs out of the workbook's "Dictionary" sheet.
///
/// The first row is a header row and is skipped. Values come from the
/// configured column when any data row has one there; otherwise the first
/// column is used and `used_fallback` is set so the caller can warn about
/// it. Values are trimmed and blank cells dropped.
pub fn extract(workbook_bytes: &[u8], column: usize) -> Result<ReferenceList> {
    let rows = xlsx::read_sheet(workbook_bytes, REFERENCE_SHEET)?;
    let data_rows = if rows.is_empty() { &rows[..] } else { &rows[1..] };

    let column_has_data = data_rows
        .iter()
        .any(|row| matches!(row.get(column), Some(cell) if !cell.trim().is_empty()));

    let (selected, used_fallback) = if column_has_data {
        (column, false)
    } else {
        (0, true)
    };

    let object_ids: Vec<String> = data_rows
        .iter()
        .filter_map(|row| row.get(selected))
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect();

    Ok(ReferenceList {
        object_ids,
        used_fallback,
    })
}
