pub mod hyperlinks;

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{DataType, Reader, Xlsx};

use crate::domain::error::{AppError, Result};

/// First worksheet of a workbook, flattened to strings, plus the hyperlink
/// targets collected from the raw sheet XML (calamine does not surface
/// hyperlinks). Hyperlink keys are absolute zero-based `(row, col)` sheet
/// coordinates; `start_row`/`start_col` locate the header cell so data rows
/// can be matched positionally.
#[derive(Debug, Default)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub hyperlinks: HashMap<(u32, u32), String>,
    pub start_row: u32,
    pub start_col: u32,
}

/// Reads the first sheet of an `.xlsx` workbook from raw bytes. A workbook
/// that cannot be opened or has no sheet fails the whole import; everything
/// past that degrades per cell.
pub fn read_first_sheet(bytes: &[u8]) -> Result<SheetData> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<_> = Xlsx::new(cursor)
        .map_err(|e| AppError::ParseError(format!("Failed to open Excel file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for row in range.rows() {
        let row_data: Vec<String> = row
            .iter()
            .map(|cell| {
                cell.as_string()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("{}", cell))
            })
            .collect();
        all_rows.push(row_data);
    }

    if all_rows.is_empty() {
        return Err(AppError::ParseError(
            "Worksheet has no header row".to_string(),
        ));
    }

    let headers = all_rows.remove(0);
    let hyperlinks = hyperlinks::extract_hyperlinks(bytes);

    Ok(SheetData {
        headers,
        rows: all_rows,
        hyperlinks,
        start_row,
        start_col,
    })
}
