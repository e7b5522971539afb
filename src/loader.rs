use calamine::{Data, ExcelDateTime, Reader, Xlsx, open_workbook};
use chrono::TimeDelta;
use std::path::Path;

use crate::error::{Result, WesternizerError};
use crate::table::{CellValue, MetadataTable, TableReader};

/// Reads the user-edited template back with calamine
#[derive(Clone, Copy, Debug, Default)]
pub struct XlsxTableReader;

impl TableReader for XlsxTableReader {
    fn read(&self, path: &Path) -> Result<MetadataTable> {
        from_excel(path)
    }
}

/// Maps a calamine cell to the crate's cell model
///
/// Dates and times become text the way the sheet shows them, booleans become
/// `True`/`False` text and error cells (`#N/A` and friends) read as empty.
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::text(if *b { "True" } else { "False" }),
        Data::DateTime(dt) => match date_text(dt) {
            Some(text) => CellValue::Text(text),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Text for a date or time cell, rounded to the second
///
/// A serial below one day is a time of day (`01:10:00`), anything else a
/// full timestamp (`2024-01-02 00:00:00`). Durations print as `HH:MM:SS`
/// with hours past 24 kept.
fn date_text(dt: &ExcelDateTime) -> Option<String> {
    let half_second = TimeDelta::milliseconds(500);

    if dt.is_duration() {
        let seconds = (dt.as_duration()? + half_second).num_seconds();
        return Some(format!(
            "{:02}:{:02}:{:02}",
            seconds / 3600,
            seconds % 3600 / 60,
            seconds % 60
        ));
    }

    let value = dt.as_datetime()? + half_second;
    let pattern = if dt.as_f64() < 1.0 {
        "%H:%M:%S"
    } else {
        "%Y-%m-%d %H:%M:%S"
    };
    Some(value.format(pattern).to_string())
}

/// Load the metadata table from an Excel file
///
/// The first worksheet is used; its first row is the header.
///
/// # Arguments
/// * `filepath` - Path to the XLSX file
///
/// # Returns
/// * `Result<MetadataTable>` - Header and data rows, or an error
///
/// # Examples
/// ```no_run
/// use westernizer::loader::from_excel;
///
/// match from_excel("Output Excel/240307 1405 WB Template.xlsx") {
///     Ok(table) => println!("Loaded {} rows", table.rows.len()),
///     Err(e) => eprintln!("Error loading Excel: {}", e),
/// }
/// ```
pub fn from_excel(filepath: impl AsRef<Path>) -> Result<MetadataTable> {
    let mut workbook: Xlsx<_> = open_workbook(filepath.as_ref())?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(WesternizerError::EmptyWorkbook)?;

    let range = workbook.worksheet_range(&sheet_name)?;

    // Cells left of the used range still count as columns
    let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let mut rows = range.rows().map(|row| {
        let mut values = vec![CellValue::Empty; col_offset];
        values.extend(row.iter().map(cell_value));
        values
    });

    let headers: Vec<String> = rows
        .next()
        .ok_or(WesternizerError::EmptyWorkbook)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let rows: Vec<Vec<CellValue>> = rows.collect();
    log::debug!(
        "Read sheet '{}' with {} columns and {} rows",
        sheet_name,
        headers.len(),
        rows.len()
    );

    Ok(MetadataTable { headers, rows })
}
