use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook};
use std::path::Path;

use crate::error::Result;
use crate::table::{CellValue, HIGHLIGHTED_COLUMNS, MetadataTable, TableWriter};

/// Width applied to every template column
pub const COLUMN_WIDTH: f64 = 25.0;

/// Fill for the columns the user has to complete
pub const HIGHLIGHT_RGB: u32 = 0xFFFF00;

/// Writes the metadata template as a styled `.xlsx` workbook
#[derive(Clone, Copy, Debug, Default)]
pub struct XlsxTableWriter;

impl TableWriter for XlsxTableWriter {
    fn write(&self, table: &MetadataTable, path: &Path) -> Result<()> {
        let buffer = to_xlsx(table)?;
        std::fs::write(path, buffer)?;
        log::info!("Wrote template with {} rows to {}", table.rows.len(), path.display());
        Ok(())
    }
}

fn cell_format(highlight: bool, header: bool) -> Format {
    let mut format = Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    if header {
        format = format.set_bold();
    }
    if highlight {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(HIGHLIGHT_RGB));
    }
    format
}

/// Convert the metadata table to XLSX bytes
///
/// Every cell, blank ones included, gets a thin border and centered text so
/// the grid is visible before the user types anything. Antibody, Marker and
/// Conditions are filled yellow.
///
/// # Arguments
/// * `table` - Header and rows to write
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an error
///
/// # Examples
/// ```
/// use westernizer::downloader::to_xlsx;
/// use westernizer::table::MetadataTable;
///
/// let table = MetadataTable::seeded(&["actin".to_string(), "gapdh".to_string()]);
/// let bytes = to_xlsx(&table).unwrap();
/// assert!(bytes.starts_with(b"PK"));
/// ```
pub fn to_xlsx(table: &MetadataTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let highlighted: Vec<bool> = table
        .headers
        .iter()
        .map(|h| !h.is_empty() && HIGHLIGHTED_COLUMNS.contains(&h.as_str()))
        .collect();

    let letters: Vec<String> = highlighted
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .map(|(c, _)| column_to_letter(c as u16 + 1))
        .collect();
    log::debug!("Highlighting columns {}", letters.join(", "));

    for (c, header) in table.headers.iter().enumerate() {
        let col = c as u16;
        worksheet.set_column_width(col, COLUMN_WIDTH)?;
        let format = cell_format(highlighted[c], true);
        if header.is_empty() {
            worksheet.write_blank(0, col, &format)?;
        } else {
            worksheet.write_string_with_format(0, col, header, &format)?;
        }
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_num = (r + 1) as u32;
        for c in 0..table.headers.len() {
            let col = c as u16;
            let format = cell_format(highlighted[c], false);
            match row.get(c).unwrap_or(&CellValue::Empty) {
                CellValue::Text(text) if !text.is_empty() => {
                    worksheet.write_string_with_format(row_num, col, text, &format)?;
                }
                CellValue::Number(n) if !n.is_nan() => {
                    worksheet.write_number_with_format(row_num, col, *n, &format)?;
                }
                _ => {
                    worksheet.write_blank(row_num, col, &format)?;
                }
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Convert column number to letter (A=1, B=2, etc.)
///
/// # Arguments
/// * `col` - Column number (1-based)
///
/// # Returns
/// * `String` - Column letter (A, B, C, ..., Z, AA, AB, etc.)
///
/// # Examples
/// ```
/// use westernizer::downloader::column_to_letter;
///
/// assert_eq!(column_to_letter(1), "A");
/// assert_eq!(column_to_letter(8), "H");
/// assert_eq!(column_to_letter(27), "AA");
/// ```
pub fn column_to_letter(col: u16) -> String {
    let mut name = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        name.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    name
}
