#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::Path;
use westernizer::table::COLUMNS;

/// Writes a blank RGB image; the format follows the extension
pub fn write_image(path: &Path, width: u32, height: u32) {
    image::RgbImage::new(width, height)
        .save(path)
        .unwrap_or_else(|e| panic!("failed to write {}: {}", path.display(), e));
}

/// Writes a file that has an image extension but is not an image
pub fn write_garbage(path: &Path) {
    std::fs::write(path, b"not an image").unwrap();
}

/// One antibody row as a user would fill it in
pub struct FilledRow<'a> {
    pub name: &'a str,
    pub marker: Option<Marker<'a>>,
}

pub enum Marker<'a> {
    Number(f64),
    Text(&'a str),
}

/// Saves a workbook laid out like the template, already filled in
pub fn write_filled_workbook(path: &Path, rows: &[FilledRow<'_>], conditions: &[&str]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, header) in COLUMNS.iter().enumerate() {
        if !header.is_empty() {
            worksheet.write_string(0, c as u16, *header).unwrap();
        }
    }

    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        worksheet.write_string(r, 0, row.name).unwrap();
        worksheet.write_number(r, 1, 10.0).unwrap();
        worksheet.write_number(r, 2, 12.0).unwrap();
        match &row.marker {
            Some(Marker::Number(n)) => {
                worksheet.write_number(r, 3, *n).unwrap();
            }
            Some(Marker::Text(t)) => {
                worksheet.write_string(r, 3, *t).unwrap();
            }
            None => {}
        }
        worksheet.write_string(r, 4, "ab8227").unwrap();
        worksheet.write_number(r, 5, 1000.0).unwrap();
    }

    for (r, condition) in conditions.iter().enumerate() {
        let r = (r + 1) as u32;
        match condition.parse::<f64>() {
            Ok(n) => worksheet.write_number(r, 7, n).unwrap(),
            Err(_) => worksheet.write_string(r, 7, *condition).unwrap(),
        };
    }

    workbook.save(path).unwrap();
}
