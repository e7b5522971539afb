mod common;

use common::{FilledRow, Marker, write_filled_workbook};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tempfile::tempdir;
use westernizer::WesternizerError;
use westernizer::downloader::{XlsxTableWriter, column_to_letter, to_xlsx};
use westernizer::loader::{XlsxTableReader, from_excel};
use westernizer::table::*;

// Helper to build a table from text cells, "" meaning empty
fn table_from(headers: &[&str], rows: &[&[&str]]) -> MetadataTable {
    MetadataTable {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        if cell.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::text(*cell)
                        }
                    })
                    .collect()
            })
            .collect(),
    }
}

#[test]
fn test_clean_marker() {
    println!("\n====== Testing clean_marker ======");
    assert_eq!(clean_marker(&CellValue::Number(5.0)), "5");
    assert_eq!(clean_marker(&CellValue::Number(5.5)), "5.5");
    assert_eq!(clean_marker(&CellValue::Number(-3.0)), "-3");
    assert_eq!(clean_marker(&CellValue::text("GAPDH")), "GAPDH");
    assert_eq!(clean_marker(&CellValue::text("  GAPDH  ")), "GAPDH");
    assert_eq!(clean_marker(&CellValue::text("5.0")), "5");
    assert_eq!(clean_marker(&CellValue::text(" 42 ")), "42");
    assert_eq!(clean_marker(&CellValue::text("   ")), "");
    assert_eq!(clean_marker(&CellValue::Empty), "");
    assert_eq!(clean_marker(&CellValue::Number(f64::NAN)), "");
    println!("✓ Numbers, text and missing values cleaned");
}

#[test]
fn test_seeded_template() {
    println!("\n====== Testing MetadataTable::seeded ======");
    let ids = vec!["actin".to_string(), "gapdh_2".to_string()];
    let table = MetadataTable::seeded(&ids);

    assert_eq!(table.headers, COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>());
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1][0], CellValue::text("GAPDH_2"));
    for row in &table.rows {
        assert_eq!(row.len(), 8);
        assert!(row[1..].iter().all(|c| *c == CellValue::Empty));
    }
    assert_eq!(table.column_index(COL_CONDITIONS), Some(7));
    assert_eq!(table.column_index(COL_MARKER), Some(3));
    println!("✓ Template has 8 columns and upper-cased names");
}

#[test]
fn test_sheet_from_table() {
    println!("\n====== Testing MetadataSheet::from_table ======");
    let table = table_from(
        &COLUMNS,
        &[
            &[" Actin ", "10", "12", "42", "ab1", "1000", "", "DMSO"],
            &["", "", "", "", "", "", "", "  "],
            &["GAPDH", "", "", "", "", "", "", " 10 uM "],
            &["", "", "", "", "", "", "", "20.0"],
        ],
    );

    let sheet = MetadataSheet::from_table(&table).unwrap();
    assert_eq!(sheet.antibodies.len(), 2);
    assert_eq!(sheet.antibodies[0].key(), "actin");
    assert_eq!(sheet.antibodies[0].marker_label, "42");
    assert_eq!(sheet.antibodies[0].dilution, CellValue::text("1000"));
    assert_eq!(sheet.antibodies[1].marker_label, "");
    println!("✓ Blank antibody rows dropped");

    let texts: Vec<&str> = sheet.conditions.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["DMSO", "10 uM", "20.0"]);
    let indices: Vec<usize> = sheet.conditions.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    println!("✓ Conditions trimmed, blanks dropped, order kept");

    let index = sheet.marker_index();
    let entries: Vec<(&str, &str)> = index.iter().collect();
    assert_eq!(entries, vec![("actin", "42"), ("gapdh", "")]);
    println!("✓ Marker index keyed by lower-cased trimmed names");
}

#[test]
fn test_duplicate_antibody_keeps_first_position() {
    let table = table_from(
        &COLUMNS,
        &[
            &["ACTIN", "", "", "1", "", "", "", "a"],
            &["GAPDH", "", "", "2", "", "", "", ""],
            &["actin ", "", "", "3", "", "", "", ""],
        ],
    );
    let index = MetadataSheet::from_table(&table).unwrap().marker_index();
    let entries: Vec<(&str, &str)> = index.iter().collect();
    assert_eq!(entries, vec![("actin", "3"), ("gapdh", "2")]);
}

#[test]
fn test_no_conditions() {
    println!("\n====== Testing NoConditionsFound ======");
    let table = MetadataTable::seeded(&["actin".to_string()]);
    let result = MetadataSheet::from_table(&table);
    assert!(matches!(result, Err(WesternizerError::NoConditionsFound)));

    let whitespace_only = table_from(&COLUMNS, &[&["ACTIN", "", "", "", "", "", "", "   "]]);
    assert!(matches!(
        MetadataSheet::from_table(&whitespace_only),
        Err(WesternizerError::NoConditionsFound)
    ));
    println!("✓ Empty and whitespace-only conditions rejected");
}

#[test]
fn test_missing_column() {
    let table = table_from(&["Antibody Name", "Conditions"], &[&["ACTIN", "DMSO"]]);
    match MetadataSheet::from_table(&table) {
        Err(WesternizerError::MissingColumn { column }) => assert_eq!(column, COL_VOLUME),
        other => panic!("expected MissingColumn, got {:?}", other),
    }

    let no_conditions = table_from(&["Antibody Name"], &[&["ACTIN"]]);
    assert!(matches!(
        MetadataSheet::from_table(&no_conditions),
        Err(WesternizerError::MissingColumn { .. })
    ));
}

#[test]
fn test_template_round_trip() {
    println!("\n====== Testing xlsx template write/read ======");
    let dir = tempdir().unwrap();
    let path = dir.path().join("template.xlsx");

    let ids = vec!["actin".to_string(), "gapdh".to_string()];
    let table = MetadataTable::seeded(&ids);
    XlsxTableWriter.write(&table, &path).unwrap();
    assert!(path.exists());

    let read = XlsxTableReader.read(&path).unwrap();
    assert_eq!(read.headers, table.headers);
    assert_eq!(read.rows.len(), 2);
    assert_eq!(read.cell(0, 0), &CellValue::text("ACTIN"));
    assert_eq!(read.cell(1, 0), &CellValue::text("GAPDH"));
    assert!(read.cell(1, 3).is_missing());
    println!("✓ Template reads back with the same header and names");

    assert!(matches!(
        MetadataSheet::from_table(&read),
        Err(WesternizerError::NoConditionsFound)
    ));
    println!("✓ Unfilled template has no conditions");
}

#[test]
fn test_read_filled_workbook() {
    println!("\n====== Testing from_excel on a filled workbook ======");
    let dir = tempdir().unwrap();
    let path = dir.path().join("filled.xlsx");
    write_filled_workbook(
        &path,
        &[
            FilledRow { name: "ACTIN", marker: Some(Marker::Number(42.0)) },
            FilledRow { name: "GAPDH", marker: Some(Marker::Text(" Ladder A ")) },
            FilledRow { name: "TUBULIN", marker: None },
        ],
        &["DMSO", "10", "20.5", "LPS"],
    );

    let table = from_excel(&path).unwrap();
    let sheet = MetadataSheet::from_table(&table).unwrap();

    let markers: Vec<&str> = sheet.antibodies.iter().map(|a| a.marker_label.as_str()).collect();
    assert_eq!(markers, vec!["42", "Ladder A", ""]);
    assert_eq!(sheet.antibodies[0].volume, CellValue::Number(10.0));
    assert_eq!(sheet.antibodies[0].catalog_number, CellValue::text("ab8227"));

    let texts: Vec<&str> = sheet.conditions.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["DMSO", "10", "20.5", "LPS"]);
    println!("✓ Numeric cells come back without a trailing .0");
}

#[test]
fn test_date_and_time_conditions_read_as_text() {
    println!("\n====== Testing date/time condition cells ======");
    let dir = tempdir().unwrap();
    let path = dir.path().join("dates.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (c, header) in COLUMNS.iter().enumerate() {
        if !header.is_empty() {
            worksheet.write_string(0, c as u16, *header).unwrap();
        }
    }
    worksheet.write_string(1, 0, "ACTIN").unwrap();

    // What Excel stores when a user types 1:10 or 1/2
    let time = ExcelDateTime::from_hms(1, 10, 0).unwrap();
    let date = ExcelDateTime::from_ymd(2024, 1, 2).unwrap();
    worksheet
        .write_datetime_with_format(1, 7, &time, &Format::new().set_num_format("h:mm"))
        .unwrap();
    worksheet
        .write_datetime_with_format(2, 7, &date, &Format::new().set_num_format("m/d"))
        .unwrap();
    worksheet.write_string(3, 7, "DMSO").unwrap();
    workbook.save(&path).unwrap();

    let sheet = MetadataSheet::from_table(&from_excel(&path).unwrap()).unwrap();
    let texts: Vec<&str> = sheet.conditions.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["01:10:00", "2024-01-02 00:00:00", "DMSO"]);
    println!("✓ Times and dates keep the value the user typed");
}

fn read_entry(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}

// Value of `name="..."` inside one tag
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let key = format!(r#" {}=""#, name);
    let start = tag.find(&key)? + key.len();
    tag[start..].split('"').next()
}

// Style index of the cell at `cell_ref`, e.g. "D2"
fn style_index<'a>(sheet: &'a str, cell_ref: &str) -> &'a str {
    let start = sheet
        .find(&format!(r#"<c r="{}""#, cell_ref))
        .unwrap_or_else(|| panic!("cell {} not written", cell_ref));
    let rest = &sheet[start..];
    let tag = &rest[..rest.find('>').unwrap()];
    attribute(tag, "s").unwrap_or("0")
}

#[test]
fn test_template_styling() {
    println!("\n====== Testing template styling ======");
    let dir = tempdir().unwrap();
    let path = dir.path().join("styled.xlsx");
    XlsxTableWriter
        .write(&MetadataTable::seeded(&["actin".to_string(), "gapdh".to_string()]), &path)
        .unwrap();

    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    let mut covered = Vec::new();
    for col in sheet.split("<col ").skip(1) {
        let tag = &col[..col.find('>').unwrap()];
        assert_eq!(attribute(tag, "width"), Some("25.7109375"));
        let min: u16 = attribute(tag, "min").unwrap().parse().unwrap();
        let max: u16 = attribute(tag, "max").unwrap().parse().unwrap();
        covered.extend(min..=max);
    }
    assert_eq!(covered, (1..=8).collect::<Vec<u16>>());
    println!("✓ All 8 columns are 25 wide");

    let styles = read_entry(&path, "xl/styles.xml");
    assert!(styles.contains(r#"<fgColor rgb="FFFFFF00"/>"#));
    assert!(styles.contains(r#"<left style="thin""#));
    assert!(styles.contains(r#"horizontal="center""#));
    assert!(styles.contains(r#"vertical="center""#));
    println!("✓ Yellow fill, thin borders and centering defined");

    for row in ["2", "3"] {
        let highlighted = style_index(&sheet, &format!("A{row}"));
        for col in ["D", "H"] {
            assert_eq!(style_index(&sheet, &format!("{col}{row}")), highlighted);
        }
        let plain = style_index(&sheet, &format!("B{row}"));
        for col in ["C", "E", "F", "G"] {
            assert_eq!(style_index(&sheet, &format!("{col}{row}")), plain);
        }
        assert_ne!(highlighted, plain);
    }
    assert_ne!(style_index(&sheet, "A1"), style_index(&sheet, "A2"));
    assert_ne!(style_index(&sheet, "A1"), style_index(&sheet, "B1"));
    println!("✓ A, D and H use the highlighted style, header is separate");
}

#[test]
fn test_to_xlsx_bytes() {
    let bytes = to_xlsx(&MetadataTable::seeded(&["actin".to_string()])).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_column_letter_conversion() {
    assert_eq!(column_to_letter(1), "A");
    assert_eq!(column_to_letter(4), "D");
    assert_eq!(column_to_letter(8), "H");
    assert_eq!(column_to_letter(26), "Z");
    assert_eq!(column_to_letter(27), "AA");
    assert_eq!(column_to_letter(52), "AZ");
}
