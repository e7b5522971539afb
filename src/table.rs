use std::fmt;
use std::path::Path;

use crate::error::{Result, WesternizerError};
use crate::resolver::MarkerIndex;

pub const COL_ANTIBODY: &str = "Antibody Name";
pub const COL_VOLUME: &str = "Volume (uL)";
pub const COL_GEL: &str = "Gel (%)";
pub const COL_MARKER: &str = "Marker";
pub const COL_CATALOG: &str = "1' Antibody Catalog #";
pub const COL_DILUTION: &str = "1' Antibody Dilution (1 : x)";
pub const COL_SPACER: &str = "";
pub const COL_CONDITIONS: &str = "Conditions";

/// Template columns, in sheet order
pub const COLUMNS: [&str; 8] = [
    COL_ANTIBODY,
    COL_VOLUME,
    COL_GEL,
    COL_MARKER,
    COL_CATALOG,
    COL_DILUTION,
    COL_SPACER,
    COL_CONDITIONS,
];

/// Columns the user is expected to fill, highlighted in the template
pub const HIGHLIGHTED_COLUMNS: [&str; 3] = [COL_ANTIBODY, COL_MARKER, COL_CONDITIONS];

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A single spreadsheet cell as the rest of the crate sees it
#[derive(Clone, Debug, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Empty cells and NaN count as missing
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) if n.is_nan() => Ok(()),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Marker field as a file stem
///
/// Integral numbers lose their fraction, other numbers print as they are,
/// text is trimmed (numeric-looking text goes through the number path) and
/// missing values become an empty string.
///
/// # Examples
/// ```
/// use westernizer::table::{clean_marker, CellValue};
///
/// assert_eq!(clean_marker(&CellValue::Number(5.0)), "5");
/// assert_eq!(clean_marker(&CellValue::Number(5.5)), "5.5");
/// assert_eq!(clean_marker(&CellValue::text(" GAPDH ")), "GAPDH");
/// assert_eq!(clean_marker(&CellValue::Empty), "");
/// ```
pub fn clean_marker(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(n) => clean_number(*n),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => clean_number(n),
                _ => trimmed.to_string(),
            }
        }
    }
}

fn clean_number(n: f64) -> String {
    if n.is_nan() {
        String::new()
    } else if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// Header plus rows, exactly as stored in the workbook
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl MetadataTable {
    /// Fresh template with one row per antibody id, names upper-cased
    ///
    /// # Examples
    /// ```
    /// use westernizer::table::{MetadataTable, CellValue, COLUMNS};
    ///
    /// let table = MetadataTable::seeded(&["actin".to_string()]);
    /// assert_eq!(table.headers.len(), COLUMNS.len());
    /// assert_eq!(table.rows[0][0], CellValue::text("ACTIN"));
    /// assert_eq!(table.rows[0][3], CellValue::Empty);
    /// ```
    pub fn seeded(antibody_ids: &[String]) -> Self {
        let rows = antibody_ids
            .iter()
            .map(|id| {
                let mut row = vec![CellValue::Empty; COLUMNS.len()];
                row[0] = CellValue::Text(id.to_uppercase());
                row
            })
            .collect();

        MetadataTable {
            headers: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Index of the column whose trimmed header equals `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| WesternizerError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Cell at `row`/`col`; short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Every value of one column, top to bottom
    pub fn column(&self, name: &str) -> Result<Vec<&CellValue>> {
        let col = self.require_column(name)?;
        Ok((0..self.rows.len()).map(|row| self.cell(row, col)).collect())
    }
}

/// One filled-in antibody row
#[derive(Clone, Debug, PartialEq)]
pub struct AntibodyMetadata {
    /// Name as typed in the sheet
    pub antibody_name: String,
    pub volume: CellValue,
    pub gel_percent: CellValue,
    /// Cleaned marker stem, empty when no marker was given
    pub marker_label: String,
    pub catalog_number: CellValue,
    pub dilution: CellValue,
}

impl AntibodyMetadata {
    /// Lower-cased trimmed name used as the matching key
    pub fn key(&self) -> String {
        self.antibody_name.trim().to_lowercase()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionLabel {
    pub index: usize,
    pub text: String,
}

/// Parsed, validated contents of the edited workbook
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataSheet {
    pub antibodies: Vec<AntibodyMetadata>,
    pub conditions: Vec<ConditionLabel>,
}

impl MetadataSheet {
    /// Reads antibody rows and conditions from a table
    ///
    /// # Returns
    /// * `Err(NoConditionsFound)` when no condition is filled in
    /// * `Err(MissingColumn)` when a template column was removed
    pub fn from_table(table: &MetadataTable) -> Result<Self> {
        let conditions = parse_conditions(table)?;

        let name_col = table.require_column(COL_ANTIBODY)?;
        let volume_col = table.require_column(COL_VOLUME)?;
        let gel_col = table.require_column(COL_GEL)?;
        let marker_col = table.require_column(COL_MARKER)?;
        let catalog_col = table.require_column(COL_CATALOG)?;
        let dilution_col = table.require_column(COL_DILUTION)?;

        let mut antibodies = Vec::new();
        for row in 0..table.rows.len() {
            let name = table.cell(row, name_col);
            if name.is_missing() || name.to_string().trim().is_empty() {
                continue;
            }
            antibodies.push(AntibodyMetadata {
                antibody_name: name.to_string(),
                volume: table.cell(row, volume_col).clone(),
                gel_percent: table.cell(row, gel_col).clone(),
                marker_label: clean_marker(table.cell(row, marker_col)),
                catalog_number: table.cell(row, catalog_col).clone(),
                dilution: table.cell(row, dilution_col).clone(),
            });
        }

        Ok(MetadataSheet {
            antibodies,
            conditions,
        })
    }

    /// Antibody key to marker label, in sheet order
    pub fn marker_index(&self) -> MarkerIndex {
        let mut index = MarkerIndex::new();
        for antibody in &self.antibodies {
            index.insert(antibody.key(), antibody.marker_label.clone());
        }
        index
    }
}

/// Non-empty trimmed entries of the Conditions column
pub fn parse_conditions(table: &MetadataTable) -> Result<Vec<ConditionLabel>> {
    let conditions: Vec<ConditionLabel> = table
        .column(COL_CONDITIONS)?
        .into_iter()
        .filter(|cell| !cell.is_missing())
        .map(|cell| cell.to_string().trim().to_string())
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(index, text)| ConditionLabel { index, text })
        .collect();

    if conditions.is_empty() {
        return Err(WesternizerError::NoConditionsFound);
    }
    Ok(conditions)
}

/// Persists the template for external editing
pub trait TableWriter {
    fn write(&self, table: &MetadataTable, path: &Path) -> Result<()>;
}

/// Reads the table back after the user saved it
pub trait TableReader {
    fn read(&self, path: &Path) -> Result<MetadataTable>;
}
