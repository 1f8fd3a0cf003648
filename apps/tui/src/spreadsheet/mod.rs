//! Mapping between spreadsheet rows and student records.

pub mod aliases;
pub mod codec;
pub mod export;
pub mod import;
pub mod transfer;

use std::collections::BTreeMap;
use std::fmt;

pub use aliases::{StudentField, STUDENT_FIELD_ALIASES};
pub use export::{export_table, EXPORT_HEADERS};
pub use import::{partition_rows, ImportOutcome, RejectReason, RejectedRow};

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, Self::text)
    }

    /// Trimmed textual form; `None` when the cell holds nothing.
    pub fn as_text(&self) -> Option<String> {
        let text = self.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            // Spreadsheets hand back ID and phone columns as floats.
            Self::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
                write!(f, "{number:.0}")
            }
            Self::Number(number) => write!(f, "{number}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// A data row keyed by its column header, as read from a sheet.
pub type SheetRow = BTreeMap<String, CellValue>;

/// A header row plus data rows, the unit exchanged with files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Data rows keyed by header. Short rows are padded with empty cells,
    /// blank headers and fully empty rows are dropped.
    pub fn into_records(self) -> Vec<SheetRow> {
        let headers = self.headers;
        self.rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|row| {
                let mut cells = row.into_iter();
                headers
                    .iter()
                    .map(|header| (header, cells.next().unwrap_or(CellValue::Empty)))
                    .filter(|(header, _)| !header.trim().is_empty())
                    .map(|(header, cell)| (header.trim().to_string(), cell))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(123_456_789_012.0).to_string(), "123456789012");
        assert_eq!(CellValue::Number(16.5).to_string(), "16.5");
        assert_eq!(CellValue::text("  ").as_text(), None);
        assert_eq!(CellValue::text(" Asha ").as_text().as_deref(), Some("Asha"));
    }

    #[test]
    fn into_records_pads_and_skips_blank_rows() {
        let mut table = Table::new(["Name", "Aadhaar", ""]);
        table.rows.push(vec![CellValue::text("Asha")]);
        table.rows.push(vec![CellValue::Empty, CellValue::Empty]);
        table.rows.push(vec![
            CellValue::text("Bilal"),
            CellValue::Number(1.0),
            CellValue::text("stray"),
        ]);

        let records = table.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Aadhaar"), Some(&CellValue::Empty));
        assert_eq!(records[1].len(), 2);
    }
}
