//! Reading and writing [`Table`]s as spreadsheet files.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) are read from their first
//! sheet with the first row as headers. Output is a single-sheet `.xlsx`
//! with a bold header row, or plain CSV.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::{CellValue, Table};
use crate::error::BridgeError;

pub const SHEET_NAME: &str = "Students";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Workbook,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self, BridgeError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(Self::Workbook),
            Some("csv") => Ok(Self::Csv),
            _ => Err(BridgeError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Workbook => "xlsx",
            Self::Csv => "csv",
        }
    }
}

pub fn read_table(path: &Path) -> Result<Table, BridgeError> {
    match SheetFormat::from_path(path)? {
        SheetFormat::Workbook => read_workbook(path),
        SheetFormat::Csv => read_csv(path),
    }
}

fn read_workbook(path: &Path) -> Result<Table, BridgeError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(BridgeError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header_row| {
            header_row
                .iter()
                .map(|cell| cell_from_data(cell).to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(Table {
        headers,
        rows: rows
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect(),
    })
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            CellValue::text(text.as_str())
        }
        #[allow(clippy::cast_precision_loss)]
        Data::Int(number) => CellValue::Number(*number as f64),
        Data::Float(number) => CellValue::Number(*number),
        Data::Bool(flag) => CellValue::Bool(*flag),
        // Serial day number; import understands it as a date.
        Data::DateTime(datetime) => CellValue::Number(datetime.as_f64().trunc()),
    }
}

fn read_csv(path: &Path) -> Result<Table, BridgeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(CellValue::text).collect());
    }

    Ok(Table { headers, rows })
}

/// Serializes `table` into the bytes of a single-sheet workbook.
pub fn workbook_bytes(table: &Table) -> Result<Vec<u8>, BridgeError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (column, header) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(column)?, header, &header_format)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (column, cell) in row.iter().enumerate() {
            let column = column_index(column)?;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    worksheet.write_string(row_number, column, text)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number(row_number, column, *number)?;
                }
                CellValue::Bool(flag) => {
                    worksheet.write_boolean(row_number, column, *flag)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_index(column: usize) -> Result<u16, XlsxError> {
    u16::try_from(column).map_err(|_| XlsxError::RowColumnLimitError)
}

pub fn csv_bytes(table: &Table) -> Result<Vec<u8>, BridgeError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer
        .into_inner()
        .map_err(|e| BridgeError::Io(e.into_error()))
}

/// Writes `table` to `path` in the format its extension names.
pub fn write_table(table: &Table, path: &Path) -> Result<(), BridgeError> {
    let bytes = match SheetFormat::from_path(path)? {
        SheetFormat::Workbook => workbook_bytes(table)?,
        SheetFormat::Csv => csv_bytes(table)?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::SheetRow;

    fn sample() -> Table {
        let mut table = Table::new(["Name", "Aadhaar", "Active"]);
        table.rows.push(vec![
            CellValue::text("Asha"),
            CellValue::text("123456789012"),
            CellValue::text("Yes"),
        ]);
        table.rows.push(vec![
            CellValue::text("Bilal, Jr."),
            CellValue::Number(223_456_789_012.0),
            CellValue::Bool(false),
        ]);
        table
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SheetFormat::from_path(Path::new("intake.XLSX")).ok(),
            Some(SheetFormat::Workbook)
        );
        assert_eq!(
            SheetFormat::from_path(Path::new("intake.csv")).ok(),
            Some(SheetFormat::Csv)
        );
        assert!(matches!(
            SheetFormat::from_path(Path::new("intake.pdf")),
            Err(BridgeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn csv_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("students.csv");

        write_table(&sample(), &path)?;
        let records: Vec<SheetRow> = read_table(&path)?.into_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("Name"), Some(&CellValue::text("Bilal, Jr.")));
        assert_eq!(
            records[1].get("Aadhaar"),
            Some(&CellValue::text("223456789012"))
        );
        Ok(())
    }

    #[test]
    fn xlsx_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("students.xlsx");

        write_table(&sample(), &path)?;
        let table = read_table(&path)?;

        assert_eq!(table.headers, vec!["Name", "Aadhaar", "Active"]);
        let records = table.into_records();
        assert_eq!(records[0].get("Aadhaar"), Some(&CellValue::text("123456789012")));
        assert_eq!(
            records[1].get("Aadhaar").map(ToString::to_string).as_deref(),
            Some("223456789012")
        );
        assert_eq!(records[1].get("Active"), Some(&CellValue::Bool(false)));
        Ok(())
    }
}
