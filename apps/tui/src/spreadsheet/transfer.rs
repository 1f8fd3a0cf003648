//! Import and export of student workbooks against the store, each leaving
//! one audit row in `export_logs`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use super::codec::{read_table, write_table, SheetFormat};
use super::export::{export_file_name, export_table};
use super::import::{partition_rows, RejectedRow};
use crate::db::models::ExportLogParams;
use crate::domain::TransferKind;
use crate::error::BridgeError;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub file_name: String,
    pub inserted: usize,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        if self.rejected.is_empty() {
            format!("Imported {} students from {}", self.inserted, self.file_name)
        } else {
            format!(
                "Imported {} students from {} ({} rows rejected)",
                self.inserted,
                self.file_name,
                self.rejected.len()
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub exported: usize,
}

impl ExportReport {
    pub fn summary(&self) -> String {
        format!("Exported {} students to {}", self.exported, self.path.display())
    }
}

/// Where an export should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Default file name for the day inside this directory.
    Directory { dir: PathBuf, format: SheetFormat },
    File(PathBuf),
}

impl ExportTarget {
    pub fn resolve(&self, today: NaiveDate) -> PathBuf {
        match self {
            Self::Directory { dir, format } => {
                dir.join(export_file_name(today, format.extension()))
            }
            Self::File(path) => path.clone(),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// Reads `path`, inserts every valid row in one transaction together with
/// the audit row. Nothing is written when no row is valid.
pub async fn import_students_file(
    store: &Store,
    path: &Path,
    today: NaiveDate,
) -> Result<ImportReport, BridgeError> {
    let file_name = display_name(path);
    info!(file = %file_name, "starting student import");

    let outcome = partition_rows(read_table(path)?.into_records(), today);
    for rejected in &outcome.invalid {
        warn!(row = rejected.row_number, reason = %rejected.reason, "rejected import row");
    }

    if outcome.valid.is_empty() {
        return Err(BridgeError::NoValidRows {
            rejected: outcome.invalid.len(),
        });
    }

    let audit = ExportLogParams {
        kind: TransferKind::Import,
        file_name: file_name.clone(),
        record_count: i64::try_from(outcome.valid.len()).unwrap_or(i64::MAX),
    };
    let inserted = store.import_students(&outcome.valid, &audit).await?;

    info!(file = %file_name, inserted, rejected = outcome.invalid.len(), "import finished");
    Ok(ImportReport {
        file_name,
        inserted,
        rejected: outcome.invalid,
    })
}

/// Writes every student to `target`, then appends the audit row.
pub async fn export_students_file(
    store: &Store,
    target: &ExportTarget,
    today: NaiveDate,
) -> Result<ExportReport, BridgeError> {
    let students = store.fetch_students().await?;
    let path = target.resolve(today);

    write_table(&export_table(&students), &path)?;

    store
        .record_transfer(&ExportLogParams {
            kind: TransferKind::Export,
            file_name: display_name(&path),
            record_count: i64::try_from(students.len()).unwrap_or(i64::MAX),
        })
        .await?;

    info!(path = %path.display(), exported = students.len(), "export finished");
    Ok(ExportReport {
        path,
        exported: students.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::connect_in_memory;
    use crate::spreadsheet::{CellValue, Table};
    use crate::sync::ChangeBus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap_or_default()
    }

    async fn store() -> Result<Store, sqlx::Error> {
        Ok(Store::new(connect_in_memory().await?, ChangeBus::default()))
    }

    fn intake(rows: &[(&str, &str)]) -> Table {
        let mut table = Table::new(["Student Name", "Aadhaar Number", "Course"]);
        table.rows = rows
            .iter()
            .map(|(name, aadhaar)| {
                vec![
                    CellValue::text(*name),
                    CellValue::text(*aadhaar),
                    CellValue::text("Web Intermediate"),
                ]
            })
            .collect();
        table
    }

    #[tokio::test]
    async fn import_inserts_valid_rows_and_logs_once() -> Result<(), Box<dyn std::error::Error>> {
        let store = store().await?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("intake.csv");
        write_table(
            &intake(&[("Asha", "123456789012"), ("", "223456789012"), ("Bilal", "12")]),
            &path,
        )?;

        let report = import_students_file(&store, &path, today()).await?;

        assert_eq!(report.inserted, 1);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].row_number, 2);
        let students = store.fetch_students().await?;
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].course_enrolled, "web-intermediate");
        let logs = store.fetch_export_logs(10).await?;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].kind, TransferKind::Import);
        assert_eq!(logs[0].file_name, "intake.csv");
        assert_eq!(logs[0].record_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn all_invalid_import_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let store = store().await?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.xlsx");
        write_table(&intake(&[("Asha", "1234"), ("", "")]), &path)?;

        let result = import_students_file(&store, &path, today()).await;

        assert!(matches!(result, Err(BridgeError::NoValidRows { rejected: 2 })));
        assert!(store.fetch_students().await?.is_empty());
        assert!(store.fetch_export_logs(10).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn export_then_import_round_trips() -> Result<(), Box<dyn std::error::Error>> {
        let source = store().await?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("first.csv");
        write_table(&intake(&[("Asha", "123456789012"), ("Bilal", "223456789012")]), &path)?;
        import_students_file(&source, &path, today()).await?;

        let target = ExportTarget::Directory {
            dir: dir.path().to_path_buf(),
            format: SheetFormat::Workbook,
        };
        let exported = export_students_file(&source, &target, today()).await?;
        assert_eq!(exported.exported, 2);
        assert!(exported.path.ends_with("students_export_2024-07-15.xlsx"));

        let destination = store().await?;
        let report = import_students_file(&destination, &exported.path, today()).await?;
        assert_eq!(report.inserted, 2);
        let names: Vec<(String, String)> = destination
            .fetch_students()
            .await?
            .into_iter()
            .map(|s| (s.name, s.aadhaar_number))
            .collect();
        assert!(names.contains(&("Asha".to_string(), "123456789012".to_string())));
        assert!(names.contains(&("Bilal".to_string(), "223456789012".to_string())));

        let logs = source.fetch_export_logs(10).await?;
        assert_eq!(logs[0].kind, TransferKind::Export);
        Ok(())
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected_before_reading() -> Result<(), sqlx::Error> {
        let store = store().await?;
        let result = import_students_file(&store, Path::new("notes.txt"), today()).await;
        assert!(matches!(result, Err(BridgeError::UnsupportedFormat(_))));
        Ok(())
    }
}
