use std::path::PathBuf;

/// Failures of a spreadsheet import or export as a whole. Per-row
/// validation problems are not errors; see `spreadsheet::RejectedRow`.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Unsupported spreadsheet format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Workbook has no sheets")]
    EmptyWorkbook,

    #[error("No valid records found ({rejected} rows rejected)")]
    NoValidRows { rejected: usize },

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook read error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}
