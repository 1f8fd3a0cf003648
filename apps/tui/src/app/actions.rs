use chrono::Local;
use color_eyre::Result;
use literacy_desk::config::AppConfig;
use literacy_desk::db::models::{
    AttendanceParams, AttendanceRecord, BatchRecord, DailyReportParams, DailyReportRecord,
    ExportLogRecord, StudentRecord, TeacherRecord,
};
use literacy_desk::db::queries::StudentUpdateParams;
use literacy_desk::db::create_database_pool;
use literacy_desk::spreadsheet::transfer::{
    export_students_file, import_students_file, ExportReport, ExportTarget, ImportReport,
};
use literacy_desk::spreadsheet::codec::SheetFormat;
use literacy_desk::store::Store;
use literacy_desk::sync::{spawn_refetch_forwarder, ChangeBus, RefetchTask};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::info;

/// Store access for the dashboard. Every mutation goes through the store,
/// which announces it on the change bus; reloads happen through the refetch
/// queue, not here.
#[derive(Debug)]
pub struct AppActions {
    pub export_dir: PathBuf,
    store: Option<Store>,
}

impl AppActions {
    pub fn new() -> Self {
        Self {
            export_dir: PathBuf::from("./exports"),
            store: None,
        }
    }

    /// Opens the database and starts forwarding changes to the returned queue.
    pub async fn initialize(&mut self, config: &AppConfig) -> Result<mpsc::Receiver<RefetchTask>> {
        self.export_dir.clone_from(&config.export_dir);

        let pool = create_database_pool(config).await?;
        let store = Store::new(pool, ChangeBus::default());
        let (refetch_rx, _forwarder) = spawn_refetch_forwarder(store.changes().subscribe());
        self.store = Some(store);

        info!("store initialized");
        Ok(refetch_rx)
    }

    pub async fn fetch_students(&self) -> Result<Vec<StudentRecord>> {
        self.store()?.fetch_students().await.map_err(Into::into)
    }

    pub async fn fetch_teachers(&self) -> Result<Vec<TeacherRecord>> {
        self.store()?.fetch_teachers().await.map_err(Into::into)
    }

    pub async fn fetch_batches(&self) -> Result<Vec<BatchRecord>> {
        self.store()?.fetch_batches().await.map_err(Into::into)
    }

    pub async fn fetch_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        self.store()?.fetch_attendance().await.map_err(Into::into)
    }

    pub async fn fetch_daily_reports(&self) -> Result<Vec<DailyReportRecord>> {
        self.store()?.fetch_daily_reports().await.map_err(Into::into)
    }

    pub async fn fetch_export_logs(&self, limit: i64) -> Result<Vec<ExportLogRecord>> {
        self.store()?.fetch_export_logs(limit).await.map_err(Into::into)
    }

    pub async fn set_student_active(&self, id: i64, is_active: bool) -> Result<()> {
        let params = StudentUpdateParams {
            id,
            is_active: Some(is_active),
            ..StudentUpdateParams::default()
        };
        self.store()?.update_student(&params).await.map_err(Into::into)
    }

    pub async fn delete_student(&self, id: i64) -> Result<()> {
        self.store()?.delete_student(id).await.map_err(Into::into)
    }

    pub async fn delete_teacher(&self, id: i64) -> Result<()> {
        self.store()?.delete_teacher(id).await.map_err(Into::into)
    }

    pub async fn delete_batch(&self, id: i64) -> Result<()> {
        self.store()?.delete_batch(id).await.map_err(Into::into)
    }

    pub async fn mark_attendance(&self, params: &AttendanceParams) -> Result<()> {
        self.store()?.upsert_attendance(params).await.map_err(Into::into)
    }

    pub async fn clear_attendance(&self, id: i64) -> Result<()> {
        self.store()?.delete_attendance(id).await.map_err(Into::into)
    }

    pub async fn insert_daily_report(&self, params: &DailyReportParams) -> Result<i64> {
        self.store()?.insert_daily_report(params).await.map_err(Into::into)
    }

    pub async fn update_daily_report(&self, id: i64, params: &DailyReportParams) -> Result<()> {
        self.store()?
            .update_daily_report(id, params)
            .await
            .map_err(Into::into)
    }

    pub async fn delete_daily_report(&self, id: i64) -> Result<()> {
        self.store()?.delete_daily_report(id).await.map_err(Into::into)
    }

    pub async fn import_students(&self, path: &Path) -> Result<ImportReport> {
        let today = Local::now().date_naive();
        import_students_file(self.store()?, path, today)
            .await
            .map_err(Into::into)
    }

    pub async fn export_students(&self, format: SheetFormat) -> Result<ExportReport> {
        let today = Local::now().date_naive();
        let target = ExportTarget::Directory {
            dir: self.export_dir.clone(),
            format,
        };
        export_students_file(self.store()?, &target, today)
            .await
            .map_err(Into::into)
    }

    fn store(&self) -> Result<&Store> {
        self.store
            .as_ref()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database not initialized"))
    }
}
