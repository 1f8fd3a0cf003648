use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::db::models::{
    AttendanceParams, AttendanceRecord, BatchParams, BatchRecord, DailyReportParams,
    DailyReportRecord, ExportLogParams, ExportLogRecord, StudentParams, StudentRecord, TeacherParams,
    TeacherRecord,
};
use crate::db::queries::{self, StudentUpdateParams};
use crate::domain::Table;
use crate::sync::ChangeBus;

/// The data store boundary: fetch-all, insert, update-by-id and delete-by-id
/// per table, with a change published after every successful mutation.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    changes: ChangeBus,
}

impl Store {
    pub const fn new(pool: SqlitePool, changes: ChangeBus) -> Self {
        Self { pool, changes }
    }

    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub const fn changes(&self) -> &ChangeBus {
        &self.changes
    }

    fn announce<T>(&self, table: Table, result: Result<T, sqlx::Error>) -> Result<T, sqlx::Error> {
        self.announce_all(&[table], result)
    }

    /// Publishes one change per table in `tables`. The first entry is the
    /// table written to; the rest are rewritten by foreign key actions.
    fn announce_all<T>(
        &self,
        tables: &[Table],
        result: Result<T, sqlx::Error>,
    ) -> Result<T, sqlx::Error> {
        match &result {
            Ok(_) => {
                debug!(?tables, "mutation committed");
                for table in tables {
                    self.changes.publish(*table);
                }
            }
            Err(e) => warn!(?tables, error = %e, "mutation failed"),
        }
        result
    }

    pub async fn fetch_students(&self) -> Result<Vec<StudentRecord>, sqlx::Error> {
        queries::get_students(&self.pool).await
    }

    pub async fn insert_student(&self, params: &StudentParams) -> Result<i64, sqlx::Error> {
        let result = queries::insert_student(&self.pool, params).await;
        self.announce(Table::Students, result)
    }

    pub async fn update_student(&self, params: &StudentUpdateParams) -> Result<(), sqlx::Error> {
        let result = queries::update_student(&self.pool, params).await;
        self.announce(Table::Students, result)
    }

    pub async fn delete_student(&self, id: i64) -> Result<(), sqlx::Error> {
        // Attendance rows cascade
        let result = queries::delete_student(&self.pool, id).await;
        self.announce_all(&[Table::Students, Table::Attendance], result)
    }

    pub async fn fetch_teachers(&self) -> Result<Vec<TeacherRecord>, sqlx::Error> {
        queries::get_teachers(&self.pool).await
    }

    pub async fn insert_teacher(&self, params: &TeacherParams) -> Result<i64, sqlx::Error> {
        let result = queries::insert_teacher(&self.pool, params).await;
        self.announce(Table::Teachers, result)
    }

    pub async fn delete_teacher(&self, id: i64) -> Result<(), sqlx::Error> {
        // Batch teacher references are set to NULL
        let result = queries::delete_teacher(&self.pool, id).await;
        self.announce_all(&[Table::Teachers, Table::Batches], result)
    }

    pub async fn fetch_batches(&self) -> Result<Vec<BatchRecord>, sqlx::Error> {
        queries::get_batches(&self.pool).await
    }

    pub async fn insert_batch(&self, params: &BatchParams) -> Result<i64, sqlx::Error> {
        let result = queries::insert_batch(&self.pool, params).await;
        self.announce(Table::Batches, result)
    }

    pub async fn delete_batch(&self, id: i64) -> Result<(), sqlx::Error> {
        // Student and attendance batch references are set to NULL
        let result = queries::delete_batch(&self.pool, id).await;
        self.announce_all(
            &[Table::Batches, Table::Students, Table::Attendance],
            result,
        )
    }

    pub async fn fetch_attendance(&self) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        queries::get_attendance(&self.pool).await
    }

    pub async fn upsert_attendance(&self, params: &AttendanceParams) -> Result<(), sqlx::Error> {
        let result = queries::upsert_attendance(&self.pool, params).await;
        self.announce(Table::Attendance, result)
    }

    pub async fn delete_attendance(&self, id: i64) -> Result<(), sqlx::Error> {
        let result = queries::delete_attendance(&self.pool, id).await;
        self.announce(Table::Attendance, result)
    }

    pub async fn fetch_daily_reports(&self) -> Result<Vec<DailyReportRecord>, sqlx::Error> {
        queries::get_daily_reports(&self.pool).await
    }

    pub async fn insert_daily_report(&self, params: &DailyReportParams) -> Result<i64, sqlx::Error> {
        let result = queries::insert_daily_report(&self.pool, params).await;
        self.announce(Table::DailyReports, result)
    }

    pub async fn update_daily_report(
        &self,
        id: i64,
        params: &DailyReportParams,
    ) -> Result<(), sqlx::Error> {
        let result = queries::update_daily_report(&self.pool, id, params).await;
        self.announce(Table::DailyReports, result)
    }

    pub async fn delete_daily_report(&self, id: i64) -> Result<(), sqlx::Error> {
        let result = queries::delete_daily_report(&self.pool, id).await;
        self.announce(Table::DailyReports, result)
    }

    pub async fn fetch_export_logs(&self, limit: i64) -> Result<Vec<ExportLogRecord>, sqlx::Error> {
        queries::get_export_logs(&self.pool, limit).await
    }

    /// Inserts a batch of students in one transaction and records the audit
    /// row in the same transaction. Announces both tables on commit.
    pub async fn import_students(
        &self,
        students: &[StudentParams],
        audit: &ExportLogParams,
    ) -> Result<usize, sqlx::Error> {
        let result = async {
            let mut tx = self.pool.begin().await?;
            for student in students {
                queries::insert_student(&mut *tx, student).await?;
            }
            queries::insert_export_log(&mut *tx, audit).await?;
            tx.commit().await?;
            Ok::<usize, sqlx::Error>(students.len())
        }
        .await;

        let result = self.announce(Table::Students, result);
        if result.is_ok() {
            self.changes.publish(Table::ExportLogs);
        }
        result
    }

    pub async fn record_transfer(
        &self,
        audit: &ExportLogParams,
    ) -> Result<i64, sqlx::Error> {
        let result = queries::insert_export_log(&self.pool, audit).await;
        self.announce(Table::ExportLogs, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::connect_in_memory;
    use crate::domain::{AttendanceStatus, BatchType, TransferKind};
    use tokio::sync::broadcast::{self, error::TryRecvError};

    fn student(name: &str) -> StudentParams {
        StudentParams {
            name: name.to_string(),
            age: None,
            gender: None,
            contact_phone: None,
            guardian_name: None,
            guardian_phone: None,
            address: None,
            aadhaar_number: "123456789012".to_string(),
            course_enrolled: "coding".to_string(),
            batch_id: None,
            admission_date: "2024-06-01".to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn successful_mutation_publishes_one_change() -> Result<(), Box<dyn std::error::Error>> {
        let store = Store::new(connect_in_memory().await?, ChangeBus::default());
        let mut changes = store.changes().subscribe();

        store.insert_student(&student("Asha")).await?;

        assert_eq!(changes.try_recv()?.table, Table::Students);
        assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)));
        Ok(())
    }

    fn announced(changes: &mut broadcast::Receiver<crate::sync::TableChange>) -> Vec<Table> {
        let mut tables = Vec::new();
        while let Ok(change) = changes.try_recv() {
            tables.push(change.table);
        }
        tables
    }

    async fn seeded_store() -> Result<(Store, i64, i64, i64), Box<dyn std::error::Error>> {
        let store = Store::new(connect_in_memory().await?, ChangeBus::default());
        let teacher_id = store
            .insert_teacher(&TeacherParams {
                name: "Ravi".to_string(),
                contact_phone: None,
                specializations: vec!["Python".to_string()],
                photo_url: None,
            })
            .await?;
        let batch_id = store
            .insert_batch(&BatchParams {
                name: "Morning".to_string(),
                batch_type: BatchType::Coding,
                start_time: "09:00".to_string(),
                end_time: "11:00".to_string(),
                primary_teacher_id: Some(teacher_id),
                secondary_teacher_id: None,
                room: None,
            })
            .await?;
        let student_id = store
            .insert_student(&StudentParams {
                batch_id: Some(batch_id),
                ..student("Asha")
            })
            .await?;
        store
            .upsert_attendance(&AttendanceParams {
                student_id,
                batch_id: Some(batch_id),
                date: "2024-07-01".to_string(),
                status: AttendanceStatus::Present,
                notes: None,
                marked_by: None,
            })
            .await?;
        Ok((store, teacher_id, batch_id, student_id))
    }

    #[tokio::test]
    async fn deleting_a_student_announces_cascaded_attendance(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (store, _, _, student_id) = seeded_store().await?;
        let mut changes = store.changes().subscribe();

        store.delete_student(student_id).await?;

        assert!(store.fetch_attendance().await?.is_empty());
        assert_eq!(
            announced(&mut changes),
            vec![Table::Students, Table::Attendance]
        );
        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_batch_announces_detached_students_and_attendance(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (store, _, batch_id, _) = seeded_store().await?;
        let mut changes = store.changes().subscribe();

        store.delete_batch(batch_id).await?;

        assert_eq!(store.fetch_students().await?[0].batch_id, None);
        assert_eq!(store.fetch_attendance().await?[0].batch_id, None);
        assert_eq!(
            announced(&mut changes),
            vec![Table::Batches, Table::Students, Table::Attendance]
        );
        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_teacher_announces_detached_batches(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (store, teacher_id, _, _) = seeded_store().await?;
        let mut changes = store.changes().subscribe();

        store.delete_teacher(teacher_id).await?;

        assert_eq!(store.fetch_batches().await?[0].primary_teacher_id, None);
        assert_eq!(
            announced(&mut changes),
            vec![Table::Teachers, Table::Batches]
        );
        Ok(())
    }

    #[tokio::test]
    async fn clearing_a_mark_announces_attendance() -> Result<(), Box<dyn std::error::Error>> {
        let (store, _, _, _) = seeded_store().await?;
        let mut changes = store.changes().subscribe();
        let record_id = store.fetch_attendance().await?[0].id;

        store.delete_attendance(record_id).await?;

        assert_eq!(announced(&mut changes), vec![Table::Attendance]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_publishes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let store = Store::new(connect_in_memory().await?, ChangeBus::default());
        let mut changes = store.changes().subscribe();

        assert!(store.delete_teacher(42).await.is_err());

        assert!(matches!(changes.try_recv(), Err(TryRecvError::Empty)));
        Ok(())
    }

    #[tokio::test]
    async fn import_commits_students_with_audit_row() -> Result<(), Box<dyn std::error::Error>> {
        let store = Store::new(connect_in_memory().await?, ChangeBus::default());
        let mut changes = store.changes().subscribe();

        let audit = ExportLogParams {
            kind: TransferKind::Import,
            file_name: "intake.xlsx".to_string(),
            record_count: 2,
        };
        let inserted = store
            .import_students(&[student("Asha"), student("Bilal")], &audit)
            .await?;

        assert_eq!(inserted, 2);
        assert_eq!(store.fetch_students().await?.len(), 2);
        let logs = store.fetch_export_logs(5).await?;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].record_count, 2);
        assert_eq!(changes.try_recv()?.table, Table::Students);
        assert_eq!(changes.try_recv()?.table, Table::ExportLogs);
        Ok(())
    }
}
