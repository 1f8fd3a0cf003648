use sqlx::{query, query_as, query_scalar, Executor, Sqlite, SqlitePool};

use crate::db::models::{
    AttendanceParams, AttendanceRecord, BatchParams, BatchRecord, DailyReportParams,
    DailyReportRecord, ExportLogParams, ExportLogRecord, StudentParams, StudentRecord,
    TeacherParams, TeacherRecord,
};

const STUDENT_COLUMNS: &str = "id, name, age, gender, contact_phone, guardian_name, guardian_phone, \
     address, aadhaar_number, course_enrolled, batch_id, admission_date, is_active, created_at";

fn affected_or_not_found(rows: u64) -> Result<(), sqlx::Error> {
    if rows == 0 {
        Err(sqlx::Error::RowNotFound)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

/// Retrieves all students ordered by name
pub async fn get_students(pool: &SqlitePool) -> Result<Vec<StudentRecord>, sqlx::Error> {
    query_as::<_, StudentRecord>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students ORDER BY name COLLATE NOCASE, id"
    ))
    .fetch_all(pool)
    .await
}

/// Retrieves a single student by ID
pub async fn get_student_by_id(pool: &SqlitePool, id: i64) -> Result<StudentRecord, sqlx::Error> {
    query_as::<_, StudentRecord>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Inserts a student and returns its new ID. Generic over the executor so
/// bulk imports can run inside one transaction.
pub async fn insert_student<'e, E>(executor: E, params: &StudentParams) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = query(
        "INSERT INTO students (name, age, gender, contact_phone, guardian_name, guardian_phone, \
         address, aadhaar_number, course_enrolled, batch_id, admission_date, is_active) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&params.name)
    .bind(params.age)
    .bind(&params.gender)
    .bind(&params.contact_phone)
    .bind(&params.guardian_name)
    .bind(&params.guardian_phone)
    .bind(&params.address)
    .bind(&params.aadhaar_number)
    .bind(&params.course_enrolled)
    .bind(params.batch_id)
    .bind(&params.admission_date)
    .bind(params.is_active)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Parameters for updating a student.
/// Only fields that are Some will be updated, None fields keep their current values.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdateParams {
    pub id: i64,
    pub name: Option<String>,
    pub contact_phone: Option<String>,
    pub course_enrolled: Option<String>,
    pub batch_id: Option<i64>,
    pub is_active: Option<bool>,
}

pub async fn update_student(
    pool: &SqlitePool,
    params: &StudentUpdateParams,
) -> Result<(), sqlx::Error> {
    let current = get_student_by_id(pool, params.id).await?;

    query(
        "UPDATE students
         SET name = ?,
             contact_phone = ?,
             course_enrolled = ?,
             batch_id = ?,
             is_active = ?
         WHERE id = ?",
    )
    .bind(params.name.as_deref().unwrap_or(&current.name))
    .bind(
        params
            .contact_phone
            .as_deref()
            .or(current.contact_phone.as_deref()),
    )
    .bind(
        params
            .course_enrolled
            .as_deref()
            .unwrap_or(&current.course_enrolled),
    )
    .bind(params.batch_id.or(current.batch_id))
    .bind(params.is_active.unwrap_or(current.is_active))
    .bind(params.id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_student(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let result = query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    affected_or_not_found(result.rows_affected())
}

pub async fn count_students(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(pool)
        .await
}

// ---------------------------------------------------------------------------
// Teachers
// ---------------------------------------------------------------------------

pub async fn get_teachers(pool: &SqlitePool) -> Result<Vec<TeacherRecord>, sqlx::Error> {
    query_as::<_, TeacherRecord>(
        "SELECT id, name, contact_phone, specialization, photo_url \
         FROM teachers ORDER BY name COLLATE NOCASE, id",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_teacher(pool: &SqlitePool, params: &TeacherParams) -> Result<i64, sqlx::Error> {
    let result = query(
        "INSERT INTO teachers (name, contact_phone, specialization, photo_url) VALUES (?, ?, ?, ?)",
    )
    .bind(&params.name)
    .bind(&params.contact_phone)
    .bind(params.specializations.join(", "))
    .bind(&params.photo_url)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn delete_teacher(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let result = query("DELETE FROM teachers WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    affected_or_not_found(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

pub async fn get_batches(pool: &SqlitePool) -> Result<Vec<BatchRecord>, sqlx::Error> {
    query_as::<_, BatchRecord>(
        "SELECT id, name, batch_type, start_time, end_time, primary_teacher_id, \
         secondary_teacher_id, room FROM batches ORDER BY start_time, name",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_batch(pool: &SqlitePool, params: &BatchParams) -> Result<i64, sqlx::Error> {
    let result = query(
        "INSERT INTO batches (name, batch_type, start_time, end_time, primary_teacher_id, \
         secondary_teacher_id, room) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&params.name)
    .bind(params.batch_type)
    .bind(&params.start_time)
    .bind(&params.end_time)
    .bind(params.primary_teacher_id)
    .bind(params.secondary_teacher_id)
    .bind(&params.room)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn delete_batch(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let result = query("DELETE FROM batches WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    affected_or_not_found(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// Retrieves all attendance rows, newest date first
pub async fn get_attendance(pool: &SqlitePool) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    query_as::<_, AttendanceRecord>(
        "SELECT id, student_id, batch_id, date, status, notes, marked_by \
         FROM attendance ORDER BY date DESC, student_id",
    )
    .fetch_all(pool)
    .await
}

/// Inserts or replaces the single row for (student, date)
pub async fn upsert_attendance(
    pool: &SqlitePool,
    params: &AttendanceParams,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO attendance (student_id, batch_id, date, status, notes, marked_by) \
         VALUES (?, ?, ?, ?, ?, ?) \
         ON CONFLICT(student_id, date) DO UPDATE SET \
             batch_id = excluded.batch_id, \
             status = excluded.status, \
             notes = excluded.notes, \
             marked_by = excluded.marked_by",
    )
    .bind(params.student_id)
    .bind(params.batch_id)
    .bind(&params.date)
    .bind(params.status)
    .bind(&params.notes)
    .bind(&params.marked_by)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_attendance(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let result = query("DELETE FROM attendance WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    affected_or_not_found(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Daily reports
// ---------------------------------------------------------------------------

pub async fn get_daily_reports(pool: &SqlitePool) -> Result<Vec<DailyReportRecord>, sqlx::Error> {
    query_as::<_, DailyReportRecord>(
        "SELECT id, title, description, task_type, report_date, created_by, created_at \
         FROM daily_reports ORDER BY report_date DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_daily_report(
    pool: &SqlitePool,
    params: &DailyReportParams,
) -> Result<i64, sqlx::Error> {
    let result = query(
        "INSERT INTO daily_reports (title, description, task_type, report_date, created_by) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&params.title)
    .bind(&params.description)
    .bind(&params.task_type)
    .bind(&params.report_date)
    .bind(&params.created_by)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_daily_report(
    pool: &SqlitePool,
    id: i64,
    params: &DailyReportParams,
) -> Result<(), sqlx::Error> {
    let result = query(
        "UPDATE daily_reports SET title = ?, description = ?, task_type = ?, report_date = ? \
         WHERE id = ?",
    )
    .bind(&params.title)
    .bind(&params.description)
    .bind(&params.task_type)
    .bind(&params.report_date)
    .bind(id)
    .execute(pool)
    .await?;
    affected_or_not_found(result.rows_affected())
}

pub async fn delete_daily_report(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let result = query("DELETE FROM daily_reports WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    affected_or_not_found(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Export logs
// ---------------------------------------------------------------------------

pub async fn get_export_logs(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<ExportLogRecord>, sqlx::Error> {
    query_as::<_, ExportLogRecord>(
        "SELECT id, kind, file_name, record_count, created_at \
         FROM export_logs ORDER BY id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn insert_export_log<'e, E>(
    executor: E,
    params: &ExportLogParams,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = query("INSERT INTO export_logs (kind, file_name, record_count) VALUES (?, ?, ?)")
        .bind(params.kind)
        .bind(&params.file_name)
        .bind(params.record_count)
        .execute(executor)
        .await?;

    Ok(result.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::connect_in_memory;
    use crate::domain::{AttendanceStatus, BatchType, TransferKind};

    fn student(name: &str, aadhaar: &str) -> StudentParams {
        StudentParams {
            name: name.to_string(),
            age: Some(16),
            gender: Some("F".to_string()),
            contact_phone: Some("9800000000".to_string()),
            guardian_name: None,
            guardian_phone: None,
            address: None,
            aadhaar_number: aadhaar.to_string(),
            course_enrolled: "coding".to_string(),
            batch_id: None,
            admission_date: "2024-06-01".to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_student() -> Result<(), Box<dyn std::error::Error>> {
        let pool = connect_in_memory().await?;

        let id = insert_student(&pool, &student("Asha", "123456789012")).await?;
        let fetched = get_student_by_id(&pool, id).await?;

        assert_eq!(fetched.name, "Asha");
        assert_eq!(fetched.aadhaar_number, "123456789012");
        assert!(fetched.is_active);
        assert_eq!(fetched.batch_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_student_keeps_unset_fields() -> Result<(), Box<dyn std::error::Error>> {
        let pool = connect_in_memory().await?;
        let id = insert_student(&pool, &student("Asha", "123456789012")).await?;

        let params = StudentUpdateParams {
            id,
            is_active: Some(false),
            ..StudentUpdateParams::default()
        };
        update_student(&pool, &params).await?;

        let updated = get_student_by_id(&pool, id).await?;
        assert!(!updated.is_active);
        assert_eq!(updated.name, "Asha");
        assert_eq!(updated.contact_phone.as_deref(), Some("9800000000"));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let pool = connect_in_memory().await?;

        let result = delete_student(&pool, 99).await;
        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_student_and_date(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let pool = connect_in_memory().await?;
        let student_id = insert_student(&pool, &student("Asha", "123456789012")).await?;

        let mut params = AttendanceParams {
            student_id,
            batch_id: None,
            date: "2024-07-01".to_string(),
            status: AttendanceStatus::Absent,
            notes: None,
            marked_by: Some("admin".to_string()),
        };
        upsert_attendance(&pool, &params).await?;

        params.status = AttendanceStatus::Late;
        params.notes = Some("bus delayed".to_string());
        upsert_attendance(&pool, &params).await?;

        params.date = "2024-07-02".to_string();
        params.status = AttendanceStatus::Present;
        upsert_attendance(&pool, &params).await?;

        let rows = get_attendance(&pool).await?;
        assert_eq!(rows.len(), 2);
        let first_day = rows
            .iter()
            .find(|row| row.date == "2024-07-01")
            .ok_or("missing row")?;
        assert_eq!(first_day.parsed_status(), Some(AttendanceStatus::Late));
        assert_eq!(first_day.notes.as_deref(), Some("bus delayed"));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_attendance_clears_one_mark() -> Result<(), Box<dyn std::error::Error>> {
        let pool = connect_in_memory().await?;
        let student_id = insert_student(&pool, &student("Asha", "123456789012")).await?;

        for date in ["2024-07-01", "2024-07-02"] {
            upsert_attendance(
                &pool,
                &AttendanceParams {
                    student_id,
                    batch_id: None,
                    date: date.to_string(),
                    status: AttendanceStatus::Present,
                    notes: None,
                    marked_by: None,
                },
            )
            .await?;
        }

        let first = get_attendance(&pool)
            .await?
            .into_iter()
            .find(|row| row.date == "2024-07-01")
            .ok_or("missing row")?;
        delete_attendance(&pool, first.id).await?;

        let rows = get_attendance(&pool).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "2024-07-02");
        assert!(matches!(
            delete_attendance(&pool, first.id).await,
            Err(sqlx::Error::RowNotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_batch_and_teacher_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let pool = connect_in_memory().await?;

        let teacher_id = insert_teacher(
            &pool,
            &TeacherParams {
                name: "Ravi".to_string(),
                contact_phone: None,
                specializations: vec!["Python".to_string(), "Tally".to_string()],
                photo_url: None,
            },
        )
        .await?;

        insert_batch(
            &pool,
            &BatchParams {
                name: "Morning Coders".to_string(),
                batch_type: BatchType::WebBasicTally,
                start_time: "09:00".to_string(),
                end_time: "11:00".to_string(),
                primary_teacher_id: Some(teacher_id),
                secondary_teacher_id: None,
                room: Some("Lab 1".to_string()),
            },
        )
        .await?;

        let teachers = get_teachers(&pool).await?;
        assert_eq!(
            teachers[0].specializations().collect::<Vec<_>>(),
            vec!["Python", "Tally"]
        );

        let batches = get_batches(&pool).await?;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_type, BatchType::WebBasicTally);
        assert_eq!(batches[0].primary_teacher_id, Some(teacher_id));

        Ok(())
    }

    #[tokio::test]
    async fn test_export_logs_newest_first() -> Result<(), Box<dyn std::error::Error>> {
        let pool = connect_in_memory().await?;

        for (kind, name) in [
            (TransferKind::Export, "students_export_2024-07-01.xlsx"),
            (TransferKind::Import, "intake.csv"),
        ] {
            insert_export_log(
                &pool,
                &ExportLogParams {
                    kind,
                    file_name: name.to_string(),
                    record_count: 3,
                },
            )
            .await?;
        }

        let logs = get_export_logs(&pool, 10).await?;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].kind, TransferKind::Import);
        assert_eq!(logs[0].file_name, "intake.csv");

        Ok(())
    }
}
