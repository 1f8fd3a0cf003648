use serde::Serialize;
use sqlx::FromRow;

use crate::domain::{AttendanceStatus, BatchType, TransferKind};

/// Represents a student row in the database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub contact_phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub aadhaar_number: String,
    pub course_enrolled: String,
    pub batch_id: Option<i64>,
    pub admission_date: String,
    pub is_active: bool, // SQLite stores booleans as integers
    pub created_at: String,
}

/// Fields for inserting or replacing a student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentParams {
    pub name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub contact_phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub aadhaar_number: String,
    pub course_enrolled: String,
    pub batch_id: Option<i64>,
    pub admission_date: String,
    pub is_active: bool,
}

impl From<&StudentRecord> for StudentParams {
    fn from(record: &StudentRecord) -> Self {
        Self {
            name: record.name.clone(),
            age: record.age,
            gender: record.gender.clone(),
            contact_phone: record.contact_phone.clone(),
            guardian_name: record.guardian_name.clone(),
            guardian_phone: record.guardian_phone.clone(),
            address: record.address.clone(),
            aadhaar_number: record.aadhaar_number.clone(),
            course_enrolled: record.course_enrolled.clone(),
            batch_id: record.batch_id,
            admission_date: record.admission_date.clone(),
            is_active: record.is_active,
        }
    }
}

/// Represents a teacher row in the database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TeacherRecord {
    pub id: i64,
    pub name: String,
    pub contact_phone: Option<String>,
    /// Comma separated, see [`TeacherRecord::specializations`]
    pub specialization: String,
    pub photo_url: Option<String>,
}

impl TeacherRecord {
    pub fn specializations(&self) -> impl Iterator<Item = &str> {
        self.specialization
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherParams {
    pub name: String,
    pub contact_phone: Option<String>,
    pub specializations: Vec<String>,
    pub photo_url: Option<String>,
}

/// Represents a batch (class cohort) row in the database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct BatchRecord {
    pub id: i64,
    pub name: String,
    pub batch_type: BatchType,
    pub start_time: String,
    pub end_time: String,
    pub primary_teacher_id: Option<i64>,
    pub secondary_teacher_id: Option<i64>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchParams {
    pub name: String,
    pub batch_type: BatchType,
    pub start_time: String,
    pub end_time: String,
    pub primary_teacher_id: Option<i64>,
    pub secondary_teacher_id: Option<i64>,
    pub room: Option<String>,
}

/// Represents an attendance row. `status` stays raw text so values written
/// by other tools survive a read.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub batch_id: Option<i64>,
    pub date: String,
    pub status: String,
    pub notes: Option<String>,
    pub marked_by: Option<String>,
}

impl AttendanceRecord {
    pub fn parsed_status(&self) -> Option<AttendanceStatus> {
        AttendanceStatus::parse(&self.status)
    }
}

/// Parameters for the (student, date) upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceParams {
    pub student_id: i64,
    pub batch_id: Option<i64>,
    pub date: String,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub marked_by: Option<String>,
}

/// Represents a daily field report
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DailyReportRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub task_type: String,
    pub report_date: String,
    pub created_by: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReportParams {
    pub title: String,
    pub description: String,
    pub task_type: String,
    pub report_date: String,
    pub created_by: String,
}

/// One audit entry per spreadsheet import or export
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ExportLogRecord {
    pub id: i64,
    pub kind: TransferKind,
    pub file_name: String,
    pub record_count: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLogParams {
    pub kind: TransferKind,
    pub file_name: String,
    pub record_count: i64,
}
