use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::attendance::DATE_FORMAT;
use crate::db::models::{
    AttendanceParams, BatchParams, DailyReportParams, StudentParams, TeacherParams,
};
use crate::db::queries;
use crate::domain::{AttendanceStatus, BatchType};
use crate::store::Store;

const SEED_MARKER: &str = "seed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub teachers: usize,
    pub batches: usize,
    pub students: usize,
    pub attendance: usize,
    pub reports: usize,
}

impl SeedSummary {
    pub const fn is_empty(&self) -> bool {
        self.teachers == 0 && self.students == 0
    }
}

const TEACHERS: [(&str, &str, &[&str]); 3] = [
    ("Meera Nair", "9810000001", &["coding", "web"]),
    ("Arjun Das", "9810000002", &["web", "tally"]),
    ("Farah Khan", "9810000003", &["coding"]),
];

// (name, type, start, end, room, primary teacher index, secondary)
const BATCHES: [(&str, BatchType, &str, &str, &str, usize, Option<usize>); 3] = [
    ("Morning Coders", BatchType::Coding, "09:00", "11:00", "Lab 1", 0, Some(2)),
    ("Afternoon Web", BatchType::WebIntermediate, "13:00", "15:00", "Lab 2", 1, None),
    ("Evening Basics", BatchType::WebBasicTally, "17:00", "19:00", "Room 3", 1, Some(0)),
];

// (name, age, gender, guardian, batch index)
const STUDENTS: [(&str, i64, &str, &str, usize); 9] = [
    ("Asha Kumari", 15, "F", "Sunita Devi", 0),
    ("Bilal Ahmed", 16, "M", "Rashid Ahmed", 0),
    ("Chitra Rao", 14, "F", "Lakshmi Rao", 0),
    ("Deepak Yadav", 17, "M", "Ramesh Yadav", 1),
    ("Esha Singh", 16, "F", "Kavita Singh", 1),
    ("Faizan Ali", 18, "M", "Nasreen Ali", 1),
    ("Gita Verma", 21, "F", "Mohan Verma", 2),
    ("Harish Patel", 24, "M", "Jaya Patel", 2),
    ("Ishita Roy", 19, "F", "Anil Roy", 2),
];

const REPORTS: [(&str, &str, &str); 3] = [
    ("Lab setup", "Replaced two keyboards in Lab 1", "maintenance"),
    ("Community visit", "Met guardians of the evening batch", "outreach"),
    ("Typing drills", "Ran a typing speed session for Morning Coders", "teaching"),
];

/// Inserts a small, fixed data set: three teachers and batches, nine
/// students, a week of attendance ending on `today` and a few reports.
/// Does nothing when students already exist.
pub async fn seed_sample_data(store: &Store, today: NaiveDate) -> Result<SeedSummary, sqlx::Error> {
    let existing = queries::count_students(store.pool()).await?;
    if existing > 0 {
        info!(existing, "database already has students, skipping seed");
        return Ok(SeedSummary::default());
    }

    let mut summary = SeedSummary::default();

    let mut teacher_ids = Vec::with_capacity(TEACHERS.len());
    for (name, phone, specializations) in TEACHERS {
        let id = store
            .insert_teacher(&TeacherParams {
                name: name.to_string(),
                contact_phone: Some(phone.to_string()),
                specializations: specializations.iter().map(ToString::to_string).collect(),
                photo_url: None,
            })
            .await?;
        teacher_ids.push(id);
        summary.teachers += 1;
    }

    let mut batch_ids = Vec::with_capacity(BATCHES.len());
    for (name, batch_type, start, end, room, primary, secondary) in BATCHES {
        let id = store
            .insert_batch(&BatchParams {
                name: name.to_string(),
                batch_type,
                start_time: start.to_string(),
                end_time: end.to_string(),
                primary_teacher_id: teacher_ids.get(primary).copied(),
                secondary_teacher_id: secondary.and_then(|index| teacher_ids.get(index).copied()),
                room: Some(room.to_string()),
            })
            .await?;
        batch_ids.push((id, batch_type));
        summary.batches += 1;
    }

    let admission = (today - Duration::days(60)).format(DATE_FORMAT).to_string();
    let mut enrolled = Vec::with_capacity(STUDENTS.len());
    for (index, (name, age, gender, guardian, batch)) in STUDENTS.into_iter().enumerate() {
        let (batch_id, batch_type) = batch_ids[batch];
        let id = store
            .insert_student(&StudentParams {
                name: name.to_string(),
                age: Some(age),
                gender: Some(gender.to_string()),
                contact_phone: Some(format!("98200000{index:02}")),
                guardian_name: Some(guardian.to_string()),
                guardian_phone: Some(format!("98300000{index:02}")),
                address: Some(format!("Ward {}", index % 4 + 1)),
                aadhaar_number: format!("4000 1000 {:04}", index + 1),
                course_enrolled: batch_type.as_str().to_string(),
                batch_id: Some(batch_id),
                admission_date: admission.clone(),
                is_active: index != STUDENTS.len() - 1,
            })
            .await?;
        enrolled.push((index, id, batch_id));
    }
    summary.students = enrolled.len();

    for offset in (0..7).rev() {
        let day = today - Duration::days(offset);
        let date = day.format(DATE_FORMAT).to_string();
        for &(index, student_id, batch_id) in &enrolled {
            store
                .upsert_attendance(&AttendanceParams {
                    student_id,
                    batch_id: Some(batch_id),
                    date: date.clone(),
                    status: status_for(index, offset),
                    notes: None,
                    marked_by: Some(SEED_MARKER.to_string()),
                })
                .await?;
            summary.attendance += 1;
        }
    }

    for (offset, (title, description, task_type)) in REPORTS.into_iter().enumerate() {
        let day = today - Duration::days(i64::try_from(offset).unwrap_or_default());
        store
            .insert_daily_report(&DailyReportParams {
                title: title.to_string(),
                description: description.to_string(),
                task_type: task_type.to_string(),
                report_date: day.format(DATE_FORMAT).to_string(),
                created_by: SEED_MARKER.to_string(),
            })
            .await?;
        summary.reports += 1;
    }

    info!(?summary, "sample data seeded");
    Ok(summary)
}

/// Deterministic mix: mostly present, with some absences and late arrivals.
fn status_for(student: usize, day_offset: i64) -> AttendanceStatus {
    let day = usize::try_from(day_offset).unwrap_or_default();
    match (student * 3 + day) % 7 {
        0 => AttendanceStatus::Absent,
        1 => AttendanceStatus::Late,
        _ => AttendanceStatus::Present,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::aggregate;
    use crate::db::migrations::connect_in_memory;
    use crate::sync::ChangeBus;

    #[tokio::test]
    async fn seeds_once() -> Result<(), Box<dyn std::error::Error>> {
        let store = Store::new(connect_in_memory().await?, ChangeBus::default());
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap_or_default();

        let summary = seed_sample_data(&store, today).await?;
        assert_eq!(summary.teachers, 3);
        assert_eq!(summary.students, 9);
        assert_eq!(summary.attendance, 63);

        let attendance = store.fetch_attendance().await?;
        assert_eq!(attendance.len(), 63);
        let stats = aggregate(&attendance);
        assert!(stats.present_count > stats.absent_count);
        assert!(stats.late_count > 0);

        let again = seed_sample_data(&store, today).await?;
        assert!(again.is_empty());
        assert_eq!(store.fetch_students().await?.len(), 9);
        Ok(())
    }
}
