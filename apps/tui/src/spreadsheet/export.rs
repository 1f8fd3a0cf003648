use chrono::NaiveDate;

use super::{CellValue, Table};
use crate::attendance::DATE_FORMAT;
use crate::db::models::StudentRecord;

pub const EXPORT_HEADERS: [&str; 11] = [
    "Name",
    "Age",
    "Gender",
    "Contact Phone",
    "Aadhaar",
    "Guardian Name",
    "Guardian Phone",
    "Address",
    "Course Enrolled",
    "Admission Date",
    "Active",
];

/// Default workbook name for an export made on `day`.
pub fn export_file_name(day: NaiveDate, extension: &str) -> String {
    format!("students_export_{}.{extension}", day.format(DATE_FORMAT))
}

/// One flat row per student under [`EXPORT_HEADERS`], in input order.
pub fn export_table(students: &[StudentRecord]) -> Table {
    let mut table = Table::new(EXPORT_HEADERS);
    table.rows = students.iter().map(export_row).collect();
    table
}

fn export_row(student: &StudentRecord) -> Vec<CellValue> {
    vec![
        CellValue::text(student.name.as_str()),
        student
            .age
            .map_or(CellValue::Empty, |age| CellValue::text(age.to_string())),
        CellValue::optional_text(student.gender.as_deref()),
        CellValue::optional_text(student.contact_phone.as_deref()),
        // Kept as text so long IDs never turn into floats in the workbook.
        CellValue::text(student.aadhaar_number.as_str()),
        CellValue::optional_text(student.guardian_name.as_deref()),
        CellValue::optional_text(student.guardian_phone.as_deref()),
        CellValue::optional_text(student.address.as_deref()),
        CellValue::text(student.course_enrolled.as_str()),
        CellValue::text(student.admission_date.as_str()),
        CellValue::text(if student.is_active { "Yes" } else { "No" }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::partition_rows;

    fn student(id: i64, name: &str, aadhaar: &str, active: bool) -> StudentRecord {
        StudentRecord {
            id,
            name: name.to_string(),
            age: Some(17),
            gender: Some("M".to_string()),
            contact_phone: Some("9800000000".to_string()),
            guardian_name: None,
            guardian_phone: None,
            address: Some("Ward 4".to_string()),
            aadhaar_number: aadhaar.to_string(),
            course_enrolled: "web-intermediate".to_string(),
            batch_id: Some(2),
            admission_date: "2024-05-20".to_string(),
            is_active: active,
            created_at: "2024-05-20 09:00:00".to_string(),
        }
    }

    #[test]
    fn export_uses_fixed_headers_and_yes_no() {
        let table = export_table(&[student(1, "Asha", "123456789012", true), student(2, "Bilal", "223456789012", false)]);

        assert_eq!(table.headers, EXPORT_HEADERS.map(String::from).to_vec());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], CellValue::text("Asha"));
        assert_eq!(table.rows[0][10], CellValue::text("Yes"));
        assert_eq!(table.rows[1][10], CellValue::text("No"));
        assert_eq!(table.rows[0][6], CellValue::Empty);
    }

    #[test]
    fn export_then_import_preserves_name_and_aadhaar() {
        let students = vec![
            student(1, "Asha", "123456789012", true),
            student(2, "Bilal", "1234 5678 9012", false),
            student(3, "Chitra", "98765", true),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap_or_default();

        let outcome = partition_rows(export_table(&students).into_records(), today);

        let round_tripped: Vec<(&str, &str)> = outcome
            .valid
            .iter()
            .map(|s| (s.name.as_str(), s.aadhaar_number.as_str()))
            .collect();
        assert_eq!(
            round_tripped,
            vec![("Asha", "123456789012"), ("Bilal", "1234 5678 9012")]
        );
        assert_eq!(outcome.invalid.len(), 1);
        assert!(!outcome.valid[1].is_active);
        assert_eq!(outcome.valid[0].course_enrolled, "web-intermediate");
        assert_eq!(outcome.valid[0].admission_date, "2024-05-20");
    }

    #[test]
    fn default_file_name_carries_iso_date() {
        let day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default();
        assert_eq!(export_file_name(day, "xlsx"), "students_export_2024-07-01.xlsx");
    }
}
