use std::fmt;

use chrono::{Duration, NaiveDate};

use super::aliases::{lookup, StudentField};
use super::SheetRow;
use crate::attendance::DATE_FORMAT;
use crate::db::models::StudentParams;
use crate::domain::BatchType;

pub const MIN_AADHAAR_LEN: usize = 12;
pub const DEFAULT_COURSE: &str = "coding";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingRequiredFields,
    InvalidAadhaar,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredFields => f.write_str("Missing required fields"),
            Self::InvalidAadhaar => f.write_str("Invalid Aadhaar number"),
        }
    }
}

/// A row that failed validation, with its 1-based position among the data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub row_number: usize,
    pub row: SheetRow,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    pub valid: Vec<StudentParams>,
    pub invalid: Vec<RejectedRow>,
}

impl ImportOutcome {
    pub fn total_rows(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }
}

/// Splits rows into normalized students and rejected rows. Never fails:
/// every problem is reported per row.
pub fn partition_rows(rows: Vec<SheetRow>, today: NaiveDate) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    for (index, row) in rows.into_iter().enumerate() {
        match student_from_row(&row, today) {
            Ok(student) => outcome.valid.push(student),
            Err(reason) => outcome.invalid.push(RejectedRow {
                row_number: index + 1,
                row,
                reason,
            }),
        }
    }

    outcome
}

pub fn student_from_row(row: &SheetRow, today: NaiveDate) -> Result<StudentParams, RejectReason> {
    let name = lookup(row, StudentField::Name);
    let aadhaar = lookup(row, StudentField::Aadhaar);

    let (Some(name), Some(aadhaar_number)) = (name, aadhaar) else {
        return Err(RejectReason::MissingRequiredFields);
    };
    if aadhaar_number.chars().count() < MIN_AADHAAR_LEN {
        return Err(RejectReason::InvalidAadhaar);
    }

    let course_enrolled = lookup(row, StudentField::CourseEnrolled).map_or_else(
        || DEFAULT_COURSE.to_string(),
        |course| BatchType::parse(&course).map_or(course, |kind| kind.as_str().to_string()),
    );
    let admission_date = lookup(row, StudentField::AdmissionDate)
        .and_then(|value| parse_admission_date(&value))
        .unwrap_or(today)
        .format(DATE_FORMAT)
        .to_string();

    Ok(StudentParams {
        name,
        age: lookup(row, StudentField::Age).and_then(|age| parse_age(&age)),
        gender: lookup(row, StudentField::Gender),
        contact_phone: lookup(row, StudentField::ContactPhone),
        guardian_name: lookup(row, StudentField::GuardianName),
        guardian_phone: lookup(row, StudentField::GuardianPhone),
        address: lookup(row, StudentField::Address),
        aadhaar_number,
        course_enrolled,
        batch_id: None,
        admission_date,
        is_active: lookup(row, StudentField::Active).map_or(true, |value| parse_flag(&value)),
    })
}

fn parse_age(value: &str) -> Option<i64> {
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|age| age.trunc() as i64))
        .filter(|age| *age > 0)
}

/// ISO, day-first and Excel serial dates.
fn parse_admission_date(value: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = [DATE_FORMAT, "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

    // A datetime cell comes through as "2024-06-01 00:00:00".
    let date_part = value.split_whitespace().next().unwrap_or(value);
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .or_else(|| {
            let serial = value.parse::<i64>().ok()?;
            let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
            (1..100_000)
                .contains(&serial)
                .then(|| epoch + Duration::days(serial))
        })
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "no" | "n" | "false" | "0" | "inactive"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::CellValue;

    fn row(pairs: &[(&str, &str)]) -> SheetRow {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), CellValue::text(*value)))
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap_or_default()
    }

    #[test]
    fn partitions_valid_and_invalid_rows() {
        let rows = vec![
            row(&[("Name", "A"), ("Aadhaar", "123456789012")]),
            row(&[("Name", ""), ("Aadhaar", "999999999999")]),
            row(&[("Name", "B"), ("Aadhaar", "123")]),
        ];

        let outcome = partition_rows(rows, today());

        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.valid[0].name, "A");
        assert_eq!(outcome.invalid.len(), 2);
        assert_eq!(outcome.invalid[0].row_number, 2);
        assert_eq!(outcome.invalid[0].reason, RejectReason::MissingRequiredFields);
        assert_eq!(outcome.invalid[1].row_number, 3);
        assert_eq!(outcome.invalid[1].reason, RejectReason::InvalidAadhaar);
        assert_eq!(outcome.invalid[1].row.get("Name"), Some(&CellValue::text("B")));
    }

    #[test]
    fn aadhaar_length_boundary() {
        let twelve = row(&[("name", "A"), ("aadhaar", "123456789012")]);
        let eleven = row(&[("name", "A"), ("aadhaar", "12345678901")]);

        assert!(student_from_row(&twelve, today()).is_ok());
        assert_eq!(
            student_from_row(&eleven, today()),
            Err(RejectReason::InvalidAadhaar)
        );
        assert_eq!(RejectReason::InvalidAadhaar.to_string(), "Invalid Aadhaar number");
    }

    #[test]
    fn empty_name_is_missing_even_with_valid_aadhaar() {
        let missing = row(&[("Name", "   "), ("Aadhaar", "123456789012")]);

        let reason = student_from_row(&missing, today());
        assert_eq!(reason, Err(RejectReason::MissingRequiredFields));
        assert_eq!(
            RejectReason::MissingRequiredFields.to_string(),
            "Missing required fields"
        );
    }

    #[test]
    fn defaults_fill_course_date_and_active() -> Result<(), RejectReason> {
        let student = student_from_row(&row(&[("Name", "A"), ("Aadhaar", "123456789012")]), today())?;

        assert_eq!(student.course_enrolled, "coding");
        assert_eq!(student.admission_date, "2024-07-15");
        assert!(student.is_active);
        assert_eq!(student.age, None);
        Ok(())
    }

    #[test]
    fn optional_columns_are_normalized() -> Result<(), RejectReason> {
        let mut sheet_row = row(&[
            ("Student Name", "Asha"),
            ("Aadhaar Number", "123456789012"),
            ("Course", "Web Basic + Tally"),
            ("Admission Date", "01/06/2024"),
            ("Active", "No"),
            ("Guardian", "Sunita"),
        ]);
        sheet_row.insert("Age".to_string(), CellValue::Number(15.0));

        let student = student_from_row(&sheet_row, today())?;

        assert_eq!(student.course_enrolled, "web-basic-tally");
        assert_eq!(student.admission_date, "2024-06-01");
        assert!(!student.is_active);
        assert_eq!(student.age, Some(15));
        assert_eq!(student.guardian_name.as_deref(), Some("Sunita"));
        Ok(())
    }

    #[test]
    fn excel_serial_admission_date() {
        // 45474 is 2024-07-01 in the 1900 date system
        assert_eq!(
            parse_admission_date("45474"),
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
        assert_eq!(parse_admission_date("next week"), None);
    }
}
