use super::SheetRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    Name,
    Age,
    Gender,
    ContactPhone,
    Aadhaar,
    GuardianName,
    GuardianPhone,
    Address,
    CourseEnrolled,
    AdmissionDate,
    Active,
}

/// Accepted column headers per field, in normalized form (see [`normalize_header`]).
/// Adding a synonym is a data change here, nothing else.
pub const STUDENT_FIELD_ALIASES: &[(StudentField, &[&str])] = &[
    (StudentField::Name, &["name", "studentname", "fullname"]),
    (StudentField::Age, &["age"]),
    (StudentField::Gender, &["gender", "sex"]),
    (
        StudentField::ContactPhone,
        &["contactphone", "contact", "phone", "mobile", "phonenumber"],
    ),
    (
        StudentField::Aadhaar,
        &["aadhaar", "aadhaarnumber", "aadhar", "aadharnumber", "aadhaarno"],
    ),
    (
        StudentField::GuardianName,
        &["guardianname", "guardian", "parentname"],
    ),
    (
        StudentField::GuardianPhone,
        &["guardianphone", "guardiancontact", "parentphone"],
    ),
    (StudentField::Address, &["address"]),
    (
        StudentField::CourseEnrolled,
        &["courseenrolled", "course"],
    ),
    (
        StudentField::AdmissionDate,
        &["admissiondate", "dateofadmission", "admittedon"],
    ),
    (StudentField::Active, &["active", "isactive", "status"]),
];

/// Lowercase with spaces, underscores, hyphens and dots removed.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn aliases_for(field: StudentField) -> &'static [&'static str] {
    STUDENT_FIELD_ALIASES
        .iter()
        .find(|(candidate, _)| *candidate == field)
        .map_or(&[][..], |(_, aliases)| *aliases)
}

/// First non-empty cell whose header is an alias of `field`, trimmed.
pub fn lookup(row: &SheetRow, field: StudentField) -> Option<String> {
    let aliases = aliases_for(field);
    row.iter()
        .filter(|(header, _)| aliases.contains(&normalize_header(header).as_str()))
        .find_map(|(_, cell)| cell.as_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::CellValue;

    #[test]
    fn every_field_has_aliases() {
        for field in [
            StudentField::Name,
            StudentField::Age,
            StudentField::Gender,
            StudentField::ContactPhone,
            StudentField::Aadhaar,
            StudentField::GuardianName,
            StudentField::GuardianPhone,
            StudentField::Address,
            StudentField::CourseEnrolled,
            StudentField::AdmissionDate,
            StudentField::Active,
        ] {
            assert!(!aliases_for(field).is_empty(), "{field:?}");
        }
    }

    #[test]
    fn headers_match_regardless_of_case_and_separators() {
        let mut row = SheetRow::new();
        row.insert("AADHAAR_NUMBER".to_string(), CellValue::text("123456789012"));
        row.insert("Student Name".to_string(), CellValue::text("Asha"));
        row.insert("Contact Phone".to_string(), CellValue::Number(9_800_000_000.0));

        assert_eq!(lookup(&row, StudentField::Aadhaar).as_deref(), Some("123456789012"));
        assert_eq!(lookup(&row, StudentField::Name).as_deref(), Some("Asha"));
        assert_eq!(lookup(&row, StudentField::ContactPhone).as_deref(), Some("9800000000"));
        assert_eq!(lookup(&row, StudentField::Address), None);
    }

    #[test]
    fn empty_synonym_falls_through_to_next_one() {
        let mut row = SheetRow::new();
        row.insert("name".to_string(), CellValue::Empty);
        row.insert("Full Name".to_string(), CellValue::text("Bilal"));

        assert_eq!(lookup(&row, StudentField::Name).as_deref(), Some("Bilal"));
    }
}
