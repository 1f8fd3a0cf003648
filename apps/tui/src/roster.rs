//! Search and categorical filtering over roster collections.

use std::borrow::Cow;

use crate::db::models::{BatchRecord, StudentRecord, TeacherRecord};
use crate::domain::ALL;

/// Categorical fields a roster can be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterField {
    Course,
    Batch,
    Status,
    BatchType,
    Specialization,
}

/// Records that can be searched and filtered.
pub trait Rosterable {
    /// Free-text fields in the order they are searched; `None` never matches.
    fn search_fields(&self) -> Vec<Option<&str>>;

    /// Value of a categorical field, `None` when absent or not applicable.
    fn field_value(&self, field: RosterField) -> Option<Cow<'_, str>>;

    /// List-valued categories match on membership. Defaults to `field_value`.
    fn field_matches(&self, field: RosterField, wanted: &str) -> bool {
        self.field_value(field)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case(wanted))
    }
}

/// The conjunction of a text search and categorical filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterQuery {
    pub text: String,
    pub filters: Vec<(RosterField, String)>,
}

impl RosterQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, field: RosterField, value: impl Into<String>) -> Self {
        self.filters.push((field, value.into()));
        self
    }

    pub fn matches<T: Rosterable + ?Sized>(&self, record: &T) -> bool {
        self.matches_text(record) && self.matches_filters(record)
    }

    fn matches_text<T: Rosterable + ?Sized>(&self, record: &T) -> bool {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        record
            .search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_filters<T: Rosterable + ?Sized>(&self, record: &T) -> bool {
        self.filters.iter().all(|(field, wanted)| {
            let wanted = wanted.trim();
            is_unfiltered(wanted) || record.field_matches(*field, wanted)
        })
    }
}

/// `"all"` and empty selections impose no constraint.
pub fn is_unfiltered(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

/// Matching records, in input order.
pub fn filter<'a, T: Rosterable>(records: &'a [T], query: &RosterQuery) -> Vec<&'a T> {
    records.iter().filter(|record| query.matches(*record)).collect()
}

impl Rosterable for StudentRecord {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            Some(self.aadhaar_number.as_str()),
            self.contact_phone.as_deref(),
            self.guardian_name.as_deref(),
        ]
    }

    fn field_value(&self, field: RosterField) -> Option<Cow<'_, str>> {
        match field {
            RosterField::Course => Some(Cow::Borrowed(self.course_enrolled.as_str())),
            RosterField::Batch => self.batch_id.map(|id| Cow::Owned(id.to_string())),
            RosterField::Status => Some(Cow::Borrowed(if self.is_active {
                "active"
            } else {
                "inactive"
            })),
            RosterField::BatchType | RosterField::Specialization => None,
        }
    }
}

impl Rosterable for TeacherRecord {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.contact_phone.as_deref(),
            Some(self.specialization.as_str()),
        ]
    }

    fn field_value(&self, field: RosterField) -> Option<Cow<'_, str>> {
        match field {
            RosterField::Specialization => Some(Cow::Borrowed(self.specialization.as_str())),
            _ => None,
        }
    }

    fn field_matches(&self, field: RosterField, wanted: &str) -> bool {
        match field {
            RosterField::Specialization => self
                .specializations()
                .any(|item| item.eq_ignore_ascii_case(wanted)),
            _ => false,
        }
    }
}

impl Rosterable for BatchRecord {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), self.room.as_deref()]
    }

    fn field_value(&self, field: RosterField) -> Option<Cow<'_, str>> {
        match field {
            RosterField::BatchType => Some(Cow::Borrowed(self.batch_type.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BatchType;

    fn student(id: i64, name: &str, course: &str, batch_id: Option<i64>, active: bool) -> StudentRecord {
        StudentRecord {
            id,
            name: name.to_string(),
            age: None,
            gender: None,
            contact_phone: None,
            guardian_name: Some(format!("Guardian of {name}")),
            guardian_phone: None,
            address: None,
            aadhaar_number: format!("{id:012}"),
            course_enrolled: course.to_string(),
            batch_id,
            admission_date: "2024-06-01".to_string(),
            is_active: active,
            created_at: "2024-06-01 10:00:00".to_string(),
        }
    }

    fn roster() -> Vec<StudentRecord> {
        vec![
            student(1, "Asha Kumari", "coding", Some(1), true),
            student(2, "Bilal Ahmed", "web-intermediate", Some(2), true),
            student(3, "Chitra Das", "coding", None, false),
            student(4, "Deepak Rai", "web-basic-tally", Some(1), true),
        ]
    }

    #[test]
    fn all_and_empty_text_return_everything_in_order() {
        let students = roster();
        let query = RosterQuery::new("").with_filter(RosterField::Course, "all");

        let ids: Vec<i64> = filter(&students, &query).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn text_search_is_case_insensitive_substring() {
        let students = roster();

        let ids: Vec<i64> = filter(&students, &RosterQuery::new("ASHA"))
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1]);

        // guardian name is searched too
        let ids: Vec<i64> = filter(&students, &RosterQuery::new("guardian of d"))
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let students = roster();
        let query = RosterQuery::new("a")
            .with_filter(RosterField::Course, "coding")
            .with_filter(RosterField::Status, "active");

        let ids: Vec<i64> = filter(&students, &query).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn missing_field_is_no_match_not_error() {
        let students = roster();
        let query = RosterQuery::default().with_filter(RosterField::Batch, "1");

        let ids: Vec<i64> = filter(&students, &query).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 4]);

        // students carry no batch type at all
        let query = RosterQuery::default().with_filter(RosterField::BatchType, "coding");
        assert!(filter(&students, &query).is_empty());
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let students = roster();
        let query = RosterQuery::new("r").with_filter(RosterField::Status, "active");

        let once: Vec<StudentRecord> = filter(&students, &query).into_iter().cloned().collect();
        let twice: Vec<StudentRecord> = filter(&once, &query).into_iter().cloned().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn teacher_specialization_matches_list_members() {
        let teachers = vec![
            TeacherRecord {
                id: 1,
                name: "Ravi".to_string(),
                contact_phone: None,
                specialization: "Python, Web".to_string(),
                photo_url: None,
            },
            TeacherRecord {
                id: 2,
                name: "Meena".to_string(),
                contact_phone: None,
                specialization: "Tally".to_string(),
                photo_url: None,
            },
        ];

        let query = RosterQuery::default().with_filter(RosterField::Specialization, "web");
        let ids: Vec<i64> = filter(&teachers, &query).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn batch_type_filter() {
        let batches = vec![BatchRecord {
            id: 1,
            name: "Evening Web".to_string(),
            batch_type: BatchType::WebIntermediate,
            start_time: "17:00".to_string(),
            end_time: "19:00".to_string(),
            primary_teacher_id: None,
            secondary_teacher_id: None,
            room: None,
        }];

        let hit = RosterQuery::default().with_filter(RosterField::BatchType, "web-intermediate");
        let miss = RosterQuery::new("lab").with_filter(RosterField::BatchType, "all");
        assert_eq!(filter(&batches, &hit).len(), 1);
        assert!(filter(&batches, &miss).is_empty());
    }
}
