//! Field constraints for tasks and the messages reported when they are violated.
//!
//! Every check appends to a [`ValidationErrors`] instead of returning early, so a
//! caller can report all violated fields at once.
use crate::task::{CreateTaskInput, TaskFilter, TaskPriority, TaskStatus, UpdateTaskInput};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

pub const TITLE_MIN_LENGTH: usize = 1;
pub const TITLE_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

pub const TITLE_REQUIRED: &str = "title should not be empty";
pub const TITLE_NOT_STRING: &str = "title must be a string";
pub const DESCRIPTION_NOT_STRING: &str = "description must be a string";
pub const DUE_DATE_INVALID: &str = "dueDate must be a valid ISO 8601 date string";

/// One or more violated constraints, in field order.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single message, for errors that are not tied to one field.
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    /// `Ok(value)` if nothing was recorded, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

pub fn status_message(field: &str) -> String {
    format!(
        "{field} must be one of the following values: {}",
        TaskStatus::ALL.map(|status| status.as_str()).join(", ")
    )
}

pub fn priority_message(field: &str) -> String {
    format!(
        "{field} must be one of the following values: {}",
        TaskPriority::ALL.map(|priority| priority.as_str()).join(", ")
    )
}

/// Message for a field the payload schema does not know about.
pub fn unknown_property_message(name: &str) -> String {
    format!("property {name} should not exist")
}

/// Checks the title length bounds, counted in characters.
pub fn check_title(title: &str, errors: &mut ValidationErrors) {
    let length = title.chars().count();
    if length < TITLE_MIN_LENGTH {
        errors.push(format!(
            "title must be longer than or equal to {TITLE_MIN_LENGTH} characters"
        ));
    }
    if length > TITLE_MAX_LENGTH {
        errors.push(format!(
            "title must be shorter than or equal to {TITLE_MAX_LENGTH} characters"
        ));
    }
}

pub fn check_description(description: &str, errors: &mut ValidationErrors) {
    if description.chars().count() > DESCRIPTION_MAX_LENGTH {
        errors.push(format!(
            "description must be shorter than or equal to {DESCRIPTION_MAX_LENGTH} characters"
        ));
    }
}

/// Date-time layouts accepted for due dates, extended and basic ISO 8601
/// forms, each with seconds and fractions optional.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Parses an ISO 8601 date-time.
///
/// An offset may be `Z`, `+hh:mm` or `+hhmm`; without one the value is read as
/// UTC. Bare dates are taken as midnight UTC.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    let zoned = match raw.strip_suffix(['Z', 'z']) {
        Some(local) => Some(format!("{local}+00:00")),
        None => raw.contains(['+', '-']).then(|| raw.to_string()),
    };
    if let Some(zoned) = zoned {
        let parsed = DATE_TIME_FORMATS.iter().find_map(|format| {
            DateTime::parse_from_str(&zoned, &format!("{format}%z")).ok()
        });
        if let Some(parsed) = parsed {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    if let Some(naive) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl CreateTaskInput {
    /// Checks the length constraints of an already typed payload.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_title(&self.title, &mut errors);
        if let Some(description) = &self.description {
            check_description(description, &mut errors);
        }
        errors.into_result(())
    }
}

impl UpdateTaskInput {
    /// Checks the length constraints of the fields present in the patch.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = &self.title {
            check_title(title, &mut errors);
        }
        if let Some(Some(description)) = &self.description {
            check_description(description, &mut errors);
        }
        errors.into_result(())
    }
}

impl TaskFilter {
    /// Builds a filter from raw query string pairs.
    ///
    /// Only `status` and `priority` are accepted. Empty values count as absent.
    pub fn from_query_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<TaskFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut filter = TaskFilter::default();
        for (key, value) in pairs {
            match key {
                "status" if value.is_empty() => filter.status = None,
                "status" => match value.parse() {
                    Ok(status) => filter.status = Some(status),
                    Err(_) => errors.push(status_message("status")),
                },
                "priority" if value.is_empty() => filter.priority = None,
                "priority" => match value.parse() {
                    Ok(priority) => filter.priority = Some(priority),
                    Err(_) => errors.push(priority_message("priority")),
                },
                other => errors.push(unknown_property_message(other)),
            }
        }
        errors.into_result(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_title_reports_minimum_length() {
        let err = CreateTaskInput::new("").validate().unwrap_err();
        assert_eq!(
            err.messages(),
            ["title must be longer than or equal to 1 characters"]
        );
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_LENGTH);
        assert!(CreateTaskInput::new(title).validate().is_ok());

        let title = "é".repeat(TITLE_MAX_LENGTH + 1);
        let err = CreateTaskInput::new(title).validate().unwrap_err();
        assert_eq!(
            err.messages(),
            ["title must be shorter than or equal to 100 characters"]
        );
    }

    #[test]
    fn reports_every_violated_field() {
        let input = CreateTaskInput {
            title: String::new(),
            description: Some("x".repeat(DESCRIPTION_MAX_LENGTH + 1)),
            ..Default::default()
        };

        let err = input.validate().unwrap_err();

        assert_eq!(
            err.messages(),
            [
                "title must be longer than or equal to 1 characters",
                "description must be shorter than or equal to 500 characters",
            ]
        );
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert!(UpdateTaskInput::default().validate().is_ok());

        let patch = UpdateTaskInput {
            title: Some(String::new()),
            description: Some(None),
            ..Default::default()
        };
        let err = patch.validate().unwrap_err();
        assert_eq!(err.messages().len(), 1);
    }

    #[test]
    fn parses_rfc3339_due_dates() {
        let parsed = parse_due_date("2025-10-20T00:00:00.000Z");
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap()));

        let parsed = parse_due_date("2025-10-20T02:00:00+02:00");
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap()));
    }

    #[test]
    fn parses_bare_dates_as_midnight_utc() {
        let parsed = parse_due_date("2025-10-20");
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap()));
    }

    #[test]
    fn parses_other_iso_8601_layouts() {
        let ten_utc = Some(Utc.with_ymd_and_hms(2025, 10, 20, 10, 0, 0).unwrap());
        let eight_utc = Some(Utc.with_ymd_and_hms(2025, 10, 20, 8, 0, 0).unwrap());

        assert_eq!(parse_due_date("2025-10-20T10:00Z"), ten_utc);
        assert_eq!(parse_due_date("2025-10-20T10:00"), ten_utc);
        assert_eq!(parse_due_date("2025-10-20T10:00+02:00"), eight_utc);
        assert_eq!(parse_due_date("2025-10-20T10:00:00.000+0200"), eight_utc);
        assert_eq!(parse_due_date("2025-10-20T10:00:00+0200"), eight_utc);
        assert_eq!(parse_due_date("20251020T100000Z"), ten_utc);
        assert_eq!(parse_due_date("20251020T1000+0200"), eight_utc);
        assert_eq!(
            parse_due_date("20251020"),
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_due_date("next tuesday"), None);
        assert_eq!(parse_due_date("2025-13-01"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn builds_filter_from_query_pairs() {
        let filter =
            TaskFilter::from_query_pairs([("status", "done"), ("priority", "high")]).unwrap();
        assert_eq!(filter.status, Some(TaskStatus::Done));
        assert_eq!(filter.priority, Some(TaskPriority::High));
    }

    #[test]
    fn empty_query_values_are_ignored() {
        let filter = TaskFilter::from_query_pairs([("status", ""), ("priority", "")]).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn rejects_unknown_query_parameters_and_values() {
        let err = TaskFilter::from_query_pairs([("status", "finished"), ("page", "2")]).unwrap_err();
        assert_eq!(
            err.messages(),
            [
                "status must be one of the following values: todo, in_progress, done",
                "property page should not exist",
            ]
        );
    }
}
