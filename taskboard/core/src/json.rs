//! Validating conversion from untyped JSON bodies into task inputs.
//!
//! Deserializing straight into the typed structs would stop at the first bad
//! field. Walking the object by hand lets every problem be reported together.
use crate::task::{CreateTaskInput, TaskPriority, TaskStatus, UpdateTaskInput};
use crate::validation::{
    self, DESCRIPTION_NOT_STRING, DUE_DATE_INVALID, TITLE_NOT_STRING, TITLE_REQUIRED,
    ValidationErrors,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

const KNOWN_FIELDS: [&str; 5] = ["title", "description", "status", "priority", "dueDate"];

fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    value
        .as_object()
        .ok_or_else(|| ValidationErrors::single("request body must be a JSON object"))
}

fn reject_unknown_fields(fields: &Map<String, Value>, errors: &mut ValidationErrors) {
    for name in fields.keys() {
        if !KNOWN_FIELDS.contains(&name.as_str()) {
            errors.push(validation::unknown_property_message(name));
        }
    }
}

fn title(value: &Value, errors: &mut ValidationErrors) -> Option<String> {
    match value {
        Value::Null => {
            errors.push(TITLE_REQUIRED);
            None
        }
        Value::String(title) => {
            validation::check_title(title, errors);
            Some(title.clone())
        }
        _ => {
            errors.push(TITLE_NOT_STRING);
            None
        }
    }
}

fn description(value: &Value, errors: &mut ValidationErrors) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(description) => {
            validation::check_description(description, errors);
            Some(Some(description.clone()))
        }
        _ => {
            errors.push(DESCRIPTION_NOT_STRING);
            None
        }
    }
}

fn status(value: &Value, errors: &mut ValidationErrors) -> Option<TaskStatus> {
    let parsed = value.as_str().and_then(|raw| raw.parse().ok());
    if parsed.is_none() {
        errors.push(validation::status_message("status"));
    }
    parsed
}

fn priority(value: &Value, errors: &mut ValidationErrors) -> Option<TaskPriority> {
    let parsed = value.as_str().and_then(|raw| raw.parse().ok());
    if parsed.is_none() {
        errors.push(validation::priority_message("priority"));
    }
    parsed
}

fn due_date(value: &Value, errors: &mut ValidationErrors) -> Option<Option<DateTime<Utc>>> {
    match value {
        Value::Null => Some(None),
        Value::String(raw) => match validation::parse_due_date(raw) {
            Some(parsed) => Some(Some(parsed)),
            None => {
                errors.push(DUE_DATE_INVALID);
                None
            }
        },
        _ => {
            errors.push(DUE_DATE_INVALID);
            None
        }
    }
}

impl CreateTaskInput {
    /// Validates a JSON body and converts it into a create payload.
    ///
    /// `null` for `description` or `dueDate` is treated as absent.
    pub fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let fields = as_object(value)?;
        let mut errors = ValidationErrors::new();
        reject_unknown_fields(fields, &mut errors);

        let title = match fields.get("title") {
            Some(value) => title(value, &mut errors),
            None => {
                errors.push(TITLE_REQUIRED);
                None
            }
        };
        let description = fields
            .get("description")
            .and_then(|value| description(value, &mut errors))
            .flatten();
        let status = fields
            .get("status")
            .and_then(|value| status(value, &mut errors));
        let priority = fields
            .get("priority")
            .and_then(|value| priority(value, &mut errors));
        let due_date = fields
            .get("dueDate")
            .and_then(|value| due_date(value, &mut errors))
            .flatten();

        match title {
            Some(title) if errors.is_empty() => Ok(CreateTaskInput {
                title,
                description,
                status,
                priority,
                due_date,
            }),
            _ => Err(errors),
        }
    }
}

impl UpdateTaskInput {
    /// Validates a JSON body and converts it into a partial update.
    ///
    /// `null` clears `description` and `dueDate`; it is rejected for the
    /// fields that can never be empty.
    pub fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let fields = as_object(value)?;
        let mut errors = ValidationErrors::new();
        reject_unknown_fields(fields, &mut errors);

        let patch = UpdateTaskInput {
            title: fields
                .get("title")
                .and_then(|value| title(value, &mut errors)),
            description: fields
                .get("description")
                .and_then(|value| description(value, &mut errors)),
            status: fields
                .get("status")
                .and_then(|value| status(value, &mut errors)),
            priority: fields
                .get("priority")
                .and_then(|value| priority(value, &mut errors)),
            due_date: fields
                .get("dueDate")
                .and_then(|value| due_date(value, &mut errors)),
        };
        errors.into_result(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn minimal_create_body_uses_defaults() {
        let input = CreateTaskInput::from_json(&json!({ "title": "Write docs" })).unwrap();
        assert_eq!(input, CreateTaskInput::new("Write docs"));
        assert_eq!(input.status_or_default(), TaskStatus::Todo);
        assert_eq!(input.priority_or_default(), TaskPriority::Medium);
    }

    #[test]
    fn full_create_body_is_converted() {
        let input = CreateTaskInput::from_json(&json!({
            "title": "Implement JWT auth",
            "description": "guards and strategy",
            "status": "in_progress",
            "priority": "high",
            "dueDate": "2025-10-20T00:00:00.000Z",
        }))
        .unwrap();

        assert_eq!(input.status, Some(TaskStatus::InProgress));
        assert_eq!(input.priority, Some(TaskPriority::High));
        assert_eq!(input.description.as_deref(), Some("guards and strategy"));
        assert_eq!(
            input.due_date,
            Some(Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn missing_title_is_rejected() {
        let err = CreateTaskInput::from_json(&json!({ "priority": "low" })).unwrap_err();
        assert_eq!(err.messages(), [TITLE_REQUIRED]);
    }

    #[test]
    fn collects_every_violation_in_one_pass() {
        let err = CreateTaskInput::from_json(&json!({
            "title": 42,
            "description": "x".repeat(501),
            "status": "finished",
            "priority": "urgent",
            "dueDate": "tomorrow",
            "owner": "alice",
        }))
        .unwrap_err();

        assert_eq!(
            err.messages(),
            [
                "property owner should not exist",
                "title must be a string",
                "description must be shorter than or equal to 500 characters",
                "status must be one of the following values: todo, in_progress, done",
                "priority must be one of the following values: low, medium, high",
                "dueDate must be a valid ISO 8601 date string",
            ]
        );
    }

    #[test]
    fn null_optional_fields_are_absent_on_create() {
        let input = CreateTaskInput::from_json(&json!({
            "title": "t",
            "description": null,
            "dueDate": null,
        }))
        .unwrap();
        assert_eq!(input.description, None);
        assert_eq!(input.due_date, None);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = CreateTaskInput::from_json(&json!(["title"])).unwrap_err();
        assert_eq!(err.messages(), ["request body must be a JSON object"]);
    }

    #[test]
    fn empty_patch_is_valid() {
        let patch = UpdateTaskInput::from_json(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let patch = UpdateTaskInput::from_json(&json!({ "description": null })).unwrap();
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.due_date, None);
    }

    #[test]
    fn patch_rejects_null_for_required_columns() {
        let err = UpdateTaskInput::from_json(&json!({
            "title": null,
            "status": null,
            "priority": null,
        }))
        .unwrap_err();
        assert_eq!(err.messages().len(), 3);
    }

    #[test]
    fn patch_rejects_empty_title() {
        let err = UpdateTaskInput::from_json(&json!({ "title": "" })).unwrap_err();
        assert_eq!(
            err.messages(),
            ["title must be longer than or equal to 1 characters"]
        );
    }

    #[test]
    fn task_serializes_with_wire_names() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let task = crate::Task {
            id: uuid::Uuid::nil(),
            title: "Write docs".to_string(),
            description: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: created,
            updated_at: created,
        };

        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "title": "Write docs",
                "description": null,
                "status": "in_progress",
                "priority": "medium",
                "dueDate": null,
                "createdAt": "2025-01-01T09:00:00Z",
                "updatedAt": "2025-01-01T09:00:00Z",
            })
        );
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = UpdateTaskInput {
            priority: Some(TaskPriority::High),
            due_date: Some(None),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "priority": "high", "dueDate": null })
        );
    }
}
