//! Create/edit form model.
//!
//! The form holds raw user input. Converting it into an API payload runs the
//! same checks the server runs, so obvious mistakes never leave the client.

use chrono::{DateTime, NaiveDate, Utc};
use taskboard_core::validation::DUE_DATE_INVALID;
use taskboard_core::{
    CreateTaskInput, Task, TaskPriority, TaskStatus, UpdateTaskInput, ValidationErrors,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// `YYYY-MM-DD`, or empty for no due date.
    pub due_date: String,
}

impl TaskForm {
    /// An empty form with default status and priority.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled from an existing task. The due date shows its date part.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            due_date: task
                .due_date
                .map(|due_date| due_date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    fn trimmed_description(&self) -> Option<String> {
        let description = self.description.trim();
        (!description.is_empty()).then(|| description.to_string())
    }

    /// Parses the due date field as midnight UTC. Empty means no due date.
    fn parsed_due_date(&self, errors: &mut ValidationErrors) -> Option<DateTime<Utc>> {
        let raw = self.due_date.trim();
        if raw.is_empty() {
            return None;
        }
        let parsed = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
        if parsed.is_none() {
            errors.push(DUE_DATE_INVALID);
        }
        parsed
    }

    /// Payload for creating a task. Empty description and due date are omitted.
    pub fn to_create_input(&self) -> Result<CreateTaskInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let due_date = self.parsed_due_date(&mut errors);
        let input = CreateTaskInput {
            title: self.title.clone(),
            description: self.trimmed_description(),
            status: Some(self.status),
            priority: Some(self.priority),
            due_date,
        };
        if let Err(invalid) = input.validate() {
            for message in invalid.into_messages() {
                errors.push(message);
            }
        }
        errors.into_result(input)
    }

    /// Payload for editing a task. Every field is sent; an emptied description
    /// or due date clears the stored value.
    pub fn to_update_input(&self) -> Result<UpdateTaskInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let due_date = self.parsed_due_date(&mut errors);
        let patch = UpdateTaskInput {
            title: Some(self.title.clone()),
            description: Some(self.trimmed_description()),
            status: Some(self.status),
            priority: Some(self.priority),
            due_date: Some(due_date),
        };
        if let Err(invalid) = patch.validate() {
            for message in invalid.into_messages() {
                errors.push(message);
            }
        }
        errors.into_result(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn converts_due_date_to_midnight_utc() {
        let form = TaskForm {
            title: "Ship".to_string(),
            due_date: "2025-12-31".to_string(),
            ..TaskForm::new()
        };

        let input = form.to_create_input().unwrap();

        assert_eq!(
            input.due_date,
            Some(Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap())
        );
        assert_eq!(input.status, Some(TaskStatus::Todo));
        assert_eq!(input.priority, Some(TaskPriority::Medium));
    }

    #[test]
    fn omits_blank_optional_fields_on_create() {
        let form = TaskForm {
            title: "Ship".to_string(),
            description: "   ".to_string(),
            ..TaskForm::new()
        };

        let input = form.to_create_input().unwrap();

        assert_eq!(input.description, None);
        assert_eq!(input.due_date, None);
    }

    #[test]
    fn trims_description() {
        let form = TaskForm {
            title: "Ship".to_string(),
            description: "  tag and publish \n".to_string(),
            ..TaskForm::new()
        };
        let input = form.to_create_input().unwrap();
        assert_eq!(input.description.as_deref(), Some("tag and publish"));
    }

    #[test]
    fn collects_every_error() {
        let form = TaskForm {
            title: String::new(),
            due_date: "31/12/2025".to_string(),
            ..TaskForm::new()
        };

        let err = form.to_create_input().unwrap_err();

        assert_eq!(
            err.messages(),
            [
                "dueDate must be a valid ISO 8601 date string",
                "title must be longer than or equal to 1 characters",
            ]
        );
    }

    #[test]
    fn prefills_from_task_and_clears_on_edit() {
        let task = Task {
            id: Uuid::nil(),
            title: "Write report".to_string(),
            description: Some("Numbers".to_string()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(Utc.with_ymd_and_hms(2025, 3, 4, 15, 30, 0).unwrap()),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        };

        let mut form = TaskForm::from_task(&task);
        assert_eq!(form.title, "Write report");
        assert_eq!(form.description, "Numbers");
        assert_eq!(form.due_date, "2025-03-04");
        assert_eq!(form.status, TaskStatus::InProgress);

        form.description.clear();
        form.due_date.clear();
        let patch = form.to_update_input().unwrap();

        assert_eq!(patch.title.as_deref(), Some("Write report"));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.priority, Some(TaskPriority::High));
    }
}
