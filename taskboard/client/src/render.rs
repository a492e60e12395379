//! Plain-text views of the board for the terminal.

use crate::board::ListState;
use std::fmt::Write;
use taskboard_core::Task;

pub const LOADING: &str = "Loading tasks...";
pub const EMPTY_TITLE: &str = "No tasks";
pub const EMPTY_HINT: &str = "Start by creating a new task";

fn count_line(count: usize) -> String {
    match count {
        1 => "1 task".to_string(),
        n => format!("{n} tasks"),
    }
}

/// One task as a card: title with badges, then details on indented lines.
pub fn render_task(task: &Task) -> String {
    let mut card = format!(
        "{} [{}] [{}]\n",
        task.title,
        task.status.label(),
        task.priority.label()
    );
    if let Some(description) = &task.description {
        let _ = writeln!(card, "  {description}");
    }
    if let Some(due_date) = task.due_date {
        let _ = writeln!(card, "  Due {}", due_date.format("%Y-%m-%d"));
    }
    let _ = writeln!(card, "  Created {}", task.created_at.format("%Y-%m-%d %H:%M"));
    let _ = writeln!(card, "  {}", task.id);
    card
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return format!("{EMPTY_TITLE}\n{EMPTY_HINT}\n");
    }
    let cards: Vec<String> = tasks.iter().map(render_task).collect();
    format!("{}\n\n{}", count_line(tasks.len()), cards.join("\n"))
}

/// An error banner listing every message.
pub fn render_error(messages: &[String]) -> String {
    let mut banner = String::from("Error\n");
    for message in messages {
        let _ = writeln!(banner, "  {message}");
    }
    banner
}

pub fn render_list(state: &ListState) -> String {
    match state {
        ListState::Loading => format!("{LOADING}\n"),
        ListState::Loaded(tasks) => render_tasks(tasks),
        ListState::Failed(messages) => render_error(messages),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;
    use taskboard_core::{TaskPriority, TaskStatus};
    use uuid::Uuid;

    fn task() -> Task {
        Task {
            id: Uuid::nil(),
            title: "Write report".to_string(),
            description: Some("Quarterly numbers".to_string()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap()),
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn renders_card_with_badges_and_dates() {
        assert_snapshot!(render_task(&task()), @r"
        Write report [In progress] [High]
          Quarterly numbers
          Due 2025-12-31
          Created 2025-01-02 09:30
          00000000-0000-0000-0000-000000000000
        ");
    }

    #[test]
    fn renders_count_line_before_cards() {
        let minimal = Task {
            title: "Call back".to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Low,
            due_date: None,
            ..task()
        };

        assert_snapshot!(render_tasks(&[task(), minimal]), @r"
        2 tasks

        Write report [In progress] [High]
          Quarterly numbers
          Due 2025-12-31
          Created 2025-01-02 09:30
          00000000-0000-0000-0000-000000000000

        Call back [To do] [Low]
          Created 2025-01-02 09:30
          00000000-0000-0000-0000-000000000000
        ");
    }

    #[test]
    fn renders_empty_state() {
        assert_snapshot!(render_list(&ListState::Loaded(vec![])), @r"
        No tasks
        Start by creating a new task
        ");
    }

    #[test]
    fn renders_loading_and_error_states() {
        assert_eq!(render_list(&ListState::Loading), "Loading tasks...\n");
        assert_snapshot!(
            render_list(&ListState::Failed(vec!["Request failed with status 502".to_string()])),
            @r"
        Error
          Request failed with status 502
        "
        );
    }

    #[test]
    fn lists_every_message_of_a_failed_load() {
        let messages = vec![
            "title should not be empty".to_string(),
            "priority must be one of the following values: LOW, MEDIUM, HIGH".to_string(),
        ];
        assert_snapshot!(render_list(&ListState::Failed(messages)), @r"
        Error
          title should not be empty
          priority must be one of the following values: LOW, MEDIUM, HIGH
        ");
    }

    #[test]
    fn singular_count() {
        assert!(render_tasks(&[task()]).starts_with("1 task\n"));
    }
}
