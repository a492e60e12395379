use std::collections::HashMap;
use taskboard_core::{Task, TaskFilter};

/// Task lists fetched so far, one entry per filter.
#[derive(Debug, Default)]
pub struct TaskCache {
    entries: HashMap<TaskFilter, Vec<Task>>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filter: &TaskFilter) -> Option<&Vec<Task>> {
        self.entries.get(filter)
    }

    pub fn insert(&mut self, filter: TaskFilter, tasks: Vec<Task>) {
        self.entries.insert(filter, tasks);
    }

    /// Drops every entry. Any mutation can change any filtered view.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
