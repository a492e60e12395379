use crate::entities::{sea_orm_active_enums, task};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::*;
use std::sync::Arc;
use taskboard_core::{CreateTaskInput, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTaskInput};
use uuid::Uuid;

pub mod api;

pub use api::create_task_router;

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// No live row has the given ID.
    #[error("Task with ID {0} not found")]
    TaskNotFound(Uuid),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

impl From<TaskStatus> for sea_orm_active_enums::TaskStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Todo => Self::Todo,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Done => Self::Done,
        }
    }
}

impl From<sea_orm_active_enums::TaskStatus> for TaskStatus {
    fn from(status: sea_orm_active_enums::TaskStatus) -> Self {
        match status {
            sea_orm_active_enums::TaskStatus::Todo => TaskStatus::Todo,
            sea_orm_active_enums::TaskStatus::InProgress => TaskStatus::InProgress,
            sea_orm_active_enums::TaskStatus::Done => TaskStatus::Done,
        }
    }
}

impl From<TaskPriority> for sea_orm_active_enums::TaskPriority {
    fn from(priority: TaskPriority) -> Self {
        match priority {
            TaskPriority::Low => Self::Low,
            TaskPriority::Medium => Self::Medium,
            TaskPriority::High => Self::High,
        }
    }
}

impl From<sea_orm_active_enums::TaskPriority> for TaskPriority {
    fn from(priority: sea_orm_active_enums::TaskPriority) -> Self {
        match priority {
            sea_orm_active_enums::TaskPriority::Low => TaskPriority::Low,
            sea_orm_active_enums::TaskPriority::Medium => TaskPriority::Medium,
            sea_orm_active_enums::TaskPriority::High => TaskPriority::High,
        }
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status.into(),
            priority: model.priority.into(),
            due_date: model.due_date.map(|due_date| due_date.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Current time at the precision the database stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Creates a new task.
    ///
    /// Missing status and priority fall back to `todo` and `medium`. `created_at`
    /// and `updated_at` start out equal.
    ///
    /// # Arguments
    ///
    /// * `input` - The validated create payload.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Task, TaskServiceError> {
        let created_at = now();
        let active_model = task::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            title: ActiveValue::Set(input.title.clone()),
            description: ActiveValue::Set(input.description.clone()),
            status: ActiveValue::Set(input.status_or_default().into()),
            priority: ActiveValue::Set(input.priority_or_default().into()),
            due_date: ActiveValue::Set(input.due_date.map(|due_date| due_date.fixed_offset())),
            created_at: ActiveValue::Set(created_at.fixed_offset()),
            updated_at: ActiveValue::Set(created_at.fixed_offset()),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Task::from(created_model))
    }

    /// Lists tasks matching every clause of `filter`, newest first.
    ///
    /// Rows created at the same instant come back in reverse insertion order.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskServiceError> {
        let mut query = task::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(
                task::Column::Status.eq(sea_orm_active_enums::TaskStatus::from(status)),
            );
        }
        if let Some(priority) = filter.priority {
            query = query.filter(
                task::Column::Priority.eq(sea_orm_active_enums::TaskPriority::from(priority)),
            );
        }

        let tasks = query
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Seq)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: Uuid) -> Result<Task, TaskServiceError> {
        let model = self.find_model(id).await?;
        Ok(Task::from(model))
    }

    /// Applies a partial update to a task.
    ///
    /// The stored row is read first so a missing ID is reported before anything
    /// is written. Fields absent from `patch` keep their values. Every call moves
    /// `updated_at` forward, even an empty patch.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to update.
    /// * `patch` - The validated partial payload.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task_by_id(
        &self,
        id: Uuid,
        patch: UpdateTaskInput,
    ) -> Result<Task, TaskServiceError> {
        let current = Task::from(self.find_model(id).await?);
        let merged = current.merged(&patch);
        let updated_at = now().max(current.updated_at);

        let active_model = task::ActiveModel {
            id: ActiveValue::Unchanged(id),
            title: ActiveValue::Set(merged.title),
            description: ActiveValue::Set(merged.description),
            status: ActiveValue::Set(merged.status.into()),
            priority: ActiveValue::Set(merged.priority.into()),
            due_date: ActiveValue::Set(merged.due_date.map(|due_date| due_date.fixed_offset())),
            updated_at: ActiveValue::Set(updated_at.fixed_offset()),
            ..Default::default()
        };
        let updated_model = active_model.update(self.db).await.map_err(|err| match err {
            // Deleted between the read and the write.
            DbErr::RecordNotUpdated => TaskServiceError::TaskNotFound(id),
            other => TaskServiceError::Database(other),
        })?;

        Ok(Task::from(updated_model))
    }

    /// Permanently deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: Uuid) -> Result<Task, TaskServiceError> {
        let task_to_delete = self.find_model(id).await?;
        let deleted = Task::from(task_to_delete);

        let result = task::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound(id));
        }
        Ok(deleted)
    }

    async fn find_model(&self, id: Uuid) -> Result<task::Model, TaskServiceError> {
        task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }
}
