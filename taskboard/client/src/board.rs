//! State behind the task board views.
//!
//! The board owns the active filter, the cached lists, the form mode and the
//! pending delete confirmation. Reads are retried once; mutations are sent at
//! most once and a second submit is refused while one is in flight. After any
//! successful mutation every cached list is dropped and the active one is
//! fetched again.

use crate::api::{ApiError, TaskApi};
use crate::cache::TaskCache;
use crate::form::TaskForm;
use std::sync::{Mutex, MutexGuard, PoisonError};
use taskboard_core::{Task, TaskFilter, ValidationErrors};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("Another change is still being saved")]
    MutationPending,
    #[error("The task form is not open")]
    FormClosed,
    #[error("No delete is waiting for confirmation")]
    NoPendingDelete,
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl BoardError {
    /// Messages to show next to the form or in the error banner.
    pub fn messages(&self) -> Vec<String> {
        match self {
            BoardError::Invalid(errors) => errors.messages().to_vec(),
            BoardError::Api(err) => err.messages(),
            other => vec![other.to_string()],
        }
    }
}

/// What the list view currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Task>),
    /// The messages of the last error, as the server sent them.
    Failed(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Creating,
    Editing(Task),
}

#[derive(Debug)]
struct BoardState {
    filter: TaskFilter,
    cache: TaskCache,
    list: ListState,
    form: FormMode,
    mutation_pending: bool,
    pending_delete: Option<Uuid>,
}

/// Clears the pending-mutation flag when the mutation ends, however it ends.
struct MutationGuard<'a, A: TaskApi> {
    board: &'a TaskBoard<A>,
}

impl<A: TaskApi> Drop for MutationGuard<'_, A> {
    fn drop(&mut self) {
        self.board.state().mutation_pending = false;
    }
}

pub struct TaskBoard<A: TaskApi> {
    api: A,
    state: Mutex<BoardState>,
}

impl<A: TaskApi> TaskBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(BoardState {
                filter: TaskFilter::default(),
                cache: TaskCache::new(),
                list: ListState::Loading,
                form: FormMode::Closed,
                mutation_pending: false,
                pending_delete: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn filter(&self) -> TaskFilter {
        self.state().filter
    }

    pub fn list_state(&self) -> ListState {
        self.state().list.clone()
    }

    pub fn form_mode(&self) -> FormMode {
        self.state().form.clone()
    }

    pub fn is_mutation_pending(&self) -> bool {
        self.state().mutation_pending
    }

    pub fn pending_delete(&self) -> Option<Uuid> {
        self.state().pending_delete
    }

    /// Switches to `filter` and fetches its list.
    ///
    /// A list cached for the filter is shown right away while the fetch runs.
    pub async fn set_filter(&self, filter: TaskFilter) -> ListState {
        {
            let mut state = self.state();
            state.filter = filter;
            state.list = match state.cache.get(&filter) {
                Some(tasks) => ListState::Loaded(tasks.clone()),
                None => ListState::Loading,
            };
        }
        self.refresh().await
    }

    /// Fetches the list for the active filter.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> ListState {
        let filter = self.filter();
        let result = self.read(|| self.api.list_tasks(filter)).await;

        let mut state = self.state();
        // The filter may have moved on while the fetch was in flight.
        if state.filter != filter {
            if let Ok(tasks) = result {
                state.cache.insert(filter, tasks);
            }
            return state.list.clone();
        }
        state.list = match result {
            Ok(tasks) => {
                state.cache.insert(filter, tasks.clone());
                ListState::Loaded(tasks)
            }
            Err(err) => ListState::Failed(err.messages()),
        };
        state.list.clone()
    }

    /// Fetches a single task.
    pub async fn fetch_task(&self, id: Uuid) -> Result<Task, BoardError> {
        Ok(self.read(|| self.api.get_task(id)).await?)
    }

    /// Runs a read, retrying it once if it fails.
    async fn read<T, F, Fut>(&self, call: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match call().await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!("Read failed, retrying once: {}", err);
                call().await
            }
        }
    }

    pub fn open_create_form(&self) {
        self.state().form = FormMode::Creating;
    }

    pub fn open_edit_form(&self, task: Task) {
        self.state().form = FormMode::Editing(task);
    }

    pub fn close_form(&self) {
        self.state().form = FormMode::Closed;
    }

    fn begin_mutation(&self) -> Result<MutationGuard<'_, A>, BoardError> {
        let mut state = self.state();
        if state.mutation_pending {
            return Err(BoardError::MutationPending);
        }
        state.mutation_pending = true;
        Ok(MutationGuard { board: self })
    }

    /// Submits the open form as a create or an edit.
    ///
    /// The form closes on success and stays open on failure.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&self, form: &TaskForm) -> Result<Task, BoardError> {
        let mode = self.form_mode();
        let task = match mode {
            FormMode::Closed => return Err(BoardError::FormClosed),
            FormMode::Creating => {
                let input = form.to_create_input()?;
                let _guard = self.begin_mutation()?;
                self.api.create_task(input).await?
            }
            FormMode::Editing(current) => {
                let patch = form.to_update_input()?;
                let _guard = self.begin_mutation()?;
                self.api.update_task(current.id, patch).await?
            }
        };
        tracing::info!("Saved task {}", task.id);

        self.close_form();
        self.invalidate_and_refresh().await;
        Ok(task)
    }

    /// Asks for confirmation before deleting `id`.
    pub fn request_delete(&self, id: Uuid) {
        self.state().pending_delete = Some(id);
    }

    pub fn cancel_delete(&self) {
        self.state().pending_delete = None;
    }

    /// Deletes the task waiting for confirmation.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_delete(&self) -> Result<Uuid, BoardError> {
        let id = self.pending_delete().ok_or(BoardError::NoPendingDelete)?;
        {
            let _guard = self.begin_mutation()?;
            self.api.delete_task(id).await?;
        }
        tracing::info!("Deleted task {}", id);

        self.cancel_delete();
        self.invalidate_and_refresh().await;
        Ok(id)
    }

    async fn invalidate_and_refresh(&self) {
        self.state().cache.invalidate_all();
        self.refresh().await;
    }
}
