//! Board view state.
//!
//! # Responsibility
//! - Hold the visible task list, the new-task form draft and the load phase.
//! - Turn user actions (load, submit, toggle, delete) into backend calls.
//!
//! # Invariants
//! - Phase moves `Loading` -> `Loaded` exactly once, on the first `load`,
//!   whether or not the request succeeds.
//! - Tasks are only inserted, replaced or removed after a successful
//!   response; a failed action leaves the board untouched.
//! - Title and description drafts are independent fields.

use crate::api::{ClientError, ClientResult, TaskBackend};
use log::{error, info};
use taskboard_core::{NewTask, Task, TaskId, TaskPatch};

pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No tasks yet. Create your first task above!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Loaded,
}

/// New-task form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
}

impl Draft {
    fn to_new_task(&self) -> NewTask {
        let description = Some(self.description.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        NewTask::new(self.title.trim(), description)
    }
}

pub struct TaskBoard<B: TaskBackend> {
    backend: B,
    tasks: Vec<Task>,
    draft: Draft,
    phase: LoadPhase,
}

impl<B: TaskBackend> TaskBoard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            tasks: Vec::new(),
            draft: Draft::default(),
            phase: LoadPhase::Loading,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Fetches the task list. Called once when the board is shown.
    pub async fn load(&mut self) -> ClientResult<()> {
        let result = self.backend.list_tasks().await;
        self.phase = LoadPhase::Loaded;
        match result {
            Ok(tasks) => {
                info!(
                    "event=board_load module=client status=ok count={}",
                    tasks.len()
                );
                self.tasks = tasks;
                Ok(())
            }
            Err(err) => Err(log_failure("board_load", err)),
        }
    }

    /// Creates a task from the draft and puts it at the top of the list.
    ///
    /// Returns `Ok(None)` without any request when the draft title is blank.
    /// The draft is cleared only on success.
    pub async fn submit(&mut self) -> ClientResult<Option<TaskId>> {
        if self.draft.title.trim().is_empty() {
            return Ok(None);
        }

        let input = self.draft.to_new_task();
        match self.backend.create_task(&input).await {
            Ok(task) => {
                let id = task.id;
                self.tasks.insert(0, task);
                self.draft = Draft::default();
                Ok(Some(id))
            }
            Err(err) => Err(log_failure("board_submit", err)),
        }
    }

    /// Flips `completed` of a listed task and stores the server's copy.
    pub async fn toggle(&mut self, id: TaskId) -> ClientResult<()> {
        let Some(current) = self.tasks.iter().find(|task| task.id == id) else {
            return Err(log_failure("board_toggle", ClientError::NotInView(id)));
        };
        let patch = TaskPatch::completed(!current.completed);

        match self.backend.update_task(id, &patch).await {
            Ok(updated) => {
                // The entry may have been removed while the request was in flight.
                if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) {
                    *slot = updated;
                }
                Ok(())
            }
            Err(err) => Err(log_failure("board_toggle", err)),
        }
    }

    /// Deletes a task on the server, then drops it from the list.
    pub async fn delete(&mut self, id: TaskId) -> ClientResult<()> {
        match self.backend.delete_task(id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                Ok(())
            }
            Err(err) => Err(log_failure("board_delete", err)),
        }
    }

    /// Plain-text rendering of the current view.
    pub fn render(&self) -> String {
        if self.phase == LoadPhase::Loading {
            return LOADING_TEXT.to_string();
        }
        if self.tasks.is_empty() {
            return EMPTY_TEXT.to_string();
        }

        let mut out = String::new();
        for task in &self.tasks {
            let mark = if task.completed { 'x' } else { ' ' };
            out.push_str(&format!("[{mark}] {}  ({})\n", task.title, task.id));
            if let Some(description) = task.description.as_deref() {
                out.push_str(&format!("    {description}\n"));
            }
            out.push_str(&format!(
                "    Created: {}\n",
                task.created_at.format("%Y-%m-%d")
            ));
        }
        out
    }
}

fn log_failure(event: &str, err: ClientError) -> ClientError {
    error!("event={event} module=client status=error error={err}");
    err
}

#[cfg(test)]
mod tests {
    use super::{LoadPhase, TaskBoard, EMPTY_TEXT, LOADING_TEXT};
    use crate::api::{ClientError, ClientResult, TaskBackend};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use taskboard_core::{NewTask, Task, TaskId, TaskPatch};

    #[derive(Default)]
    struct FakeBackend {
        tasks: Mutex<Vec<Task>>,
        fail: Mutex<bool>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeBackend {
        fn failing() -> Self {
            let backend = Self::default();
            *backend.fail.lock().unwrap() = true;
            backend
        }

        fn with_tasks(tasks: Vec<Task>) -> Self {
            let backend = Self::default();
            *backend.tasks.lock().unwrap() = tasks;
            backend
        }

        fn record(&self, call: &'static str) -> ClientResult<()> {
            self.calls.lock().unwrap().push(call);
            if *self.fail.lock().unwrap() {
                return Err(ClientError::Status {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskBackend for FakeBackend {
        async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
            self.record("list")?;
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn get_task(&self, id: TaskId) -> ClientResult<Task> {
            self.record("get")?;
            self.tasks
                .lock()
                .unwrap()
                .iter()
                .find(|task| task.id == id)
                .cloned()
                .ok_or(ClientError::Status {
                    status: 404,
                    message: "Task not found".to_string(),
                })
        }

        async fn create_task(&self, input: &NewTask) -> ClientResult<Task> {
            self.record("create")?;
            let task = Task::new(&input.title, input.description.as_deref()).unwrap();
            self.tasks.lock().unwrap().insert(0, task.clone());
            Ok(task)
        }

        async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ClientResult<Task> {
            self.record("update")?;
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks.iter_mut().find(|task| task.id == id).unwrap();
            task.apply(patch, chrono::Utc::now()).unwrap();
            Ok(task.clone())
        }

        async fn delete_task(&self, id: TaskId) -> ClientResult<()> {
            self.record("delete")?;
            self.tasks.lock().unwrap().retain(|task| task.id != id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn load_populates_tasks_and_finishes_loading() {
        let seeded = vec![Task::new("b", None).unwrap(), Task::new("a", None).unwrap()];
        let mut board = TaskBoard::new(FakeBackend::with_tasks(seeded.clone()));
        assert_eq!(board.phase(), LoadPhase::Loading);
        assert_eq!(board.render(), LOADING_TEXT);

        board.load().await.unwrap();
        assert_eq!(board.phase(), LoadPhase::Loaded);
        assert_eq!(board.tasks(), seeded.as_slice());
    }

    #[tokio::test]
    async fn failed_load_still_finishes_loading_with_empty_list() {
        let mut board = TaskBoard::new(FakeBackend::failing());

        let err = board.load().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(board.phase(), LoadPhase::Loaded);
        assert!(board.tasks().is_empty());
        assert_eq!(board.render(), EMPTY_TEXT);
    }

    #[tokio::test]
    async fn submit_with_blank_title_sends_nothing() {
        let mut board = TaskBoard::new(FakeBackend::default());
        board.load().await.unwrap();
        board.set_title("   ");
        board.set_description("ignored");

        assert_eq!(board.submit().await.unwrap(), None);
        assert_eq!(board.backend.calls(), vec!["list"]);
        assert_eq!(board.draft().description, "ignored");
    }

    #[tokio::test]
    async fn submit_prepends_created_task_and_clears_draft() {
        let existing = Task::new("existing", None).unwrap();
        let mut board = TaskBoard::new(FakeBackend::with_tasks(vec![existing.clone()]));
        board.load().await.unwrap();

        board.set_title("write report");
        board.set_description("quarterly numbers");
        let id = board.submit().await.unwrap().unwrap();

        assert_eq!(board.tasks().len(), 2);
        assert_eq!(board.tasks()[0].id, id);
        assert_eq!(board.tasks()[0].title, "write report");
        assert_eq!(
            board.tasks()[0].description.as_deref(),
            Some("quarterly numbers")
        );
        assert_eq!(board.tasks()[1], existing);
        assert_eq!(board.draft(), &super::Draft::default());
    }

    #[tokio::test]
    async fn failed_submit_keeps_list_and_draft() {
        let mut board = TaskBoard::new(FakeBackend::default());
        board.load().await.unwrap();
        board.backend.set_failing(true);
        board.set_title("will fail");

        assert!(board.submit().await.is_err());
        assert!(board.tasks().is_empty());
        assert_eq!(board.draft().title, "will fail");
    }

    #[tokio::test]
    async fn toggle_replaces_entry_with_server_copy() {
        let task = Task::new("flip", None).unwrap();
        let mut board = TaskBoard::new(FakeBackend::with_tasks(vec![task.clone()]));
        board.load().await.unwrap();

        board.toggle(task.id).await.unwrap();
        assert!(board.tasks()[0].completed);
        board.toggle(task.id).await.unwrap();
        assert!(!board.tasks()[0].completed);
    }

    #[tokio::test]
    async fn failed_toggle_and_delete_leave_state_unchanged() {
        let task = Task::new("stay", None).unwrap();
        let mut board = TaskBoard::new(FakeBackend::with_tasks(vec![task.clone()]));
        board.load().await.unwrap();
        board.backend.set_failing(true);

        assert!(board.toggle(task.id).await.is_err());
        assert!(board.delete(task.id).await.is_err());
        assert_eq!(board.tasks(), &[task]);
    }

    #[tokio::test]
    async fn toggle_unknown_task_sends_nothing() {
        let mut board = TaskBoard::new(FakeBackend::default());
        board.load().await.unwrap();

        let missing = uuid::Uuid::new_v4();
        let err = board.toggle(missing).await.unwrap_err();
        assert!(matches!(err, ClientError::NotInView(id) if id == missing));
        assert_eq!(board.backend.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let keep = Task::new("keep", None).unwrap();
        let gone = Task::new("gone", None).unwrap();
        let mut board = TaskBoard::new(FakeBackend::with_tasks(vec![gone.clone(), keep.clone()]));
        board.load().await.unwrap();

        board.delete(gone.id).await.unwrap();
        assert_eq!(board.tasks(), &[keep]);
    }

    #[tokio::test]
    async fn render_lists_titles_descriptions_and_completion() {
        let mut done = Task::new("done thing", Some("with notes")).unwrap();
        done.completed = true;
        let open = Task::new("open thing", None).unwrap();
        let mut board = TaskBoard::new(FakeBackend::with_tasks(vec![done.clone(), open]));
        board.load().await.unwrap();

        let text = board.render();
        assert!(text.contains("[x] done thing"));
        assert!(text.contains("    with notes"));
        assert!(text.contains("[ ] open thing"));
        assert!(text.contains(&format!(
            "Created: {}",
            done.created_at.format("%Y-%m-%d")
        )));
    }
}
