//! Task use-case service.
//!
//! # Responsibility
//! - Provide the five task operations (list/get/create/update/delete).
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Missing records surface as `RepoError::NotFound`, never as `None`.
//! - Log events carry ids and durations only.

use crate::model::task::{now_millis, NewTask, Task, TaskId, TaskPatch};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use log::{info, warn};
use std::time::Instant;

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every task, newest first.
    pub fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();
        let tasks = self.repo.list_tasks()?;
        info!(
            "event=task_list module=service status=ok count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(tasks)
    }

    /// Gets one task by id.
    pub fn get_task(&self, id: TaskId) -> RepoResult<Task> {
        self.repo.get_task(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Creates a task from `{title, description}`.
    ///
    /// # Contract
    /// - Title is trimmed; blank titles fail with a validation error and
    ///   nothing is persisted.
    /// - `completed` starts as `false`.
    pub fn create_task(&self, input: &NewTask) -> RepoResult<Task> {
        let task = match Task::new(&input.title, input.description.as_deref()) {
            Ok(task) => task,
            Err(err) => {
                warn!("event=task_create module=service status=rejected reason={err}");
                return Err(err.into());
            }
        };
        self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={}",
            task.id
        );
        Ok(task)
    }

    /// Merges `patch` into an existing task and persists the result.
    ///
    /// Returns the record as stored after the update.
    pub fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<Task> {
        let mut task = self.get_task(id)?;
        task.apply(patch, now_millis())?;
        self.repo.update_task(&task)?;
        info!(
            "event=task_update module=service status=ok task_id={} completed={}",
            task.id, task.completed
        );
        Ok(task)
    }

    /// Flips the completion flag of an existing task.
    pub fn toggle_task(&self, id: TaskId) -> RepoResult<Task> {
        let current = self.get_task(id)?;
        self.update_task(id, &TaskPatch::completed(!current.completed))
    }

    /// Permanently deletes a task.
    pub fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }
}
