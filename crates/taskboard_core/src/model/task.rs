//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its wire shape (`_id`, camelCase).
//! - Define create/update inputs and merge them into records.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is trimmed and non-empty.
//! - `updated_at` is never earlier than `created_at`.
//! - Timestamps carry millisecond precision to match storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every task record.
pub type TaskId = Uuid;

/// Validation failures for task records and inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is missing, empty or whitespace-only.
    EmptyTitle,
    /// Nil UUID is reserved and cannot identify a task.
    NilId,
    /// Path or payload identifier does not parse as a UUID.
    MalformedId(String),
    /// `updated_at` precedes `created_at`.
    TimestampOrder {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::NilId => write!(f, "task id must not be the nil uuid"),
            Self::MalformedId(raw) => write!(f, "invalid task id format: `{raw}`"),
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({updated_at}) must not be earlier than createdAt ({created_at})"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Serialized with `_id` and camelCase timestamps so the HTTP contract
/// matches existing document-store clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not yet completed task with a generated id.
    ///
    /// # Errors
    /// - Returns `EmptyTitle` when `title` is blank after trimming.
    pub fn new(title: &str, description: Option<&str>) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), title, description, now_millis())
    }

    /// Creates a task with a caller-provided id and creation time.
    ///
    /// Both timestamps are set to `created_at`, truncated to milliseconds.
    pub fn with_id(
        id: TaskId,
        title: &str,
        description: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let created_at = truncate_millis(created_at);
        let task = Self {
            id,
            title: normalize_title(title)?,
            description: normalize_description(description),
            completed: false,
            created_at,
            updated_at: created_at,
        };
        task.validate()?;
        Ok(task)
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.updated_at < self.created_at {
            return Err(TaskValidationError::TimestampOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Merges a partial update into this record.
    ///
    /// Fields absent from `patch` are kept. `id` and `created_at` never change.
    /// `updated_at` moves to `now`, or stays put if `now` would go backwards.
    ///
    /// # Errors
    /// - Returns `EmptyTitle` when the patch supplies a blank title. The record
    ///   is left untouched in that case.
    pub fn apply(
        &mut self,
        patch: &TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<(), TaskValidationError> {
        let title = match patch.title.as_deref() {
            Some(raw) => Some(normalize_title(raw)?),
            None => None,
        };

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = patch.description.as_deref() {
            self.description = normalize_description(Some(description));
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        self.updated_at = truncate_millis(now).max(self.updated_at);
        Ok(())
    }
}

/// Create input: `{title, description}`.
///
/// `title` defaults to empty so a missing field surfaces as `EmptyTitle`
/// rather than as a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
        }
    }
}

/// Partial update input. Unknown fields (including `_id`, `createdAt`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// An empty string clears the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch that only sets the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Parses an externally supplied identifier.
///
/// # Errors
/// - `MalformedId` when `raw` is not a UUID.
/// - `NilId` for the nil UUID, which never identifies a task.
pub fn parse_task_id(raw: &str) -> Result<TaskId, TaskValidationError> {
    let trimmed = raw.trim();
    let id = Uuid::parse_str(trimmed)
        .map_err(|_| TaskValidationError::MalformedId(trimmed.to_string()))?;
    if id.is_nil() {
        return Err(TaskValidationError::NilId);
    }
    Ok(id)
}

/// Current time truncated to storage precision.
pub fn now_millis() -> DateTime<Utc> {
    truncate_millis(Utc::now())
}

pub(crate) fn truncate_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}

fn normalize_title(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{normalize_description, truncate_millis};
    use chrono::{TimeZone, Utc};

    #[test]
    fn normalize_description_drops_blank_values() {
        assert_eq!(normalize_description(Some("   ")), None);
        assert_eq!(normalize_description(None), None);
        assert_eq!(
            normalize_description(Some(" milk, eggs ")).as_deref(),
            Some("milk, eggs")
        );
    }

    #[test]
    fn truncate_millis_drops_sub_millisecond_precision() {
        let value = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let truncated = truncate_millis(value);
        assert_eq!(truncated.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(truncated.timestamp_subsec_nanos(), 123_000_000);
    }
}
