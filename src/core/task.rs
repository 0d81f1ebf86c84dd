//! Task record and lifecycle status.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a task by the store. Strictly positive once assigned.
pub type TaskId = i64;

/// Lifecycle state of a task.
///
/// Transitions only move forward: `Pending -> Running -> Done`, or
/// `Pending -> Failed` when the pool rejects the task at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Accepted and waiting for a worker.
    Pending,
    /// Picked up by a worker, simulated work in progress.
    Running,
    /// Work finished.
    Done,
    /// Rejected before execution; `Task::error` holds the reason.
    Failed,
}

impl TaskStatus {
    /// Lowercase name used on the wire and in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Whether the status is terminal (`Done` or `Failed`).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of submitted work.
///
/// The store owns the canonical copy; everything else works on clones and
/// reports mutations back to the store by [`TaskId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identity. Zero until the store creates the record.
    pub id: TaskId,
    /// Non-empty, trimmed title.
    pub title: String,
    /// Optional trimmed description; empty when not supplied.
    pub description: String,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Failure reason, only set when `status` is `Failed`.
    pub error: Option<String>,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// How long a worker "performs" this task.
    pub work_duration: Duration,
}

impl Task {
    /// Build an unsaved task record. The store assigns `id` and `status`.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        created_at_ms: u64,
        work_duration: Duration,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            error: None,
            created_at_ms,
            work_duration,
        }
    }
}
