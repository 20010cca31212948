//! Five-queue task board with lock-serialized atomic moves.
//!
//! A task belongs to exactly one queue at a time; its queue membership *is*
//! its storage location under `.agent-factory/queue/<queue>/`. Moves are
//! same-filesystem renames, so at every observable instant a task is in
//! exactly one of the two queues involved — never both, never neither.
//!
//! Transitions on the same task filename are serialized through the lock
//! manager; transitions on different filenames proceed fully in parallel.
//! Listing is deliberately unlocked: a list racing a move may miss or include
//! the moving task, which is an accepted inconsistency window.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::{ParseQueueError, QueueError};
use crate::lock::{DirLockProvider, LockProvider, with_lock};
use crate::project::FACTORY_DIR;
use crate::task::{TaskRecord, update_field};

/// The five task queues, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueName {
    Backlog,
    Todo,
    InProgress,
    Review,
    Done,
}

impl QueueName {
    pub const ALL: [QueueName; 5] = [
        QueueName::Backlog,
        QueueName::Todo,
        QueueName::InProgress,
        QueueName::Review,
        QueueName::Done,
    ];

    /// The queue's fixed on-disk directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueName::Backlog => "backlog",
            QueueName::Todo => "todo",
            QueueName::InProgress => "in-progress",
            QueueName::Review => "review",
            QueueName::Done => "done",
        }
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueName {
    type Err = ParseQueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueueName::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| ParseQueueError(s.to_string()))
    }
}

/// Engine over the on-disk task queues.
pub struct TaskBoard {
    queue_root: PathBuf,
    locks: Arc<dyn LockProvider>,
}

impl TaskBoard {
    /// Board over `<project>/.agent-factory/queue/` using the shared
    /// machine-wide lock namespace.
    pub fn open(project_dir: &Path) -> Self {
        Self::with_locks(project_dir, Arc::new(DirLockProvider::shared()))
    }

    pub fn with_locks(project_dir: &Path, locks: Arc<dyn LockProvider>) -> Self {
        Self {
            queue_root: project_dir.join(FACTORY_DIR).join("queue"),
            locks,
        }
    }

    fn queue_dir(&self, queue: QueueName) -> PathBuf {
        self.queue_root.join(queue.as_str())
    }

    /// Parse every `.md` task document in a queue. A queue whose directory
    /// does not exist yet yields an empty list, never an error. Order follows
    /// directory iteration and is not meaningful.
    pub fn list_tasks(&self, queue: QueueName) -> Result<Vec<TaskRecord>, QueueError> {
        let dir = self.queue_dir(queue);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };

        let mut tasks = Vec::new();
        for entry in entries.flatten() {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !name.ends_with(".md") {
                continue;
            }
            let path = entry.path();
            let content = fs::read_to_string(&path)
                .map_err(|source| QueueError::ReadFailed { path, source })?;
            let mut task = TaskRecord::parse(&content);
            task.filename = name;
            tasks.push(task);
        }
        Ok(tasks)
    }

    /// Size of each of the five queues.
    pub fn queue_counts(&self) -> Result<BTreeMap<QueueName, usize>, QueueError> {
        let mut counts = BTreeMap::new();
        for queue in QueueName::ALL {
            counts.insert(queue, self.list_tasks(queue)?.len());
        }
        Ok(counts)
    }

    /// Core primitive behind every task transition. Runs entirely under the
    /// lock for `filename`: existence check, in-place field rewrites, then
    /// the atomic rename into the destination queue.
    fn move_task(
        &self,
        filename: &str,
        from: QueueName,
        to: QueueName,
        updates: &[(&str, &str)],
    ) -> Result<(), QueueError> {
        let src = self.queue_dir(from).join(filename);
        let dst = self.queue_dir(to).join(filename);

        with_lock(self.locks.as_ref(), filename, || {
            if !src.exists() {
                return Err(QueueError::TaskNotFound {
                    filename: filename.to_string(),
                    queue: from,
                });
            }

            if !updates.is_empty() {
                let mut content = fs::read_to_string(&src).map_err(|source| {
                    QueueError::ReadFailed {
                        path: src.clone(),
                        source,
                    }
                })?;
                for (field, value) in updates {
                    content = update_field(&content, field, value);
                }
                fs::write(&src, content).map_err(|source| QueueError::WriteFailed {
                    path: src.clone(),
                    source,
                })?;
            }

            fs::rename(&src, &dst).map_err(|source| QueueError::MoveFailed {
                from: src.clone(),
                to: dst.clone(),
                source,
            })
        })
    }

    /// Claim a todo task: move it to in-progress and record the claimant.
    ///
    /// Without an explicit worker id the claimant defaults to
    /// `worker-<pid>`. Returns the worker id that was recorded.
    pub fn claim(&self, filename: &str, worker_id: Option<&str>) -> Result<String, QueueError> {
        let worker = worker_id
            .map(str::to_string)
            .unwrap_or_else(|| format!("worker-{}", std::process::id()));
        self.move_task(
            filename,
            QueueName::Todo,
            QueueName::InProgress,
            &[("Status", "in-progress"), ("Assigned", &worker)],
        )?;
        Ok(worker)
    }

    /// Submit an in-progress task for review.
    pub fn submit(&self, filename: &str) -> Result<(), QueueError> {
        self.move_task(
            filename,
            QueueName::InProgress,
            QueueName::Review,
            &[("Status", "review")],
        )
    }

    /// Reject a task in review and send it back to todo, unassigned.
    pub fn reject(&self, filename: &str) -> Result<(), QueueError> {
        self.move_task(
            filename,
            QueueName::Review,
            QueueName::Todo,
            &[("Status", "todo (rejected)"), ("Assigned", "none")],
        )
    }

    /// Approve a task in review; done is terminal.
    pub fn done(&self, filename: &str) -> Result<(), QueueError> {
        self.move_task(
            filename,
            QueueName::Review,
            QueueName::Done,
            &[("Status", "done")],
        )
    }

    /// Return an in-progress task to todo (the worker gives up).
    pub fn return_task(&self, filename: &str) -> Result<(), QueueError> {
        self.move_task(
            filename,
            QueueName::InProgress,
            QueueName::Todo,
            &[("Status", "todo (returned)"), ("Assigned", "none")],
        )
    }
}
