use std::fmt;

/// Deferred controller steps. Hosts fire them through
/// [`Controller::run_task`](crate::Controller::run_task) once due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Automatic door opening after page load.
    OpenDoor,
    /// End of the zooming phase; the door starts opening.
    FinishZoom,
    /// End of the opening phase; the invitation appears.
    FinishOpening,
    /// Post-load check that builds the viewer if the flipbook is showing.
    WarmFlipbook,
    /// Apply turn library callbacks that arrived outside a controller call.
    PumpTurnEvents,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenDoor => write!(f, "open door"),
            Self::FinishZoom => write!(f, "finish zoom"),
            Self::FinishOpening => write!(f, "finish opening"),
            Self::WarmFlipbook => write!(f, "warm flipbook"),
            Self::PumpTurnEvents => write!(f, "pump turn events"),
        }
    }
}

/// A task together with the session time it becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    /// Session time the task fires at.
    pub due_ms: u64,
    /// Delay requested when it was scheduled.
    pub delay_ms: u64,
    /// What to do.
    pub task: Task,
}

/// Pending tasks ordered by due time, ties in insertion order.
#[derive(Debug, Default, Clone)]
pub struct TaskQueue {
    pending: Vec<(u64, ScheduledTask)>,
    seq: u64,
}

impl TaskQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a task.
    pub fn push(&mut self, task: ScheduledTask) {
        self.pending.push((self.seq, task));
        self.seq += 1;
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|(_, t)| t.due_ms).min()
    }

    /// Remove and return the earliest task due at or before `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<ScheduledTask> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (_, t))| t.due_ms <= until_ms)
            .min_by_key(|(_, (seq, t))| (t.due_ms, *seq))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx).1)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Nothing pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
