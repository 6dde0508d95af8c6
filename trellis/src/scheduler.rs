//! Cooperative task queue.
//!
//! Tasks are closures over `&mut View`, ordered by due time and then by
//! posting order. Nothing runs concurrently: `View::poll` pops due tasks and
//! runs each to completion. A task may post further tasks, which is how
//! animation chains are built. Tasks posted while a poll is in progress
//! run on a later poll, even with zero delay, so a self-posting task never
//! spins inside a single turn.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Duration;

use crate::view::View;

pub type Task = Box<dyn FnOnce(&mut View)>;

/// Cancellation token returned by `post`. Cloning shares the token.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle(Rc<Cell<bool>>);

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

struct Scheduled {
    due: Duration,
    seq: u64,
    handle: TaskHandle,
    task: Task,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap and we want the earliest first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Timed queue driven by a logical clock.
///
/// The clock starts at zero and only moves when the owner calls
/// [`Scheduler::advance_to`]; the host maps wall time onto it.
#[derive(Default)]
pub struct Scheduler {
    queue: BinaryHeap<Scheduled>,
    now: Duration,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `task` to run `delay` after the current logical time.
    pub fn post(&mut self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        self.post_with(delay, handle.clone(), task);
        handle
    }

    /// Queue `task` under an existing cancellation token.
    pub fn post_with(&mut self, delay: Duration, handle: TaskHandle, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due: self.now + delay,
            seq,
            handle,
            task,
        });
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Sequence number below which tasks belong to the current turn.
    pub fn horizon(&self) -> u64 {
        self.next_seq
    }

    /// Next task that is due and was posted before `horizon`. Cancelled
    /// tasks are dropped on the way.
    pub fn pop_due(&mut self, horizon: u64) -> Option<Task> {
        let mut deferred = Vec::new();
        let mut found = None;
        while let Some(top) = self.queue.peek() {
            if top.due > self.now {
                break;
            }
            let Some(entry) = self.queue.pop() else { break };
            if entry.handle.is_cancelled() {
                tracing::trace!(seq = entry.seq, "dropping cancelled task");
                continue;
            }
            if entry.seq >= horizon {
                deferred.push(entry);
                continue;
            }
            found = Some(entry.task);
            break;
        }
        self.queue.extend(deferred);
        found
    }

    /// Number of queued, uncancelled tasks.
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|s| !s.handle.is_cancelled())
            .count()
    }

    /// Due time of the earliest uncancelled task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|s| !s.handle.is_cancelled())
            .map(|s| s.due)
            .min()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.pending())
            .finish()
    }
}
