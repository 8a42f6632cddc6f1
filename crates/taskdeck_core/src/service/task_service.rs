//! Task list controller.
//!
//! # Responsibility
//! - Apply add/toggle/delete to the collection stored under `tasks`.
//! - Derive filtered views, counters and captions from current state.
//!
//! # Invariants
//! - The collection lives only in the persisted store; nothing is cached here.
//! - Blank input and unknown ids are silent no-ops and trigger no write.
//! - Task order is insertion order; no operation reorders.
//! - New ids are strictly greater than every id already present, except
//!   when the stored maximum is `i64::MAX`; then the clock value is used if
//!   free, otherwise the add is skipped.
//! - Toggle and delete act on every task carrying the given id.

use crate::model::task::{Task, TaskCounts, TaskFilter, TaskId};
use crate::service::clock::{Clock, SystemClock};
use crate::storage::{PersistedStore, StorageProvider};
use chrono::SubsecRound;
use log::{debug, info, warn};

/// Storage key holding the task collection.
pub const TASKS_KEY: &str = "tasks";

/// Controller over the persisted task collection.
pub struct TaskService<S, C = SystemClock> {
    store: PersistedStore<Vec<Task>, S>,
    clock: C,
}

impl<S: StorageProvider> TaskService<S, SystemClock> {
    /// Opens the `tasks` slot with the system clock.
    pub fn open(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: StorageProvider, C: Clock> TaskService<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        let store = PersistedStore::open(storage, TASKS_KEY, Vec::new());
        info!(
            "event=tasks_open module=service status={} total={}",
            if store.is_degraded() { "degraded" } else { "ok" },
            store.read().len()
        );
        Self { store, clock }
    }

    /// Current collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        self.store.read()
    }

    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks().iter().find(|task| task.id == id)
    }

    /// Appends a new open task unless `text` is blank.
    ///
    /// The text is stored as given; trimming only decides emptiness.
    pub fn add_task(&mut self, text: &str) -> &[Task] {
        if text.trim().is_empty() {
            debug!("event=task_add module=service status=skipped reason=blank_text");
            return self.tasks();
        }

        let created_at = self.clock.now().trunc_subsecs(3);
        let Some(id) = self.next_id(created_at.timestamp_millis()) else {
            warn!("event=task_add module=service status=skipped reason=id_space_exhausted");
            return self.tasks();
        };
        let task = Task::new(id, text, created_at);
        self.store.update(|tasks| tasks.push(task));
        info!(
            "event=task_add module=service status=ok task_id={} total={}",
            id,
            self.tasks().len()
        );
        self.tasks()
    }

    /// Flips completion of every task with `id`; unknown ids are ignored.
    pub fn toggle_task(&mut self, id: TaskId) -> &[Task] {
        if !self.contains(id) {
            debug!("event=task_toggle module=service status=skipped reason=not_found task_id={id}");
            return self.tasks();
        }

        self.store.update(|tasks| {
            tasks
                .iter_mut()
                .filter(|task| task.id == id)
                .for_each(Task::toggle);
        });
        info!("event=task_toggle module=service status=ok task_id={id}");
        self.tasks()
    }

    /// Removes every task with `id`; unknown ids are ignored.
    pub fn delete_task(&mut self, id: TaskId) -> &[Task] {
        if !self.contains(id) {
            debug!("event=task_delete module=service status=skipped reason=not_found task_id={id}");
            return self.tasks();
        }

        self.store.update(|tasks| tasks.retain(|task| task.id != id));
        info!(
            "event=task_delete module=service status=ok task_id={} total={}",
            id,
            self.tasks().len()
        );
        self.tasks()
    }

    /// Ordered subsequence of tasks matching `filter`.
    pub fn filtered_view(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks()
            .iter()
            .filter(|task| filter.matches(task))
            .collect()
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::of(self.tasks())
    }

    pub fn total_count(&self) -> usize {
        self.tasks().len()
    }

    pub fn active_count(&self) -> usize {
        self.counts().active
    }

    pub fn completed_count(&self) -> usize {
        self.counts().completed
    }

    /// Filter caption with its current count, e.g. `Active (2)`.
    pub fn filter_label(&self, filter: TaskFilter) -> String {
        format!("{} ({})", filter.caption(), self.counts().for_filter(filter))
    }

    /// Footer line such as `1 task remaining` or `3 tasks remaining`.
    pub fn remaining_label(&self) -> String {
        let active = self.active_count();
        let plural = if active == 1 { "" } else { "s" };
        format!("{active} task{plural} remaining")
    }

    /// Returns whether the backing slot could not be read or written.
    pub fn is_degraded(&self) -> bool {
        self.store.is_degraded()
    }

    /// Registers a callback run after every persisted change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Vec<Task>) + 'static) {
        self.store.subscribe(listener);
    }

    fn contains(&self, id: TaskId) -> bool {
        self.tasks().iter().any(|task| task.id == id)
    }

    /// Next id after every stored one, or `now_ms` when the id space above
    /// the stored maximum is exhausted and `now_ms` is still free.
    fn next_id(&self, now_ms: i64) -> Option<TaskId> {
        match self.tasks().iter().map(|task| task.id).max() {
            Some(max_id) if max_id >= now_ms => max_id
                .checked_add(1)
                .or_else(|| (!self.contains(now_ms)).then_some(now_ms)),
            _ => Some(now_ms),
        }
    }
}
