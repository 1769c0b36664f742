// src/queue/manager.rs

//! Thread-safe FIFO of pending tasks.
//!
//! Any number of caller threads may add tasks; exactly one worker drains
//! them. The worker sleeps on a channel receive and is woken by a
//! non-blocking send from [`TaskQueue::add_task`], so there is no spurious
//! wakeup bookkeeping.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::debug;

use crate::queue::task::Task;
use crate::types::ItemRef;

/// Receiving side of the worker wake signal, handed to the worker at
/// construction time.
pub type WakeReceiver = mpsc::Receiver<()>;

/// Notification hook for task population changes.
///
/// The queue calls this on every add and remove so ancillary UI counters
/// (per-item badges, a global activity indicator) stay in sync. The display
/// mechanism itself is someone else's concern.
pub trait QueueObserver: Send + Sync {
    /// Total number of queued tasks changed.
    fn queue_size_changed(&self, remaining: usize);
    /// The number of tasks referencing `item` changed.
    fn item_count_changed(&self, item: &ItemRef, count: usize);
}

/// Observer that drops all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl QueueObserver for NullObserver {
    fn queue_size_changed(&self, _remaining: usize) {}
    fn item_count_changed(&self, _item: &ItemRef, _count: usize) {}
}

/// Observer that logs counter changes, used by the CLI front-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl QueueObserver for LogObserver {
    fn queue_size_changed(&self, remaining: usize) {
        debug!(remaining, "task queue size changed");
    }

    fn item_count_changed(&self, item: &ItemRef, count: usize) {
        debug!(%item, count, "pending task count changed");
    }
}

/// FIFO of pending tasks, guarded by a single mutex shared across all
/// operations: the worker thread and caller threads both touch it.
pub struct TaskQueue {
    tasks: Mutex<Vec<Arc<Task>>>,
    observer: Box<dyn QueueObserver>,
    wake: mpsc::Sender<()>,
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("tasks", &self.tasks.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

impl TaskQueue {
    /// Create a queue and the wake receiver for its worker.
    ///
    /// The wake channel has capacity 1: if a wake is already pending the
    /// worker has not gone back to sleep yet, and one pending signal is
    /// enough for it to re-drain everything.
    pub fn new(observer: Box<dyn QueueObserver>) -> (Arc<Self>, WakeReceiver) {
        let (wake, wake_rx) = mpsc::channel(1);
        let queue = Arc::new(Self {
            tasks: Mutex::new(Vec::new()),
            observer,
            wake,
        });
        (queue, wake_rx)
    }

    /// Append a task to the tail and wake the worker.
    pub fn add_task(&self, task: Arc<Task>) {
        let remaining = {
            let mut tasks = self.tasks.lock().unwrap();
            tasks.push(Arc::clone(&task));
            tasks.len()
        };
        debug!(task = task.name(), remaining, "task added");

        self.observer.queue_size_changed(remaining);
        self.notify_item_counters(&task);

        // Non-blocking: a full channel means the worker is already awake (or
        // has a pending wake), a closed one that it has shut down.
        let _ = self.wake.try_send(());
    }

    /// Remove a task, but only if it is present and not currently being
    /// processed.
    pub fn remove_task(&self, task: &Arc<Task>) {
        let removed = {
            let mut tasks = self.tasks.lock().unwrap();
            match tasks.iter().position(|t| Arc::ptr_eq(t, task)) {
                Some(index) if !task.is_active() => {
                    tasks.remove(index);
                    Some(tasks.len())
                }
                _ => None,
            }
        };

        if let Some(remaining) = removed {
            debug!(task = task.name(), remaining, "task removed");
            self.observer.queue_size_changed(remaining);
            self.notify_item_counters(task);
        }
    }

    pub fn has_tasks(&self) -> bool {
        !self.tasks.lock().unwrap().is_empty()
    }

    /// Number of queued tasks referencing the given item: for a device, the
    /// tasks targeting it as destination; for a project, the tasks with it
    /// as subject. Callers use this to gate destructive actions (a device
    /// with pending tasks cannot be removed, a project not closed).
    pub fn tasks_for_item(&self, item: &ItemRef) -> usize {
        let tasks = self.tasks.lock().unwrap();
        tasks
            .iter()
            .filter(|task| match item {
                ItemRef::Device(id) => task.destination_device() == Some(id.as_str()),
                ItemRef::Project(_) => task.source_item() == Some(item),
            })
            .count()
    }

    /// The oldest task that is neither completed nor active, or `None`.
    ///
    /// The scan from the front (instead of a plain pop) skips tasks somehow
    /// already active or completed. With a single worker such tasks should
    /// not be observable here; the scan is kept anyway and the ordering
    /// invariants are pinned by property tests.
    pub fn next_task(&self) -> Option<Arc<Task>> {
        let tasks = self.tasks.lock().unwrap();
        tasks
            .iter()
            .find(|task| !task.is_completed() && !task.is_active())
            .cloned()
    }

    fn notify_item_counters(&self, task: &Task) {
        if let Some(item) = task.source_item() {
            self.observer.item_count_changed(item, self.tasks_for_item(item));
        }
        if let Some(id) = task.destination_device() {
            let item = ItemRef::Device(id.to_string());
            self.observer.item_count_changed(&item, self.tasks_for_item(&item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::task::TaskKind;

    fn queue() -> (Arc<TaskQueue>, WakeReceiver) {
        TaskQueue::new(Box::new(NullObserver))
    }

    fn task(kind: TaskKind) -> Arc<Task> {
        Arc::new(Task::new(kind, None, None))
    }

    #[test]
    fn next_task_returns_oldest_eligible() {
        let (queue, _rx) = queue();
        let first = task(TaskKind::ProjectPackage);
        let second = task(TaskKind::ProjectInstall);
        queue.add_task(Arc::clone(&first));
        queue.add_task(Arc::clone(&second));

        assert!(Arc::ptr_eq(&queue.next_task().unwrap(), &first));

        first.set_completed(true);
        assert!(Arc::ptr_eq(&queue.next_task().unwrap(), &second));

        second.set_active(true);
        assert!(queue.next_task().is_none());
    }

    #[test]
    fn active_tasks_are_not_removed() {
        let (queue, _rx) = queue();
        let task = task(TaskKind::ProjectPackage);
        queue.add_task(Arc::clone(&task));

        task.set_active(true);
        queue.remove_task(&task);
        assert!(queue.has_tasks());

        task.set_active(false);
        queue.remove_task(&task);
        assert!(!queue.has_tasks());
    }

    #[test]
    fn item_counts_differentiate_projects_and_devices() {
        let (queue, _rx) = queue();
        let project = ItemRef::Project("/p".to_string());
        let device = ItemRef::Device("abc".to_string());

        queue.add_task(Arc::new(Task::new(
            TaskKind::ProjectInstall,
            Some(project.clone()),
            Some("abc".to_string()),
        )));
        queue.add_task(Arc::new(Task::new(
            TaskKind::DeviceListApps,
            None,
            Some("abc".to_string()),
        )));

        assert_eq!(queue.tasks_for_item(&project), 1);
        assert_eq!(queue.tasks_for_item(&device), 2);
    }

    #[test]
    fn add_task_wakes_the_worker_once() {
        let (queue, mut rx) = queue();
        queue.add_task(task(TaskKind::DeviceScan));
        queue.add_task(task(TaskKind::DeviceScan));
        // Capacity 1: both adds collapse into a single pending wake.
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
