// tests/queue_property.rs
//
// Property tests pinning the queue's scan-from-front selection and the
// FIFO draining order, so the selection logic cannot regress if it is ever
// simplified.

use std::sync::Arc;

use devpilot::queue::{NullObserver, Task, TaskKind, TaskQueue};
use proptest::prelude::*;

fn queue_with_tasks(n: usize) -> (Arc<TaskQueue>, Vec<Arc<Task>>, devpilot::queue::WakeReceiver) {
    let (queue, wake_rx) = TaskQueue::new(Box::new(NullObserver));
    let tasks: Vec<Arc<Task>> = (0..n)
        .map(|_| Arc::new(Task::new(TaskKind::DeviceScan, None, None)))
        .collect();
    for task in &tasks {
        queue.add_task(Arc::clone(task));
    }
    (queue, tasks, wake_rx)
}

proptest! {
    /// `next_task` always returns the oldest task that is neither active
    /// nor completed, regardless of the flag pattern ahead of it.
    #[test]
    fn next_task_selects_first_eligible(flags in prop::collection::vec(any::<(bool, bool)>(), 0..24)) {
        let (queue, tasks, _wake_rx) = queue_with_tasks(flags.len());
        for (task, (active, completed)) in tasks.iter().zip(&flags) {
            task.set_active(*active);
            task.set_completed(*completed);
        }

        let expected = tasks
            .iter()
            .position(|t| !t.is_active() && !t.is_completed());

        match (queue.next_task(), expected) {
            (Some(selected), Some(index)) => {
                prop_assert!(Arc::ptr_eq(&selected, &tasks[index]));
            }
            (None, None) => {}
            (selected, expected) => {
                prop_assert!(false, "selection mismatch: got {:?}, expected index {:?}", selected.map(|t| t.name()), expected);
            }
        }
    }

    /// Driving the claim/complete/remove cycle the way the worker does
    /// processes tasks in exact submission order and leaves the queue empty.
    #[test]
    fn drain_cycle_preserves_submission_order(n in 0usize..24) {
        let (queue, tasks, _wake_rx) = queue_with_tasks(n);

        let mut order = Vec::new();
        while let Some(task) = queue.next_task() {
            let index = tasks
                .iter()
                .position(|t| Arc::ptr_eq(t, &task))
                .expect("task from queue must be one of ours");
            order.push(index);

            task.set_active(true);
            // At most one task may be active while it is being processed.
            prop_assert_eq!(tasks.iter().filter(|t| t.is_active()).count(), 1);
            task.set_active(false);
            task.set_completed(true);
            queue.remove_task(&task);
        }

        prop_assert_eq!(order, (0..n).collect::<Vec<_>>());
        prop_assert!(!queue.has_tasks());
    }
}
