// src/queue/mod.rs

//! Task queue: the order sheet store for the single background worker.
//!
//! - [`task`] defines the [`Task`] value object and its kind enumeration.
//! - [`manager`] holds the thread-safe FIFO of pending tasks and the
//!   notification hook that keeps UI counters in sync.

pub mod manager;
pub mod task;

pub use manager::{LogObserver, NullObserver, QueueObserver, TaskQueue, WakeReceiver};
pub use task::{Task, TaskKind};
