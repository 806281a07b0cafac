//! Domain module for task tracking.
//!
//! This module contains the task model, the demo dataset, and pure view
//! functions over task collections.

pub mod seed;
pub mod task;
pub mod view;

pub use seed::{SEED_TASKS, SeedTask, build_seed_tasks};
pub use task::{InvalidPriority, Priority, Task, TaskId, Timestamp, TimestampParseError};
pub use view::{DEFAULT_PAGE_SIZE, Page, SortOrder, filter_local, paginate, sort_by_due_date};
