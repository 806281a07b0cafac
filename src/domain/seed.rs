//! Fixed demo dataset used by the populate operation.
//!
//! Each call produces fresh ids and a caller-chosen priority per task; the
//! titles, descriptions, dates, and completion flags never change.

use super::task::{Priority, Task, TaskId, Timestamp, TimestampParseError};

/// A seed entry before ids and priorities are assigned.
#[derive(Debug, Clone, Copy)]
pub struct SeedTask {
    pub title: &'static str,
    pub description: &'static str,
    pub due_date: &'static str,
    pub create_date: &'static str,
    pub status: bool,
}

/// The demo dataset.
pub const SEED_TASKS: [SeedTask; 13] = [
    SeedTask {
        title: "Plan quarterly roadma",
        description: "Draft the Q4 roadmap including milestones and dependencies.",
        due_date: "2025-10-03T00:00:00.000Z",
        create_date: "2025-09-28T10:10:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Write unit tests for service layer",
        description: "Add coverage for createTask and findTasksByName functions.",
        due_date: "2025-10-04T09:00:00.000Z",
        create_date: "2025-09-28T11:20:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Refactor repository file IO",
        description: "Optimize JSON read/write with atomic temp file strategy.",
        due_date: "2025-10-05T09:00:00.000Z",
        create_date: "2025-09-28T12:30:00.000Z",
        status: true,
    },
    SeedTask {
        title: "Design API error schema",
        description: "Propose consistent error response format with codes and messages.",
        due_date: "2025-10-06T09:00:00.000Z",
        create_date: "2025-09-28T13:40:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Add request validation",
        description: "Validate incoming JSON bodies for required fields and types.",
        due_date: "2025-10-07T09:00:00.000Z",
        create_date: "2025-09-28T14:50:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Write README setup instructions",
        description: "Document how to run server and configure API_URL for frontend.",
        due_date: "2025-10-08T09:00:00.000Z",
        create_date: "2025-09-28T15:10:00.000Z",
        status: true,
    },
    SeedTask {
        title: "Implement search by title UI",
        description: "Add search box to filter tasks by name on the frontend.",
        due_date: "2025-10-09T09:00:00.000Z",
        create_date: "2025-09-28T16:20:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Add logging middleware",
        description: "Log method, path, and response status for each request.",
        due_date: "2025-10-10T09:00:00.000Z",
        create_date: "2025-09-28T17:30:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Configure CI checks",
        description: "Add formatting and lint checks to CI workflow.",
        due_date: "2025-10-11T09:00:00.000Z",
        create_date: "2025-09-28T18:40:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Harden CORS settings",
        description: "Restrict origins and methods for production environment.",
        due_date: "2025-10-12T09:00:00.000Z",
        create_date: "2025-09-28T19:50:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Add pagination to tasks list",
        description: "Support limit and offset query params on GET /tasks.",
        due_date: "2025-10-13T09:00:00.000Z",
        create_date: "2025-09-29T08:00:00.000Z",
        status: false,
    },
    SeedTask {
        title: "Implement delete endpoint",
        description: "Expose DELETE /tasks/:id to remove a task.",
        due_date: "2025-10-14T09:00:00.000Z",
        create_date: "2025-09-29T08:20:00.000Z",
        status: true,
    },
    SeedTask {
        title: "Build edit task form",
        description: "Create UI to update title and description of a task.",
        due_date: "2025-10-15T09:00:00.000Z",
        create_date: "2025-09-29T09:15:00.000Z",
        status: false,
    },
];

impl SeedTask {
    /// Builds a task from this entry with the given id and priority.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampParseError`] if one of the fixed date strings is malformed.
    pub fn build(&self, id: TaskId, priority: Priority) -> Result<Task, TimestampParseError> {
        let due_date = Timestamp::parse(self.due_date)?;
        let create_date = Timestamp::parse(self.create_date)?;

        Ok(Task::new(id, self.title, due_date, create_date)
            .with_description(self.description)
            .with_status(self.status)
            .with_priority(priority))
    }
}

/// Builds the whole demo dataset with fresh ids.
///
/// `next_priority` is called once per task, in dataset order.
///
/// # Errors
///
/// Returns [`TimestampParseError`] if a fixed date string is malformed.
pub fn build_seed_tasks<F>(mut next_priority: F) -> Result<Vec<Task>, TimestampParseError>
where
    F: FnMut() -> Priority,
{
    SEED_TASKS
        .iter()
        .map(|seed| seed.build(TaskId::generate(), next_priority()))
        .collect()
}
