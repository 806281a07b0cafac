//! Derived views over a task collection.
//!
//! The collection read from storage is the single source of truth; these
//! functions compute filtered, ordered, or paged views of it without
//! mutating the input.

use serde::Deserialize;

use super::task::Task;

/// Number of tasks per page when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Ordering by due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Latest due date first.
    Recent,
    /// Earliest due date first.
    Older,
}

/// One page of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Tasks on this page.
    pub items: Vec<Task>,
    /// 1-based page number.
    pub page: usize,
    /// Number of tasks per page.
    pub page_size: usize,
    /// Total number of pages for the whole view.
    pub total_pages: usize,
}

/// Case-insensitive substring filter on title or description.
///
/// A blank query returns every task.
#[must_use]
pub fn filter_local(tasks: &[Task], query: &str) -> Vec<Task> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return tasks.to_vec();
    }

    tasks
        .iter()
        .filter(|task| {
            task.title_contains(&normalized)
                || task.description.to_lowercase().contains(&normalized)
        })
        .cloned()
        .collect()
}

/// Stable sort by due date.
#[must_use]
pub fn sort_by_due_date(tasks: &[Task], order: SortOrder) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    match order {
        SortOrder::Older => sorted.sort_by(|left, right| left.due_date.cmp(&right.due_date)),
        SortOrder::Recent => sorted.sort_by(|left, right| right.due_date.cmp(&left.due_date)),
    }
    sorted
}

/// Slices a view into 1-based pages.
///
/// A `page_size` of zero falls back to [`DEFAULT_PAGE_SIZE`]; page zero is
/// treated as page one. Pages past the end are empty.
#[must_use]
pub fn paginate(tasks: &[Task], page: usize, page_size: usize) -> Page {
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let page = page.max(1);
    let total_pages = tasks.len().div_ceil(page_size);

    let items = (page - 1)
        .checked_mul(page_size)
        .filter(|start| *start < tasks.len())
        .map(|start| {
            let end = start.saturating_add(page_size).min(tasks.len());
            tasks[start..end].to_vec()
        })
        .unwrap_or_default();

    Page {
        items,
        page,
        page_size,
        total_pages,
    }
}
