//! Task domain model.
//!
//! The task is the only persisted entity. Its JSON shape (camelCase field
//! names, millisecond ISO-8601 dates, integer priority) is shared by the
//! storage document and the HTTP API.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for a task.
///
/// Ids generated by the server are UUID v4 strings. Ids read back from an
/// existing document or supplied by a client on edit are kept verbatim, so
/// the value is treated as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing id value without validation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random id (UUID v4).
    ///
    /// **Note**: This is an impure function (side effect: random number generation).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Error returned when a date/time string cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid timestamp: {0}")]
pub struct TimestampParseError(String);

/// A UTC point in time.
///
/// Serialized as ISO-8601 with millisecond precision and a `Z` suffix
/// (`2025-10-03T00:00:00.000Z`), which is what browsers produce for
/// `Date.prototype.toISOString`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the current time as a `Timestamp`, truncated to the
    /// millisecond precision used on the wire.
    ///
    /// **Note**: This is an impure function (side effect: system clock).
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(3))
    }

    /// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date meaning
    /// midnight UTC.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampParseError`] if the value matches neither form.
    pub fn parse(value: &str) -> Result<Self, TimestampParseError> {
        let trimmed = value.trim();

        if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(datetime.with_timezone(&Utc)));
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
            .ok_or_else(|| TimestampParseError(value.to_string()))
    }

    /// Formats the timestamp as ISO-8601 with millisecond precision.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.to_iso_string())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Enums
// =============================================================================

/// Error returned for a priority value outside `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid priority: {0} (expected 0, 1 or 2)")]
pub struct InvalidPriority(pub u8);

/// The priority level of a task, stored as a small integer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    /// Low priority (value: 0).
    #[default]
    Low,
    /// Medium priority (value: 1).
    Medium,
    /// High priority (value: 2).
    High,
}

impl Priority {
    /// All priorities in ascending order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the numeric value of the priority.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = InvalidPriority;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            other => Err(InvalidPriority(other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.value()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(formatter, "Low"),
            Self::Medium => write!(formatter, "Medium"),
            Self::High => write!(formatter, "High"),
        }
    }
}

// =============================================================================
// Task
// =============================================================================

/// A single to-do record.
///
/// # Examples
///
/// ```
/// use todo_api::domain::{Priority, Task, TaskId, Timestamp};
///
/// let task = Task::new(
///     TaskId::generate(),
///     "Write README",
///     Timestamp::parse("2025-10-08").unwrap(),
///     Timestamp::now(),
/// )
/// .with_priority(Priority::High);
///
/// assert!(!task.status);
/// assert!(task.edit_date.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned by the server on create.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Free-form description, empty when not given.
    #[serde(default)]
    pub description: String,
    /// When the task is due.
    pub due_date: Timestamp,
    /// When the task was created (server clock).
    pub create_date: Timestamp,
    /// When the task was last edited; absent until the first edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_date: Option<Timestamp>,
    /// Completion flag.
    #[serde(default)]
    pub status: bool,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    /// Creates an open, low-priority task with an empty description.
    #[must_use]
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        due_date: Timestamp,
        create_date: Timestamp,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            due_date,
            create_date,
            edit_date: None,
            status: false,
            priority: Priority::Low,
        }
    }

    /// Returns a new task with the given description.
    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    /// Returns a new task with the given priority.
    #[must_use]
    pub fn with_priority(self, priority: Priority) -> Self {
        Self { priority, ..self }
    }

    /// Returns a new task with the given completion flag.
    #[must_use]
    pub fn with_status(self, status: bool) -> Self {
        Self { status, ..self }
    }

    /// Returns a new task stamped as edited at `timestamp`.
    ///
    /// The stamp never precedes `create_date`.
    #[must_use]
    pub fn edited_at(self, timestamp: Timestamp) -> Self {
        let edit_date = timestamp.max(self.create_date);
        Self {
            edit_date: Some(edit_date),
            ..self
        }
    }

    /// Returns a new task marked as completed.
    #[must_use]
    pub fn complete(self) -> Self {
        self.with_status(true)
    }

    /// Returns `true` if the lower-cased title contains `normalized_query`.
    ///
    /// The query must already be trimmed and lower-cased.
    #[must_use]
    pub fn title_contains(&self, normalized_query: &str) -> bool {
        self.title.to_lowercase().contains(normalized_query)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn test_task(title: &str) -> Task {
        Task::new(
            TaskId::generate(),
            title,
            Timestamp::parse("2025-10-03T00:00:00.000Z").unwrap(),
            Timestamp::parse("2025-09-28T10:10:00.000Z").unwrap(),
        )
    }

    // -------------------------------------------------------------------------
    // TaskId Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_task_id_generate_creates_unique_ids() {
        let id1 = TaskId::generate();
        let id2 = TaskId::generate();
        assert_ne!(id1, id2);
    }

    #[rstest]
    fn test_task_id_generate_is_uuid() {
        let id = TaskId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("abc", false)]
    fn test_task_id_is_blank(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(TaskId::new(value).is_blank(), expected);
    }

    #[rstest]
    fn test_task_id_serializes_as_plain_string() {
        let id = TaskId::new("7b92adB5-6f4e-4b12-c34f-c1b2f23f0008");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"7b92adB5-6f4e-4b12-c34f-c1b2f23f0008\"");
    }

    // -------------------------------------------------------------------------
    // Timestamp Tests
    // -------------------------------------------------------------------------

    #[rstest]
    #[case("2025-10-03T00:00:00.000Z", "2025-10-03T00:00:00.000Z")]
    #[case("2025-10-03T09:00:00Z", "2025-10-03T09:00:00.000Z")]
    #[case("2025-10-03T11:00:00+02:00", "2025-10-03T09:00:00.000Z")]
    #[case("2025-10-03", "2025-10-03T00:00:00.000Z")]
    #[case("  2025-10-03  ", "2025-10-03T00:00:00.000Z")]
    fn test_timestamp_parse_accepted_forms(#[case] input: &str, #[case] expected: &str) {
        let timestamp = Timestamp::parse(input).unwrap();
        assert_eq!(timestamp.to_iso_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("tomorrow")]
    #[case("2025-13-40")]
    fn test_timestamp_parse_rejects_garbage(#[case] input: &str) {
        assert!(Timestamp::parse(input).is_err());
    }

    #[rstest]
    fn test_timestamp_deserialize_rejects_non_string() {
        let result: Result<Timestamp, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[rstest]
    fn test_timestamp_now_survives_serialization() {
        let now = Timestamp::now();
        let json = serde_json::to_string(&now).unwrap();
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), now);
    }

    // -------------------------------------------------------------------------
    // Priority Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_priority_values() {
        assert_eq!(Priority::Low.value(), 0);
        assert_eq!(Priority::Medium.value(), 1);
        assert_eq!(Priority::High.value(), 2);
    }

    #[rstest]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[rstest]
    #[case(0, Priority::Low)]
    #[case(1, Priority::Medium)]
    #[case(2, Priority::High)]
    fn test_priority_try_from_valid(#[case] value: u8, #[case] expected: Priority) {
        assert_eq!(Priority::try_from(value), Ok(expected));
    }

    #[rstest]
    fn test_priority_try_from_out_of_range() {
        assert_eq!(Priority::try_from(3), Err(InvalidPriority(3)));
    }

    #[rstest]
    fn test_priority_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "2");
        let parsed: Priority = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Priority::Medium);
        assert!(serde_json::from_str::<Priority>("7").is_err());
    }

    // -------------------------------------------------------------------------
    // Task Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_task_new_defaults() {
        let task = test_task("Plan quarterly roadma");
        assert_eq!(task.title, "Plan quarterly roadma");
        assert!(task.description.is_empty());
        assert!(!task.status);
        assert_eq!(task.priority, Priority::Low);
        assert!(task.edit_date.is_none());
    }

    #[rstest]
    fn test_task_complete() {
        let task = test_task("Test").complete();
        assert!(task.status);
    }

    #[rstest]
    fn test_task_edited_at_never_precedes_create_date() {
        let task = test_task("Test");
        let before_creation = Timestamp::parse("2020-01-01").unwrap();

        let edited = task.clone().edited_at(before_creation);
        assert_eq!(edited.edit_date, Some(task.create_date));

        let later = Timestamp::parse("2030-01-01").unwrap();
        let edited = task.edited_at(later);
        assert_eq!(edited.edit_date, Some(later));
    }

    #[rstest]
    #[case("roadma", true)]
    #[case("quarterly", true)]
    #[case("plan", true)]
    #[case("roadmap", false)]
    #[case("description", false)]
    fn test_task_title_contains(#[case] query: &str, #[case] expected: bool) {
        let task = test_task("Plan quarterly roadma").with_description("description here");
        assert_eq!(task.title_contains(query), expected);
    }

    // -------------------------------------------------------------------------
    // Serialization Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_task_serializes_with_camel_case_fields() {
        let task = test_task("Test")
            .with_description("Details")
            .with_priority(Priority::Medium);

        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["title"], "Test");
        assert_eq!(value["description"], "Details");
        assert_eq!(value["dueDate"], "2025-10-03T00:00:00.000Z");
        assert_eq!(value["createDate"], "2025-09-28T10:10:00.000Z");
        assert_eq!(value["status"], false);
        assert_eq!(value["priority"], 1);
        assert!(value.get("editDate").is_none());
    }

    #[rstest]
    fn test_task_deserializes_with_defaults() {
        let json = r#"{
            "id": "abc",
            "title": "Minimal",
            "dueDate": "2025-10-03T00:00:00.000Z",
            "createDate": "2025-09-28T10:10:00.000Z"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id, TaskId::new("abc"));
        assert!(task.description.is_empty());
        assert!(!task.status);
        assert_eq!(task.priority, Priority::Low);
        assert!(task.edit_date.is_none());
    }

    #[rstest]
    fn test_task_serialization_round_trip_preserves_edit_date() {
        let task = test_task("Test").edited_at(Timestamp::parse("2025-09-30").unwrap());

        let json = serde_json::to_string(&task).unwrap();
        let deserialized: Task = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, task);
    }
}
