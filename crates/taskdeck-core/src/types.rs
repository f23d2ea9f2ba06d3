//! Domain types shared by the API client, the services and the console.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Todo lists
// ─────────────────────────────────────────────────────────────────────────────

/// A todo-list as the server stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default, with = "wire_date")]
    pub added_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub order: i64,
}

/// A todo-list as held in the client mirror: the server fields plus the
/// client-only filter tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTodo {
    #[serde(flatten)]
    pub todo: Todo,
    #[serde(default)]
    pub filter: FilterType,
}

impl DomainTodo {
    pub fn id(&self) -> &str {
        &self.todo.id
    }
}

impl From<Todo> for DomainTodo {
    fn from(todo: Todo) -> Self {
        Self {
            todo,
            filter: FilterType::All,
        }
    }
}

/// Which tasks of a todo-list are visible. Never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterType {
    pub const ALL: [FilterType; 3] = [FilterType::All, FilterType::Active, FilterType::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::All => "all",
            FilterType::Active => "active",
            FilterType::Completed => "completed",
        }
    }

    /// Whether `task` is visible under this filter.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            FilterType::All => true,
            FilterType::Active => task.status != TaskStatus::Completed,
            FilterType::Completed => task.status == TaskStatus::Completed,
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterType::All),
            "active" => Ok(FilterType::Active),
            "completed" => Ok(FilterType::Completed),
            other => Err(format!(
                "unknown filter '{other}' (expected all, active or completed)"
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

/// Task status as the backend encodes it (integer on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TaskStatus {
    /// Shown as "active" in the UI.
    #[default]
    New = 0,
    InProgress = 1,
    Completed = 2,
    Draft = 3,
}

impl From<i64> for TaskStatus {
    fn from(value: i64) -> Self {
        match value {
            1 => TaskStatus::InProgress,
            2 => TaskStatus::Completed,
            3 => TaskStatus::Draft,
            _ => TaskStatus::New,
        }
    }
}

impl From<TaskStatus> for i64 {
    fn from(status: TaskStatus) -> Self {
        status as i64
    }
}

/// Task priority as the backend encodes it (integer on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TaskPriority {
    #[default]
    Low = 0,
    Middle = 1,
    High = 2,
    Urgent = 3,
    Later = 4,
}

impl From<i64> for TaskPriority {
    fn from(value: i64) -> Self {
        match value {
            1 => TaskPriority::Middle,
            2 => TaskPriority::High,
            3 => TaskPriority::Urgent,
            4 => TaskPriority::Later,
            _ => TaskPriority::Low,
        }
    }
}

impl From<TaskPriority> for i64 {
    fn from(priority: TaskPriority) -> Self {
        priority as i64
    }
}

/// A task belonging to a todo-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub todo_list_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, with = "wire_date")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, with = "wire_date")]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default, with = "wire_date")]
    pub added_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Merge the writable fields of `patch` into this task.
    pub fn apply(&mut self, patch: &UpdateTaskRequest) {
        self.title = patch.title.clone();
        self.description = patch.description.clone();
        self.status = patch.status;
        self.priority = patch.priority;
        self.start_date = patch.start_date;
        self.deadline = patch.deadline;
        self.completed = patch.completed;
    }
}

/// Body of `PUT /todo-lists/{id}/tasks/{taskId}`: the complete writable model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, with = "wire_date")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, with = "wire_date")]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed: bool,
}

impl UpdateTaskRequest {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the status and keep the `completed` flag consistent with it.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self.completed = status == TaskStatus::Completed;
        self
    }
}

impl From<&Task> for UpdateTaskRequest {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            start_date: task.start_date,
            deadline: task.deadline,
            completed: task.completed,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me: false,
            captcha: None,
        }
    }

    pub fn remember(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }
}

/// `data` of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user_id: i64,
}

/// `data` of a successful `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub login: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// A transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire date format
// ─────────────────────────────────────────────────────────────────────────────

/// Zone-less ISO timestamps (`2023-11-27T12:49:40.24`). Empty strings and
/// `null` mean "no date"; `None` is written back as an empty string.
pub mod wire_date {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        let raw = raw.trim().trim_end_matches('Z');
        NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).or_else(|err| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .ok_or(err)
        })
    }

    pub fn format(value: &NaiveDateTime) -> String {
        value.format(DATETIME_FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&format(dt)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse(s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    fn task_json() -> serde_json::Value {
        json!({
            "id": "61b0388b-90ec-4760-af4e-9dbc85fc2657",
            "title": "df",
            "description": "",
            "todoListId": "b7a11ad0-2c76-4d4a-a4ce-39a2105a660f",
            "order": -1,
            "status": 0,
            "priority": 1,
            "startDate": "",
            "deadline": null,
            "addedDate": "2023-11-27T12:49:40.24",
            "completed": false
        })
    }

    #[test]
    fn test_task_decodes_backend_shape() {
        let task: Task = serde_json::from_value(task_json()).unwrap();
        assert_eq!(task.todo_list_id, "b7a11ad0-2c76-4d4a-a4ce-39a2105a660f");
        assert_eq!(task.order, -1);
        assert_eq!(task.status, TaskStatus::New);
        assert_eq!(task.priority, TaskPriority::Middle);
        assert!(task.start_date.is_none());
        assert!(task.deadline.is_none());

        let added = task.added_date.unwrap();
        assert_eq!(added.hour(), 12);
        assert_eq!(added.nanosecond(), 240_000_000);
    }

    #[test]
    fn test_task_encodes_missing_dates_as_empty_strings() {
        let task: Task = serde_json::from_value(task_json()).unwrap();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["startDate"], "");
        assert_eq!(value["deadline"], "");
        assert_eq!(value["todoListId"], "b7a11ad0-2c76-4d4a-a4ce-39a2105a660f");
        assert_eq!(value["priority"], 1);
    }

    #[test]
    fn test_unknown_status_and_priority_fall_back() {
        assert_eq!(TaskStatus::from(42), TaskStatus::New);
        assert_eq!(TaskPriority::from(-3), TaskPriority::Low);
        assert_eq!(i64::from(TaskStatus::Completed), 2);
    }

    #[test]
    fn test_wire_date_accepts_plain_dates_and_zulu_suffix() {
        let date = wire_date::parse("2024-02-01").unwrap();
        assert_eq!(date.hour(), 0);

        let zulu = wire_date::parse("2024-02-01T10:30:00Z").unwrap();
        assert_eq!(zulu.minute(), 30);

        assert!(wire_date::parse("yesterday").is_err());
    }

    #[test]
    fn test_filter_matches() {
        let mut task: Task = serde_json::from_value(task_json()).unwrap();

        assert!(FilterType::All.matches(&task));
        assert!(FilterType::Active.matches(&task));
        assert!(!FilterType::Completed.matches(&task));

        task.status = TaskStatus::Completed;
        assert!(FilterType::All.matches(&task));
        assert!(!FilterType::Active.matches(&task));
        assert!(FilterType::Completed.matches(&task));
    }

    #[test]
    fn test_filter_parse_and_display() {
        assert_eq!("Active".parse::<FilterType>().unwrap(), FilterType::Active);
        assert_eq!(" completed ".parse::<FilterType>().unwrap(), FilterType::Completed);
        assert!("done".parse::<FilterType>().is_err());

        for filter in FilterType::ALL {
            assert_eq!(filter.to_string().parse::<FilterType>().unwrap(), filter);
        }
    }

    #[test]
    fn test_domain_todo_flattens_with_filter() {
        let todo: Todo = serde_json::from_value(json!({
            "id": "a",
            "title": "groceries",
            "addedDate": "2023-11-27T07:41:04.363",
            "order": 0
        }))
        .unwrap();
        let domain = DomainTodo::from(todo);
        assert_eq!(domain.filter, FilterType::All);
        assert_eq!(domain.id(), "a");

        let value = serde_json::to_value(&domain).unwrap();
        assert_eq!(value["title"], "groceries");
        assert_eq!(value["filter"], "all");
    }

    #[test]
    fn test_update_request_with_status_keeps_completed_in_sync() {
        let task: Task = serde_json::from_value(task_json()).unwrap();
        let patch = UpdateTaskRequest::from(&task).with_status(TaskStatus::Completed);
        assert!(patch.completed);

        let patch = patch.with_status(TaskStatus::New);
        assert!(!patch.completed);
    }

    #[test]
    fn test_task_apply_merges_patch() {
        let mut task: Task = serde_json::from_value(task_json()).unwrap();
        let patch = UpdateTaskRequest::from(&task)
            .with_title("new title")
            .with_status(TaskStatus::Completed);

        task.apply(&patch);

        assert_eq!(task.title, "new title");
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.completed);
        assert_eq!(task.id, "61b0388b-90ec-4760-af4e-9dbc85fc2657");
        assert_eq!(task.order, -1);
    }

    #[test]
    fn test_login_request_wire_shape() {
        let req = LoginRequest::new("testemail@gmail.com", "qwerty123");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["email"], "testemail@gmail.com");
        assert_eq!(value["rememberMe"], false);
        assert!(value.get("captcha").is_none());
    }

    #[test]
    fn test_notification_constructors() {
        let n = Notification::error("mock");
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(
            serde_json::to_value(&n).unwrap(),
            json!({"severity": "error", "message": "mock"})
        );
        assert_eq!(Notification::success("ok").severity, Severity::Success);
    }
}
