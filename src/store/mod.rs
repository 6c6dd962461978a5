//! Data-store seam.
//!
//! The AI subsystem never talks to a database directly; everything goes
//! through [`TaskStore`]. The crate ships [`MemoryStore`] as the reference
//! implementation for tests and embedding hosts.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::priority::Priority;

/// A task row. Serializes in the camelCase shape tool results carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub content: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub order: i32,
    pub label_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A project row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub is_archived: bool,
}

/// A label row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

/// Fields for creating a task. `order` is assigned by the caller
/// (read-max-then-increment).
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub project_id: Option<Uuid>,
    pub content: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub order: i32,
    pub label_ids: Vec<Uuid>,
}

/// Partial update; `None` leaves a field untouched, the double-`Option`
/// fields distinguish "leave" from "clear".
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub content: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub project_id: Option<Option<Uuid>>,
}

/// Named list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskQuery {
    Today,
    Tomorrow,
    Upcoming,
    Overdue,
    Completed,
    #[default]
    All,
}

impl TaskQuery {
    /// Parse the wire-level filter string. Unknown values fall back to
    /// [`TaskQuery::All`].
    pub fn parse(value: &str) -> Self {
        match value {
            "today" => Self::Today,
            "tomorrow" => Self::Tomorrow,
            "upcoming" => Self::Upcoming,
            "overdue" => Self::Overdue,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }
}

/// Parameters for a filtered list.
#[derive(Debug, Clone, Default)]
pub struct ListTasks {
    pub filter: TaskQuery,
    pub project_id: Option<Uuid>,
    pub limit: Option<usize>,
    /// Calendar date for "today" in the requesting user's timezone.
    pub today: Option<NaiveDate>,
}

/// Scoped data access for tasks, projects, and labels.
///
/// Every method takes the acting user's id; implementations must only
/// return or touch rows owned by that user.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, user_id: Uuid, new: NewTask) -> Result<Task>;
    async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>>;
    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>>;
    async fn set_completed(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<Option<Task>>;
    async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<bool>;
    async fn list_tasks(&self, user_id: Uuid, params: ListTasks) -> Result<Vec<Task>>;
    async fn search_tasks(
        &self,
        user_id: Uuid,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Task>>;
    /// Highest `order` among the user's tasks in the given project scope,
    /// `None` when the scope has no tasks yet.
    async fn max_order(&self, user_id: Uuid, project_id: Option<Uuid>)
        -> Result<Option<i32>>;

    async fn list_projects(&self, user_id: Uuid, include_archived: bool)
        -> Result<Vec<Project>>;
    async fn create_project(
        &self,
        user_id: Uuid,
        name: &str,
        color: Option<&str>,
    ) -> Result<Project>;

    async fn list_labels(&self, user_id: Uuid) -> Result<Vec<Label>>;
    async fn create_label(
        &self,
        user_id: Uuid,
        name: &str,
        color: Option<&str>,
    ) -> Result<Label>;
}
