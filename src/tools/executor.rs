//! Tool execution against the data store.
//!
//! Every call is folded into a [`ToolResult`] envelope: tool failures of
//! any kind (unknown tool, bad arguments, store errors, missing rows)
//! come back as `{success: false, error}` so one failed call in a round
//! never disturbs its siblings or the orchestration loop.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::datetime::combine_date_and_time;
use crate::error::Result;
use crate::store::{ListTasks, NewTask, TaskPatch, TaskQuery, TaskStore};
use crate::tools::input::{
    CreateTaskArgs, ListProjectsArgs, ListTasksArgs, NamedArgs, SearchTasksArgs,
    TaskRefArgs, ToolInput, UpdateTaskArgs,
};

/// Default page size for `list_tasks`.
const LIST_TASKS_DEFAULT_LIMIT: usize = 20;
/// Default page size for `search_tasks`.
const SEARCH_TASKS_DEFAULT_LIMIT: usize = 10;

/// Outcome envelope for a single tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Executes catalog tools on behalf of one authenticated user at a time.
pub struct ToolExecutor {
    store: Arc<dyn TaskStore>,
}

impl ToolExecutor {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Run one tool call. `today` is the current calendar date in the
    /// requesting user's timezone, used by date-relative list filters.
    /// Never returns `Err` and never panics.
    pub async fn execute(
        &self,
        user_id: Uuid,
        tool_name: &str,
        input: &Value,
        today: NaiveDate,
    ) -> ToolResult {
        debug!(tool = tool_name, "executing tool call");
        let decoded = match ToolInput::decode(tool_name, input) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(tool = tool_name, error = %e, "tool input rejected");
                return ToolResult::fail(e.message());
            }
        };

        let result = match decoded {
            ToolInput::CreateTask(args) => self.create_task(user_id, args).await,
            ToolInput::CompleteTask(args) => {
                self.set_completed(user_id, args, true).await
            }
            ToolInput::ReopenTask(args) => {
                self.set_completed(user_id, args, false).await
            }
            ToolInput::UpdateTask(args) => self.update_task(user_id, args).await,
            ToolInput::DeleteTask(args) => self.delete_task(user_id, args).await,
            ToolInput::ListTasks(args) => self.list_tasks(user_id, args, today).await,
            ToolInput::SearchTasks(args) => self.search_tasks(user_id, args).await,
            ToolInput::ListProjects(args) => self.list_projects(user_id, args).await,
            ToolInput::CreateProject(args) => self.create_project(user_id, args).await,
            ToolInput::ListLabels => self.list_labels(user_id).await,
            ToolInput::CreateLabel(args) => self.create_label(user_id, args).await,
        };

        match result {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = tool_name, error = %e, "tool call failed");
                ToolResult::fail(e.message())
            }
        }
    }

    async fn create_task(&self, user_id: Uuid, args: CreateTaskArgs) -> Result<ToolResult> {
        let due_date = match parse_due(args.due_date.as_deref(), args.due_time.as_deref()) {
            Ok(due) => due,
            Err(msg) => return Ok(ToolResult::fail(msg)),
        };
        let max = self.store.max_order(user_id, args.project_id).await?;
        let task = self
            .store
            .create_task(
                user_id,
                NewTask {
                    project_id: args.project_id,
                    content: args.content,
                    description: None,
                    priority: args.priority.unwrap_or_default(),
                    due_date,
                    order: max.map_or(0, |m| m + 1),
                    label_ids: args.labels.unwrap_or_default(),
                },
            )
            .await?;
        Ok(ToolResult::ok(to_json(&task)?))
    }

    async fn set_completed(
        &self,
        user_id: Uuid,
        args: TaskRefArgs,
        completed: bool,
    ) -> Result<ToolResult> {
        match self.store.set_completed(user_id, args.task_id, completed).await? {
            Some(task) => Ok(ToolResult::ok(to_json(&task)?)),
            None => Ok(ToolResult::fail("Task not found")),
        }
    }

    async fn update_task(&self, user_id: Uuid, args: UpdateTaskArgs) -> Result<ToolResult> {
        let due_date = match args.due_date.as_deref().map(parse_due_timestamp) {
            None => None,
            Some(Ok(due)) => Some(Some(due)),
            Some(Err(msg)) => return Ok(ToolResult::fail(msg)),
        };
        let patch = TaskPatch {
            content: args.content,
            priority: args.priority,
            due_date,
            ..Default::default()
        };
        match self.store.update_task(user_id, args.task_id, patch).await? {
            Some(task) => Ok(ToolResult::ok(to_json(&task)?)),
            None => Ok(ToolResult::fail("Task not found")),
        }
    }

    async fn delete_task(&self, user_id: Uuid, args: TaskRefArgs) -> Result<ToolResult> {
        if self.store.delete_task(user_id, args.task_id).await? {
            Ok(ToolResult::ok(json!({ "deleted": args.task_id })))
        } else {
            Ok(ToolResult::fail("Task not found"))
        }
    }

    async fn list_tasks(
        &self,
        user_id: Uuid,
        args: ListTasksArgs,
        today: NaiveDate,
    ) -> Result<ToolResult> {
        let params = ListTasks {
            filter: args.filter.as_deref().map(TaskQuery::parse).unwrap_or_default(),
            project_id: args.project_id,
            limit: Some(numeric_limit(args.limit, LIST_TASKS_DEFAULT_LIMIT)),
            today: Some(today),
        };
        let tasks = self.store.list_tasks(user_id, params).await?;
        Ok(ToolResult::ok(to_json(&tasks)?))
    }

    async fn search_tasks(&self, user_id: Uuid, args: SearchTasksArgs) -> Result<ToolResult> {
        let limit = numeric_limit(args.limit, SEARCH_TASKS_DEFAULT_LIMIT);
        let tasks = self.store.search_tasks(user_id, &args.query, limit).await?;
        Ok(ToolResult::ok(to_json(&tasks)?))
    }

    async fn list_projects(&self, user_id: Uuid, args: ListProjectsArgs) -> Result<ToolResult> {
        let projects = self
            .store
            .list_projects(user_id, args.include_archived.unwrap_or(false))
            .await?;
        Ok(ToolResult::ok(to_json(&projects)?))
    }

    async fn create_project(&self, user_id: Uuid, args: NamedArgs) -> Result<ToolResult> {
        let project = self
            .store
            .create_project(user_id, &args.name, args.color.as_deref())
            .await?;
        Ok(ToolResult::ok(to_json(&project)?))
    }

    async fn list_labels(&self, user_id: Uuid) -> Result<ToolResult> {
        let labels = self.store.list_labels(user_id).await?;
        Ok(ToolResult::ok(to_json(&labels)?))
    }

    async fn create_label(&self, user_id: Uuid, args: NamedArgs) -> Result<ToolResult> {
        let label = self
            .store
            .create_label(user_id, &args.name, args.color.as_deref())
            .await?;
        Ok(ToolResult::ok(to_json(&label)?))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| crate::error::AiError::ToolError(format!("serialization failed: {e}")))
}

/// Parse `create_task`'s split date (`YYYY-MM-DD`) and time (`HH:mm`).
fn parse_due(
    date: Option<&str>,
    time: Option<&str>,
) -> std::result::Result<Option<DateTime<Utc>>, String> {
    let date = match date {
        Some(d) => Some(
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| format!("Invalid dueDate: {d}"))?,
        ),
        None => None,
    };
    let time = match time {
        Some(t) => Some(
            NaiveTime::parse_from_str(t, "%H:%M")
                .map_err(|_| format!("Invalid dueTime: {t}"))?,
        ),
        None => None,
    };
    Ok(combine_date_and_time(date, time))
}

/// Parse `update_task`'s single ISO field: full timestamp, or bare date
/// anchored the same way the normalizer anchors date-only values.
fn parse_due_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(ts) = combine_date_and_time(Some(date), None) {
            return Ok(ts);
        }
    }
    Err(format!("Invalid dueDate: {raw}"))
}

fn numeric_limit(raw: Option<f64>, default: usize) -> usize {
    match raw {
        Some(n) if n >= 1.0 => n as usize,
        _ => default,
    }
}
