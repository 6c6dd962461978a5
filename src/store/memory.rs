//! In-memory [`TaskStore`] implementation.
//!
//! Backs the test suites and embedding hosts that have no database.
//! State lives in plain `HashMap`s under a `Mutex`; critical sections
//! never hold the lock across an await.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AiError, Result};
use super::{
    Label, ListTasks, NewTask, Project, Task, TaskPatch, TaskQuery, TaskStore,
};

#[derive(Default)]
struct State {
    tasks: HashMap<Uuid, Task>,
    projects: HashMap<Uuid, Project>,
    labels: HashMap<Uuid, Label>,
}

/// HashMap-backed store, safe to share across tasks.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AiError::StoreError("store lock poisoned".into()))
    }
}

/// Stable list ordering: priority, then due date (undated last), then
/// manual order, then creation time.
fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.priority
        .as_int()
        .cmp(&b.priority.as_int())
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.order.cmp(&b.order))
        .then_with(|| a.created_at.cmp(&b.created_at))
}

fn matches_filter(task: &Task, params: &ListTasks) -> bool {
    if let Some(project_id) = params.project_id {
        if task.project_id != Some(project_id) {
            return false;
        }
    }
    let today = params.today.unwrap_or_else(|| Utc::now().date_naive());
    let due_day = task.due_date.map(|d| d.date_naive());
    match params.filter {
        TaskQuery::Today => !task.is_completed && due_day == Some(today),
        TaskQuery::Tomorrow => {
            !task.is_completed && due_day == today.succ_opt()
        }
        TaskQuery::Upcoming => {
            // Today through the next seven days.
            !task.is_completed
                && due_day
                    .is_some_and(|d| d >= today && d <= today + chrono::Duration::days(7))
        }
        TaskQuery::Overdue => {
            !task.is_completed && due_day.is_some_and(|d| d < today)
        }
        TaskQuery::Completed => task.is_completed,
        TaskQuery::All => !task.is_completed,
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, user_id: Uuid, new: NewTask) -> Result<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            user_id,
            project_id: new.project_id,
            content: new.content,
            description: new.description,
            priority: new.priority,
            due_date: new.due_date,
            is_completed: false,
            completed_at: None,
            order: new.order,
            label_ids: new.label_ids,
            created_at: Utc::now(),
        };
        self.lock()?.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<Task>> {
        let state = self.lock()?;
        Ok(state
            .tasks
            .get(&task_id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>> {
        let mut state = self.lock()?;
        let Some(task) = state
            .tasks
            .get_mut(&task_id)
            .filter(|t| t.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(content) = patch.content {
            task.content = content;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = project_id;
        }
        Ok(Some(task.clone()))
    }

    async fn set_completed(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<Option<Task>> {
        let mut state = self.lock()?;
        let Some(task) = state
            .tasks
            .get_mut(&task_id)
            .filter(|t| t.user_id == user_id)
        else {
            return Ok(None);
        };
        task.is_completed = completed;
        task.completed_at = completed.then(Utc::now);
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<bool> {
        let mut state = self.lock()?;
        let owned = state
            .tasks
            .get(&task_id)
            .is_some_and(|t| t.user_id == user_id);
        if owned {
            state.tasks.remove(&task_id);
        }
        Ok(owned)
    }

    async fn list_tasks(&self, user_id: Uuid, params: ListTasks) -> Result<Vec<Task>> {
        let state = self.lock()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.user_id == user_id && matches_filter(t, &params))
            .cloned()
            .collect();
        tasks.sort_by(compare_tasks);
        if let Some(limit) = params.limit {
            tasks.truncate(limit);
        }
        Ok(tasks)
    }

    async fn search_tasks(
        &self,
        user_id: Uuid,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Task>> {
        let needle = query.to_lowercase();
        let state = self.lock()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| {
                t.user_id == user_id && t.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        tasks.sort_by(compare_tasks);
        tasks.truncate(limit);
        Ok(tasks)
    }

    async fn max_order(
        &self,
        user_id: Uuid,
        project_id: Option<Uuid>,
    ) -> Result<Option<i32>> {
        let state = self.lock()?;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.user_id == user_id && t.project_id == project_id)
            .map(|t| t.order)
            .max())
    }

    async fn list_projects(
        &self,
        user_id: Uuid,
        include_archived: bool,
    ) -> Result<Vec<Project>> {
        let state = self.lock()?;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| p.user_id == user_id && (include_archived || !p.is_archived))
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    async fn create_project(
        &self,
        user_id: Uuid,
        name: &str,
        color: Option<&str>,
    ) -> Result<Project> {
        let project = Project {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            color: color.map(str::to_string),
            is_archived: false,
        };
        self.lock()?.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn list_labels(&self, user_id: Uuid) -> Result<Vec<Label>> {
        let state = self.lock()?;
        let mut labels: Vec<Label> = state
            .labels
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        labels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(labels)
    }

    async fn create_label(
        &self,
        user_id: Uuid,
        name: &str,
        color: Option<&str>,
    ) -> Result<Label> {
        let label = Label {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            color: color.map(str::to_string),
        };
        self.lock()?.labels.insert(label.id, label.clone());
        Ok(label)
    }
}
