//! Quick add: parse natural language and create the task in one step.

use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{debug, info};
use uuid::Uuid;

use crate::client::CompletionBackend;
use crate::config::AiConfig;
use crate::datetime::combine_date_and_time;
use crate::error::Result;
use crate::parser::{ParseContext, ParsedTask, parse_task};
use crate::resolver::{EntityRef, Resolution, resolve_labels, resolve_project};
use crate::store::{NewTask, Task, TaskStore};

/// Caller options for quick add.
#[derive(Debug, Clone, Default)]
pub struct QuickAddOptions {
    /// Explicit target project; overrides whatever the parser matched.
    pub project_id: Option<Uuid>,
    /// Create the project when the parsed name matches nothing.
    pub create_project: bool,
    /// Create labels when parsed names match nothing.
    pub create_labels: bool,
}

/// The created task plus what the parser saw and what got created on
/// the way.
#[derive(Debug, Clone)]
pub struct QuickAddOutcome {
    pub task: Task,
    pub parsed: ParsedTask,
    pub project_created: bool,
    pub labels_created: bool,
}

/// Parse `text` and create the resulting task.
///
/// Entity creation happens before task creation and is not transactional
/// with it: a parse that creates a project and then fails to create the
/// task leaves the project behind.
pub async fn quick_add(
    backend: &dyn CompletionBackend,
    store: &Arc<dyn TaskStore>,
    config: &AiConfig,
    user_id: Uuid,
    text: &str,
    options: &QuickAddOptions,
    tz: Tz,
) -> Result<QuickAddOutcome> {
    debug!(text_len = text.len(), "quick add");

    let projects: Vec<EntityRef> = store
        .list_projects(user_id, true)
        .await?
        .into_iter()
        .map(|p| EntityRef { id: p.id, name: p.name })
        .collect();
    let labels: Vec<EntityRef> = store
        .list_labels(user_id)
        .await?
        .into_iter()
        .map(|l| EntityRef { id: l.id, name: l.name })
        .collect();

    let context = ParseContext {
        projects: projects.iter().map(|p| p.name.clone()).collect(),
        labels: labels.iter().map(|l| l.name.clone()).collect(),
    };
    let parsed = parse_task(backend, config, text, &context, tz).await?;

    let mut project_id = options.project_id;
    let mut project_created = false;
    if project_id.is_none()
        && let Some(name) = &parsed.project
    {
        let resolution =
            resolve_project(store, user_id, &projects, name, options.create_project).await?;
        project_id = resolution.id();
        project_created = matches!(resolution, Resolution::Created(_));
    }

    let label_resolution =
        resolve_labels(store, user_id, &labels, &parsed.labels, options.create_labels).await?;

    let max = store.max_order(user_id, project_id).await?;
    let task = store
        .create_task(
            user_id,
            NewTask {
                project_id,
                content: parsed.content.clone(),
                description: None,
                priority: parsed.priority.unwrap_or_default(),
                due_date: combine_date_and_time(parsed.due_date, parsed.due_time),
                order: max.map_or(0, |m| m + 1),
                label_ids: label_resolution.ids,
            },
        )
        .await?;

    info!(task = %task.id, project_created, "quick add complete");
    Ok(QuickAddOutcome {
        task,
        parsed,
        project_created,
        labels_created: label_resolution.created,
    })
}
