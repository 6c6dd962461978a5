//! Per-request grounding snapshot.
//!
//! Fetched once at the top of each chat turn so the model sees stable
//! project and label listings for the whole turn, even while its own tool
//! calls mutate the store.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::resolver::EntityRef;
use crate::store::TaskStore;

/// Snapshot of the user's entities for one chat turn.
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub user_id: Uuid,
    /// Non-archived projects.
    pub projects: Vec<EntityRef>,
    pub labels: Vec<EntityRef>,
}

impl ChatContext {
    /// Render the grounding block appended to the system prompt.
    pub fn grounding_block(&self, current_date: NaiveDate, timezone: &str) -> String {
        format!(
            "\nUser's projects: {}\nUser's labels: {}\nCurrent date: {}\nUser's timezone: {}\n",
            render_entities(&self.projects),
            render_entities(&self.labels),
            current_date.format("%Y-%m-%d"),
            timezone,
        )
    }
}

fn render_entities(entities: &[EntityRef]) -> String {
    if entities.is_empty() {
        return "none".to_string();
    }
    entities
        .iter()
        .map(|e| format!("{} (id: {})", e.name, e.id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Snapshot the user's non-archived projects and all labels.
pub async fn fetch_user_context(
    store: &Arc<dyn TaskStore>,
    user_id: Uuid,
) -> Result<ChatContext> {
    let projects = store
        .list_projects(user_id, false)
        .await?
        .into_iter()
        .map(|p| EntityRef {
            id: p.id,
            name: p.name,
        })
        .collect();
    let labels = store
        .list_labels(user_id)
        .await?
        .into_iter()
        .map(|l| EntityRef {
            id: l.id,
            name: l.name,
        })
        .collect();
    Ok(ChatContext {
        user_id,
        projects,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn grounding_block_lists_names_with_ids() {
        let project_id = Uuid::new_v4();
        let context = ChatContext {
            user_id: Uuid::new_v4(),
            projects: vec![EntityRef {
                id: project_id,
                name: "Work".into(),
            }],
            labels: vec![],
        };
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let block = context.grounding_block(date, "America/New_York");
        assert!(block.contains(&format!("Work (id: {project_id})")));
        assert!(block.contains("User's labels: none"));
        assert!(block.contains("Current date: 2026-08-30"));
        assert!(block.contains("User's timezone: America/New_York"));
    }

    #[tokio::test]
    async fn fetch_skips_archived_projects() {
        let store: Arc<dyn TaskStore> = Arc::new(MemoryStore::new());
        let user = Uuid::new_v4();
        store.create_project(user, "Active", None).await.unwrap();
        store.create_label(user, "urgent", None).await.unwrap();

        let context = fetch_user_context(&store, user).await.unwrap();
        assert_eq!(context.projects.len(), 1);
        assert_eq!(context.projects[0].name, "Active");
        assert_eq!(context.labels.len(), 1);
    }
}
