//! Entity resolution for parsed task text.
//!
//! The parser returns project and label *names*; this module maps them to
//! ids against a snapshot of the user's entities, creating them when the
//! caller has opted in. Matching is case-insensitive exact-name; when a
//! user has duplicate names the first snapshot entry wins.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::store::TaskStore;

/// Minimal `{id, name}` view of a project or label.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRef {
    pub id: Uuid,
    pub name: String,
}

/// Outcome of resolving a single named entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Matched an existing entity.
    Existing(Uuid),
    /// No match; a new entity was created.
    Created(Uuid),
    /// No match and creation was not allowed.
    Unresolved,
}

impl Resolution {
    pub fn id(self) -> Option<Uuid> {
        match self {
            Self::Existing(id) | Self::Created(id) => Some(id),
            Self::Unresolved => None,
        }
    }
}

/// Outcome of resolving a set of label names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelResolution {
    /// Ids of every label that resolved, matched and created alike.
    pub ids: Vec<Uuid>,
    /// Whether any label had to be created.
    pub created: bool,
}

fn find_by_name(snapshot: &[EntityRef], name: &str) -> Option<Uuid> {
    snapshot
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name))
        .map(|e| e.id)
}

/// Resolve a project name against the snapshot, optionally creating it.
pub async fn resolve_project(
    store: &Arc<dyn TaskStore>,
    user_id: Uuid,
    snapshot: &[EntityRef],
    name: &str,
    auto_create: bool,
) -> Result<Resolution> {
    if let Some(id) = find_by_name(snapshot, name) {
        return Ok(Resolution::Existing(id));
    }
    if auto_create {
        let project = store.create_project(user_id, name, None).await?;
        info!(project = name, "created project during resolution");
        return Ok(Resolution::Created(project.id));
    }
    Ok(Resolution::Unresolved)
}

/// Resolve label names against the snapshot. Unresolved names are silently
/// skipped when creation is off; there is no partial failure.
pub async fn resolve_labels(
    store: &Arc<dyn TaskStore>,
    user_id: Uuid,
    snapshot: &[EntityRef],
    names: &[String],
    auto_create: bool,
) -> Result<LabelResolution> {
    let mut out = LabelResolution::default();
    for name in names {
        if let Some(id) = find_by_name(snapshot, name) {
            out.ids.push(id);
        } else if auto_create {
            let label = store.create_label(user_id, name, None).await?;
            info!(label = %name, "created label during resolution");
            out.ids.push(label.id);
            out.created = true;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn snapshot(entries: &[(&str, Uuid)]) -> Vec<EntityRef> {
        entries
            .iter()
            .map(|(name, id)| EntityRef {
                id: *id,
                name: name.to_string(),
            })
            .collect()
    }

    fn store() -> Arc<dyn TaskStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn matches_are_case_insensitive() {
        let store = store();
        let id = Uuid::new_v4();
        let snap = snapshot(&[("Work", id)]);
        let resolved = resolve_project(&store, Uuid::new_v4(), &snap, "wOrK", false)
            .await
            .unwrap();
        assert_eq!(resolved, Resolution::Existing(id));
    }

    #[tokio::test]
    async fn first_snapshot_entry_wins_on_duplicates() {
        let store = store();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let snap = snapshot(&[("home", first), ("Home", second)]);
        let resolved = resolve_project(&store, Uuid::new_v4(), &snap, "HOME", false)
            .await
            .unwrap();
        assert_eq!(resolved, Resolution::Existing(first));
    }

    #[tokio::test]
    async fn unmatched_without_create_is_unresolved() {
        let store = store();
        let resolved = resolve_project(&store, Uuid::new_v4(), &[], "Errands", false)
            .await
            .unwrap();
        assert_eq!(resolved, Resolution::Unresolved);
        assert!(resolved.id().is_none());
    }

    #[tokio::test]
    async fn unmatched_with_create_makes_a_project() {
        let store = store();
        let user = Uuid::new_v4();
        let resolved = resolve_project(&store, user, &[], "Errands", true)
            .await
            .unwrap();
        let Resolution::Created(id) = resolved else {
            unreachable!("project must be created");
        };
        let projects = store.list_projects(user, false).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, id);
        assert_eq!(projects[0].name, "Errands");
    }

    #[tokio::test]
    async fn labels_mix_matched_created_and_skipped() {
        let store = store();
        let user = Uuid::new_v4();
        let existing = store.create_label(user, "home", None).await.unwrap();
        let snap = snapshot(&[("home", existing.id)]);

        let names = vec!["HOME".to_string(), "new-label".to_string()];
        let without_create = resolve_labels(&store, user, &snap, &names, false)
            .await
            .unwrap();
        assert_eq!(without_create.ids, vec![existing.id]);
        assert!(!without_create.created);

        let with_create = resolve_labels(&store, user, &snap, &names, true)
            .await
            .unwrap();
        assert_eq!(with_create.ids.len(), 2);
        assert!(with_create.created);
        assert_eq!(store.list_labels(user).await.unwrap().len(), 2);
    }
}
