//! Static tool catalog advertised to the model.
//!
//! Declarations here are the single source of truth for the tool wire
//! contract: [`crate::tools::input`] validates incoming arguments against
//! these same schemas before typed decode, so the advertised shape and the
//! accepted shape cannot drift apart.

use serde_json::{Value, json};

use crate::client::ToolDefinition;

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Every tool the assistant can call, task tools first.
pub fn all_tools() -> Vec<ToolDefinition> {
    vec![
        tool(
            "create_task",
            "Create a new task for the user",
            json!({
                "type": "object",
                "properties": {
                    "content": { "type": "string", "description": "The task content/title" },
                    "dueDate": { "type": "string", "description": "Due date in ISO format (YYYY-MM-DD)" },
                    "dueTime": { "type": "string", "description": "Due time in HH:mm format" },
                    "priority": { "type": "string", "enum": ["p1", "p2", "p3", "p4"], "description": "Priority level (p1=urgent, p4=normal)" },
                    "projectId": { "type": "string", "description": "Project UUID to add task to" },
                    "labels": { "type": "array", "items": { "type": "string" }, "description": "Label IDs to attach" }
                },
                "required": ["content"]
            }),
        ),
        tool(
            "complete_task",
            "Mark a task as complete",
            json!({
                "type": "object",
                "properties": {
                    "taskId": { "type": "string", "description": "The task UUID to complete" }
                },
                "required": ["taskId"]
            }),
        ),
        tool(
            "reopen_task",
            "Reopen a completed task",
            json!({
                "type": "object",
                "properties": {
                    "taskId": { "type": "string", "description": "The task UUID to reopen" }
                },
                "required": ["taskId"]
            }),
        ),
        tool(
            "update_task",
            "Update an existing task",
            json!({
                "type": "object",
                "properties": {
                    "taskId": { "type": "string", "description": "The task UUID to update" },
                    "content": { "type": "string", "description": "New task content" },
                    "dueDate": { "type": "string", "description": "New due date in ISO format" },
                    "priority": { "type": "string", "enum": ["p1", "p2", "p3", "p4"], "description": "New priority" }
                },
                "required": ["taskId"]
            }),
        ),
        tool(
            "delete_task",
            "Delete a task",
            json!({
                "type": "object",
                "properties": {
                    "taskId": { "type": "string", "description": "The task UUID to delete" }
                },
                "required": ["taskId"]
            }),
        ),
        tool(
            "list_tasks",
            "List tasks with optional filters",
            json!({
                "type": "object",
                "properties": {
                    "filter": {
                        "type": "string",
                        "enum": ["today", "tomorrow", "upcoming", "overdue", "completed", "all"],
                        "description": "Filter type for tasks"
                    },
                    "projectId": { "type": "string", "description": "Filter by project UUID" },
                    "limit": { "type": "number", "description": "Maximum number of tasks to return" }
                }
            }),
        ),
        tool(
            "search_tasks",
            "Search tasks by content",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query" },
                    "limit": { "type": "number", "description": "Maximum results" }
                },
                "required": ["query"]
            }),
        ),
        tool(
            "list_projects",
            "List all projects for the user",
            json!({
                "type": "object",
                "properties": {
                    "includeArchived": { "type": "boolean", "description": "Include archived projects" }
                }
            }),
        ),
        tool(
            "create_project",
            "Create a new project",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Project name" },
                    "color": { "type": "string", "description": "Project color" }
                },
                "required": ["name"]
            }),
        ),
        tool(
            "list_labels",
            "List all labels for the user",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
        tool(
            "create_label",
            "Create a new label",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Label name" },
                    "color": { "type": "string", "description": "Label color" }
                },
                "required": ["name"]
            }),
        ),
    ]
}

/// Look up a tool's schema by name.
pub fn schema_for(name: &str) -> Option<Value> {
    all_tools()
        .into_iter()
        .find(|t| t.name == name)
        .map(|t| t.input_schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eleven_tools() {
        assert_eq!(all_tools().len(), 11);
    }

    #[test]
    fn tool_names_are_unique() {
        let tools = all_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn every_schema_is_an_object_schema() {
        for t in all_tools() {
            assert_eq!(t.input_schema["type"], "object", "tool {}", t.name);
            assert!(t.input_schema.get("properties").is_some(), "tool {}", t.name);
        }
    }

    #[test]
    fn schema_for_known_and_unknown() {
        let schema = schema_for("create_task");
        assert!(schema.is_some_and(|s| s["required"][0] == "content"));
        assert!(schema_for("explode").is_none());
    }
}
