//! Typed tool inputs and schema validation.
//!
//! Arguments arrive from the model as raw JSON inside `tool_use` blocks.
//! [`ToolInput::decode`] first validates the JSON against the schema the
//! catalog advertised for that tool (required fields, field types), then
//! deserializes into the matching typed variant. Field names are camelCase
//! to match the wire contract.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AiError, Result};
use crate::priority::Priority;
use crate::tools::catalog;

/// One variant per catalog tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInput {
    CreateTask(CreateTaskArgs),
    CompleteTask(TaskRefArgs),
    ReopenTask(TaskRefArgs),
    UpdateTask(UpdateTaskArgs),
    DeleteTask(TaskRefArgs),
    ListTasks(ListTasksArgs),
    SearchTasks(SearchTasksArgs),
    ListProjects(ListProjectsArgs),
    CreateProject(NamedArgs),
    ListLabels,
    CreateLabel(NamedArgs),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskArgs {
    pub content: String,
    /// `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// `HH:mm`.
    pub due_time: Option<String>,
    pub priority: Option<Priority>,
    pub project_id: Option<Uuid>,
    /// Label ids to attach.
    pub labels: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRefArgs {
    pub task_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskArgs {
    pub task_id: Uuid,
    pub content: Option<String>,
    /// ISO date or datetime.
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksArgs {
    pub filter: Option<String>,
    pub project_id: Option<Uuid>,
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTasksArgs {
    pub query: String,
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsArgs {
    pub include_archived: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedArgs {
    pub name: String,
    pub color: Option<String>,
}

impl ToolInput {
    /// Validate raw model-supplied arguments and decode them.
    ///
    /// Unknown tool names and any validation or decode failure come back
    /// as [`AiError::ToolError`]; the executor folds these into result
    /// envelopes rather than letting them escape.
    pub fn decode(tool_name: &str, input: &Value) -> Result<Self> {
        let schema = catalog::schema_for(tool_name)
            .ok_or_else(|| AiError::ToolError(format!("Unknown tool: {tool_name}")))?;
        validate_tool_args(tool_name, input, &schema)?;

        let decode_err = |e: serde_json::Error| {
            AiError::ToolError(format!("tool '{tool_name}': invalid arguments: {e}"))
        };
        let input = input.clone();
        Ok(match tool_name {
            "create_task" => Self::CreateTask(serde_json::from_value(input).map_err(decode_err)?),
            "complete_task" => Self::CompleteTask(serde_json::from_value(input).map_err(decode_err)?),
            "reopen_task" => Self::ReopenTask(serde_json::from_value(input).map_err(decode_err)?),
            "update_task" => Self::UpdateTask(serde_json::from_value(input).map_err(decode_err)?),
            "delete_task" => Self::DeleteTask(serde_json::from_value(input).map_err(decode_err)?),
            "list_tasks" => Self::ListTasks(serde_json::from_value(input).map_err(decode_err)?),
            "search_tasks" => Self::SearchTasks(serde_json::from_value(input).map_err(decode_err)?),
            "list_projects" => Self::ListProjects(serde_json::from_value(input).map_err(decode_err)?),
            "create_project" => Self::CreateProject(serde_json::from_value(input).map_err(decode_err)?),
            "list_labels" => Self::ListLabels,
            "create_label" => Self::CreateLabel(serde_json::from_value(input).map_err(decode_err)?),
            _ => return Err(AiError::ToolError(format!("Unknown tool: {tool_name}"))),
        })
    }
}

/// Validate tool arguments against a JSON schema.
///
/// - All fields listed in `"required"` must be present.
/// - Field types must match those declared in `"properties"`.
/// - Extra fields not in the schema are allowed (open schema).
pub fn validate_tool_args(tool_name: &str, args: &Value, schema: &Value) -> Result<()> {
    let schema_type = schema.get("type").and_then(|t| t.as_str()).unwrap_or("");
    if schema_type != "object" {
        return Ok(());
    }

    let obj = args.as_object().ok_or_else(|| {
        AiError::ToolError(format!(
            "tool '{tool_name}': expected object arguments, got {}",
            json_type_name(args)
        ))
    })?;

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for req_field in required {
            if let Some(field_name) = req_field.as_str()
                && !obj.contains_key(field_name)
            {
                return Err(AiError::ToolError(format!(
                    "tool '{tool_name}': missing required field '{field_name}'"
                )));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        for (key, val) in obj {
            if let Some(prop_schema) = properties.get(key) {
                validate_field_type(tool_name, key, val, prop_schema)?;
            }
        }
    }

    Ok(())
}

fn validate_field_type(
    tool_name: &str,
    field_name: &str,
    value: &Value,
    prop_schema: &Value,
) -> Result<()> {
    let expected_type = match prop_schema.get("type").and_then(|t| t.as_str()) {
        Some(t) => t,
        None => return Ok(()),
    };

    // Optional fields may arrive as explicit nulls.
    if value.is_null() {
        return Ok(());
    }

    let matches = match expected_type {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    };

    if !matches {
        return Err(AiError::ToolError(format!(
            "tool '{tool_name}': field '{field_name}' expected {expected_type}, got {}",
            json_type_name(value)
        )));
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
