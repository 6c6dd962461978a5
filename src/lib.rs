//! taskwise — AI core for natural-language task management.
//!
//! This crate turns free-form user text into concrete task operations,
//! two ways:
//!
//! - [`parser::parse_task`] extracts structured task data ("buy milk
//!   tomorrow at 3pm #errands !!") in a single model round-trip, which
//!   [`quick_add::quick_add`] then resolves against the user's projects
//!   and labels and persists.
//! - [`chat::ChatOrchestrator`] runs full conversations, letting the
//!   model call catalog tools (create/complete/list/search tasks, manage
//!   projects and labels) in bounded rounds while recording every action.
//!
//! Everything data-touching goes through the [`store::TaskStore`] seam;
//! the model side goes through [`client::CompletionBackend`], implemented
//! for the Anthropic Messages API by [`client::AnthropicBackend`].

pub mod chat;
pub mod client;
pub mod config;
pub mod datetime;
pub mod error;
pub mod message;
pub mod parser;
pub mod priority;
pub mod prompts;
pub mod quick_add;
pub mod resolver;
pub mod store;
pub mod tools;

pub use chat::{ChatAction, ChatContext, ChatOrchestrator, ChatOutcome, fetch_user_context};
pub use client::{AnthropicBackend, ClientCache, CompletionBackend, MessagesRequest, ToolDefinition};
pub use config::AiConfig;
pub use error::{AiError, Result};
pub use message::{ChatMessage, ContentBlock, MessageBody, MessagesResponse, Role, StopReason};
pub use parser::{ParseContext, ParsedTask, Recurrence, parse_task};
pub use priority::Priority;
pub use quick_add::{QuickAddOptions, QuickAddOutcome, quick_add};
pub use resolver::{EntityRef, Resolution};
pub use store::{MemoryStore, Task, TaskStore};
pub use tools::{ToolExecutor, ToolResult};
