//! Conversational task assistance.

pub mod context;
pub mod orchestrator;

pub use context::{ChatContext, fetch_user_context};
pub use orchestrator::{ChatAction, ChatOrchestrator, ChatOutcome};
