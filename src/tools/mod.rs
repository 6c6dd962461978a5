//! Tool catalog, typed inputs, and execution.

pub mod catalog;
pub mod executor;
pub mod input;

pub use catalog::all_tools;
pub use executor::{ToolExecutor, ToolResult};
pub use input::ToolInput;
