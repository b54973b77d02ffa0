//! Prompts exposed through `prompts/list` and `prompts/get`.

pub mod registry;
pub mod sync_check;

pub use registry::PromptRegistry;
