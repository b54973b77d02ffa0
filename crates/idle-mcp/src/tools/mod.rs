//! Tools exposed through `tools/call`.

pub mod contract;
pub mod exec;
pub mod registry;

pub use registry::ToolRegistry;
