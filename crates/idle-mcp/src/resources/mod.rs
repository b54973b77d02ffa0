//! Resources exposed through `resources/list` and `resources/read`.

pub mod contract;
pub mod registry;

pub use registry::ResourceRegistry;
