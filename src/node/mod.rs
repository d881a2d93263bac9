pub mod chain;
pub mod runtime;
pub mod start;

/// Name reported by `system_name`, shared by every network's collator.
pub const NODE_NAME: &str = "Astar Collator";
