//! Tree module: the channel hierarchy handed to the publisher
//!
//! - `nodes`: channel, topic and content node types
//! - `assembler`: builds the hierarchy from topic groups and resource pools

mod assembler;
mod nodes;

pub use assembler::assemble;
pub use nodes::{
    Channel, ContentNode, FileRef, LeafDefaults, LeafSource, License, Resource, TopicNode,
    TreeNode,
};
