//! Toolset infrastructure — descriptors, toolsets, the group registry, and
//! runtime enablement.

pub mod dynamic;
pub mod group;
pub mod tool;
pub mod toolset;

pub use dynamic::{dynamic_toolset, DYNAMIC_TOOLSET};
pub use group::{SharedToolsetGroup, ToolsetGroup};
pub use tool::{
    CallToolResult, Content, InputSchema, PropertySchema, ServerTool, ToolAnnotations,
    ToolDescriptor, ToolHandler, ToolRegistrar,
};
pub use toolset::Toolset;
