//! In-process session dispatch table.
//!
//! Holds the tools the agent may call right now and implements the
//! [`ToolRegistrar`] hook, so tools published mid-session are dispatchable by
//! the very next call. Wire transport is left to the embedding server.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::params::Arguments;
use crate::toolsets::{CallToolResult, ServerTool, ToolDescriptor, ToolRegistrar, ToolsetGroup};
use crate::types::{Error, Result};

/// Tools currently dispatchable in one agent session, keyed by name.
#[derive(Debug, Default)]
pub struct Session {
    tools: RwLock<BTreeMap<String, ServerTool>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish every tool the group currently considers active.
    pub async fn register_group(&self, group: &ToolsetGroup) {
        self.register_tools(group.active_tools()).await;
    }

    /// Descriptors of every dispatchable tool, sorted by name.
    pub async fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools
            .read()
            .await
            .values()
            .map(|tool| tool.descriptor().clone())
            .collect()
    }

    pub async fn has_tool(&self, name: &str) -> bool {
        self.tools.read().await.contains_key(name)
    }

    pub async fn tool_count(&self) -> usize {
        self.tools.read().await.len()
    }

    /// Dispatch one call.
    ///
    /// An unknown tool name is `NotFound`; every failure inside the tool comes
    /// back as an `isError` result instead.
    pub async fn call_tool(&self, name: &str, args: Arguments) -> Result<CallToolResult> {
        // Cloned out so the handler may register tools without deadlocking.
        let tool = self
            .tools
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("tool {name}")))?;

        tracing::debug!(tool = %name, "dispatching tool call");
        Ok(tool.call(self, &args).await)
    }
}

#[async_trait]
impl ToolRegistrar for Session {
    async fn register_tools(&self, tools: Vec<ServerTool>) {
        if tools.is_empty() {
            return;
        }
        let mut table = self.tools.write().await;
        let mut count = 0;
        for tool in tools {
            match table.get(tool.name()) {
                Some(existing) if existing.same_tool(&tool) => {}
                Some(_) => {
                    tracing::warn!(tool = %tool.name(), "refusing to replace a different tool with the same name");
                }
                None => {
                    table.insert(tool.name().to_string(), tool);
                    count += 1;
                }
            }
        }
        tracing::info!(registered = count, total = table.len(), "tools registered with session");
    }
}
