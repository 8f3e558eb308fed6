//! Dynamic enablement — tools that let the agent discover and enable toolsets
//! mid-session.
//!
//! The three tools live in their own always-enabled `dynamic` toolset, outside
//! the group they control, and are read tools: they change which tools the
//! session exposes, never remote state, so they stay available in read-only
//! mode. Enabling flips the flag and publishes the newly active tools through
//! the session's [`ToolRegistrar`] while holding the group's write lock, so a
//! later call in the same session can use them.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use super::group::SharedToolsetGroup;
use super::tool::{
    CallToolResult, PropertySchema, ServerTool, ToolAnnotations, ToolDescriptor, ToolHandler,
    ToolRegistrar,
};
use super::toolset::Toolset;
use crate::params::{self, Arguments};
use crate::translations::Translator;
use crate::types::{Error, Result};

/// Name of the toolset holding the enablement tools.
pub const DYNAMIC_TOOLSET: &str = "dynamic";

pub const LIST_AVAILABLE_TOOLSETS: &str = "list_available_toolsets";
pub const GET_TOOLSET_TOOLS: &str = "get_toolset_tools";
pub const ENABLE_TOOLSET: &str = "enable_toolset";

// =============================================================================
// Response payloads
// =============================================================================

/// One entry of `list_available_toolsets`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolsetSummary {
    pub name: String,
    pub description: String,
    pub can_enable: String,
    pub currently_enabled: String,
}

/// One entry of `get_toolset_tools`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    pub can_enable: String,
    pub toolset: String,
}

// =============================================================================
// Handlers
// =============================================================================

struct ListAvailableToolsets {
    group: SharedToolsetGroup,
}

#[async_trait]
impl ToolHandler for ListAvailableToolsets {
    async fn call(&self, _registrar: &dyn ToolRegistrar, _args: &Arguments) -> Result<CallToolResult> {
        let group = self.group.read().await;
        let summaries: Vec<ToolsetSummary> = group
            .toolsets()
            .map(|ts| ToolsetSummary {
                name: ts.name().to_string(),
                description: ts.description().to_string(),
                can_enable: "true".to_string(),
                currently_enabled: ts.is_enabled().to_string(),
            })
            .collect();
        CallToolResult::json(&summaries)
    }
}

struct GetToolsetTools {
    group: SharedToolsetGroup,
}

#[async_trait]
impl ToolHandler for GetToolsetTools {
    async fn call(&self, _registrar: &dyn ToolRegistrar, args: &Arguments) -> Result<CallToolResult> {
        let name = params::required::<String>(args, "toolset")?;

        let group = self.group.read().await;
        let toolset = group
            .toolset(&name)
            .ok_or_else(|| Error::not_found(format!("toolset {name}")))?;

        let summaries: Vec<ToolSummary> = toolset
            .available_tools()
            .iter()
            .map(|tool| ToolSummary {
                name: tool.name().to_string(),
                description: tool.descriptor().description.clone(),
                can_enable: "true".to_string(),
                toolset: name.clone(),
            })
            .collect();
        CallToolResult::json(&summaries)
    }
}

struct EnableToolset {
    group: SharedToolsetGroup,
}

#[async_trait]
impl ToolHandler for EnableToolset {
    async fn call(&self, registrar: &dyn ToolRegistrar, args: &Arguments) -> Result<CallToolResult> {
        let name = params::required::<String>(args, "toolset")?;

        // Held until registration completes so enables never interleave.
        let mut group = self.group.write().await;
        if !group.enable_toolset(&name)? {
            return Ok(CallToolResult::text(format!(
                "Toolset {name} is already enabled"
            )));
        }

        let tools = group
            .toolset(&name)
            .map(Toolset::active_tools)
            .unwrap_or_default();
        tracing::debug!(toolset = %name, tools = tools.len(), "publishing newly active tools");
        registrar.register_tools(tools).await;

        Ok(CallToolResult::text(format!("Toolset {name} enabled")))
    }
}

// =============================================================================
// Toolset construction
// =============================================================================

fn toolset_param(toolset_names: &[String], translator: &Translator, key: &str) -> PropertySchema {
    PropertySchema::string(translator.translate(key, "The name of the toolset"))
        .with_enum(toolset_names.iter().cloned())
}

/// Build the enabled `dynamic` toolset controlling `group`.
///
/// `toolset_names` feeds the `enum` of the `toolset` parameter and should be
/// every name registered in `group`.
pub fn dynamic_toolset(
    group: &SharedToolsetGroup,
    toolset_names: &[String],
    translator: &Translator,
) -> Toolset {
    let list = ServerTool::new(
        ToolDescriptor::new(
            LIST_AVAILABLE_TOOLSETS,
            translator.translate(
                "TOOL_LIST_AVAILABLE_TOOLSETS_DESCRIPTION",
                "List available toolsets this server can offer, providing the enabled status of each. \
                 Use this when a task could be achieved with a tool and the currently available tools aren't enough. \
                 Call get_toolset_tools with these toolset names to discover specific tools you can call",
            ),
        )
        .with_annotations(ToolAnnotations::read_only(translator.translate(
            "TOOL_LIST_AVAILABLE_TOOLSETS_USER_TITLE",
            "List available toolsets",
        ))),
        Arc::new(ListAvailableToolsets {
            group: Arc::clone(group),
        }),
    );

    let inspect = ServerTool::new(
        ToolDescriptor::new(
            GET_TOOLSET_TOOLS,
            translator.translate(
                "TOOL_GET_TOOLSET_TOOLS_DESCRIPTION",
                "Lists all the capabilities that are enabled with the specified toolset. \
                 Use this to get clarity on whether enabling a toolset would help you to complete a task",
            ),
        )
        .with_annotations(ToolAnnotations::read_only(translator.translate(
            "TOOL_GET_TOOLSET_TOOLS_USER_TITLE",
            "List all tools in a toolset",
        )))
        .with_param(
            "toolset",
            toolset_param(toolset_names, translator, "TOOL_GET_TOOLSET_TOOLS_TOOLSET_DESCRIPTION"),
            true,
        ),
        Arc::new(GetToolsetTools {
            group: Arc::clone(group),
        }),
    );

    let enable = ServerTool::new(
        ToolDescriptor::new(
            ENABLE_TOOLSET,
            translator.translate(
                "TOOL_ENABLE_TOOLSET_DESCRIPTION",
                "Enable one of the sets of tools the server provides. \
                 Use get_toolset_tools and list_available_toolsets first to see what this will enable",
            ),
        )
        .with_annotations(ToolAnnotations::read_only(translator.translate(
            "TOOL_ENABLE_TOOLSET_USER_TITLE",
            "Enable a toolset",
        )))
        .with_param(
            "toolset",
            toolset_param(toolset_names, translator, "TOOL_ENABLE_TOOLSET_TOOLSET_DESCRIPTION"),
            true,
        ),
        Arc::new(EnableToolset {
            group: Arc::clone(group),
        }),
    );

    let mut toolset = Toolset::new(
        DYNAMIC_TOOLSET,
        "Discover tools that can help achieve tasks by enabling additional sets of tools, you can control the enablement of any toolset to access its tools when this toolset is enabled.",
    )
    .add_read_tools([list, inspect, enable]);
    toolset.enable();
    toolset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolsets::group::ToolsetGroup;
    use crate::toolsets::tool::MockToolRegistrar;
    use crate::toolsets::toolset::tests::{issues, tool};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn shared_group() -> (SharedToolsetGroup, Toolset) {
        let mut g = ToolsetGroup::new(false);
        g.add_toolset(
            Toolset::new("repos", "GitHub Repository related tools")
                .add_read_tools([tool("get_file_contents")]),
        )
        .unwrap();
        g.add_toolset(issues()).unwrap();
        let names = g.toolset_names();
        let shared = g.into_shared();
        let dynamic = dynamic_toolset(&shared, &names, &Translator::new());
        (shared, dynamic)
    }

    fn find<'a>(ts: &'a Toolset, name: &str) -> &'a ServerTool {
        ts.read_tools().iter().find(|t| t.name() == name).unwrap()
    }

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap()
    }

    async fn list(dynamic: &Toolset) -> Value {
        let result = find(dynamic, LIST_AVAILABLE_TOOLSETS)
            .call(&MockToolRegistrar::new(), &Arguments::new())
            .await;
        serde_json::from_str(&result.text_content()).unwrap()
    }

    #[test]
    fn test_dynamic_toolset_shape() {
        let (_, dynamic) = shared_group();
        assert!(dynamic.is_enabled());
        assert!(dynamic.write_tools().is_empty());
        assert_eq!(
            dynamic.tool_names().collect::<Vec<_>>(),
            vec![LIST_AVAILABLE_TOOLSETS, GET_TOOLSET_TOOLS, ENABLE_TOOLSET]
        );

        let schema = &find(&dynamic, ENABLE_TOOLSET).descriptor().input_schema;
        assert_eq!(schema.required, vec!["toolset"]);
        assert_eq!(
            schema.properties["toolset"].allowed,
            Some(vec!["repos".to_string(), "issues".to_string()])
        );
    }

    #[tokio::test]
    async fn test_list_flips_only_enabled_toolset() {
        let (shared, dynamic) = shared_group();
        let before = list(&dynamic).await;
        assert_eq!(
            before,
            json!([
                {"name": "repos", "description": "GitHub Repository related tools", "can_enable": "true", "currently_enabled": "false"},
                {"name": "issues", "description": "GitHub Issues related tools", "can_enable": "true", "currently_enabled": "false"}
            ])
        );

        let mut registrar = MockToolRegistrar::new();
        registrar.expect_register_tools().times(1).return_const(());
        find(&dynamic, ENABLE_TOOLSET)
            .call(&registrar, &args(json!({"toolset": "issues"})))
            .await;

        let after = list(&dynamic).await;
        assert_eq!(after[0]["currently_enabled"], "false");
        assert_eq!(after[1]["currently_enabled"], "true");
        assert!(shared.read().await.is_enabled("issues"));
    }

    #[tokio::test]
    async fn test_enable_publishes_active_tools() {
        let (_, dynamic) = shared_group();
        let mut registrar = MockToolRegistrar::new();
        registrar
            .expect_register_tools()
            .withf(|tools: &Vec<ServerTool>| {
                tools.iter().map(ServerTool::name).collect::<Vec<_>>()
                    == vec!["get_issue", "list_issues", "create_issue"]
            })
            .times(1)
            .return_const(());

        let result = find(&dynamic, ENABLE_TOOLSET)
            .call(&registrar, &args(json!({"toolset": "issues"})))
            .await;
        assert!(!result.is_error);
        assert_eq!(result.text_content(), "Toolset issues enabled");
    }

    #[tokio::test]
    async fn test_enable_twice_reports_already_enabled() {
        let (shared, dynamic) = shared_group();
        let mut registrar = MockToolRegistrar::new();
        registrar.expect_register_tools().times(1).return_const(());
        let enable = find(&dynamic, ENABLE_TOOLSET);

        enable.call(&registrar, &args(json!({"toolset": "repos"}))).await;
        let snapshot: Vec<bool> = {
            let group = shared.read().await;
            group.toolset_names().iter().map(|n| group.is_enabled(n)).collect()
        };

        let second = enable.call(&registrar, &args(json!({"toolset": "repos"}))).await;
        assert!(!second.is_error);
        assert_eq!(second.text_content(), "Toolset repos is already enabled");

        let group = shared.read().await;
        let after: Vec<bool> = group.toolset_names().iter().map(|n| group.is_enabled(n)).collect();
        assert_eq!(after, snapshot);
    }

    #[tokio::test]
    async fn test_enable_unknown_is_not_found_and_mutates_nothing() {
        let (shared, dynamic) = shared_group();
        let registrar = MockToolRegistrar::new();

        let result = find(&dynamic, ENABLE_TOOLSET)
            .call(&registrar, &args(json!({"toolset": "nonexistent"})))
            .await;
        assert!(result.is_error);
        assert_eq!(result.text_content(), "not found: toolset nonexistent");

        let group = shared.read().await;
        assert!(group.toolsets().all(|ts| !ts.is_enabled()));
    }

    #[tokio::test]
    async fn test_enable_requires_toolset_param() {
        let (_, dynamic) = shared_group();
        let result = find(&dynamic, ENABLE_TOOLSET)
            .call(&MockToolRegistrar::new(), &Arguments::new())
            .await;
        assert!(result.is_error);
        assert_eq!(result.text_content(), "missing required parameter: toolset");
    }

    #[tokio::test]
    async fn test_get_toolset_tools() {
        let (_, dynamic) = shared_group();
        let result = find(&dynamic, GET_TOOLSET_TOOLS)
            .call(&MockToolRegistrar::new(), &args(json!({"toolset": "issues"})))
            .await;

        let tools: Value = serde_json::from_str(&result.text_content()).unwrap();
        assert_eq!(
            tools,
            json!([
                {"name": "get_issue", "description": "get_issue tool", "can_enable": "true", "toolset": "issues"},
                {"name": "list_issues", "description": "list_issues tool", "can_enable": "true", "toolset": "issues"},
                {"name": "create_issue", "description": "create_issue tool", "can_enable": "true", "toolset": "issues"}
            ])
        );
    }

    #[tokio::test]
    async fn test_get_toolset_tools_unknown() {
        let (_, dynamic) = shared_group();
        let result = find(&dynamic, GET_TOOLSET_TOOLS)
            .call(&MockToolRegistrar::new(), &args(json!({"toolset": "gists"})))
            .await;
        assert!(result.is_error);
        assert!(result.text_content().contains("toolset gists"));
    }

    #[test]
    fn test_descriptions_are_translatable() {
        let mut g = ToolsetGroup::new(false);
        g.add_toolset(issues()).unwrap();
        let names = g.toolset_names();
        let translator = Translator::with_overrides(std::collections::HashMap::from([(
            "TOOL_ENABLE_TOOLSET_USER_TITLE".to_string(),
            "Turn on toolset".to_string(),
        )]));
        let dynamic = dynamic_toolset(&g.into_shared(), &names, &translator);

        assert_eq!(
            find(&dynamic, ENABLE_TOOLSET).descriptor().annotations.title,
            "Turn on toolset"
        );
        assert!(translator.export().contains_key("TOOL_LIST_AVAILABLE_TOOLSETS_DESCRIPTION"));
    }
}
