//! Startup wiring: configuration + toolset catalog → group + live session.

use crate::session::Session;
use crate::toolsets::{dynamic_toolset, SharedToolsetGroup, ToolRegistrar, Toolset, ToolsetGroup};
use crate::translations::Translator;
use crate::types::{Error, Result, ToolsetsConfig};

/// Register `catalog` and apply the startup selection.
///
/// Duplicate names and unknown selected toolsets are configuration errors;
/// callers should abort startup on any `Err`.
pub fn build_group(
    config: &ToolsetsConfig,
    catalog: impl IntoIterator<Item = Toolset>,
) -> Result<ToolsetGroup> {
    let mut group = ToolsetGroup::new(config.read_only);
    for toolset in catalog {
        group.add_toolset(toolset)?;
    }
    group.enable_toolsets(&config.startup_toolsets())?;

    tracing::info!(
        toolsets = group.len(),
        active_tools = group.active_tools().len(),
        read_only = config.read_only,
        dynamic = config.dynamic,
        "toolset group ready"
    );
    Ok(group)
}

/// Build the group, hand it to a fresh session, and publish the startup tools.
///
/// In dynamic mode the enablement tools are published too. The returned group
/// handle is the one those tools mutate.
/// A catalog tool sharing a name with one of them is a configuration error.
pub async fn start_session(
    config: &ToolsetsConfig,
    catalog: impl IntoIterator<Item = Toolset>,
    translator: &Translator,
) -> Result<(Session, SharedToolsetGroup)> {
    let group = build_group(config, catalog)?;
    let names = group.toolset_names();
    let shared = group.into_shared();

    let controller = config
        .dynamic
        .then(|| dynamic_toolset(&shared, &names, translator));
    let group = shared.read().await;
    if let Some(controller) = &controller {
        if let Some(clash) = controller.tool_names().find(|tool| group.has_tool(tool)) {
            return Err(Error::configuration(format!(
                "tool {clash} collides with the dynamic toolset"
            )));
        }
    }

    let session = Session::new();
    session.register_group(&group).await;
    drop(group);
    if let Some(controller) = controller {
        session.register_tools(controller.active_tools()).await;
    }

    Ok((session, shared))
}
