//! Toolset registry — the single source of truth for which tools exist and
//! which are currently callable.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::tool::ServerTool;
use super::toolset::Toolset;
use crate::types::{Error, Result, ALL_TOOLSETS};

/// A group handed to the session layer. Enablement takes the write lock.
pub type SharedToolsetGroup = Arc<RwLock<ToolsetGroup>>;

/// Named collection of toolsets plus the global read-only switch.
///
/// Built and populated at startup, then moved behind a lock with
/// [`ToolsetGroup::into_shared`]. Toolsets are kept in registration order.
#[derive(Debug, Default)]
pub struct ToolsetGroup {
    toolsets: Vec<Toolset>,
    /// toolset name → position in `toolsets`
    index: HashMap<String, usize>,
    /// every tool name registered across all toolsets
    tool_names: HashSet<String>,
    read_only: bool,
}

impl ToolsetGroup {
    pub fn new(read_only: bool) -> Self {
        Self {
            read_only,
            ..Self::default()
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a toolset under its name.
    ///
    /// A reused toolset name, or a tool name already present anywhere in the
    /// group, is a configuration error.
    pub fn add_toolset(&mut self, mut toolset: Toolset) -> Result<()> {
        let name = toolset.name().to_string();
        if name.is_empty() {
            return Err(Error::configuration("toolset name cannot be empty"));
        }
        if self.index.contains_key(&name) {
            return Err(Error::configuration(format!(
                "toolset {name} is already registered"
            )));
        }

        let mut incoming = HashSet::new();
        for tool in toolset.tool_names() {
            if self.tool_names.contains(tool) || !incoming.insert(tool.to_string()) {
                return Err(Error::configuration(format!(
                    "tool {tool} in toolset {name} is already registered"
                )));
            }
        }

        if self.read_only {
            toolset.set_read_only();
        }

        tracing::debug!(
            toolset = %name,
            read_tools = toolset.read_tools().len(),
            write_tools = toolset.write_tools().len(),
            "registered toolset"
        );
        self.tool_names.extend(incoming);
        self.index.insert(name, self.toolsets.len());
        self.toolsets.push(toolset);
        Ok(())
    }

    /// Move the group behind the lock shared with the session layer.
    pub fn into_shared(self) -> SharedToolsetGroup {
        Arc::new(RwLock::new(self))
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn toolset(&self, name: &str) -> Option<&Toolset> {
        self.index.get(name).map(|&i| &self.toolsets[i])
    }

    /// Toolsets in registration order.
    pub fn toolsets(&self) -> impl Iterator<Item = &Toolset> {
        self.toolsets.iter()
    }

    pub fn toolset_names(&self) -> Vec<String> {
        self.toolsets.iter().map(|ts| ts.name().to_string()).collect()
    }

    pub fn has_toolset(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Whether any registered toolset, enabled or not, owns a tool `name`.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tool_names.contains(name)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.toolset(name).is_some_and(Toolset::is_enabled)
    }

    pub fn len(&self) -> usize {
        self.toolsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toolsets.is_empty()
    }

    // =========================================================================
    // Enablement
    // =========================================================================

    /// Enable one toolset at runtime.
    ///
    /// Returns `true` if the state changed, `false` if it was already enabled.
    pub fn enable_toolset(&mut self, name: &str) -> Result<bool> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| Error::not_found(format!("toolset {name}")))?;

        let changed = self.toolsets[i].enable();
        if changed {
            tracing::info!(toolset = %name, read_only = self.read_only, "toolset enabled");
        }
        Ok(changed)
    }

    /// Enable the startup selection.
    ///
    /// `"all"` anywhere in `names` enables every toolset registered at this
    /// moment. Every name is checked before anything is enabled, so an unknown
    /// name leaves the group untouched.
    pub fn enable_toolsets<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let everything = names.iter().any(|n| n.as_ref() == ALL_TOOLSETS);

        if let Some(unknown) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|n| *n != ALL_TOOLSETS && !self.index.contains_key(*n))
        {
            tracing::warn!(toolset = %unknown, "unknown toolset in startup configuration");
            return Err(Error::configuration(format!("toolset {unknown} does not exist")));
        }

        if everything {
            for name in self.toolset_names() {
                self.enable_toolset(&name)?;
            }
            return Ok(());
        }

        for name in names {
            self.enable_toolset(name.as_ref())?;
        }
        Ok(())
    }

    // =========================================================================
    // Tool views
    // =========================================================================

    /// Every tool the session layer may dispatch right now.
    pub fn active_tools(&self) -> Vec<ServerTool> {
        self.toolsets.iter().flat_map(Toolset::active_tools).collect()
    }

    /// The whole catalog, for introspection only.
    pub fn available_tools(&self) -> Vec<ServerTool> {
        self.toolsets
            .iter()
            .flat_map(Toolset::available_tools)
            .collect()
    }
}
