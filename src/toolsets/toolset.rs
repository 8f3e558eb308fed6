//! A named, enable-able bag of tools split into read and write subsets.

use super::tool::ServerTool;

/// Named group of tools with a one-way enabled flag.
#[derive(Debug, Clone)]
pub struct Toolset {
    name: String,
    description: String,
    enabled: bool,
    read_only: bool,
    read_tools: Vec<ServerTool>,
    write_tools: Vec<ServerTool>,
}

impl Toolset {
    /// Create an empty, disabled toolset.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            enabled: false,
            read_only: false,
            read_tools: Vec::new(),
            write_tools: Vec::new(),
        }
    }

    /// Append tools that never change remote state.
    pub fn add_read_tools(mut self, tools: impl IntoIterator<Item = ServerTool>) -> Self {
        self.read_tools.extend(tools);
        self
    }

    /// Append tools that change remote state.
    pub fn add_write_tools(mut self, tools: impl IntoIterator<Item = ServerTool>) -> Self {
        self.write_tools.extend(tools);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn read_tools(&self) -> &[ServerTool] {
        &self.read_tools
    }

    pub fn write_tools(&self) -> &[ServerTool] {
        &self.write_tools
    }

    /// Enable the toolset. Returns `false` if it already was.
    pub(crate) fn enable(&mut self) -> bool {
        !std::mem::replace(&mut self.enabled, true)
    }

    /// Hide write tools from [`Toolset::active_tools`] for good.
    pub(crate) fn set_read_only(&mut self) {
        self.read_only = true;
    }

    /// Tools callable right now.
    ///
    /// Nothing while disabled (a disabled toolset contributes no callable
    /// tools, even read ones); read tools once enabled; write tools only when
    /// enabled and not read-only.
    pub fn active_tools(&self) -> Vec<ServerTool> {
        if !self.enabled {
            return Vec::new();
        }
        if self.read_only {
            return self.read_tools.clone();
        }
        self.available_tools()
    }

    /// Every tool in the toolset, callable or not.
    pub fn available_tools(&self) -> Vec<ServerTool> {
        self.read_tools
            .iter()
            .chain(self.write_tools.iter())
            .cloned()
            .collect()
    }

    /// Names of every tool, read tools first.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.read_tools
            .iter()
            .chain(self.write_tools.iter())
            .map(ServerTool::name)
    }
}
