//! # Toolsets Core - toolset registry for agent-facing tool servers
//!
//! Governs which remote-API tools an LLM agent may call and how their
//! arguments are decoded:
//! - Typed parameter extraction shared by every tool handler
//! - Toolsets split into read and write tools, with a one-way enabled flag
//! - A group registry with a global read-only switch
//! - Dynamic enablement tools that grow the callable set mid-session
//!
//! ## Architecture
//!
//! ```text
//!   startup config ─→ ToolsetGroup ──into_shared──→ Arc<RwLock<ToolsetGroup>>
//!                         │                                 ▲
//!                  active_tools()                    enable_toolset
//!                         ▼                                 │
//!                      Session ◀──register_tools── dynamic toolset
//!                         │
//!                   call_tool(name, args) ─→ params::* ─→ collaborator
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod bootstrap;
pub mod params;
pub mod session;
pub mod toolsets;
pub mod translations;
pub mod types;

// Internal utilities
pub mod observability;

pub use session::Session;
pub use toolsets::{ServerTool, Toolset, ToolsetGroup};
pub use types::{Config, Error, ErrorKind, Result};
