//! Tool descriptors, invocation results, and the handler/registrar seams.
//!
//! A [`ServerTool`] pairs an immutable [`ToolDescriptor`] with an opaque
//! [`ToolHandler`]. Handlers are collaborators: this crate never looks inside
//! them, it only decides whether they are callable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::params::Arguments;
use crate::types::Result;

// =============================================================================
// Input schema
// =============================================================================

/// JSON-schema fragment for one tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
}

impl PropertySchema {
    fn of_kind(kind: &str, description: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            description: description.into(),
            allowed: None,
            items: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::of_kind("string", description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::of_kind("number", description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::of_kind("boolean", description)
    }

    pub fn string_array(description: impl Into<String>) -> Self {
        let mut schema = Self::of_kind("array", description);
        schema.items = Some(Box::new(Self::of_kind("string", "")));
        schema
    }

    /// Restrict the value to one of `values`.
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_range(mut self, minimum: Option<i64>, maximum: Option<i64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }
}

/// Object schema describing a tool's arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self {
            kind: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }
}

// =============================================================================
// Annotations
// =============================================================================

/// Behavioural hints shown to the agent alongside a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    pub title: String,
    pub read_only_hint: bool,
    pub destructive_hint: bool,
    pub idempotent_hint: bool,
}

impl ToolAnnotations {
    /// Hints for a tool that never changes remote state.
    pub fn read_only(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            read_only_hint: true,
            destructive_hint: false,
            idempotent_hint: true,
        }
    }

    /// Hints for a tool that changes remote state.
    pub fn mutating(title: impl Into<String>, destructive: bool) -> Self {
        Self {
            title: title.into(),
            read_only_hint: false,
            destructive_hint: destructive,
            idempotent_hint: false,
        }
    }
}

// =============================================================================
// Descriptor
// =============================================================================

/// Name, description, schema and hints for one tool. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    pub annotations: ToolAnnotations,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: InputSchema::default(),
            annotations: ToolAnnotations::default(),
        }
    }

    pub fn with_annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Declare a parameter. Re-declaring a name replaces it.
    pub fn with_param(mut self, name: &str, schema: PropertySchema, required: bool) -> Self {
        self.input_schema.properties.insert(name.to_string(), schema);
        self.input_schema.required.retain(|r| r != name);
        if required {
            self.input_schema.required.push(name.to_string());
        }
        self
    }

    /// Declare the `page` / `perPage` parameters read by `params::pagination`.
    pub fn with_pagination(self) -> Self {
        self.with_param(
            "page",
            PropertySchema::number("Page number for pagination (min 1)").with_range(Some(1), None),
            false,
        )
        .with_param(
            "perPage",
            PropertySchema::number("Results per page for pagination (min 1, max 100)")
                .with_range(Some(1), Some(100)),
            false,
        )
    }
}

// =============================================================================
// Invocation result
// =============================================================================

/// One content block of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// Payload returned to the agent for every call, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    pub is_error: bool,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Serialize `value` as the text payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::text(serde_json::to_string(value)?))
    }

    /// Concatenated text of every content block.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                Content::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<crate::types::Error> for CallToolResult {
    fn from(err: crate::types::Error) -> Self {
        CallToolResult::error(err.to_string())
    }
}

// =============================================================================
// Seams
// =============================================================================

/// Hook exposed by the session layer for publishing tools mid-session.
///
/// Implementations must make the tools callable before returning.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolRegistrar: Send + Sync {
    async fn register_tools(&self, tools: Vec<ServerTool>);
}

/// Invocation body of a tool.
///
/// Returning `Err` is fine for any recoverable failure; [`ServerTool::call`]
/// turns it into a tool-error result.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, registrar: &dyn ToolRegistrar, args: &Arguments)
        -> Result<CallToolResult>;
}

/// Adapter for synchronous closures, for tools that need no collaborator I/O.
struct FnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(&Arguments) -> Result<CallToolResult> + Send + Sync,
{
    async fn call(
        &self,
        _registrar: &dyn ToolRegistrar,
        args: &Arguments,
    ) -> Result<CallToolResult> {
        (self.0)(args)
    }
}

/// A descriptor paired with its handler.
#[derive(Clone)]
pub struct ServerTool {
    descriptor: Arc<ToolDescriptor>,
    handler: Arc<dyn ToolHandler>,
}

impl ServerTool {
    pub fn new(descriptor: ToolDescriptor, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            handler,
        }
    }

    pub fn from_fn<F>(descriptor: ToolDescriptor, f: F) -> Self
    where
        F: Fn(&Arguments) -> Result<CallToolResult> + Send + Sync + 'static,
    {
        Self::new(descriptor, Arc::new(FnHandler(f)))
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Whether both values were cloned from the same registration.
    pub fn same_tool(&self, other: &ServerTool) -> bool {
        Arc::ptr_eq(&self.descriptor, &other.descriptor)
    }

    /// Invoke the handler. Errors never escape: they become `isError` results.
    pub async fn call(&self, registrar: &dyn ToolRegistrar, args: &Arguments) -> CallToolResult {
        match self.handler.call(registrar, args).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(tool = %self.descriptor.name, code = err.to_error_code(), "tool call failed: {}", err);
                CallToolResult::from(err)
            }
        }
    }
}

impl fmt::Debug for ServerTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerTool")
            .field("name", &self.descriptor.name)
            .finish_non_exhaustive()
    }
}
