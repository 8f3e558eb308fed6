//! Session integration tests — validates config→group→session→dispatch and
//! runtime growth of the callable set through the dynamic toolset.

use serde_json::{json, Value};
use toolsets_core::bootstrap::start_session;
use toolsets_core::params::{self, Arguments};
use toolsets_core::toolsets::{
    CallToolResult, PropertySchema, ServerTool, ToolAnnotations, ToolDescriptor,
};
use toolsets_core::translations::Translator;
use toolsets_core::types::ToolsetsConfig;
use toolsets_core::{Error, Session, Toolset};

/// Helper: a catalog shaped like a code-hosting API, with handlers that only
/// decode their arguments and echo them back.
fn catalog() -> Vec<Toolset> {
    let get_issue = ServerTool::from_fn(
        ToolDescriptor::new("get_issue", "Get details of a specific issue")
            .with_annotations(ToolAnnotations::read_only("Get issue details"))
            .with_param("owner", PropertySchema::string("Repository owner"), true)
            .with_param("repo", PropertySchema::string("Repository name"), true)
            .with_param("issue_number", PropertySchema::number("Issue number"), true),
        |args| {
            let owner = params::required::<String>(args, "owner")?;
            let repo = params::required::<String>(args, "repo")?;
            let number = params::required_int(args, "issue_number")?;
            CallToolResult::json(&json!({"url": format!("{owner}/{repo}#{number}")}))
        },
    );

    let list_issues = ServerTool::from_fn(
        ToolDescriptor::new("list_issues", "List issues in a repository")
            .with_annotations(ToolAnnotations::read_only("List issues"))
            .with_param("labels", PropertySchema::string_array("Filter by labels"), false)
            .with_pagination(),
        |args| {
            let labels = params::optional_string_array(args, "labels")?;
            let page = params::pagination(args)?;
            CallToolResult::json(&json!({"labels": labels, "page": page}))
        },
    );

    let create_issue = ServerTool::from_fn(
        ToolDescriptor::new("create_issue", "Create a new issue")
            .with_annotations(ToolAnnotations::mutating("Open new issue", false))
            .with_param("title", PropertySchema::string("Issue title"), true),
        |args| {
            let title = params::required::<String>(args, "title")?;
            if title == "fail" {
                return Err(Error::collaborator("POST /issues: 502 Bad Gateway"));
            }
            Ok(CallToolResult::text(format!("created {title}")))
        },
    );

    let get_file_contents = ServerTool::from_fn(
        ToolDescriptor::new("get_file_contents", "Get file contents")
            .with_annotations(ToolAnnotations::read_only("Get file contents")),
        |_| Ok(CallToolResult::text("README")),
    );

    vec![
        Toolset::new("repos", "GitHub Repository related tools").add_read_tools([get_file_contents]),
        Toolset::new("issues", "GitHub Issues related tools")
            .add_read_tools([get_issue, list_issues])
            .add_write_tools([create_issue]),
    ]
}

fn config(enabled: &[&str], read_only: bool, dynamic: bool) -> ToolsetsConfig {
    ToolsetsConfig {
        enabled: enabled.iter().map(|s| s.to_string()).collect(),
        read_only,
        dynamic,
    }
}

fn args(value: Value) -> Arguments {
    value.as_object().cloned().unwrap_or_default()
}

/// Helper: call a tool and parse its JSON text payload.
async fn call_json(session: &Session, tool: &str, body: Value) -> Value {
    let result = session.call_tool(tool, args(body)).await.unwrap();
    assert!(!result.is_error, "{tool} failed: {}", result.text_content());
    serde_json::from_str(&result.text_content()).unwrap()
}

#[tokio::test]
async fn test_static_selection_round_trip() {
    let (session, _) = start_session(&config(&["issues"], false, false), catalog(), &Translator::new())
        .await
        .unwrap();

    assert!(!session.has_tool("get_file_contents").await);

    let body = call_json(
        &session,
        "get_issue",
        json!({"owner": "octo", "repo": "hello", "issue_number": 42.0}),
    )
    .await;
    assert_eq!(body["url"], "octo/hello#42");

    let created = session
        .call_tool("create_issue", args(json!({"title": "bug"})))
        .await
        .unwrap();
    assert_eq!(created.text_content(), "created bug");
}

#[tokio::test]
async fn test_parameter_errors_are_tool_errors() {
    let (session, _) = start_session(&config(&["all"], false, false), catalog(), &Translator::new())
        .await
        .unwrap();

    let missing = session.call_tool("get_issue", args(json!({}))).await.unwrap();
    assert!(missing.is_error);
    assert_eq!(missing.text_content(), "missing required parameter: owner");

    let wrong = session
        .call_tool(
            "get_issue",
            args(json!({"owner": "o", "repo": "r", "issue_number": "42"})),
        )
        .await
        .unwrap();
    assert!(wrong.is_error);
    assert_eq!(wrong.text_content(), "parameter issue_number is not of type number");

    let empty = session
        .call_tool("create_issue", args(json!({"title": ""})))
        .await
        .unwrap();
    assert!(empty.is_error);
}

#[tokio::test]
async fn test_collaborator_error_is_reported_not_raised() {
    let (session, _) = start_session(&config(&["all"], false, false), catalog(), &Translator::new())
        .await
        .unwrap();

    let result = session
        .call_tool("create_issue", args(json!({"title": "fail"})))
        .await
        .unwrap();
    assert!(result.is_error);
    assert_eq!(result.text_content(), "POST /issues: 502 Bad Gateway");
}

#[tokio::test]
async fn test_pagination_defaults_through_dispatch() {
    let (session, _) = start_session(&config(&["all"], false, false), catalog(), &Translator::new())
        .await
        .unwrap();

    let body = call_json(&session, "list_issues", json!({})).await;
    assert_eq!(body["page"], json!({"page": 1, "perPage": 30}));
    assert_eq!(body["labels"], json!([]));

    let body = call_json(&session, "list_issues", json!({"page": 2, "perPage": 10, "labels": ["bug"]})).await;
    assert_eq!(body["page"], json!({"page": 2, "perPage": 10}));
    assert_eq!(body["labels"], json!(["bug"]));
}

#[tokio::test]
async fn test_read_only_hides_write_tools() {
    let (session, _) = start_session(&config(&["all"], true, false), catalog(), &Translator::new())
        .await
        .unwrap();

    assert!(session.has_tool("list_issues").await);
    let err = session
        .call_tool("create_issue", args(json!({"title": "x"})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_dynamic_enable_makes_tools_callable_in_same_session() {
    let (session, group) = start_session(&config(&["all"], false, true), catalog(), &Translator::new())
        .await
        .unwrap();

    assert!(session.call_tool("get_issue", args(json!({}))).await.is_err());

    let listed = call_json(&session, "list_available_toolsets", json!({})).await;
    assert_eq!(listed[1]["name"], "issues");
    assert_eq!(listed[1]["currently_enabled"], "false");

    let tools = call_json(&session, "get_toolset_tools", json!({"toolset": "issues"})).await;
    assert_eq!(tools.as_array().map(Vec::len), Some(3));

    let enabled = session
        .call_tool("enable_toolset", args(json!({"toolset": "issues"})))
        .await
        .unwrap();
    assert_eq!(enabled.text_content(), "Toolset issues enabled");

    let body = call_json(
        &session,
        "get_issue",
        json!({"owner": "octo", "repo": "hello", "issue_number": 7}),
    )
    .await;
    assert_eq!(body["url"], "octo/hello#7");
    assert!(session.has_tool("create_issue").await);

    let listed = call_json(&session, "list_available_toolsets", json!({})).await;
    assert_eq!(listed[0]["currently_enabled"], "false");
    assert_eq!(listed[1]["currently_enabled"], "true");

    let again = session
        .call_tool("enable_toolset", args(json!({"toolset": "issues"})))
        .await
        .unwrap();
    assert_eq!(again.text_content(), "Toolset issues is already enabled");
    assert!(group.read().await.is_enabled("issues"));
    assert!(!group.read().await.is_enabled("repos"));
}

#[tokio::test]
async fn test_dynamic_enable_respects_read_only() {
    let (session, _) = start_session(&config(&[], true, true), catalog(), &Translator::new())
        .await
        .unwrap();

    session
        .call_tool("enable_toolset", args(json!({"toolset": "issues"})))
        .await
        .unwrap();

    assert!(session.has_tool("list_issues").await);
    assert!(!session.has_tool("create_issue").await);
}

#[tokio::test]
async fn test_dynamic_enable_unknown_toolset() {
    let (session, group) = start_session(&config(&[], false, true), catalog(), &Translator::new())
        .await
        .unwrap();
    let before = session.tool_count().await;

    let result = session
        .call_tool("enable_toolset", args(json!({"toolset": "nonexistent"})))
        .await
        .unwrap();
    assert!(result.is_error);
    assert_eq!(session.tool_count().await, before);
    assert!(group.read().await.toolsets().all(|ts| !ts.is_enabled()));
}
