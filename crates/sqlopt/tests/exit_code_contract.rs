use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_INPUT_ERROR: i32 = 2;
const EXIT_CONFIG_ERROR: i32 = 3;
const EXIT_PARSE_ERROR: i32 = 4;
const EXIT_USAGE_ERROR: i32 = 64;

const CONFIG_KEYS: [&str; 4] = [
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_API_KEY",
    "API_VERSION",
    "DEPLOYMENT_NAME",
];

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}-{nanos}"))
}

struct Workspace {
    root: PathBuf,
    home_dir: PathBuf,
    cwd: PathBuf,
    out_dir: PathBuf,
}

impl Workspace {
    fn new(prefix: &str) -> Self {
        let root = unique_temp_dir(prefix);
        let workspace = Self {
            home_dir: root.join("home"),
            cwd: root.join("cwd"),
            out_dir: root.join("out"),
            root,
        };
        for dir in [&workspace.home_dir, &workspace.cwd, &workspace.out_dir] {
            std::fs::create_dir_all(dir).expect("workspace dir should be creatable");
        }
        workspace
    }

    fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_sqlopt"));
        for key in CONFIG_KEYS {
            command.env_remove(key);
        }
        command
            .env_remove("RUST_LOG")
            .arg("--home-dir")
            .arg(&self.home_dir)
            .arg("--cwd")
            .arg(&self.cwd)
            .arg("--out-dir")
            .arg(&self.out_dir);
        command
    }
}

fn completion_body(content: &str) -> String {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
    .to_string()
}

fn mock_completion(server: &mut mockito::ServerGuard, content: &str) -> mockito::Mock {
    server
        .mock("POST", "/openai/deployments/gpt-4o-mini/chat/completions")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(content))
        .create()
}

fn with_endpoint(command: &mut Command, server: &mockito::ServerGuard) {
    command
        .env("AZURE_OPENAI_ENDPOINT", server.url())
        .env("AZURE_OPENAI_API_KEY", "test-key")
        .env("API_VERSION", "2024-02-01");
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn full_reply() -> String {
    json!({
        "procedure_name": "usp_GetCustomerOrders_Inefficient",
        "scope": "Returns orders and line items for one customer.",
        "optimizations": [
            {
                "type": "Replace Cursor",
                "line_number": "15-40",
                "existing_logic": "DECLARE order_cursor CURSOR FOR ...",
                "optimized_logic": "SELECT o.OrderID FROM dbo.Orders o ...",
                "explanation": "Set-based access avoids per-row round trips."
            }
        ],
        "summary": {
            "original_performance_issues": "Cursor loop and SELECT *.",
            "optimization_impact": "Fewer reads.",
            "implementation_difficulty": "Medium"
        }
    })
    .to_string()
}

fn assert_file(path: &Path) {
    let metadata = std::fs::metadata(path)
        .unwrap_or_else(|_| panic!("expected report at {}", path.display()));
    assert!(metadata.len() > 0, "report should not be empty: {}", path.display());
}

#[test]
fn missing_input_exits_with_usage_code() {
    let workspace = Workspace::new("sqlopt-exit-usage");
    let status = workspace
        .command()
        .arg("analyze")
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_USAGE_ERROR));
}

#[test]
fn relative_home_dir_exits_with_runtime_code() {
    let status = Command::new(env!("CARGO_BIN_EXE_sqlopt"))
        .args(["--home-dir", "relative", "analyze", "--sample", "--dry-run"])
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_RUNTIME_FAILURE));
}

#[test]
fn empty_sql_file_exits_with_input_code_before_config_check() {
    let workspace = Workspace::new("sqlopt-exit-empty");
    let input = workspace.root.join("empty.sql");
    std::fs::write(&input, "   \n").expect("empty sql should be writable");

    let output = workspace
        .command()
        .arg("analyze")
        .arg(&input)
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_INPUT_ERROR));
    assert!(stderr_of(&output).contains("empty"));
}

#[test]
fn missing_credentials_exit_with_config_code() {
    let workspace = Workspace::new("sqlopt-exit-config");
    let output = workspace
        .command()
        .args(["analyze", "--sample"])
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_CONFIG_ERROR));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("AZURE_OPENAI_ENDPOINT"), "stderr: {stderr}");
    assert!(stderr.contains("AZURE_OPENAI_API_KEY"), "stderr: {stderr}");
    assert!(stderr.contains("API_VERSION"), "stderr: {stderr}");
}

#[test]
fn dry_run_needs_no_credentials() {
    let workspace = Workspace::new("sqlopt-exit-dry-run");
    let output = workspace
        .command()
        .args(["analyze", "--sample", "--dry-run"])
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("usp_GetCustomerOrders_Inefficient"));
}

#[test]
fn sample_analysis_writes_both_reports() {
    let workspace = Workspace::new("sqlopt-exit-sample");
    let mut server = mockito::Server::new();
    let mock = mock_completion(&mut server, &full_reply());

    let mut command = workspace.command();
    with_endpoint(&mut command, &server);
    let output = command
        .args(["analyze", "--sample"])
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS), "stderr: {}", stderr_of(&output));
    mock.assert();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Analysis Complete!"));
    assert!(stdout.contains("Step 1: Replace Cursor (Line: 15-40)"));
    assert_file(&workspace.out_dir.join("sample_procedure_analysis.docx"));
    assert_file(&workspace.out_dir.join("sample_procedure_analysis.md"));
}

#[test]
fn prose_reply_exits_with_parse_code_and_shows_raw_text() {
    let workspace = Workspace::new("sqlopt-exit-parse");
    let mut server = mockito::Server::new();
    let _mock = mock_completion(&mut server, "Sorry, I cannot help with that.");

    let mut command = workspace.command();
    with_endpoint(&mut command, &server);
    let output = command
        .args(["analyze", "--sample"])
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_PARSE_ERROR));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("The received response was:"), "stderr: {stderr}");
    assert!(stderr.contains("Sorry, I cannot help with that."), "stderr: {stderr}");
    assert!(!workspace.out_dir.join("sample_procedure_analysis.md").exists());
}

#[test]
fn endpoint_error_status_exits_with_runtime_code() {
    let workspace = Workspace::new("sqlopt-exit-remote");
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/openai/deployments/gpt-4o-mini/chat/completions")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body("upstream failure")
        .create();

    let mut command = workspace.command();
    with_endpoint(&mut command, &server);
    let output = command
        .args(["analyze", "--sample"])
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_RUNTIME_FAILURE));
    assert!(stderr_of(&output).contains("500"));
}

#[test]
fn render_of_partial_reply_degrades_and_succeeds() {
    let workspace = Workspace::new("sqlopt-exit-render");
    let reply = workspace.root.join("reply.json");
    std::fs::write(&reply, r#"{"procedure_name":"usp_X","scope":"..."}"#)
        .expect("reply should be writable");

    let output = workspace
        .command()
        .arg("render")
        .arg(&reply)
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS), "stderr: {}", stderr_of(&output));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("render: warning optimizations"), "stderr: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No optimization suggestions were generated."));
    assert_file(&workspace.out_dir.join("usp_X_analysis.md"));
    assert_file(&workspace.out_dir.join("usp_X_analysis.docx"));
}

#[test]
fn render_honors_name_override_and_skip_flags() {
    let workspace = Workspace::new("sqlopt-exit-render-name");
    let reply = workspace.root.join("reply.json");
    std::fs::write(&reply, full_reply()).expect("reply should be writable");

    let status = workspace
        .command()
        .arg("render")
        .arg(&reply)
        .args(["--name", "nightly run", "--no-docx"])
        .status()
        .expect("command should execute");

    assert_eq!(status.code(), Some(EXIT_SUCCESS));
    assert_file(&workspace.out_dir.join("nightly_run_analysis.md"));
    assert!(!workspace.out_dir.join("nightly_run_analysis.docx").exists());
}

#[test]
fn schema_command_prints_record_schema() {
    let output = Command::new(env!("CARGO_BIN_EXE_sqlopt"))
        .arg("schema")
        .output()
        .expect("command should execute");

    assert_eq!(output.status.code(), Some(EXIT_SUCCESS));
    let schema: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("schema should be JSON");
    assert!(schema["properties"]["optimizations"].is_object());
}
