use assert_cmd::prelude::*;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;

const INITIALIZE: &str = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1.0.0"}}}"#;
const INITIALIZED: &str = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
const LIST_TOOLS: &str = r#"{"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}}"#;

fn spawn_server(home: &TempDir) -> Child {
    let config = home.path().join("config.json");
    std::fs::write(&config, r#"{"contoso": "pat-c"}"#).expect("Failed to write config");

    Command::cargo_bin("azdo-mcp")
        .unwrap()
        .env("HOME", home.path())
        .env_remove("AZDO_MCP_LOG_FILE")
        .env_remove("RUST_LOG")
        .arg("serve")
        .arg("--config")
        .arg(&config)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start MCP server")
}

fn send(child: &mut Child, message: &str) {
    let stdin = child.stdin.as_mut().expect("Failed to get stdin");
    writeln!(stdin, "{message}").expect("Failed to write message");
    stdin.flush().expect("Failed to flush stdin");
    std::thread::sleep(Duration::from_millis(300));
}

#[test]
fn test_server_lists_tools_and_exits_on_client_disconnect() {
    let home = TempDir::new().unwrap();
    let mut server = spawn_server(&home);
    std::thread::sleep(Duration::from_millis(500));

    send(&mut server, INITIALIZE);
    send(&mut server, INITIALIZED);
    send(&mut server, LIST_TOOLS);

    // Closing stdin is how a client disconnects
    drop(server.stdin.take());

    let output = server.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "Server should exit cleanly when the client disconnects: {:?}",
        output.status.code()
    );
    assert!(stdout.contains("azdo-mcp"), "missing server info: {stdout}");
    assert!(stdout.contains("pipelines_get_builds"), "missing tools: {stdout}");
    assert!(stdout.contains("list_organizations"), "missing tools: {stdout}");
}

#[test]
fn test_server_logs_to_file_not_stdout() {
    let home = TempDir::new().unwrap();
    let mut server = spawn_server(&home);
    std::thread::sleep(Duration::from_millis(500));

    send(&mut server, INITIALIZE);
    drop(server.stdin.take());
    let output = server.wait_with_output().unwrap();

    let log = home.path().join(".azdo-mcp").join("mcp.log");
    let content = std::fs::read_to_string(&log).expect("log file should exist");
    assert!(content.contains("Loaded credentials for 1 organization(s)"));

    // Every stdout line is a JSON-RPC message
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        assert!(
            serde_json::from_str::<serde_json::Value>(line).is_ok(),
            "non-protocol output on stdout: {line}"
        );
    }
}
