// Protocol-level tests for the command handlers and the connection loop,
// driven over in-memory streams.

use crate::config::Config;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::dispatch_command;
use crate::core_network::network::handle_connection;
use crate::session::Session;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::watch;

static TEST_DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Fresh, canonicalized scratch root for one test.
fn temp_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ferroftpd-test-{}-{}-{}",
        tag,
        std::process::id(),
        TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::canonicalize(&dir).unwrap()
}

fn test_config() -> Config {
    let mut config = Config::default();
    config
        .auth
        .users
        .insert(String::from("testuser"), String::from("testpass"));
    config
}

/// Parses a raw command line and runs it through the dispatcher, returning
/// the response bytes. `input` feeds STOR's inline payload read.
async fn run_line_with_input(
    config: &Config,
    session: &mut Session,
    line: &str,
    mut input: &[u8],
) -> Vec<u8> {
    let (verb, arg) = match line.split_once(' ') {
        Some((verb, arg)) => (verb, arg),
        None => (line, ""),
    };
    let command = FtpCommand::from_str(verb).expect("test sent an unknown verb");
    let mut output: Vec<u8> = Vec::new();
    dispatch_command(command, arg, config, session, &mut input, &mut output)
        .await
        .expect("dispatch failed");
    output
}

async fn run_line(config: &Config, session: &mut Session, line: &str) -> String {
    let output = run_line_with_input(config, session, line, b"").await;
    String::from_utf8_lossy(&output).into_owned()
}

#[tokio::test]
async fn commands_before_login_get_530_not_550() {
    let root = temp_root("gate");
    let config = test_config();
    let mut session = Session::new(root.clone());

    // Traversal attempt while unauthenticated: the auth gate answers first.
    let response = run_line(&config, &mut session, "CWD ../../../etc").await;
    assert_eq!(response, "530 Please login with USER and PASS\r\n");
    assert_eq!(session.current_dir, ".");

    for line in ["PWD", "LIST", "RETR secrets.txt"] {
        let response = run_line(&config, &mut session, line).await;
        assert!(response.starts_with("530"), "{line}: {response}");
    }

    // An unauthenticated STOR must leave no file behind.
    let response = run_line_with_input(&config, &mut session, "STOR up.txt", b"payload").await;
    assert!(String::from_utf8_lossy(&response).starts_with("530"));
    assert!(!root.join("up.txt").exists());

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn user_pass_login_flow() {
    let root = temp_root("login");
    let config = test_config();
    let mut session = Session::new(root.clone());

    let response = run_line(&config, &mut session, "USER testuser").await;
    assert_eq!(response, "331 User name okay, need password\r\n");
    assert!(!session.is_authenticated);

    let response = run_line(&config, &mut session, "PASS wrong").await;
    assert_eq!(response, "530 Login failed\r\n");
    assert!(!session.is_authenticated);

    let response = run_line(&config, &mut session, "PASS testpass").await;
    assert_eq!(response, "230 User logged in\r\n");
    assert!(session.is_authenticated);

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn user_overwrites_pending_username() {
    let root = temp_root("reuser");
    let config = test_config();
    let mut session = Session::new(root.clone());

    run_line(&config, &mut session, "USER testuser").await;
    run_line(&config, &mut session, "USER anonymous").await;
    assert_eq!(session.username.as_deref(), Some("anonymous"));

    // Anonymous access ignores the password entirely.
    let response = run_line(&config, &mut session, "PASS anything-at-all").await;
    assert_eq!(response, "230 User logged in\r\n");

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn pass_without_user_fails() {
    let root = temp_root("nopass");
    let config = test_config();
    let mut session = Session::new(root.clone());

    let response = run_line(&config, &mut session, "PASS testpass").await;
    assert_eq!(response, "530 Login failed\r\n");
    assert!(!session.is_authenticated);

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn noop_is_idempotent() {
    let root = temp_root("noop");
    let config = test_config();
    let mut session = Session::new(root.clone());
    session.is_authenticated = true;
    session.current_dir = String::from("sub");

    for _ in 0..3 {
        let response = run_line(&config, &mut session, "NOOP").await;
        assert_eq!(response, "200 OK\r\n");
    }
    assert_eq!(session.current_dir, "sub");
    assert!(session.is_authenticated);

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn cwd_and_pwd_compose_relative_paths() {
    let root = temp_root("cwd");
    std::fs::create_dir_all(root.join("sub/inner")).unwrap();
    let config = test_config();
    let mut session = Session::new(root.clone());
    session.is_authenticated = true;

    let response = run_line(&config, &mut session, "PWD").await;
    assert_eq!(response, "257 \".\" is current directory\r\n");

    let response = run_line(&config, &mut session, "CWD sub").await;
    assert_eq!(response, "250 Directory changed\r\n");
    let response = run_line(&config, &mut session, "PWD").await;
    assert_eq!(response, "257 \"sub\" is current directory\r\n");

    let response = run_line(&config, &mut session, "CWD inner").await;
    assert_eq!(response, "250 Directory changed\r\n");
    assert_eq!(session.current_dir, "sub/inner");

    let response = run_line(&config, &mut session, "CWD ..").await;
    assert_eq!(response, "250 Directory changed\r\n");
    assert_eq!(session.current_dir, "sub");

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn cwd_rejects_missing_and_escaping_targets() {
    let root = temp_root("cwdbad");
    let config = test_config();
    let mut session = Session::new(root.clone());
    session.is_authenticated = true;

    let response = run_line(&config, &mut session, "CWD nosuchdir").await;
    assert_eq!(response, "550 Directory not found\r\n");

    let response = run_line(&config, &mut session, "CWD ../../../etc").await;
    assert_eq!(response, "550 Directory not found\r\n");
    assert_eq!(session.current_dir, ".");

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn list_reports_entries_between_150_and_226() {
    let root = temp_root("list");
    std::fs::write(root.join("hello.txt"), b"hello").unwrap();
    std::fs::create_dir(root.join("docs")).unwrap();
    let config = test_config();
    let mut session = Session::new(root.clone());
    session.is_authenticated = true;

    let response = run_line(&config, &mut session, "LIST").await;
    let lines: Vec<&str> = response.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert!(lines.first().unwrap().starts_with("150"));
    assert!(lines.last().unwrap().starts_with("226"));
    assert!(lines.iter().any(|l| l.starts_with("hello.txt\t5\t")));
    assert!(lines.iter().any(|l| l.starts_with("docs\t")));

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn retr_missing_file_leaves_session_usable() {
    let root = temp_root("retrmiss");
    let config = test_config();
    let mut session = Session::new(root.clone());
    session.is_authenticated = true;

    let response = run_line(&config, &mut session, "RETR nonexistent.txt").await;
    assert_eq!(response, "550 File not found\r\n");
    assert!(!response.contains("150"));

    // The failed command must not poison the connection.
    let response = run_line(&config, &mut session, "NOOP").await;
    assert_eq!(response, "200 OK\r\n");

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn retr_streams_file_bytes_inline() {
    let root = temp_root("retr");
    let content: &[u8] = b"hello from ferroftpd\nsecond line\n";
    std::fs::write(root.join("data.txt"), content).unwrap();
    let config = test_config();
    let mut session = Session::new(root.clone());
    session.is_authenticated = true;

    let output = run_line_with_input(&config, &mut session, "RETR data.txt", b"").await;
    let text = String::from_utf8_lossy(&output);
    assert!(text.starts_with("150 Opening BINARY mode data connection\r\n"));
    assert!(text.ends_with("226 Transfer complete\r\n"));

    // Payload sits unframed between the two status lines.
    let header_len = "150 Opening BINARY mode data connection\r\n".len();
    let trailer_len = "226 Transfer complete\r\n".len();
    assert_eq!(&output[header_len..output.len() - trailer_len], content);

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn stor_writes_inline_payload_until_eof() {
    let root = temp_root("stor");
    let config = test_config();
    let mut session = Session::new(root.clone());
    session.is_authenticated = true;

    let payload = b"uploaded bytes\x00\x01\x02";
    let output =
        run_line_with_input(&config, &mut session, "STOR upload.bin", payload).await;
    let text = String::from_utf8_lossy(&output);
    assert!(text.starts_with("150"));
    assert!(text.ends_with("226 Transfer complete\r\n"));
    assert_eq!(std::fs::read(root.join("upload.bin")).unwrap(), payload);

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn transfer_commands_reject_empty_and_escaping_arguments() {
    let root = temp_root("storbad");
    let config = test_config();
    let mut session = Session::new(root.clone());
    session.is_authenticated = true;

    let response = run_line(&config, &mut session, "RETR").await;
    assert_eq!(response, "501 Syntax error\r\n");
    let response = run_line(&config, &mut session, "STOR").await;
    assert_eq!(response, "501 Syntax error\r\n");

    let response =
        run_line_with_input(&config, &mut session, "STOR ../escape.txt", b"x").await;
    assert_eq!(
        String::from_utf8_lossy(&response),
        "550 File not found\r\n"
    );
    assert!(!root.parent().unwrap().join("escape.txt").exists());

    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn anonymous_session_walkthrough() {
    let root = temp_root("walkthrough");
    let config = Arc::new(test_config());
    let (client, server) = tokio::io::duplex(4096);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let session = Session::new(root.clone());

    let worker = tokio::spawn(handle_connection(server, config, session, shutdown_rx));

    let (mut read_half, mut write_half) = tokio::io::split(client);
    write_half
        .write_all(b"USER anonymous\r\nPASS anonymous\r\nPWD\r\nLIST\r\nQUIT\r\n")
        .await
        .unwrap();

    let mut output = Vec::new();
    read_half.read_to_end(&mut output).await.unwrap();
    let output = String::from_utf8_lossy(&output);

    assert!(output.starts_with("220"));
    assert!(output.contains("331 User name okay, need password"));
    assert!(output.contains("230 User logged in"));
    assert!(output.contains("257 \".\" is current directory"));
    assert!(output.contains("150"));
    assert!(output.contains("226 Transfer complete"));
    assert!(output.trim_end().ends_with("221 Goodbye"));

    worker.await.unwrap().unwrap();
    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn unknown_verbs_and_blank_lines() {
    let root = temp_root("unknown");
    let config = Arc::new(test_config());
    let (client, server) = tokio::io::duplex(4096);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let session = Session::new(root.clone());

    let worker = tokio::spawn(handle_connection(server, config, session, shutdown_rx));

    let (mut read_half, mut write_half) = tokio::io::split(client);
    write_half
        .write_all(b"\r\n\r\nFOOBAR\r\nNOOP\r\nQUIT\r\n")
        .await
        .unwrap();

    let mut output = Vec::new();
    read_half.read_to_end(&mut output).await.unwrap();
    let output = String::from_utf8_lossy(&output);
    let lines: Vec<&str> = output.split("\r\n").filter(|l| !l.is_empty()).collect();

    // Blank lines produce no response at all.
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("220"));
    assert_eq!(lines[1], "502 Command not implemented");
    assert_eq!(lines[2], "200 OK");
    assert_eq!(lines[3], "221 Goodbye");

    worker.await.unwrap().unwrap();
    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn shutdown_signal_closes_idle_session_with_421() {
    let root = temp_root("shutdown");
    let config = Arc::new(test_config());
    let (client, server) = tokio::io::duplex(4096);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let session = Session::new(root.clone());

    let worker = tokio::spawn(handle_connection(server, config, session, shutdown_rx));

    let (mut read_half, mut write_half) = tokio::io::split(client);
    write_half.write_all(b"NOOP\r\n").await.unwrap();

    let mut greeting = [0u8; 128];
    let n = read_half.read(&mut greeting).await.unwrap();
    assert!(String::from_utf8_lossy(&greeting[..n]).starts_with("220"));

    shutdown_tx.send(true).unwrap();

    let mut rest = Vec::new();
    read_half.read_to_end(&mut rest).await.unwrap();
    let rest = String::from_utf8_lossy(&rest);
    assert!(rest.contains("421 Service shutting down"), "got {rest:?}");

    worker.await.unwrap().unwrap();
    std::fs::remove_dir_all(&root).ok();
}
