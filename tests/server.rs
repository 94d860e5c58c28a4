// End-to-end tests over a real TCP listener, exercising the accept loop,
// inline transfers, and graceful shutdown.

use ferroftpd::config::Config;
use ferroftpd::core_network::network::serve;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::time::{timeout, Duration};

static TEST_DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

fn temp_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ferroftpd-e2e-{}-{}-{}",
        tag,
        std::process::id(),
        TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::canonicalize(&dir).unwrap()
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.server.shutdown_grace = Some(2);
    config
}

/// Binds an ephemeral listener and spawns the accept loop on it.
async fn spawn_server(
    root: PathBuf,
    config: Config,
) -> (
    std::net::SocketAddr,
    watch::Sender<bool>,
    tokio::task::JoinHandle<()>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = tokio::spawn(serve(listener, Arc::new(config), root, shutdown_rx));
    (addr, shutdown_tx, server)
}

async fn expect_line<R: AsyncBufRead + Unpin>(reader: &mut R, prefix: &str) -> String {
    let mut line = String::new();
    timeout(Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .expect("timed out waiting for response")
        .unwrap();
    assert!(
        line.starts_with(prefix),
        "expected {prefix}, got {line:?}"
    );
    line
}

#[tokio::test]
async fn inline_transfer_round_trip_over_tcp() {
    let root = temp_root("roundtrip");
    let (addr, shutdown_tx, server) = spawn_server(root.clone(), test_config()).await;
    let payload = b"uploaded over the control connection\n";

    // Upload: STOR consumes the control stream until the client half-closes.
    {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        expect_line(&mut reader, "220").await;
        write_half.write_all(b"USER anonymous\r\n").await.unwrap();
        expect_line(&mut reader, "331").await;
        write_half.write_all(b"PASS guest\r\n").await.unwrap();
        expect_line(&mut reader, "230").await;

        write_half.write_all(b"STOR round.txt\r\n").await.unwrap();
        expect_line(&mut reader, "150").await;
        write_half.write_all(payload).await.unwrap();
        write_half.shutdown().await.unwrap();
        expect_line(&mut reader, "226").await;
    }

    assert_eq!(std::fs::read(root.join("round.txt")).unwrap(), payload);

    // Download on a fresh connection; the payload arrives unframed between
    // the 150 and 226 lines, so read everything until the server closes.
    {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"USER anonymous\r\nPASS guest\r\nRETR round.txt\r\nQUIT\r\n")
            .await
            .unwrap();
        let mut output = Vec::new();
        timeout(Duration::from_secs(5), stream.read_to_end(&mut output))
            .await
            .unwrap()
            .unwrap();
        let output = String::from_utf8_lossy(&output);
        assert!(output.contains("150"));
        assert!(output.contains("uploaded over the control connection\n"));
        assert!(output.contains("226 Transfer complete"));
        assert!(output.trim_end().ends_with("221 Goodbye"));
    }

    shutdown_tx.send(true).unwrap();
    timeout(Duration::from_secs(5), server).await.unwrap().unwrap();
    std::fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn graceful_shutdown_notifies_idle_sessions_and_returns() {
    let root = temp_root("shutdown");
    let (addr, shutdown_tx, server) = spawn_server(root.clone(), test_config()).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    expect_line(&mut reader, "220").await;
    write_half.write_all(b"USER anonymous\r\n").await.unwrap();
    expect_line(&mut reader, "331").await;
    write_half.write_all(b"PASS guest\r\n").await.unwrap();
    expect_line(&mut reader, "230").await;

    shutdown_tx.send(true).unwrap();

    // Idle sessions are told the service is going down, then the accept
    // loop joins its workers and returns within the grace period.
    expect_line(&mut reader, "421").await;
    timeout(Duration::from_secs(5), server).await.unwrap().unwrap();

    // The listener is gone once serve has returned.
    assert!(TcpStream::connect(addr).await.is_err());
    std::fs::remove_dir_all(&root).ok();
}
