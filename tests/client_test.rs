use futures::{SinkExt, StreamExt};
use mail_notify::types::{alert_text, storage_keys};
use mail_notify::{
    ConnectionStatus, MemorySink, MemoryStore, NotificationClient, NotificationClientOptions,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::{WebSocketStream, accept_hdr_async};

const WAIT: Duration = Duration::from_secs(5);

struct ServerConn {
    path: String,
    ws: WebSocketStream<TcpStream>,
}

/// Local mail push server that hands every accepted WebSocket to the test
struct TestServer {
    addr: SocketAddr,
    conns: mpsc::UnboundedReceiver<ServerConn>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, conns) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut path = String::new();
                    let callback = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                        path = req.uri().to_string();
                        Ok(resp)
                    };
                    let accepted = accept_hdr_async(stream, callback).await;
                    if let Ok(ws) = accepted {
                        let _ = tx.send(ServerConn { path, ws });
                    }
                });
            }
        });

        Self { addr, conns }
    }

    fn endpoint(&self) -> String {
        format!("ws://{}", self.addr)
    }

    async fn next_conn(&mut self) -> ServerConn {
        tokio::time::timeout(WAIT, self.conns.recv())
            .await
            .expect("no connection within timeout")
            .expect("server stopped")
    }

    async fn expect_no_conn(&mut self, wait: Duration) {
        if let Ok(Some(conn)) = tokio::time::timeout(wait, self.conns.recv()).await {
            panic!("unexpected connection to {}", conn.path);
        }
    }
}

fn options(endpoint: String) -> NotificationClientOptions {
    NotificationClientOptions {
        endpoint,
        reconnect_interval: 20,
        notification_timeout: 60_000,
        ..Default::default()
    }
}

fn client_for(endpoint: String) -> (NotificationClient, Arc<MemoryStore>, Arc<MemorySink>) {
    client_with(options(endpoint))
}

fn client_with(
    options: NotificationClientOptions,
) -> (NotificationClient, Arc<MemoryStore>, Arc<MemorySink>) {
    let store = Arc::new(MemoryStore::new());
    store.set(storage_keys::AUTH_TOKEN, "tok");
    let sink = Arc::new(MemorySink::new());
    let client = NotificationClient::new(
        options,
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&sink),
    )
    .unwrap();
    (client, store, sink)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not met within timeout");
}

/// Wait until the peer has closed its side of the connection
async fn wait_closed(ws: &mut WebSocketStream<TcpStream>) {
    tokio::time::timeout(WAIT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await
    .expect("peer did not close");
}

#[tokio::test]
async fn test_connect_opens_channel_for_identity() {
    let mut server = TestServer::start().await;
    let (client, _store, sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let conn = server.next_conn().await;

    assert_eq!(conn.path, "/ws/mail/alice@example.com?token=tok");
    wait_until(|| client.is_connected()).await;
    assert_eq!(client.identity().as_deref(), Some("alice@example.com"));
    assert_eq!(sink.container_count(), 1);
}

#[tokio::test]
async fn test_new_mail_push_is_rendered() {
    let mut server = TestServer::start().await;
    let (client, _store, sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut conn = server.next_conn().await;
    conn.ws
        .send(Message::text(
            r#"{"type":"NEW_MAIL","from":"bob@example.com","subject":"Release notes"}"#,
        ))
        .await
        .unwrap();

    wait_until(|| sink.visible().len() == 1).await;
    let notification = &sink.visible()[0];
    assert_eq!(notification.title, alert_text::NEW_MAIL_TITLE);
    assert!(notification.body.contains("bob@example.com"));
    assert!(notification.body.contains("Release notes"));

    client.shutdown().await;
    assert!(sink.visible().is_empty());
    assert_eq!(client.status(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_unparseable_push_renders_raw_body() {
    let mut server = TestServer::start().await;
    let (client, _store, sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut conn = server.next_conn().await;
    conn.ws.send(Message::text("plain text ping")).await.unwrap();

    wait_until(|| sink.visible().len() == 1).await;
    assert_eq!(sink.visible()[0].body, "plain text ping");
}

#[tokio::test]
async fn test_binary_push_is_decoded_as_text() {
    let mut server = TestServer::start().await;
    let (client, _store, sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut conn = server.next_conn().await;
    conn.ws
        .send(Message::binary(
            br#"{"type":"NEW_MAIL","from":"x"}"#.to_vec(),
        ))
        .await
        .unwrap();

    wait_until(|| sink.visible().len() == 1).await;
    let notification = &sink.visible()[0];
    assert_eq!(notification.title, alert_text::NEW_MAIL_TITLE);
    assert_eq!(
        notification.body,
        format!("From: x\nSubject: {}", alert_text::NO_SUBJECT)
    );
}

#[tokio::test]
async fn test_reconnects_after_server_close() {
    let mut server = TestServer::start().await;
    let (client, _store, _sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut first = server.next_conn().await;
    wait_until(|| client.is_connected()).await;

    first.ws.close(None).await.unwrap();

    let second = server.next_conn().await;
    assert_eq!(second.path, first.path);
    wait_until(|| client.is_connected()).await;
    assert_eq!(client.retry_count(), 0);
}

#[tokio::test]
async fn test_retries_stop_after_max_attempts() {
    // Accepts TCP and hangs up before the WebSocket handshake
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let (client, _store, _sink) = client_for(format!("ws://{}", addr));
    client.connect("alice@example.com");

    wait_until(|| client.retry_count() == 5).await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(attempts.load(Ordering::SeqCst), 6);
    assert_eq!(client.retry_count(), 5);
    assert_eq!(client.status(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_connect_twice_keeps_single_transport() {
    let mut server = TestServer::start().await;
    let (client, _store, _sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut first = server.next_conn().await;

    client.connect("bob@example.com");
    let second = server.next_conn().await;
    assert!(second.path.starts_with("/ws/mail/bob@example.com"));

    wait_closed(&mut first.ws).await;
    wait_until(|| client.is_connected()).await;
    server.expect_no_conn(Duration::from_millis(200)).await;
    assert_eq!(client.identity().as_deref(), Some("bob@example.com"));
}

#[tokio::test]
async fn test_disconnect_does_not_reconnect() {
    let mut server = TestServer::start().await;
    let (client, _store, _sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut conn = server.next_conn().await;
    wait_until(|| client.is_connected()).await;

    client.disconnect();
    wait_closed(&mut conn.ws).await;

    server.expect_no_conn(Duration::from_millis(200)).await;
    assert_eq!(client.status(), ConnectionStatus::Disconnected);
    assert_eq!(client.identity(), None);

    // Idempotent
    client.disconnect();
}

#[tokio::test]
async fn test_settings_change_reconnects_and_gates_display() {
    let mut server = TestServer::start().await;
    let (client, store, sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut first = server.next_conn().await;
    wait_until(|| client.is_connected()).await;

    store.set(
        storage_keys::MAIL_SETTINGS,
        r#"{"emailNotification":false}"#,
    );

    let mut second = server.next_conn().await;
    assert_eq!(second.path, first.path);
    wait_closed(&mut first.ws).await;
    wait_until(|| client.is_connected()).await;

    second
        .ws
        .send(Message::text(r#"{"type":"NEW_MAIL","from":"x","subject":"y"}"#))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(sink.visible().is_empty());

    // Unrelated keys do not trigger a reconnect
    store.set("theme", "dark");
    server.expect_no_conn(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_start_uses_stored_profile() {
    let mut server = TestServer::start().await;
    let (client, store, _sink) = client_for(server.endpoint());

    assert!(!client.start());

    store.set(storage_keys::USER_INFO, "{broken");
    assert!(!client.start());
    store.set(storage_keys::USER_INFO, r#"{"email":""}"#);
    assert!(!client.start());
    server.expect_no_conn(Duration::from_millis(100)).await;

    store.set(storage_keys::USER_INFO, r#"{"email":"carol@example.com"}"#);
    assert!(client.start());

    let conn = server.next_conn().await;
    assert!(conn.path.starts_with("/ws/mail/carol@example.com"));
}

#[tokio::test]
async fn test_status_receiver_reports_connection() {
    let mut server = TestServer::start().await;
    let (client, _store, _sink) = client_for(server.endpoint());
    let mut status = client.status_receiver();

    client.connect("alice@example.com");
    let _conn = server.next_conn().await;

    tokio::time::timeout(
        WAIT,
        status.wait_for(|status| *status == ConnectionStatus::Connected),
    )
    .await
    .expect("never connected")
    .unwrap();
}

#[tokio::test]
async fn test_settings_change_after_disconnect_stays_closed() {
    let mut server = TestServer::start().await;
    let (client, store, _sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut conn = server.next_conn().await;
    wait_until(|| client.is_connected()).await;

    client.disconnect();
    wait_closed(&mut conn.ws).await;

    store.set(
        storage_keys::MAIL_SETTINGS,
        r#"{"emailNotification":true}"#,
    );
    server.expect_no_conn(Duration::from_millis(200)).await;
    assert_eq!(client.status(), ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn test_disconnect_cancels_pending_reconnect() {
    let mut server = TestServer::start().await;
    let (client, _store, _sink) = client_with(NotificationClientOptions {
        reconnect_interval: 400,
        ..options(server.endpoint())
    });

    client.connect("alice@example.com");
    let mut conn = server.next_conn().await;
    wait_until(|| client.is_connected()).await;

    conn.ws.close(None).await.unwrap();
    wait_until(|| client.retry_count() == 1).await;
    assert_eq!(client.status(), ConnectionStatus::Disconnected);

    client.disconnect();
    server.expect_no_conn(Duration::from_millis(800)).await;
    assert_eq!(client.identity(), None);
}

#[tokio::test]
async fn test_dropping_client_closes_channel() {
    let mut server = TestServer::start().await;
    let (client, store, _sink) = client_for(server.endpoint());

    client.connect("alice@example.com");
    let mut conn = server.next_conn().await;
    wait_until(|| client.is_connected()).await;

    drop(client);
    wait_closed(&mut conn.ws).await;

    // The settings listener outlives the client but no longer reconnects
    store.set(
        storage_keys::MAIL_SETTINGS,
        r#"{"emailNotification":false}"#,
    );
    server.expect_no_conn(Duration::from_millis(200)).await;
}
