use mail_notify::types::storage_keys;
use mail_notify::{
    MemoryStore, Notification, NotificationClient, NotificationClientOptions, NotificationId,
    NotificationSink,
};
use std::sync::Arc;

/// Prints notifications to the terminal instead of drawing them
struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn ensure_container(&self, container_id: &str) -> bool {
        tracing::debug!("Using terminal as container '{}'", container_id);
        false
    }

    fn render(&self, notification: &Notification) {
        println!("📬 [{}] {}\n{}\n", notification.id, notification.title, notification.body);
    }

    fn remove(&self, id: NotificationId) {
        tracing::debug!("{} dismissed", id);
    }

    fn navigate(&self, route: &str) {
        println!("➡️  open {}", route);
    }
}

/// Listen for new-mail pushes and print them
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let endpoint =
        std::env::var("MAIL_NOTIFY_ENDPOINT").unwrap_or_else(|_| "ws://localhost:8081".to_string());
    let email = std::env::var("MAIL_NOTIFY_EMAIL").expect("MAIL_NOTIFY_EMAIL must be set in .env");
    let token = std::env::var("MAIL_NOTIFY_TOKEN").expect("MAIL_NOTIFY_TOKEN must be set in .env");

    let store = Arc::new(MemoryStore::new());
    store.set(storage_keys::AUTH_TOKEN, token);
    store.set(storage_keys::USER_INFO, serde_json::json!({ "email": email }).to_string());

    let client = NotificationClient::new(
        NotificationClientOptions {
            endpoint,
            ..Default::default()
        },
        Arc::clone(&store),
        store,
        Arc::new(TerminalSink),
    )?;

    println!("📡 Listening for new mail, press Ctrl+C to stop\n");
    client.start();

    let mut status = client.status_receiver();
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("🔌 status: {:?}", *status.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    client.shutdown().await;
    Ok(())
}
