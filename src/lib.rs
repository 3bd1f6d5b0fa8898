//! # Mail Notify
//!
//! New-mail notification client for a webmail server that pushes events over
//! a per-user WebSocket (`ws://<host>/ws/mail/{email}?token={token}`).
//!
//! The client keeps one live connection, reconnects a bounded number of times
//! at a fixed interval, and surfaces every push as a transient notification
//! through a [`NotificationSink`], unless the stored settings switch
//! notifications off.
//!
//! ## Example
//!
//! ```no_run
//! use mail_notify::{MemorySink, MemoryStore, NotificationClient, NotificationClientOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     store.set("auth_token", "your-bearer-token");
//!
//!     let client = NotificationClient::new(
//!         NotificationClientOptions {
//!             endpoint: "ws://localhost:8081".to_string(),
//!             ..Default::default()
//!         },
//!         Arc::clone(&store),
//!         store,
//!         Arc::new(MemorySink::new()),
//!     )?;
//!
//!     client.connect("alice@example.com");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod infrastructure;
pub mod messaging;
pub mod notification;
pub mod store;
pub mod types;
pub mod websocket;

pub use client::{
    ConnectionStatus, NotificationClient, NotificationClientBuilder, NotificationClientOptions,
};
pub use messaging::PushKind;
pub use notification::{
    ClickTarget, MemorySink, Notification, NotificationCenter, NotificationId, NotificationSink,
};
pub use store::{ChangeListener, CredentialStore, MemoryStore, PreferenceStore};
pub use types::{MailPush, NotifyError, Result};
