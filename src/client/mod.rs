// Module declarations
mod builder;
mod connection;
mod core;
mod state;

// Public API exports
pub use builder::{NotificationClientBuilder, NotificationClientOptions};
pub use connection::{ConnectionStatus, Transport};
pub use self::core::NotificationClient;
pub use state::{CloseOutcome, ConnectionState, ReconnectPlan};
