mod factory;

pub use factory::{MailSocket, WebSocketFactory, build_endpoint_url, validate_endpoint};
