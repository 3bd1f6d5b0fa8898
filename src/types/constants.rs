/// Default server endpoint (scheme + host)
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8081";

/// Path segments prefixed to the channel identity: `/ws/mail/{identity}`
pub const MAIL_WS_PATH: [&str; 2] = ["ws", "mail"];

/// Query parameter carrying the bearer token
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Reconnect attempts allowed before giving up
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Fixed reconnect delay (milliseconds)
pub const RECONNECT_INTERVAL: u64 = 5000;

/// Lifetime of an undismissed notification (milliseconds)
pub const NOTIFICATION_TIMEOUT: u64 = 5000;

/// Well-known identifier of the notification container
pub const NOTIFICATION_CONTAINER_ID: &str = "ws-notifications";

/// Route opened when a notification body is clicked
pub const DEFAULT_MAILBOX_ROUTE: &str = "/inbox";

/// Keys used in the credential/preference stores
pub mod storage_keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const USER_INFO: &str = "user_info";
    pub const MAIL_SETTINGS: &str = "mailSettings";
}

/// Field of the settings blob gating notification display
pub const NOTIFICATION_PREFERENCE_FIELD: &str = "emailNotification";

/// Push message `type` values (magic strings layer)
pub mod push_types {
    pub const NEW_MAIL: &str = "NEW_MAIL";
}

/// Text rendered into notifications
pub mod alert_text {
    pub const NEW_MAIL_TITLE: &str = "New mail notification";
    pub const GENERIC_TITLE: &str = "You have a new message";
    pub const UNKNOWN_SENDER: &str = "Unknown sender";
    pub const NO_SUBJECT: &str = "No subject";
}
