//! Read-only collaborators the client consults: the credential store (bearer
//! token, stored user profile) and the preference store (settings blob plus
//! change notification).

mod memory;
mod preferences;

pub use memory::MemoryStore;
pub use preferences::{UserInfo, notifications_enabled, parse_user_info};

use std::sync::Arc;

/// Callback invoked with the key of a changed entry
pub type ChangeListener = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Supplies the authentication token, read once per connect attempt
pub trait CredentialStore: Send + Sync {
    /// Bearer token, if the user is signed in
    fn auth_token(&self) -> Option<String>;

    /// Raw stored user profile blob (JSON with an `email` field)
    fn user_info(&self) -> Option<String> {
        None
    }
}

/// Supplies the persisted settings blob and notifies about changes to it
pub trait PreferenceStore: Send + Sync {
    /// Raw settings blob stored under the mail settings key
    fn settings(&self) -> Option<String>;

    /// Register a listener called with the key of every changed entry
    fn subscribe(&self, listener: ChangeListener);
}
