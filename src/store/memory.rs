use super::{ChangeListener, CredentialStore, PreferenceStore};
use crate::infrastructure::lock;
use crate::types::storage_keys;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-process key/value store backing both credential and preference lookups.
///
/// `set` and `remove` notify every subscriber with the changed key, after the
/// store lock has been released, so listeners may read the store again.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        lock(&self.entries).insert(key.clone(), value.into());
        self.notify(&key);
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        let previous = lock(&self.entries).remove(key);
        if previous.is_some() {
            self.notify(key);
        }
        previous
    }

    fn notify(&self, key: &str) {
        let listeners = lock(&self.listeners).clone();
        for listener in listeners {
            listener(key);
        }
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("keys", &lock(&self.entries).keys().collect::<Vec<_>>())
            .field("listeners", &lock(&self.listeners).len())
            .finish()
    }
}

impl CredentialStore for MemoryStore {
    fn auth_token(&self) -> Option<String> {
        self.get(storage_keys::AUTH_TOKEN)
    }

    fn user_info(&self) -> Option<String> {
        self.get(storage_keys::USER_INFO)
    }
}

impl PreferenceStore for MemoryStore {
    fn settings(&self) -> Option<String> {
        self.get(storage_keys::MAIL_SETTINGS)
    }

    fn subscribe(&self, listener: ChangeListener) {
        lock(&self.listeners).push(listener);
    }
}
