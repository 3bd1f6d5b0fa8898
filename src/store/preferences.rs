use super::PreferenceStore;
use crate::types::{NOTIFICATION_PREFERENCE_FIELD, NotifyError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Whether incoming pushes should be displayed.
///
/// Fails open: only an explicit `false` in the settings blob disables
/// notifications. Missing or malformed settings leave them enabled.
pub fn notifications_enabled(store: &dyn PreferenceStore) -> bool {
    let Some(settings) = store.settings() else {
        return true;
    };

    match serde_json::from_str::<Value>(&settings) {
        Ok(value) => value.get(NOTIFICATION_PREFERENCE_FIELD) != Some(&Value::Bool(false)),
        Err(e) => {
            tracing::warn!("Failed to read notification settings: {}", e);
            true
        }
    }
}

/// Stored profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub email: String,
}

/// Parse the stored profile blob.
///
/// # Errors
///
/// [`NotifyError::Serialization`] for malformed JSON and
/// [`NotifyError::InvalidIdentity`] when the email is blank.
pub fn parse_user_info(raw: &str) -> Result<UserInfo> {
    let info: UserInfo = serde_json::from_str(raw)?;
    if info.email.trim().is_empty() {
        return Err(NotifyError::InvalidIdentity);
    }
    Ok(info)
}
