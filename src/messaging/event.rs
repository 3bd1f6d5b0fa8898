use crate::types::constants::push_types;
use serde::{Deserialize, Serialize};

/// Type-safe push kinds carried in the `type` field of a push message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PushKind {
    /// A new mail arrived in the user's mailbox
    #[serde(rename = "NEW_MAIL")]
    NewMail,

    /// Any kind this client does not recognise
    #[serde(untagged)]
    Custom(String),
}

impl PushKind {
    /// Parse a string into a PushKind
    pub fn from_str(s: &str) -> Self {
        match s {
            push_types::NEW_MAIL => Self::NewMail,
            _ => Self::Custom(s.to_string()),
        }
    }

    /// Convert kind to string representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::NewMail => push_types::NEW_MAIL,
            Self::Custom(s) => s,
        }
    }
}

impl From<&str> for PushKind {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for PushKind {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl std::fmt::Display for PushKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
