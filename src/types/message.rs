use crate::messaging::PushKind;
use crate::types::constants::alert_text;
use serde_json::Value;

/// A decoded server push.
///
/// Decoding never fails: frames that are not JSON, or that carry a kind this
/// client does not know, still produce a value so they can be surfaced.
#[derive(Debug, Clone, PartialEq)]
pub enum MailPush {
    /// `{"type":"NEW_MAIL","from":..,"subject":..}`
    NewMail {
        from: Option<String>,
        subject: Option<String>,
    },
    /// Valid JSON with a missing or unrecognised `type`
    Other { kind: Option<PushKind>, raw: String },
    /// Payload that is not valid JSON
    Unparsed { raw: String },
}

impl MailPush {
    pub fn parse(raw: &str) -> Self {
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Push payload is not JSON ({}), using raw text", e);
                return Self::Unparsed {
                    raw: raw.to_string(),
                };
            }
        };

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .map(PushKind::from_str);

        match kind {
            Some(PushKind::NewMail) => Self::NewMail {
                from: non_empty_str(&value, "from"),
                subject: non_empty_str(&value, "subject"),
            },
            kind => Self::Other {
                kind,
                raw: raw.to_string(),
            },
        }
    }

    /// Kind carried by the push, if any
    pub fn kind(&self) -> Option<PushKind> {
        match self {
            Self::NewMail { .. } => Some(PushKind::NewMail),
            Self::Other { kind, .. } => kind.clone(),
            Self::Unparsed { .. } => None,
        }
    }

    /// Notification title for this push
    pub fn title(&self) -> &'static str {
        match self {
            Self::NewMail { .. } | Self::Unparsed { .. } => alert_text::NEW_MAIL_TITLE,
            Self::Other { .. } => alert_text::GENERIC_TITLE,
        }
    }

    /// Notification body for this push
    pub fn body(&self) -> String {
        match self {
            Self::NewMail { from, subject } => format!(
                "From: {}\nSubject: {}",
                from.as_deref().unwrap_or(alert_text::UNKNOWN_SENDER),
                subject.as_deref().unwrap_or(alert_text::NO_SUBJECT)
            ),
            Self::Other { raw, .. } | Self::Unparsed { raw } => raw.clone(),
        }
    }
}

fn non_empty_str(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
