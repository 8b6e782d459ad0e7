use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker role of a conversation turn.
///
/// The hosted completion endpoint calls the assistant role `model`; `System`
/// never crosses the wire and is folded into the system instruction instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

impl Role {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
            // never appears in a contents entry
            Role::System => "user",
        }
    }
}

/// One message in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Identity obtained once at startup from the external auth provider.
///
/// Used only as a partition key for memory fragments. When `authenticated`
/// is false the persistence adapter is inert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    pub authenticated: bool,
}

impl SessionIdentity {
    pub fn anonymous() -> Self {
        Self {
            user_id: "anonymous".to_string(),
            id_token: None,
            authenticated: false,
        }
    }
}

/// A short persisted text snippet stored in the Chrono Vault.
/// Read-only from the application's perspective once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryFragment {
    /// Opaque identifier assigned by the document store.
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "emotionTag", default = "default_emotion_tag")]
    pub emotion_tag: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

pub fn default_emotion_tag() -> String {
    "neutral".to_string()
}

pub fn default_kind() -> String {
    "thought".to_string()
}

/// One interaction log entry, newest kept first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub sender: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names() {
        assert_eq!(Role::User.as_wire_str(), "user");
        assert_eq!(Role::Model.as_wire_str(), "model");
        assert_eq!(Role::System.as_wire_str(), "user");
    }

    #[test]
    fn role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn turn_constructors() {
        let t = Turn::user("hello");
        assert_eq!(t.role, Role::User);
        assert_eq!(t.text, "hello");
        assert_eq!(Turn::model("hi").role, Role::Model);
    }

    #[test]
    fn anonymous_identity_is_unauthenticated() {
        let id = SessionIdentity::anonymous();
        assert_eq!(id.user_id, "anonymous");
        assert!(!id.authenticated);
        assert!(id.id_token.is_none());
    }

    #[test]
    fn memory_fragment_defaults_on_deserialize() {
        let json = r#"{
            "id": "frag-1",
            "content": "the launch",
            "createdAt": "2025-06-01T10:00:00Z"
        }"#;
        let frag: MemoryFragment = serde_json::from_str(json).unwrap();
        assert_eq!(frag.emotion_tag, "neutral");
        assert_eq!(frag.kind, "thought");
    }

    #[test]
    fn memory_fragment_wire_field_names() {
        let frag = MemoryFragment {
            id: "frag-1".into(),
            content: "c".into(),
            created_at: Utc::now(),
            emotion_tag: default_emotion_tag(),
            kind: default_kind(),
        };
        let json = serde_json::to_string(&frag).unwrap();
        assert!(json.contains("\"emotionTag\""));
        assert!(json.contains("\"type\""));
        assert!(json.contains("\"createdAt\""));
    }
}
