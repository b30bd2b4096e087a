use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persona::PersonaId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of the conversation. Immutable once created; the orchestrator
/// owns the append-only sequence and persists it whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// The persona active when this turn was created. Assistant turns carry
    /// the persona that produced them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<PersonaId>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, persona: PersonaId) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            persona: Some(persona),
        }
    }

    pub fn assistant(content: impl Into<String>, persona: PersonaId) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            persona: Some(persona),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let msg = ChatMessage::user("hello", PersonaId::WiseFriend);
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["role"], "user");
        assert_eq!(json["persona"], "wise-friend");
    }

    #[test]
    fn persona_field_is_optional_on_the_wire() {
        let json = r#"{"role":"assistant","content":"hi","timestamp":"2025-06-01T12:00:00Z"}"#;
        let msg: ChatMessage = serde_json::from_str(json).expect("deserialize");
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.persona.is_none());
    }
}
