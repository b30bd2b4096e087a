use chrono::{DateTime, Utc};

use crate::config::CompassConfig;
use crate::error::PerspectiveError;
use crate::llm::{LlmClient, Message, SamplingParams};
use crate::message::ChatMessage;
use crate::persona::{Persona, PersonaId};

/// Number of trailing prior turns forwarded to the API. Older turns are
/// dropped from the request; the persisted history is unbounded.
pub const HISTORY_WINDOW: usize = 12;

const SAMPLING: SamplingParams = SamplingParams {
    max_tokens: 250,
    temperature: 0.7,
    presence_penalty: Some(0.1),
    frequency_penalty: Some(0.1),
};

const CONVERSATION_GUIDELINES: &str = "\n\nConversation Guidelines:\n\
- Ask thoughtful follow-up questions when appropriate (about 30% of the time)\n\
- Build upon previous exchanges in this conversation\n\
- If the user seems to need more exploration, ask 1-2 clarifying questions\n\
- Keep your unique voice and perspective while being conversational";

/// Successful outcome of a perspective request.
#[derive(Debug, Clone)]
pub struct Perspective {
    pub message: String,
    pub persona: PersonaId,
    pub timestamp: DateTime<Utc>,
}

impl From<Perspective> for ChatMessage {
    fn from(p: Perspective) -> Self {
        ChatMessage {
            role: crate::message::Role::Assistant,
            content: p.message,
            timestamp: p.timestamp,
            persona: Some(p.persona),
        }
    }
}

/// Issues the primary chat-completion request for the active persona.
#[derive(Clone)]
pub struct PerspectiveService {
    client: LlmClient,
}

impl PerspectiveService {
    pub fn new(config: &CompassConfig) -> Self {
        Self {
            client: LlmClient::new(config),
        }
    }

    /// One request/response cycle: persona system prompt, a bounded window
    /// of prior turns, then the new user turn. No retry on failure.
    pub async fn get_perspective(
        &self,
        persona_id: &str,
        user_text: &str,
        history: &[ChatMessage],
    ) -> Result<Perspective, PerspectiveError> {
        let persona = Persona::find(persona_id)
            .ok_or_else(|| PerspectiveError::UnknownPersona(persona_id.to_string()))?;

        let messages = build_messages(persona, user_text, history);
        tracing::debug!(
            persona = persona_id,
            turns = messages.len(),
            "sending perspective request"
        );

        let text = self.client.generate(messages, SAMPLING).await?;

        Ok(Perspective {
            message: text,
            persona: persona.id,
            timestamp: Utc::now(),
        })
    }
}

fn build_messages(persona: &Persona, user_text: &str, history: &[ChatMessage]) -> Vec<Message> {
    let system_prompt = format!("{}{}", persona.system_prompt, CONVERSATION_GUIDELINES);

    let skip = history.len().saturating_sub(HISTORY_WINDOW);
    let mut messages = Vec::with_capacity(history.len() - skip + 2);
    messages.push(Message::new("system", system_prompt));
    for turn in &history[skip..] {
        messages.push(Message::new(turn.role.as_str(), turn.content.clone()));
    }
    messages.push(Message::new("user", user_text));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    fn history_of(len: usize) -> Vec<ChatMessage> {
        (0..len)
            .map(|i| {
                let content = format!("turn {}", i);
                if i % 2 == 0 {
                    ChatMessage::user(content, PersonaId::CbtTherapist)
                } else {
                    ChatMessage::assistant(content, PersonaId::CbtTherapist)
                }
            })
            .collect()
    }

    #[test]
    fn system_prompt_leads_and_user_turn_closes() {
        let persona = Persona::get(PersonaId::StoicPhilosopher);
        let messages = build_messages(persona, "I feel stuck", &history_of(3));

        assert_eq!(messages.first().map(|m| m.role.as_str()), Some("system"));
        assert!(messages[0].content.starts_with(persona.system_prompt));
        assert!(messages[0].content.contains("Conversation Guidelines"));
        assert_eq!(messages.last().map(|m| m.content.as_str()), Some("I feel stuck"));
        assert_eq!(messages.len(), 5);
    }

    #[test]
    fn history_is_truncated_to_the_most_recent_window() {
        let persona = Persona::get(PersonaId::WiseFriend);
        let history = history_of(20);
        let messages = build_messages(persona, "latest", &history);

        // system + 12 prior turns + new user turn
        assert_eq!(messages.len(), HISTORY_WINDOW + 2);
        // oldest forwarded turn is history[8], order preserved
        assert_eq!(messages[1].content, "turn 8");
        assert_eq!(messages[HISTORY_WINDOW].content, "turn 19");
    }

    #[test]
    fn short_history_is_forwarded_whole() {
        let persona = Persona::get(PersonaId::InnerChild);
        let messages = build_messages(persona, "hi", &history_of(2));
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "turn 0");
    }

    #[test]
    fn roles_are_carried_through() {
        let persona = Persona::get(PersonaId::PracticalAdvisor);
        let history = vec![
            ChatMessage::user("a", PersonaId::PracticalAdvisor),
            ChatMessage::assistant("b", PersonaId::PracticalAdvisor),
        ];
        let messages = build_messages(persona, "c", &history);
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[2].role, "assistant");
    }

    #[tokio::test]
    async fn unknown_persona_is_an_error_not_a_panic() {
        let service = PerspectiveService::new(&CompassConfig::default());
        let result = service.get_perspective("life-coach", "hello", &[]).await;
        match result {
            Err(PerspectiveError::UnknownPersona(id)) => assert_eq!(id, "life-coach"),
            other => panic!("expected UnknownPersona, got {:?}", other.map(|p| p.persona)),
        }
    }

    #[tokio::test]
    async fn transport_failure_maps_to_unknown_error() {
        let mut config = CompassConfig::default();
        config.api_url = "http://127.0.0.1:9".to_string();
        let service = PerspectiveService::new(&config);

        let result = service.get_perspective("wise-friend", "hello", &[]).await;
        match result {
            Err(e) => assert_eq!(e.kind(), "unknown_error"),
            Ok(_) => panic!("expected transport failure"),
        }
    }

    #[test]
    fn perspective_converts_to_assistant_message() {
        let perspective = Perspective {
            message: "take a walk".to_string(),
            persona: PersonaId::PracticalAdvisor,
            timestamp: Utc::now(),
        };
        let msg: ChatMessage = perspective.into();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.persona, Some(PersonaId::PracticalAdvisor));
        assert_eq!(msg.content, "take a walk");
    }
}
