//! Career assistant chat

use std::sync::Arc;
use tracing::debug;

use crate::backend::{prompts, Backend, ChatRequest, ChatRole, ChatTurn, RequestStatus};
use crate::{AlchemistError, Result};

const CHAT_TEMPERATURE: f32 = 0.7;
const REVIEW_TEMPERATURE: f32 = 0.3;

pub struct ChatStore {
    backend: Arc<dyn Backend>,
    system_prompt: String,
    messages: Vec<ChatTurn>,
    status: RequestStatus,
}

impl ChatStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_system_prompt(backend, prompts::CAREER_ASSISTANT_PROMPT)
    }

    pub fn with_system_prompt(backend: Arc<dyn Backend>, system_prompt: &str) -> Self {
        Self {
            backend,
            system_prompt: system_prompt.to_string(),
            messages: Vec::new(),
            status: RequestStatus::default(),
        }
    }

    /// Conversation so far, without the system prompt
    pub fn messages(&self) -> &[ChatTurn] {
        &self.messages
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// Send a user message; both turns are kept only if the reply arrives
    pub async fn send(&mut self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(self
                .status
                .fail(AlchemistError::Other("Message is empty".to_string())));
        }

        let user_turn = ChatTurn::new(ChatRole::User, text);
        let mut turns = Vec::with_capacity(self.messages.len() + 2);
        turns.push(ChatTurn::new(ChatRole::System, self.system_prompt.clone()));
        turns.extend(self.messages.iter().cloned());
        turns.push(user_turn.clone());

        let request = ChatRequest {
            messages: turns,
            temperature: Some(CHAT_TEMPERATURE),
        };

        self.status.begin();
        let result = self.backend.complete(&request).await;
        let reply = self.status.settle(result)?;

        self.messages.push(user_turn);
        self.messages
            .push(ChatTurn::new(ChatRole::Assistant, reply.clone()));
        debug!("Chat now has {} turns", self.messages.len());
        Ok(reply)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.status.clear_error();
    }

    /// One-off resume review; does not touch the conversation
    pub async fn analyze_resume(&mut self, resume: &str, target_role: Option<&str>) -> Result<String> {
        if resume.trim().is_empty() {
            return Err(self
                .status
                .fail(AlchemistError::Other("Resume text is empty".to_string())));
        }

        let request = ChatRequest {
            messages: vec![ChatTurn::new(
                ChatRole::User,
                prompts::build_resume_review_prompt(resume.trim(), target_role),
            )],
            temperature: Some(REVIEW_TEMPERATURE),
        };

        self.status.begin();
        let result = self.backend.complete(&request).await;
        self.status.settle(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, StubBackend};

    #[tokio::test]
    async fn send_appends_both_turns() {
        let mut chat = ChatStore::new(Arc::new(MemoryBackend::new()));

        let reply = chat.send("How do I negotiate salary?").await.unwrap();
        assert_eq!(reply, "Echo: How do I negotiate salary?");

        let roles: Vec<ChatRole> = chat.messages().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
    }

    #[tokio::test]
    async fn failed_send_leaves_conversation_untouched() {
        let mut chat = ChatStore::new(Arc::new(StubBackend));

        assert!(chat.send("hello").await.is_err());
        assert!(chat.messages().is_empty());
        assert_eq!(chat.status().error.as_deref(), Some("Backend not implemented"));

        chat.clear();
        assert!(chat.status().error.is_none());
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let mut chat = ChatStore::new(Arc::new(MemoryBackend::new()));
        assert!(chat.send("   ").await.is_err());
        assert!(chat.messages().is_empty());
    }

    #[tokio::test]
    async fn resume_review_is_not_part_of_the_conversation() {
        let mut chat = ChatStore::new(Arc::new(MemoryBackend::new()));

        let review = chat
            .analyze_resume("Senior Rust developer", Some("SRE"))
            .await
            .unwrap();
        assert!(review.starts_with("Echo: "));
        assert!(review.contains("Target role: SRE"));
        assert!(chat.messages().is_empty());
    }
}
