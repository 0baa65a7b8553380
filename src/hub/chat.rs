//! AI chat assistant endpoints.

use color_eyre::{eyre::WrapErr, Result};

use super::api_types::{
  ChatReply, ConversationStarted, ConversationsEnvelope, MessageSaved, MessagesEnvelope,
  OutgoingMessage, SaveMessageRequest, StartConversationRequest,
};
use super::transport::HubClient;
use super::types::{ChatMessage, ChatRole, Conversation};

impl HubClient {
  /// Exchange one chat turn: the full message history goes up, the assistant
  /// reply comes back.
  pub async fn send_chat(&self, messages: &[OutgoingMessage]) -> Result<String> {
    let reply: ChatReply = self
      .post_json("/ai/ai-chat", messages)
      .await
      .wrap_err("Failed to send message to assistant")?;
    Ok(reply.reply)
  }

  /// Open a new conversation titled after the first message; returns its id.
  pub async fn start_conversation(&self, message: &str) -> Result<String> {
    let body = StartConversationRequest {
      message: message.to_string(),
    };

    let started: ConversationStarted = self
      .post_json("/ai/start-conversation", &body)
      .await
      .wrap_err("Failed to start conversation")?;
    Ok(started.conversation_id)
  }

  pub async fn save_message(
    &self,
    conversation_id: &str,
    role: ChatRole,
    content: &str,
  ) -> Result<bool> {
    let body = SaveMessageRequest {
      conversation_id: conversation_id.to_string(),
      role,
      content: content.to_string(),
    };

    let saved: MessageSaved = self
      .post_json("/ai/save-message", &body)
      .await
      .wrap_err("Failed to save message")?;
    Ok(saved.success)
  }

  pub async fn get_conversations(&self) -> Result<Vec<Conversation>> {
    let envelope: ConversationsEnvelope = self
      .get_json("/ai/get-conversations")
      .await
      .wrap_err("Failed to fetch conversations")?;
    Ok(envelope.conversations)
  }

  pub async fn get_messages(&self, conversation_id: &str) -> Result<Vec<ChatMessage>> {
    let envelope: MessagesEnvelope = self
      .get_json(&format!("/ai/get-messages/{}", conversation_id))
      .await
      .wrap_err_with(|| format!("Failed to fetch messages for {}", conversation_id))?;
    Ok(envelope.messages)
  }
}
