//! Free-form messages outside the scripted flow.

use std::collections::BTreeMap;

use tracing::warn;

use crate::llm_client::prompts::{fill_template, CONTEXTUAL_PROMPT_TEMPLATE};
use crate::llm_client::{record_exchange, ChatTurn, LanguageModel};

pub fn chat_fallback(reason: &str) -> String {
    format!("I apologize, but I encountered an error: {reason}. Please try again.")
}

/// Wraps `message` with one `key: value` line per context entry.
/// Without context the message is sent as-is.
pub fn build_contextual_prompt(message: &str, context: &BTreeMap<String, String>) -> String {
    if context.is_empty() {
        return message.to_string();
    }
    let lines = context
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n");
    fill_template(
        CONTEXTUAL_PROMPT_TEMPLATE,
        &[("context", lines.as_str()), ("message", message)],
    )
}

/// Sends one message with the session history. Failures come back as
/// `chat_fallback` text.
pub async fn respond(
    llm: &dyn LanguageModel,
    history: &mut Vec<ChatTurn>,
    message: &str,
    context: &BTreeMap<String, String>,
) -> String {
    let prompt = build_contextual_prompt(message, context);
    match llm.generate(&prompt, history).await {
        Ok(reply) => {
            record_exchange(history, &prompt, &reply);
            reply
        }
        Err(e) => {
            warn!("Chat response failed: {e}");
            chat_fallback(&e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::ScriptedModel;
    use crate::llm_client::GeminiClient;

    #[test]
    fn test_message_without_context_is_unchanged() {
        assert_eq!(build_contextual_prompt("hello", &BTreeMap::new()), "hello");
    }

    #[test]
    fn test_context_lines_precede_message() {
        let mut context = BTreeMap::new();
        context.insert("stage".to_string(), "tech_stack".to_string());
        context.insert("name".to_string(), "Ada".to_string());
        let prompt = build_contextual_prompt("What next?", &context);
        assert!(prompt.starts_with("Previous Context:\nname: Ada\nstage: tech_stack"));
        assert!(prompt.contains("Current Message:\nWhat next?"));
    }

    #[tokio::test]
    async fn test_reply_is_recorded_in_history() {
        let llm = ScriptedModel::new([Some("Sure thing.")]);
        let mut history = Vec::new();
        let reply = respond(&llm, &mut history, "hi", &BTreeMap::new()).await;
        assert_eq!(reply, "Sure thing.");
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_returns_apology() {
        let llm = ScriptedModel::failing();
        let mut history = Vec::new();
        let reply = respond(&llm, &mut history, "hi", &BTreeMap::new()).await;
        assert!(reply.starts_with("I apologize, but I encountered an error: "));
        assert!(reply.ends_with(". Please try again."));
        assert!(history.is_empty());
    }

    #[test]
    fn test_context_values_are_not_treated_as_placeholders() {
        let mut context = BTreeMap::new();
        context.insert("note".to_string(), "{message}".to_string());
        let prompt = build_contextual_prompt("hi", &context);
        assert!(prompt.contains("note: {message}"));
        assert!(prompt.contains("Current Message:\nhi"));
    }

    #[tokio::test]
    async fn test_transport_failure_reply_hides_api_key() {
        let client = GeminiClient::with_base_url(
            "SECRET_KEY_123".to_string(),
            "gemini-1.5-pro".to_string(),
            "http://127.0.0.1:1".to_string(),
        )
        .unwrap();

        let reply = respond(&client, &mut Vec::new(), "hi", &BTreeMap::new()).await;

        assert!(reply.starts_with("I apologize"));
        assert!(!reply.contains("SECRET_KEY_123"), "{reply}");
    }
}
