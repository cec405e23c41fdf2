//! Answer Evaluator: one LLM call per submitted answer.
//!
//! Returns the model's raw text. Structure is imposed later by `summary`.

use tracing::warn;

use crate::interview::prompts::EVALUATION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_template, PROFESSIONAL_TONE};
use crate::llm_client::{record_exchange, ChatTurn, LanguageModel};

/// The message returned in place of an evaluation when the call fails.
pub fn fallback_evaluation(reason: &str) -> String {
    format!("I apologize, but I could not evaluate this answer ({reason}). Please try again.")
}

pub fn build_evaluation_prompt(question: &str, answer: &str) -> String {
    fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("tone_instruction", PROFESSIONAL_TONE),
            ("question", question),
            ("answer", answer),
        ],
    )
}

/// Evaluates `answer` against `question`. Never fails: errors and empty replies
/// become `fallback_evaluation`.
pub async fn evaluate_answer(
    llm: &dyn LanguageModel,
    history: &mut Vec<ChatTurn>,
    question: &str,
    answer: &str,
) -> String {
    let prompt = build_evaluation_prompt(question, answer);

    match llm.generate(&prompt, history).await {
        Ok(reply) if !reply.trim().is_empty() => {
            record_exchange(history, &prompt, &reply);
            reply
        }
        Ok(_) => {
            warn!("Evaluator returned empty text");
            fallback_evaluation("the evaluator returned no text")
        }
        Err(e) => {
            warn!("Answer evaluation failed: {e}");
            fallback_evaluation(&e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::ScriptedModel;
    use crate::llm_client::GeminiClient;

    #[test]
    fn test_prompt_embeds_question_and_answer() {
        let prompt = build_evaluation_prompt("What is a mutex?", "A lock.");
        assert!(prompt.contains("Question: What is a mutex?"));
        assert!(prompt.contains("Candidate's Answer: A lock."));
        assert!(prompt.contains("Overall assessment:"));
        assert!(prompt.contains(PROFESSIONAL_TONE));
    }

    #[test]
    fn test_question_placeholder_text_is_not_filled_with_answer() {
        let prompt = build_evaluation_prompt("What does `{answer}` mean in a template?", "A slot.");
        assert!(prompt.contains("Question: What does `{answer}` mean in a template?"));
        assert!(prompt.contains("Candidate's Answer: A slot."));
    }

    #[tokio::test]
    async fn test_evaluation_returns_raw_model_text() {
        let reply = "Strengths:\n* Clear\nOverall assessment: Good";
        let llm = ScriptedModel::new([Some(reply)]);
        let mut history = Vec::new();

        let evaluation = evaluate_answer(&llm, &mut history, "Q?", "A.").await;

        assert_eq!(evaluation, reply);
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_evaluation_failure_is_deterministic_fallback() {
        let llm = ScriptedModel::failing();
        let mut history = Vec::new();

        let evaluation = evaluate_answer(&llm, &mut history, "Q?", "A.").await;

        assert_eq!(
            evaluation,
            fallback_evaluation("API error (status 503): service unavailable")
        );
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_evaluation_empty_reply_uses_fallback() {
        let llm = ScriptedModel::new([Some("   ")]);
        let evaluation = evaluate_answer(&llm, &mut Vec::new(), "Q?", "").await;
        assert!(evaluation.starts_with("I apologize"));
        assert!(evaluation.contains("LLM returned empty content"));
    }

    #[tokio::test]
    async fn test_transport_failure_fallback_hides_api_key() {
        let client = GeminiClient::with_base_url(
            "SECRET_KEY_123".to_string(),
            "gemini-1.5-pro".to_string(),
            "http://127.0.0.1:1".to_string(),
        )
        .unwrap();

        let evaluation = evaluate_answer(&client, &mut Vec::new(), "Q?", "A.").await;

        assert!(evaluation.starts_with("I apologize"));
        assert!(!evaluation.contains("SECRET_KEY_123"), "{evaluation}");
    }
}
