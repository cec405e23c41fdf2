//! Question Generator: turns a skill set into an ordered list of interview questions.
//!
//! Flow: build prompt → one LLM call → keep numbered-list lines → pad with the
//! fixed fallback list. Any failure of the call yields the fallback list as-is,
//! so the interview can always proceed.

use tracing::{info, warn};

use crate::interview::prompts::{PRACTICE_PROMPT_TEMPLATE, QUESTION_PROMPT_TEMPLATE};
use crate::llm_client::{record_exchange, ChatTurn, LanguageModel};
use crate::models::interview::{Question, SkillSet};

/// Questions produced by `generate_questions`, always exactly this many.
pub const QUESTION_COUNT: usize = 5;
/// Bounds for the practice-question variant.
pub const PRACTICE_MIN: usize = 3;
pub const PRACTICE_MAX: usize = 5;

const GENERIC_TECHNOLOGY: &str = "your preferred technology";

/// The fixed fallback list. The first entry names the first skill when there is one.
pub fn fallback_questions(skills: &SkillSet) -> Vec<Question> {
    let technology = skills.first().unwrap_or(GENERIC_TECHNOLOGY);
    vec![
        Question::new(format!(
            "Explain how you would implement a scalable system using {technology}."
        )),
        Question::from(
            "Describe a challenging technical problem you've solved recently and your approach to solving it.",
        ),
        Question::from("How do you ensure code quality and maintainability in your projects?"),
        Question::from(
            "Explain your approach to debugging complex issues in a production environment.",
        ),
        Question::from("How do you handle performance optimization in your applications?"),
    ]
}

/// Generates exactly `QUESTION_COUNT` questions for the given skills.
///
/// Successful calls are appended to `history`.
pub async fn generate_questions(
    llm: &dyn LanguageModel,
    history: &mut Vec<ChatTurn>,
    skills: &SkillSet,
) -> Vec<Question> {
    let prompt = QUESTION_PROMPT_TEMPLATE.replace("{skills}", &skills.joined());

    let reply = match llm.generate(&prompt, history).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Question generation failed, using fallback questions: {e}");
            return fallback_questions(skills);
        }
    };
    record_exchange(history, &prompt, &reply);

    let parsed = parse_numbered_questions(&reply);
    info!(
        "Parsed {} of {} questions from model output",
        parsed.len().min(QUESTION_COUNT),
        QUESTION_COUNT
    );
    fill_to(parsed, skills, QUESTION_COUNT, QUESTION_COUNT)
}

/// Generates between `PRACTICE_MIN` and `PRACTICE_MAX` practice questions.
/// Unlike the primary generator, bracket-tagged lines count even without numbering.
pub async fn generate_question_variant(
    llm: &dyn LanguageModel,
    history: &mut Vec<ChatTurn>,
    skills: &SkillSet,
) -> Vec<Question> {
    let prompt = PRACTICE_PROMPT_TEMPLATE.replace("{skills}", &skills.joined());

    match llm.generate(&prompt, history).await {
        Ok(reply) => {
            record_exchange(history, &prompt, &reply);
            let parsed = parse_tagged_questions(&reply);
            fill_to(parsed, skills, PRACTICE_MIN, PRACTICE_MAX)
        }
        Err(e) => {
            warn!("Practice question generation failed: {e}");
            fill_to(Vec::new(), skills, PRACTICE_MIN, PRACTICE_MAX)
        }
    }
}

/// Keeps lines shaped like `N. text` with N in 1..=5, stripped of numbering and `**`.
pub fn parse_numbered_questions(text: &str) -> Vec<Question> {
    text.lines()
        .filter_map(|line| strip_list_number(line.trim()))
        .filter_map(clean_question)
        .collect()
}

/// Like `parse_numbered_questions`, but also accepts unnumbered lines that open
/// with a `[...]` difficulty tag.
pub fn parse_tagged_questions(text: &str) -> Vec<Question> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            strip_list_number(line).or_else(|| {
                let unemphasized = line.trim_start_matches('*').trim_start();
                unemphasized.starts_with('[').then_some(unemphasized)
            })
        })
        .filter_map(clean_question)
        .collect()
}

fn strip_list_number(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some('1'..='5'), Some('.')) => Some(&line[2..]),
        _ => None,
    }
}

fn clean_question(raw: &str) -> Option<Question> {
    let text = raw.replace("**", "");
    let text = text.trim();
    (!text.is_empty()).then(|| Question::new(text))
}

/// Truncates to `max`, then pads from the front of the fallback list up to `min`.
fn fill_to(mut questions: Vec<Question>, skills: &SkillSet, min: usize, max: usize) -> Vec<Question> {
    questions.truncate(max);
    if questions.len() < min {
        let needed = min - questions.len();
        questions.extend(fallback_questions(skills).into_iter().take(needed));
    }
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::ScriptedModel;

    const FIVE_QUESTIONS: &str = "Here are your questions:\n\n\
        1. **[Difficulty: Easy]** What is the GIL in Python?\n\
        2. [Difficulty: Medium] How would you structure a Django project?\n\
        3. [Difficulty: Hard] Design a distributed task queue.\n\
        4. [Difficulty: Medium] Explain Python's memory management.\n\
        5. [Difficulty: Hard] How would you profile a slow API endpoint?\n\
        \nGood luck!";

    fn python() -> SkillSet {
        SkillSet::from_labels(["Python"])
    }

    #[test]
    fn test_fallback_first_question_uses_first_skill() {
        let questions = fallback_questions(&python());
        assert_eq!(
            questions[0].text(),
            "Explain how you would implement a scalable system using Python."
        );
        assert_eq!(questions.len(), 5);
    }

    #[test]
    fn test_fallback_with_no_skills_uses_placeholder() {
        let questions = fallback_questions(&SkillSet::default());
        assert_eq!(
            questions[0].text(),
            "Explain how you would implement a scalable system using your preferred technology."
        );
    }

    #[test]
    fn test_parse_keeps_only_numbered_lines() {
        let parsed = parse_numbered_questions(FIVE_QUESTIONS);
        assert_eq!(parsed.len(), 5);
        assert_eq!(
            parsed[0].text(),
            "[Difficulty: Easy] What is the GIL in Python?"
        );
        assert_eq!(parsed[4].difficulty(), Some("Hard"));
    }

    #[test]
    fn test_parse_ignores_numbers_outside_one_to_five() {
        let parsed = parse_numbered_questions("6. Too far\n0. Too low\n3) Wrong punctuation\n2. Kept");
        assert_eq!(parsed, vec![Question::new("Kept")]);
    }

    #[test]
    fn test_parse_discards_blank_questions() {
        let parsed = parse_numbered_questions("1. ****\n2.   \n3. Real question?");
        assert_eq!(parsed, vec![Question::new("Real question?")]);
    }

    #[test]
    fn test_parse_does_not_synthesize_tags() {
        let parsed = parse_numbered_questions("1. What is a closure?");
        assert_eq!(parsed[0].text(), "What is a closure?");
        assert_eq!(parsed[0].difficulty(), None);
    }

    #[tokio::test]
    async fn test_generate_returns_parsed_questions() {
        let llm = ScriptedModel::new([Some(FIVE_QUESTIONS)]);
        let mut history = Vec::new();
        let questions = generate_questions(&llm, &mut history, &python()).await;

        assert_eq!(questions.len(), QUESTION_COUNT);
        assert_eq!(questions[1].difficulty(), Some("Medium"));
        assert_eq!(history.len(), 2);
        assert!(llm.prompts()[0].contains("expertise in: Python"));
    }

    #[tokio::test]
    async fn test_generate_pads_short_output_with_fallback() {
        let llm = ScriptedModel::new([Some("1. [Hard] Only one question here")]);
        let mut history = Vec::new();
        let questions = generate_questions(&llm, &mut history, &python()).await;

        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0].text(), "[Hard] Only one question here");
        assert_eq!(
            questions[1].text(),
            "Explain how you would implement a scalable system using Python."
        );
        assert!(questions.iter().all(|q| !q.text().is_empty()));
    }

    #[tokio::test]
    async fn test_generate_truncates_long_output() {
        let reply = "1. a\n2. b\n3. c\n4. d\n5. e\n1. f\n2. g";
        let llm = ScriptedModel::new([Some(reply)]);
        let questions = generate_questions(&llm, &mut Vec::new(), &python()).await;
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[4].text(), "e");
    }

    #[tokio::test]
    async fn test_generate_failure_returns_fallback_unmodified() {
        let llm = ScriptedModel::failing();
        let mut history = Vec::new();
        let questions = generate_questions(&llm, &mut history, &python()).await;

        assert_eq!(questions, fallback_questions(&python()));
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_generate_empty_reply_returns_fallback() {
        let llm = ScriptedModel::new([Some("")]);
        let questions = generate_questions(&llm, &mut Vec::new(), &python()).await;
        assert_eq!(questions, fallback_questions(&python()));
    }

    #[tokio::test]
    async fn test_generate_unformatted_reply_returns_fallback() {
        let llm = ScriptedModel::new([Some("I cannot help with that.")]);
        let questions = generate_questions(&llm, &mut Vec::new(), &python()).await;
        assert_eq!(questions, fallback_questions(&python()));
    }

    #[tokio::test]
    async fn test_variant_accepts_unnumbered_tagged_lines() {
        let reply = "[Easy] What is a list?\n**[Medium]** Explain decorators.\nNoise line";
        let llm = ScriptedModel::new([Some(reply)]);
        let questions = generate_question_variant(&llm, &mut Vec::new(), &python()).await;

        assert_eq!(questions.len(), PRACTICE_MIN);
        assert_eq!(questions[0].difficulty(), Some("Easy"));
        assert_eq!(questions[1].text(), "[Medium] Explain decorators.");
    }

    #[tokio::test]
    async fn test_variant_caps_at_five() {
        let reply = "1. a\n2. b\n3. c\n4. d\n5. e\n[Hard] f";
        let llm = ScriptedModel::new([Some(reply)]);
        let questions = generate_question_variant(&llm, &mut Vec::new(), &python()).await;
        assert_eq!(questions.len(), PRACTICE_MAX);
    }

    #[tokio::test]
    async fn test_variant_failure_returns_three_fallbacks() {
        let llm = ScriptedModel::failing();
        let questions = generate_question_variant(&llm, &mut Vec::new(), &python()).await;
        assert_eq!(questions, fallback_questions(&python())[..3].to_vec());
    }
}
