use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// De-duplicated set of skill labels. Keeps first-occurrence order so prompts
/// and exports list skills the way the candidate picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    /// Builds a skill set from raw labels, trimming each one and dropping blanks
    /// and exact duplicates.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut skills: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || skills.iter().any(|s| s == label) {
                continue;
            }
            skills.push(label.to_string());
        }
        Self(skills)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Comma-separated rendering used in prompts and the exported summary.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

/// One interview question, optionally prefixed with a bracketed difficulty tag
/// such as `[Difficulty: Medium]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(String);

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// The difficulty label inside a leading `[...]` tag, if any.
    ///
    /// `[Difficulty: Hard] ...` → `Hard`, `[Easy] ...` → `Easy`.
    pub fn difficulty(&self) -> Option<&str> {
        let rest = self.0.trim_start().strip_prefix('[')?;
        let (tag, _) = rest.split_once(']')?;
        let tag = tag.trim();
        let label = match tag.split_once(':') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("difficulty") => value.trim(),
            _ => tag,
        };
        (!label.is_empty()).then_some(label)
    }
}

impl From<&str> for Question {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Question, the candidate's answer, and the evaluator's text for one submission.
/// Records are only ever appended to a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question: String,
    pub answer: String,
    pub evaluation: String,
}

/// Progress figures reported alongside a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewMetrics {
    pub started_at: DateTime<Utc>,
    pub questions_answered: usize,
    pub elapsed_seconds: i64,
}

impl InterviewMetrics {
    pub fn compute(started_at: DateTime<Utc>, questions_answered: usize) -> Self {
        let elapsed_seconds = (Utc::now() - started_at).num_seconds().max(0);
        Self {
            started_at,
            questions_answered,
            elapsed_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_set_removes_duplicates_and_blanks() {
        let skills = SkillSet::from_labels(["Python", " Rust ", "", "Python", "Rust"]);
        assert_eq!(skills.as_slice(), &["Python".to_string(), "Rust".to_string()]);
        assert_eq!(skills.first(), Some("Python"));
    }

    #[test]
    fn test_skill_set_joined() {
        let skills = SkillSet::from_labels(["Go", "Docker"]);
        assert_eq!(skills.joined(), "Go, Docker");
    }

    #[test]
    fn test_empty_skill_set() {
        let skills = SkillSet::from_labels(Vec::<String>::new());
        assert!(skills.is_empty());
        assert_eq!(skills.first(), None);
    }

    #[test]
    fn test_question_difficulty_with_key() {
        let q = Question::new("[Difficulty: Hard] Design a rate limiter.");
        assert_eq!(q.difficulty(), Some("Hard"));
    }

    #[test]
    fn test_question_difficulty_bare_label() {
        let q = Question::new("[Easy] What is a closure?");
        assert_eq!(q.difficulty(), Some("Easy"));
    }

    #[test]
    fn test_question_without_tag_has_no_difficulty() {
        let q = Question::new("How do you handle performance optimization?");
        assert_eq!(q.difficulty(), None);
    }

    #[test]
    fn test_question_serializes_as_plain_string() {
        let q = Question::new("What is ownership?");
        assert_eq!(serde_json::to_string(&q).unwrap(), r#""What is ownership?""#);
    }

    #[test]
    fn test_metrics_elapsed_is_never_negative() {
        let future = Utc::now() + chrono::Duration::seconds(30);
        let metrics = InterviewMetrics::compute(future, 2);
        assert_eq!(metrics.elapsed_seconds, 0);
        assert_eq!(metrics.questions_answered, 2);
    }
}
