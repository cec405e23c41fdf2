//! Interview Flow: the four-stage state machine.
//!
//! `greeting → tech_stack → tech_questions → completed`, plus a full reset back
//! to `greeting` from anywhere. `transition` is pure: LLM calls happen in the
//! service, and their results arrive here as events. On error the caller keeps
//! the previous state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interview::skills::SkillSelection;
use crate::models::candidate::{CandidateProfile, ProfileForm};
use crate::models::interview::{Question, ResponseRecord, SkillSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Greeting,
    TechStack,
    TechQuestions,
    Completed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Greeting => "greeting",
            Stage::TechStack => "tech_stack",
            Stage::TechQuestions => "tech_questions",
            Stage::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Questions for one interview, the cursor, and the transcript so far.
///
/// Invariants: `current < questions.len()`, `questions` is never empty and
/// never changes once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRound {
    questions: Vec<Question>,
    current: usize,
    responses: Vec<ResponseRecord>,
}

impl QuestionRound {
    fn new(questions: Vec<Question>) -> Result<Self, FlowError> {
        if questions.is_empty() {
            return Err(FlowError::NoQuestions);
        }
        Ok(Self {
            questions,
            current: 0,
            responses: Vec::new(),
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    pub fn current_question(&self) -> Result<&Question, FlowError> {
        self.questions
            .get(self.current)
            .ok_or(FlowError::IndexOutOfRange {
                index: self.current,
                len: self.questions.len(),
            })
    }

    pub fn responses(&self) -> &[ResponseRecord] {
        &self.responses
    }

    /// Whether at least one answer has been recorded for `index`.
    pub fn is_answered(&self, index: usize) -> bool {
        self.questions
            .get(index)
            .is_some_and(|q| self.responses.iter().any(|r| r.question == q.text()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum InterviewState {
    #[default]
    Greeting,
    TechStack {
        profile: CandidateProfile,
    },
    /// `round` stays `None` until questions have been generated once.
    TechQuestions {
        profile: CandidateProfile,
        skills: SkillSet,
        round: Option<QuestionRound>,
    },
    Completed {
        profile: CandidateProfile,
        skills: SkillSet,
        questions: Vec<Question>,
        responses: Vec<ResponseRecord>,
    },
}

impl InterviewState {
    pub fn stage(&self) -> Stage {
        match self {
            InterviewState::Greeting => Stage::Greeting,
            InterviewState::TechStack { .. } => Stage::TechStack,
            InterviewState::TechQuestions { .. } => Stage::TechQuestions,
            InterviewState::Completed { .. } => Stage::Completed,
        }
    }

    pub fn profile(&self) -> Option<&CandidateProfile> {
        match self {
            InterviewState::Greeting => None,
            InterviewState::TechStack { profile }
            | InterviewState::TechQuestions { profile, .. }
            | InterviewState::Completed { profile, .. } => Some(profile),
        }
    }

    pub fn skills(&self) -> Option<&SkillSet> {
        match self {
            InterviewState::TechQuestions { skills, .. }
            | InterviewState::Completed { skills, .. } => Some(skills),
            _ => None,
        }
    }

    pub fn round(&self) -> Option<&QuestionRound> {
        match self {
            InterviewState::TechQuestions { round, .. } => round.as_ref(),
            _ => None,
        }
    }

    /// Every response recorded so far, in submission order.
    pub fn responses(&self) -> &[ResponseRecord] {
        match self {
            InterviewState::TechQuestions {
                round: Some(round), ..
            } => round.responses(),
            InterviewState::Completed { responses, .. } => responses,
            _ => &[],
        }
    }

    /// True when the tech-questions stage still needs its one generation call.
    pub fn awaiting_questions(&self) -> bool {
        matches!(
            self,
            InterviewState::TechQuestions { round: None, .. }
        )
    }
}

#[derive(Debug, Clone)]
pub enum InterviewEvent {
    SubmitProfile(ProfileForm),
    SubmitSkills(SkillSelection),
    QuestionsGenerated(Vec<Question>),
    Previous,
    Next,
    AnswerEvaluated { answer: String, evaluation: String },
    Reset,
}

impl InterviewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InterviewEvent::SubmitProfile(_) => "submit_profile",
            InterviewEvent::SubmitSkills(_) => "submit_skills",
            InterviewEvent::QuestionsGenerated(_) => "questions_generated",
            InterviewEvent::Previous => "previous",
            InterviewEvent::Next => "next",
            InterviewEvent::AnswerEvaluated { .. } => "answer_evaluated",
            InterviewEvent::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("Please fill in: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Please select at least one skill")]
    EmptySkillSet,

    #[error("Failed to generate technical questions")]
    NoQuestions,

    #[error("Questions have already been generated for this interview")]
    QuestionsAlreadyGenerated,

    #[error("Questions have not been generated yet")]
    QuestionsNotReady,

    #[error("Question index {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Cannot apply '{event}' in stage '{stage}'")]
    InvalidEvent { stage: Stage, event: &'static str },
}

/// Applies `event` to `state`, returning the next state.
pub fn transition(state: &InterviewState, event: InterviewEvent) -> Result<InterviewState, FlowError> {
    use InterviewEvent as E;
    use InterviewState as S;

    match (state, event) {
        (_, E::Reset) => Ok(S::Greeting),

        (S::Greeting, E::SubmitProfile(form)) => {
            let missing = form.missing_fields();
            if !missing.is_empty() {
                return Err(FlowError::MissingFields(missing));
            }
            Ok(S::TechStack {
                profile: form.into_profile(),
            })
        }

        (S::TechStack { profile }, E::SubmitSkills(selection)) => {
            let skills = selection.to_skill_set();
            if skills.is_empty() {
                return Err(FlowError::EmptySkillSet);
            }
            Ok(S::TechQuestions {
                profile: profile.clone(),
                skills,
                round: None,
            })
        }

        (
            S::TechQuestions {
                profile,
                skills,
                round,
            },
            E::QuestionsGenerated(questions),
        ) => {
            if round.is_some() {
                return Err(FlowError::QuestionsAlreadyGenerated);
            }
            Ok(S::TechQuestions {
                profile: profile.clone(),
                skills: skills.clone(),
                round: Some(QuestionRound::new(questions)?),
            })
        }

        (
            S::TechQuestions {
                profile,
                skills,
                round,
            },
            event @ (E::Previous | E::Next),
        ) => {
            let mut round = round.clone().ok_or(FlowError::QuestionsNotReady)?;
            round.current = match event {
                E::Previous => round.current.saturating_sub(1),
                _ => (round.current + 1).min(round.last_index()),
            };
            Ok(S::TechQuestions {
                profile: profile.clone(),
                skills: skills.clone(),
                round: Some(round),
            })
        }

        (
            S::TechQuestions {
                profile,
                skills,
                round,
            },
            E::AnswerEvaluated { answer, evaluation },
        ) => {
            let mut round = round.clone().ok_or(FlowError::QuestionsNotReady)?;
            let question = round.current_question()?.text().to_string();
            round.responses.push(ResponseRecord {
                question,
                answer,
                evaluation,
            });

            if round.current >= round.last_index() {
                return Ok(S::Completed {
                    profile: profile.clone(),
                    skills: skills.clone(),
                    questions: round.questions,
                    responses: round.responses,
                });
            }

            round.current += 1;
            Ok(S::TechQuestions {
                profile: profile.clone(),
                skills: skills.clone(),
                round: Some(round),
            })
        }

        (state, event) => Err(FlowError::InvalidEvent {
            stage: state.stage(),
            event: event.name(),
        }),
    }
}
