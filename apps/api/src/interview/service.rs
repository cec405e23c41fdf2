//! Session-level orchestration: one function per user interaction.
//!
//! Each call holds the session's guard for its whole length, model calls
//! included, so interactions on one session run one after another. Work is
//! done on a copy that is committed only on success: a failed transition
//! leaves the stored session untouched.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{build_summary_pdf, SummaryDocument};
use crate::interview::conversation;
use crate::interview::evaluator::evaluate_answer;
use crate::interview::flow::{transition, FlowError, InterviewEvent, InterviewState, Stage};
use crate::interview::questions::{generate_question_variant, generate_questions};
use crate::interview::resume::read_resume;
use crate::interview::skills::SkillSelection;
use crate::interview::summary::{summarize_evaluation, EvaluationSummary};
use crate::interview::validation::{validate_profile_form, validate_tech_stack, FieldError};
use crate::llm_client::LanguageModel;
use crate::models::candidate::{ProfileForm, ResumeAttachment};
use crate::models::interview::{Question, ResponseRecord};
use crate::session::{InterviewSession, SessionGuard, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

/// Result of one answer submission.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub record: ResponseRecord,
    pub summary: EvaluationSummary,
    pub session: InterviewSession,
}

// ────────────────────────────────────────────────────────────────────────────
// Session plumbing
// ────────────────────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found or expired"))
}

async fn acquire(store: &SessionStore, id: Uuid) -> Result<SessionGuard, AppError> {
    store.acquire(id).await.ok_or_else(|| not_found(id))
}

/// Acquires the session and returns the guard with a working copy.
async fn load(
    store: &SessionStore,
    id: Uuid,
) -> Result<(SessionGuard, InterviewSession), AppError> {
    let guard = acquire(store, id).await?;
    let session = InterviewSession::clone(&guard);
    Ok((guard, session))
}

fn save(guard: &mut SessionGuard, session: InterviewSession) -> Result<InterviewSession, AppError> {
    let id = session.id;
    if guard.commit(session.clone()) {
        Ok(session)
    } else {
        Err(not_found(id))
    }
}

fn apply(session: &mut InterviewSession, event: InterviewEvent) -> Result<(), FlowError> {
    session.state = transition(&session.state, event)?;
    Ok(())
}

fn require_stage(session: &InterviewSession, stage: Stage, action: &str) -> Result<(), AppError> {
    if session.state.stage() == stage {
        Ok(())
    } else {
        Err(AppError::InvalidTransition(format!(
            "Cannot {action} in stage '{}'",
            session.state.stage()
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ────────────────────────────────────────────────────────────────────────────

pub fn create_session(store: &SessionStore) -> InterviewSession {
    let session = store.create();
    info!("Started interview session {}", session.id);
    session
}

pub async fn get_session(store: &SessionStore, id: Uuid) -> Result<InterviewSession, AppError> {
    store.get(id).await.ok_or_else(|| not_found(id))
}

/// Waits for any interaction in progress, then drops the session.
pub async fn end_session(store: &SessionStore, id: Uuid) -> Result<(), AppError> {
    let _guard = acquire(store, id).await?;
    if store.expire(id) {
        info!("Ended interview session {id}");
        Ok(())
    } else {
        Err(not_found(id))
    }
}

/// Back to the greeting stage with every piece of collected data dropped.
/// The session id survives.
pub async fn reset_session(store: &SessionStore, id: Uuid) -> Result<InterviewSession, AppError> {
    let (mut guard, mut session) = load(store, id).await?;
    apply(&mut session, InterviewEvent::Reset)?;
    session.clear_progress();
    info!("Reset interview session {id}");
    save(&mut guard, session)
}

// ────────────────────────────────────────────────────────────────────────────
// Greeting
// ────────────────────────────────────────────────────────────────────────────

/// greeting → tech_stack. Missing fields are reported before format errors.
pub async fn submit_profile(
    store: &SessionStore,
    id: Uuid,
    form: ProfileForm,
) -> Result<InterviewSession, AppError> {
    let (mut guard, mut session) = load(store, id).await?;
    let next = transition(&session.state, InterviewEvent::SubmitProfile(form.clone()))?;

    let errors = validate_profile_form(&form);
    if !errors.is_empty() {
        return Err(AppError::invalid_fields(errors));
    }

    session.state = next;
    save(&mut guard, session)
}

pub async fn upload_resume(
    store: &SessionStore,
    id: Uuid,
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
) -> Result<ResumeAttachment, AppError> {
    let (mut guard, mut session) = load(store, id).await?;
    require_stage(&session, Stage::Greeting, "upload a resume")?;

    let attachment = read_resume(file_name, content_type, data).await?;
    session.resume = Some(attachment.clone());
    save(&mut guard, session)?;
    info!("Stored resume {} for session {id}", attachment.file_name);
    Ok(attachment)
}

// ────────────────────────────────────────────────────────────────────────────
// Tech stack and questions
// ────────────────────────────────────────────────────────────────────────────

/// tech_stack → tech_questions, followed by the one question-generation call.
pub async fn submit_skills(
    store: &SessionStore,
    llm: &dyn LanguageModel,
    id: Uuid,
    selection: SkillSelection,
) -> Result<InterviewSession, AppError> {
    let (mut guard, mut session) = load(store, id).await?;

    let unknown = selection.unknown_labels();
    if !unknown.is_empty() {
        return Err(AppError::invalid_fields(vec![FieldError::new(
            "skills",
            format!("Unknown skills: {}", unknown.join(", ")),
        )]));
    }

    let next = transition(&session.state, InterviewEvent::SubmitSkills(selection))?;
    if let Some(skills) = next.skills() {
        let check = validate_tech_stack(skills.as_slice());
        if !check.valid {
            return Err(AppError::invalid_fields(vec![FieldError::new(
                "skills",
                check.message,
            )]));
        }
    }
    session.state = next;

    // The stage change sticks even if generation yields nothing; the client
    // can retry through `ensure_questions`.
    let generated = populate_questions(&mut session, llm).await;
    let session = save(&mut guard, session)?;
    generated.map(|()| session)
}

/// Generates the question list if it has not been generated yet. Safe to
/// call repeatedly: once questions exist the session is returned unchanged,
/// including to a caller that waited on a concurrent generation.
pub async fn ensure_questions(
    store: &SessionStore,
    llm: &dyn LanguageModel,
    id: Uuid,
) -> Result<InterviewSession, AppError> {
    let (mut guard, mut session) = load(store, id).await?;
    match session.state.stage() {
        Stage::TechQuestions if session.state.awaiting_questions() => {
            populate_questions(&mut session, llm).await?;
            save(&mut guard, session)
        }
        Stage::TechQuestions | Stage::Completed => Ok(session),
        stage => Err(AppError::InvalidTransition(format!(
            "Cannot generate questions in stage '{stage}'"
        ))),
    }
}

async fn populate_questions(
    session: &mut InterviewSession,
    llm: &dyn LanguageModel,
) -> Result<(), AppError> {
    let skills = session
        .state
        .skills()
        .cloned()
        .ok_or(FlowError::QuestionsNotReady)?;
    let questions = generate_questions(llm, &mut session.history, &skills).await;
    info!(
        "Generated {} questions for session {} from {} skills",
        questions.len(),
        session.id,
        skills.len()
    );
    apply(session, InterviewEvent::QuestionsGenerated(questions))?;
    Ok(())
}

pub async fn navigate(
    store: &SessionStore,
    id: Uuid,
    direction: Direction,
) -> Result<InterviewSession, AppError> {
    let (mut guard, mut session) = load(store, id).await?;
    let event = match direction {
        Direction::Previous => InterviewEvent::Previous,
        Direction::Next => InterviewEvent::Next,
    };
    apply(&mut session, event)?;
    save(&mut guard, session)
}

/// Evaluates `answer` against the current question and records it.
pub async fn submit_answer(
    store: &SessionStore,
    llm: &dyn LanguageModel,
    id: Uuid,
    answer: String,
) -> Result<AnswerOutcome, AppError> {
    if answer.trim().is_empty() {
        return Err(AppError::invalid_fields(vec![FieldError::new(
            "answer",
            "Answer cannot be empty",
        )]));
    }

    let (mut guard, mut session) = load(store, id).await?;

    // Dry run so a submission the flow would reject never reaches the evaluator.
    transition(
        &session.state,
        InterviewEvent::AnswerEvaluated {
            answer: answer.clone(),
            evaluation: String::new(),
        },
    )?;

    let question = session
        .state
        .round()
        .ok_or(FlowError::QuestionsNotReady)?
        .current_question()?
        .text()
        .to_string();

    let evaluation = evaluate_answer(llm, &mut session.history, &question, &answer).await;
    let summary = summarize_evaluation(&evaluation);
    let record = ResponseRecord {
        question,
        answer: answer.clone(),
        evaluation: evaluation.clone(),
    };

    apply(&mut session, InterviewEvent::AnswerEvaluated { answer, evaluation })?;
    if session.state.stage() == Stage::Completed {
        info!("Interview session {id} completed");
    }
    let session = save(&mut guard, session)?;

    Ok(AnswerOutcome {
        record,
        summary,
        session,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Completed interview
// ────────────────────────────────────────────────────────────────────────────

pub async fn completed_session(
    store: &SessionStore,
    id: Uuid,
) -> Result<InterviewSession, AppError> {
    let session = get_session(store, id).await?;
    require_stage(&session, Stage::Completed, "view the summary")?;
    Ok(session)
}

/// Renders the summary PDF and parks it on the session until it is downloaded.
/// Returns the document size in bytes.
pub async fn prepare_export(store: &SessionStore, id: Uuid) -> Result<usize, AppError> {
    let (mut guard, mut session) = load(store, id).await?;
    let InterviewState::Completed {
        profile,
        skills,
        responses,
        ..
    } = &session.state
    else {
        return Err(AppError::InvalidTransition(format!(
            "Cannot export the summary in stage '{}'",
            session.state.stage()
        )));
    };

    let pdf = build_summary_pdf(&SummaryDocument {
        profile: Some(profile),
        skills: skills.as_slice(),
        responses,
    })?;

    let size = pdf.len();
    session.export = Some(Bytes::from(pdf));
    save(&mut guard, session)?;
    info!("Prepared {size} byte summary for session {id}");
    Ok(size)
}

/// Hands out the prepared document once.
pub async fn take_export(store: &SessionStore, id: Uuid) -> Result<Bytes, AppError> {
    let (mut guard, mut session) = load(store, id).await?;
    let pdf = session.export.take().ok_or_else(|| {
        AppError::NotFound(format!("No summary document is waiting for session {id}"))
    })?;
    save(&mut guard, session)?;
    Ok(pdf)
}

// ────────────────────────────────────────────────────────────────────────────
// Outside the flow
// ────────────────────────────────────────────────────────────────────────────

/// Answers a free-form message without changing the stage.
pub async fn send_message(
    store: &SessionStore,
    llm: &dyn LanguageModel,
    id: Uuid,
    message: String,
    context: BTreeMap<String, String>,
) -> Result<String, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::invalid_fields(vec![FieldError::new(
            "message",
            "Message cannot be empty",
        )]));
    }
    let (mut guard, mut session) = load(store, id).await?;
    let reply = conversation::respond(llm, &mut session.history, &message, &context).await;
    save(&mut guard, session)?;
    Ok(reply)
}

/// A fresh set of 3 to 5 practice questions for the selected skills.
/// The interview's own question list is not touched.
pub async fn practice_questions(
    store: &SessionStore,
    llm: &dyn LanguageModel,
    id: Uuid,
) -> Result<Vec<Question>, AppError> {
    let (mut guard, mut session) = load(store, id).await?;
    let skills = session.state.skills().cloned().ok_or_else(|| {
        AppError::InvalidTransition(format!(
            "Cannot generate practice questions in stage '{}'",
            session.state.stage()
        ))
    })?;
    let questions = generate_question_variant(llm, &mut session.history, &skills).await;
    save(&mut guard, session)?;
    Ok(questions)
}
