//! Axum route handlers for the Interview API.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::flow::Stage;
use crate::interview::service::{self, Direction};
use crate::interview::skills::{skill_catalog, CatalogGroup, SkillSelection};
use crate::interview::summary::{summarize_evaluation, EvaluationSummary};
use crate::models::candidate::{CandidateProfile, ProfileForm, ResumeAttachment};
use crate::models::interview::{InterviewMetrics, ResponseRecord};
use crate::session::InterviewSession;
use crate::state::AppState;

const EXPORT_FILE_NAME: &str = "interview_summary.pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// The question under the cursor, with enough context to draw navigation.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub text: String,
    pub difficulty: Option<String>,
    pub answered: bool,
    pub is_first: bool,
    pub is_last: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub stage: Stage,
    pub profile: Option<CandidateProfile>,
    pub skills: Vec<String>,
    pub resume: Option<ResumeAttachment>,
    /// `true` once questions exist (or the interview is over).
    pub questions_ready: bool,
    pub current_question: Option<QuestionView>,
    pub responses: Vec<ResponseRecord>,
    pub metrics: InterviewMetrics,
    pub export_ready: bool,
}

impl From<&InterviewSession> for SessionView {
    fn from(session: &InterviewSession) -> Self {
        let state = &session.state;
        let current_question = state.round().and_then(|round| {
            let question = round.current_question().ok()?;
            let index = round.current_index();
            Some(QuestionView {
                index,
                total: round.questions().len(),
                text: question.text().to_string(),
                difficulty: question.difficulty().map(str::to_string),
                answered: round.is_answered(index),
                is_first: index == 0,
                is_last: index == round.last_index(),
            })
        });

        SessionView {
            session_id: session.id,
            stage: state.stage(),
            profile: state.profile().cloned(),
            skills: state
                .skills()
                .map(|s| s.as_slice().to_vec())
                .unwrap_or_default(),
            resume: session.resume.clone(),
            questions_ready: state.round().is_some() || state.stage() == Stage::Completed,
            current_question,
            responses: state.responses().to_vec(),
            metrics: session.metrics(),
            export_ready: session.export.is_some(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub groups: Vec<CatalogGroup>,
    pub max_skills: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    /// Value to send as the profile's `resume` field.
    pub resume: String,
    pub attachment: ResumeAttachment,
    pub text_extracted: bool,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub record: ResponseRecord,
    pub summary: EvaluationSummary,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct TranscriptEntry {
    #[serde(flatten)]
    pub record: ResponseRecord,
    pub summary: EvaluationSummary,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub session_id: Uuid,
    pub profile: Option<CandidateProfile>,
    pub skills: Vec<String>,
    pub transcript: Vec<TranscriptEntry>,
    pub metrics: InterviewMetrics,
}

#[derive(Debug, Serialize)]
pub struct ExportPreparedResponse {
    pub file_name: &'static str,
    pub size_bytes: usize,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub reply: String,
    pub stage: Stage,
}

#[derive(Debug, Serialize)]
pub struct PracticeQuestion {
    pub text: String,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PracticeResponse {
    pub questions: Vec<PracticeQuestion>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/skills/catalog
pub async fn handle_skill_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        groups: skill_catalog(),
        max_skills: crate::interview::validation::MAX_SKILLS,
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = service::create_session(&state.sessions);
    (StatusCode::CREATED, Json(SessionView::from(&session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = service::get_session(&state.sessions, id).await?;
    Ok(Json(SessionView::from(&session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service::end_session(&state.sessions, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/profile
///
/// Greeting stage. Moves to tech_stack when every field is present and valid.
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<SessionView>, AppError> {
    let session = service::submit_profile(&state.sessions, id, form).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload; the file goes in the `resume` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation("The resume field must carry a file name"))?;
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Could not read resume upload: {e}")))?;

        let attachment =
            service::upload_resume(&state.sessions, id, file_name, content_type, data).await?;
        return Ok(Json(ResumeUploadResponse {
            resume: attachment.file_name.clone(),
            text_extracted: attachment.has_text(),
            attachment,
        }));
    }

    Err(AppError::validation("Missing 'resume' file field"))
}

/// POST /api/v1/sessions/:id/skills
///
/// Tech-stack stage. Moves to tech_questions and generates the question list.
pub async fn handle_submit_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(selection): Json<SkillSelection>,
) -> Result<Json<SessionView>, AppError> {
    let session =
        service::submit_skills(&state.sessions, state.llm.as_ref(), id, selection).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/sessions/:id/questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = service::ensure_questions(&state.sessions, state.llm.as_ref(), id).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/sessions/:id/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = service::navigate(&state.sessions, id, request.direction).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/sessions/:id/answers
///
/// Evaluates the answer to the current question, records it, and advances.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let outcome =
        service::submit_answer(&state.sessions, state.llm.as_ref(), id, request.answer).await?;
    Ok(Json(AnswerResponse {
        session: SessionView::from(&outcome.session),
        record: outcome.record,
        summary: outcome.summary,
    }))
}

/// GET /api/v1/sessions/:id/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, AppError> {
    let session = service::completed_session(&state.sessions, id).await?;
    let transcript = session
        .state
        .responses()
        .iter()
        .map(|record| TranscriptEntry {
            summary: summarize_evaluation(&record.evaluation),
            record: record.clone(),
        })
        .collect();

    Ok(Json(SummaryResponse {
        session_id: session.id,
        profile: session.state.profile().cloned(),
        skills: session
            .state
            .skills()
            .map(|s| s.as_slice().to_vec())
            .unwrap_or_default(),
        transcript,
        metrics: session.metrics(),
    }))
}

/// POST /api/v1/sessions/:id/export
///
/// Builds the summary PDF. Download it once with GET on the same path.
pub async fn handle_prepare_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportPreparedResponse>, AppError> {
    let size_bytes = service::prepare_export(&state.sessions, id).await?;
    Ok(Json(ExportPreparedResponse {
        file_name: EXPORT_FILE_NAME,
        size_bytes,
    }))
}

/// GET /api/v1/sessions/:id/export
pub async fn handle_download_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pdf = service::take_export(&state.sessions, id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        pdf,
    ))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = service::reset_session(&state.sessions, id).await?;
    Ok(Json(SessionView::from(&session)))
}

/// POST /api/v1/sessions/:id/messages
pub async fn handle_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let reply = service::send_message(
        &state.sessions,
        state.llm.as_ref(),
        id,
        request.message,
        request.context,
    )
    .await?;
    let stage = service::get_session(&state.sessions, id).await?.state.stage();
    Ok(Json(MessageResponse { reply, stage }))
}

/// GET /api/v1/sessions/:id/practice-questions
pub async fn handle_practice_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PracticeResponse>, AppError> {
    let questions =
        service::practice_questions(&state.sessions, state.llm.as_ref(), id).await?;
    Ok(Json(PracticeResponse {
        questions: questions
            .iter()
            .map(|q| PracticeQuestion {
                text: q.text().to_string(),
                difficulty: q.difficulty().map(str::to_string),
            })
            .collect(),
    }))
}
