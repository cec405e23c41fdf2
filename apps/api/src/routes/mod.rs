pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::interview::resume::MAX_RESUME_BYTES;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/skills/catalog", get(handlers::handle_skill_catalog))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(handlers::handle_reset),
        )
        // Greeting
        .route(
            "/api/v1/sessions/:id/profile",
            post(handlers::handle_submit_profile),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_upload_resume)
                .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + 64 * 1024)),
        )
        // Tech stack and questions
        .route(
            "/api/v1/sessions/:id/skills",
            post(handlers::handle_submit_skills),
        )
        .route(
            "/api/v1/sessions/:id/questions",
            post(handlers::handle_generate_questions),
        )
        .route(
            "/api/v1/sessions/:id/navigate",
            post(handlers::handle_navigate),
        )
        .route(
            "/api/v1/sessions/:id/answers",
            post(handlers::handle_submit_answer),
        )
        // Completed
        .route("/api/v1/sessions/:id/summary", get(handlers::handle_summary))
        .route(
            "/api/v1/sessions/:id/export",
            post(handlers::handle_prepare_export).get(handlers::handle_download_export),
        )
        // Outside the flow
        .route(
            "/api/v1/sessions/:id/messages",
            post(handlers::handle_message),
        )
        .route(
            "/api/v1/sessions/:id/practice-questions",
            get(handlers::handle_practice_questions),
        )
        .with_state(state)
}
