pub mod health;
pub mod stubs;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::ai::{handlers as ai, upload::UPLOAD_BODY_LIMIT};
use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::state::AppState;

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Authentication
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route(
            "/api/auth/profile",
            get(auth::handle_get_profile).put(auth::handle_update_profile),
        )
        .route("/api/auth/change-password", post(auth::handle_change_password))
        .route("/api/auth/refresh", post(auth::handle_refresh))
        // Jobs, candidates and applications (placeholders)
        .route("/api/jobs", get(stubs::list_jobs).post(stubs::create_job))
        .route(
            "/api/jobs/:id",
            get(stubs::get_job)
                .put(stubs::update_job)
                .delete(stubs::delete_job),
        )
        .route(
            "/api/candidates",
            get(stubs::list_candidates).post(stubs::create_candidate),
        )
        .route(
            "/api/candidates/:id",
            get(stubs::get_candidate).put(stubs::update_candidate),
        )
        .route(
            "/api/applications",
            get(stubs::list_applications).post(stubs::create_application),
        )
        .route("/api/applications/:id", get(stubs::get_application))
        .route(
            "/api/applications/:id/status",
            put(stubs::update_application_status),
        )
        // AI
        .route(
            "/api/ai/parse-resume",
            post(ai::handle_parse_resume).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/ai/match-candidates", post(ai::handle_match_candidates))
        .route("/api/ai/analyze-resume", post(ai::handle_analyze_resume))
        .route(
            "/api/ai/sentiment-analysis",
            post(ai::handle_sentiment_analysis),
        )
        .route(
            "/api/ai/generate-job-description",
            post(ai::handle_generate_job_description),
        )
        .route(
            "/api/ai/interview-questions",
            post(ai::handle_interview_questions),
        )
        .route("/api/ai/predict-success", post(ai::handle_predict_success))
        .fallback(route_not_found)
        .with_state(state)
}
