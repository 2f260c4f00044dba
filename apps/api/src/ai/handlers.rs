//! Axum route handlers for /api/ai.

use axum::extract::{multipart::MultipartRejection, Multipart, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::ai::schema::{
    CandidateMatch, InterviewQuestions, JobDescription, ParsedResume, ResumeAnalysis,
    SentimentAnalysis, SuccessPrediction,
};
use crate::ai::upload::{extract_text, read_resume_upload};
use crate::ai::JobDescriptionParams;
use crate::auth::{Authorized, HiringTeam, HrLeads, InterviewPanel};
use crate::errors::AppError;
use crate::response::{ApiJson, ApiResponse};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

// Fields are optional so that missing values produce the route's own message
// instead of a generic deserialization error.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidatesRequest {
    pub job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumeRequest {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub text: Option<String>,
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateJobDescriptionRequest {
    pub position: Option<String>,
    pub department: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub experience_level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestionsRequest {
    pub job_id: Option<String>,
    pub candidate_id: Option<String>,
    pub interview_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictSuccessRequest {
    pub candidate_id: Option<String>,
    pub job_id: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ai/parse-resume
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    auth: Authorized<HiringTeam>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<ParsedResume>>, AppError> {
    let multipart =
        multipart.map_err(|_| AppError::Validation("No resume file provided".to_string()))?;
    let upload = read_resume_upload(multipart).await?;
    info!(
        "Parsing resume {:?} for {}",
        upload.file_name, auth.user.email
    );
    let text = extract_text(upload).await?;

    let parsed = state.ai.parse_resume(&text).await?;
    Ok(ApiResponse::ok("Resume parsed successfully", parsed))
}

/// POST /api/ai/match-candidates
pub async fn handle_match_candidates(
    State(state): State<AppState>,
    _auth: Authorized<HiringTeam>,
    ApiJson(req): ApiJson<MatchCandidatesRequest>,
) -> Result<Json<ApiResponse<Vec<CandidateMatch>>>, AppError> {
    let job_id = parse_id(req.job_id.as_deref(), "Job ID is required")?;
    let matches = state.ai.match_candidates(job_id).await?;
    Ok(ApiResponse::ok("Candidates matched successfully", matches))
}

/// POST /api/ai/analyze-resume
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    _auth: Authorized<HiringTeam>,
    ApiJson(req): ApiJson<AnalyzeResumeRequest>,
) -> Result<Json<ApiResponse<ResumeAnalysis>>, AppError> {
    let resume_text = required_text(req.resume_text.as_deref(), "Resume text is required")?;
    let analysis = state
        .ai
        .analyze_resume(resume_text, non_blank(req.job_description.as_deref()))
        .await?;
    Ok(ApiResponse::ok("Resume analyzed successfully", analysis))
}

/// POST /api/ai/sentiment-analysis
pub async fn handle_sentiment_analysis(
    State(state): State<AppState>,
    _auth: Authorized<InterviewPanel>,
    ApiJson(req): ApiJson<SentimentRequest>,
) -> Result<Json<ApiResponse<SentimentAnalysis>>, AppError> {
    let text = required_text(
        req.text.as_deref(),
        "Text is required for sentiment analysis",
    )?;
    let sentiment = state
        .ai
        .analyze_sentiment(text, non_blank(req.context.as_deref()))
        .await?;
    Ok(ApiResponse::ok("Sentiment analysis completed", sentiment))
}

/// POST /api/ai/generate-job-description
pub async fn handle_generate_job_description(
    State(state): State<AppState>,
    _auth: Authorized<HiringTeam>,
    ApiJson(req): ApiJson<GenerateJobDescriptionRequest>,
) -> Result<Json<ApiResponse<JobDescription>>, AppError> {
    let position = required_text(req.position.as_deref(), "Position is required")?;
    let params = JobDescriptionParams {
        position: position.to_string(),
        department: non_blank(req.department.as_deref()).map(str::to_string),
        requirements: req.requirements.unwrap_or_default(),
        experience_level: non_blank(req.experience_level.as_deref()).map(str::to_string),
    };

    let description = state.ai.generate_job_description(&params).await?;
    Ok(ApiResponse::ok(
        "Job description generated successfully",
        description,
    ))
}

/// POST /api/ai/interview-questions
pub async fn handle_interview_questions(
    State(state): State<AppState>,
    _auth: Authorized<InterviewPanel>,
    ApiJson(req): ApiJson<InterviewQuestionsRequest>,
) -> Result<Json<ApiResponse<InterviewQuestions>>, AppError> {
    let job_id = parse_id(req.job_id.as_deref(), "Job ID is required")?;
    let candidate_id = match non_blank(req.candidate_id.as_deref()) {
        Some(raw) => Some(parse_uuid(raw)?),
        None => None,
    };

    let questions = state
        .ai
        .generate_interview_questions(
            job_id,
            candidate_id,
            non_blank(req.interview_type.as_deref()),
        )
        .await?;
    Ok(ApiResponse::ok(
        "Interview questions generated successfully",
        questions,
    ))
}

/// POST /api/ai/predict-success
pub async fn handle_predict_success(
    State(state): State<AppState>,
    _auth: Authorized<HrLeads>,
    ApiJson(req): ApiJson<PredictSuccessRequest>,
) -> Result<Json<ApiResponse<SuccessPrediction>>, AppError> {
    const MISSING: &str = "Candidate ID and Job ID are required";
    let candidate_id = parse_id(req.candidate_id.as_deref(), MISSING)?;
    let job_id = parse_id(req.job_id.as_deref(), MISSING)?;

    let prediction = state.ai.predict_success(candidate_id, job_id).await?;
    Ok(ApiResponse::ok("Candidate success predicted", prediction))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required_text<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, AppError> {
    non_blank(value).ok_or_else(|| AppError::Validation(message.to_string()))
}

fn parse_id(value: Option<&str>, missing: &str) -> Result<Uuid, AppError> {
    parse_uuid(required_text(value, missing)?)
}

fn parse_uuid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid ID format: {raw}")))
}
