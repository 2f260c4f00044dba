//! AI integration façade: turns domain requests into one model call each and
//! model replies back into validated, typed results.
//!
//! Failure policy: per-candidate match scoring degrades to a neutral
//! `MatchScore::fallback()`; every other operation surfaces an
//! `AppError::Ai` ("Failed to <operation>").

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::with_json_instruction;
use crate::llm_client::LlmClient;
use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::store::RecruitingStore;

pub mod handlers;
pub mod prompts;
pub mod schema;
pub mod upload;

use prompts::{fill, join_or};
use schema::{
    CandidateMatch, InterviewQuestions, JobDescription, MatchScore, ParsedResume, ResumeAnalysis,
    SentimentAnalysis, SuccessPrediction,
};

const DEFAULT_INTERVIEW_TYPE: &str = "technical";

/// Inputs for job-description generation. Only `position` is required.
#[derive(Debug, Clone, Default)]
pub struct JobDescriptionParams {
    pub position: String,
    pub department: Option<String>,
    pub requirements: Vec<String>,
    pub experience_level: Option<String>,
}

#[derive(Clone)]
pub struct AiService {
    llm: LlmClient,
    recruiting: Arc<dyn RecruitingStore>,
}

impl AiService {
    pub fn new(llm: LlmClient, recruiting: Arc<dyn RecruitingStore>) -> Self {
        Self { llm, recruiting }
    }

    /// Extracts a structured candidate profile from raw resume text.
    /// No fallback: any failure is an error and no partial profile is returned.
    pub async fn parse_resume(&self, resume_text: &str) -> Result<ParsedResume, AppError> {
        let prompt = with_json_instruction(
            &fill(prompts::RESUME_PARSE_PROMPT, &[("resume_text", resume_text.trim())]),
        );
        self.llm
            .call_json::<ParsedResume>(&prompts::RESUME_PARSE.request(&prompt))
            .await
            .map_err(AppError::ai("parse resume"))
    }

    /// Scores every candidate that applied to `job_id`, best match first.
    ///
    /// One model call per candidate, issued concurrently. A failed call only
    /// affects its own candidate, which receives the neutral fallback.
    pub async fn match_candidates(&self, job_id: Uuid) -> Result<Vec<CandidateMatch>, AppError> {
        let job = self.load_job(job_id).await?;
        let candidates = self.recruiting.candidates_for_job(job_id).await?;
        info!(
            "Matching {} candidates against job {}",
            candidates.len(),
            job_id
        );

        let scores = join_all(
            candidates
                .iter()
                .map(|candidate| self.score_candidate(&job, candidate)),
        )
        .await;

        let mut matches: Vec<CandidateMatch> = candidates
            .iter()
            .zip(scores)
            .map(|(candidate, score)| {
                CandidateMatch::new(candidate.id, candidate.full_name(), score)
            })
            .collect();

        // Stable: ties keep application order.
        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        Ok(matches)
    }

    /// Asks the model for a compatibility score, falling back to a neutral
    /// score when the call or its validation fails.
    async fn score_candidate(&self, job: &Job, candidate: &Candidate) -> MatchScore {
        let prompt = with_json_instruction(&fill(
            prompts::MATCH_SCORE_PROMPT,
            &[
                ("job_title", &job.title),
                ("job_skills", &join_or(&job.skills, "Not specified")),
                ("experience_level", &job.experience_level),
                ("job_requirements", &join_or(&job.requirements, "Not specified")),
                ("candidate_skills", &join_or(&candidate.skills, "Not specified")),
                ("years", &candidate.years_of_experience.to_string()),
                (
                    "current_position",
                    candidate.current_position.as_deref().unwrap_or("Not specified"),
                ),
            ],
        ));

        match self
            .llm
            .call_json::<MatchScore>(&prompts::MATCH_SCORE.request(&prompt))
            .await
        {
            Ok(score) => score,
            Err(e) => {
                warn!(
                    "Match scoring failed for candidate {} on job {}, using fallback: {e}",
                    candidate.id, job.id
                );
                MatchScore::fallback()
            }
        }
    }

    pub async fn analyze_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<ResumeAnalysis, AppError> {
        let job_section = job_description
            .map(|jd| format!("\nJOB DESCRIPTION:\n{}\n", jd.trim()))
            .unwrap_or_default();
        let prompt = with_json_instruction(&fill(
            prompts::RESUME_ANALYSIS_PROMPT,
            &[
                ("resume_text", resume_text.trim()),
                ("job_description_section", &job_section),
            ],
        ));
        self.llm
            .call_json::<ResumeAnalysis>(&prompts::RESUME_ANALYSIS.request(&prompt))
            .await
            .map_err(AppError::ai("analyze resume"))
    }

    pub async fn analyze_sentiment(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<SentimentAnalysis, AppError> {
        let context_section = context
            .map(|c| format!("Context: {}\n", c.trim()))
            .unwrap_or_default();
        let prompt = with_json_instruction(&fill(
            prompts::SENTIMENT_PROMPT,
            &[("context_section", &context_section), ("text", text.trim())],
        ));
        self.llm
            .call_json::<SentimentAnalysis>(&prompts::SENTIMENT.request(&prompt))
            .await
            .map_err(AppError::ai("analyze sentiment"))
    }

    pub async fn generate_job_description(
        &self,
        params: &JobDescriptionParams,
    ) -> Result<JobDescription, AppError> {
        let prompt = with_json_instruction(&fill(
            prompts::JOB_DESCRIPTION_PROMPT,
            &[
                ("position", params.position.trim()),
                (
                    "department",
                    params.department.as_deref().unwrap_or("Not specified"),
                ),
                (
                    "experience_level",
                    params.experience_level.as_deref().unwrap_or("Mid-level"),
                ),
                (
                    "requirements",
                    &join_or(&params.requirements, "Standard requirements"),
                ),
            ],
        ));
        self.llm
            .call_json::<JobDescription>(&prompts::JOB_DESCRIPTION.request(&prompt))
            .await
            .map_err(AppError::ai("generate job description"))
    }

    /// Both the job and, when given, the candidate must exist.
    pub async fn generate_interview_questions(
        &self,
        job_id: Uuid,
        candidate_id: Option<Uuid>,
        interview_type: Option<&str>,
    ) -> Result<InterviewQuestions, AppError> {
        let job = self.load_job(job_id).await?;
        let candidate = match candidate_id {
            Some(id) => Some(self.load_candidate(id).await?),
            None => None,
        };

        let candidate_section = candidate
            .map(|c| {
                format!(
                    "Candidate Background: {}, {} years experience\n",
                    c.current_position.as_deref().unwrap_or("Not specified"),
                    c.years_of_experience
                )
            })
            .unwrap_or_default();
        let prompt = with_json_instruction(&fill(
            prompts::INTERVIEW_QUESTIONS_PROMPT,
            &[
                (
                    "interview_type",
                    interview_type.unwrap_or(DEFAULT_INTERVIEW_TYPE),
                ),
                ("job_title", &job.title),
                ("job_skills", &join_or(&job.skills, "Not specified")),
                ("experience_level", &job.experience_level),
                ("candidate_section", &candidate_section),
            ],
        ));
        self.llm
            .call_json::<InterviewQuestions>(&prompts::INTERVIEW_QUESTIONS.request(&prompt))
            .await
            .map_err(AppError::ai("generate interview questions"))
    }

    /// Scores the pair with the matching sub-routine (fallback included), then
    /// asks the model to turn that score into a hiring prediction.
    pub async fn predict_success(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<SuccessPrediction, AppError> {
        let candidate = self.recruiting.find_candidate(candidate_id).await?;
        let job = self.recruiting.find_job(job_id).await?;
        let (candidate, job) = match (candidate, job) {
            (Some(c), Some(j)) => (c, j),
            _ => return Err(AppError::NotFound("Candidate or Job not found".to_string())),
        };

        let score = self.score_candidate(&job, &candidate).await;
        let prompt = with_json_instruction(&fill(
            prompts::SUCCESS_PREDICTION_PROMPT,
            &[
                ("overall", &format!("{:.0}", score.overall)),
                ("years", &candidate.years_of_experience.to_string()),
                ("experience_level", &job.experience_level),
                ("skills", &format!("{:.0}", score.skills)),
            ],
        ));
        self.llm
            .call_json::<SuccessPrediction>(&prompts::SUCCESS_PREDICTION.request(&prompt))
            .await
            .map_err(AppError::ai("predict success"))
    }

    async fn load_job(&self, id: Uuid) -> Result<Job, AppError> {
        self.recruiting
            .find_job(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
    }

    async fn load_candidate(&self, id: Uuid) -> Result<Candidate, AppError> {
        self.recruiting
            .find_candidate(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Candidate not found".to_string()))
    }
}
