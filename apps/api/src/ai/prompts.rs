// AI façade prompt templates and per-task model settings.
// Placeholders are `{name}` and are filled with `str::replace`.

use crate::llm_client::PromptRequest;

/// Persona, creativity and token budget for one kind of task.
#[derive(Debug, Clone, Copy)]
pub struct TaskProfile {
    pub system: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl TaskProfile {
    pub fn request<'a>(&'a self, prompt: &'a str) -> PromptRequest<'a> {
        PromptRequest {
            system: self.system,
            prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

pub const RESUME_PARSE: TaskProfile = TaskProfile {
    system: "You are an expert HR assistant specialized in resume parsing.",
    temperature: 0.3,
    max_tokens: 2000,
};

pub const MATCH_SCORE: TaskProfile = TaskProfile {
    system: "You are an expert HR consultant specialized in candidate evaluation.",
    temperature: 0.5,
    max_tokens: 500,
};

pub const RESUME_ANALYSIS: TaskProfile = TaskProfile {
    system: "You are an expert career coach and resume reviewer.",
    temperature: 0.6,
    max_tokens: 1000,
};

pub const SENTIMENT: TaskProfile = TaskProfile {
    system: "You are an expert in sentiment analysis and emotional intelligence.",
    temperature: 0.3,
    max_tokens: 300,
};

pub const JOB_DESCRIPTION: TaskProfile = TaskProfile {
    system: "You are an expert HR professional specialized in writing compelling job descriptions.",
    temperature: 0.7,
    max_tokens: 1500,
};

pub const INTERVIEW_QUESTIONS: TaskProfile = TaskProfile {
    system: "You are an expert interviewer and talent assessor.",
    temperature: 0.8,
    max_tokens: 2000,
};

pub const SUCCESS_PREDICTION: TaskProfile = TaskProfile {
    system: "You are an expert in predictive HR analytics.",
    temperature: 0.4,
    max_tokens: 800,
};

pub const RESUME_PARSE_PROMPT: &str = r#"Parse the following resume and extract structured candidate information.

RESUME CONTENT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "firstName": "string",
  "lastName": "string",
  "email": "string" | null,
  "phoneNumber": "string" | null,
  "skills": ["string"],
  "experience": [{"company": "string", "position": "string", "duration": "string", "description": "string"}],
  "education": [{"institution": "string", "degree": "string", "fieldOfStudy": "string", "graduationYear": number | "string"}],
  "summary": "string"
}"#;

pub const MATCH_SCORE_PROMPT: &str = r#"Analyze the match between this job and candidate.
Provide a compatibility score (0-100) and insights.

JOB DETAILS:
- Title: {job_title}
- Required Skills: {job_skills}
- Experience Level: {experience_level}
- Requirements: {job_requirements}

CANDIDATE DETAILS:
- Skills: {candidate_skills}
- Experience: {years} years
- Current Position: {current_position}

OUTPUT SCHEMA:
{
  "overall": number (0-100),
  "skills": number (0-100),
  "experience": number (0-100),
  "insights": "string (brief analysis)"
}"#;

pub const RESUME_ANALYSIS_PROMPT: &str = r#"Analyze this resume and provide comprehensive feedback.

RESUME:
{resume_text}
{job_description_section}
OUTPUT SCHEMA:
{
  "strengths": ["string"],
  "weaknesses": ["string"],
  "recommendations": ["string"],
  "keywords": ["string"],
  "overallScore": number (0-100)
}"#;

pub const SENTIMENT_PROMPT: &str = r#"Perform sentiment analysis on the following text.
{context_section}
TEXT:
{text}

OUTPUT SCHEMA:
{
  "sentiment": "positive" | "neutral" | "negative",
  "confidence": number (0-1),
  "emotions": ["string"],
  "summary": "string (brief summary)"
}"#;

pub const JOB_DESCRIPTION_PROMPT: &str = r#"Generate a professional job description for the following position.

Position: {position}
Department: {department}
Experience Level: {experience_level}
Requirements: {requirements}

Include a job title, a brief overview, 5-7 key responsibilities, required qualifications,
preferred qualifications, and benefits and perks.

OUTPUT SCHEMA:
{
  "title": "string",
  "overview": "string",
  "responsibilities": ["string"],
  "qualifications": ["string"],
  "preferredQualifications": ["string"],
  "benefits": ["string"]
}"#;

pub const INTERVIEW_QUESTIONS_PROMPT: &str = r#"Generate {interview_type} interview questions for:

Position: {job_title}
Skills Required: {job_skills}
Experience Level: {experience_level}
{candidate_section}
Generate 10-15 questions split into technical, behavioral and situational categories.

OUTPUT SCHEMA:
{
  "technical": ["string"],
  "behavioral": ["string"],
  "situational": ["string"]
}"#;

pub const SUCCESS_PREDICTION_PROMPT: &str = r#"Predict the success probability of this candidate for the role.

Match Score: {overall}/100
Candidate Experience: {years} years
Required Experience: {experience_level}
Skill Match: {skills}/100

OUTPUT SCHEMA:
{
  "successProbability": number (0-100),
  "riskFactors": ["string"],
  "strengths": ["string"],
  "recommendation": "hire" | "interview" | "reject",
  "reasoning": "string"
}"#;

/// Substitutes `{name}` placeholders in one pass. Inserted values are never
/// rescanned, so user text containing `{name}` stays literal. Braces that do
/// not name a known placeholder (the JSON schemas) are left untouched.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let value = tail.find('}').and_then(|end| {
            let key = &tail[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end + 1, *value))
        });
        match value {
            Some((consumed, value)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Renders a list for a prompt line, or `fallback` when it is empty.
pub fn join_or(items: &[String], fallback: &str) -> String {
    let joined = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}
