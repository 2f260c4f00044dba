//! Typed shapes the model is asked to produce, with their validation rules.
//!
//! A reply must deserialize into one of these structs AND pass `validate`
//! before any caller sees it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm_client::StructuredOutput;

fn check_range(field: &str, value: f64, max: f64) -> Result<(), String> {
    if !value.is_finite() || !(0.0..=max).contains(&value) {
        return Err(format!("{field} must be between 0 and {max}, got {value}"));
    }
    Ok(())
}

fn check_not_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

fn check_items(field: &str, items: &[String]) -> Result<(), String> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(format!("{field} contains an empty entry"));
    }
    Ok(())
}

/// Rounds a validated 0–100 score for presentation.
fn as_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

// ────────────────────────────────────────────────────────────────────────────
// Resume parsing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<GraduationYear>,
}

/// Models answer with either `2019` or `"2019"` / `"Expected 2025"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraduationYear {
    Year(i32),
    Text(String),
}

impl StructuredOutput for ParsedResume {
    fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err("candidate name is missing".to_string());
        }
        check_items("skills", &self.skills)?;
        for entry in &self.experience {
            check_not_blank("experience.company", &entry.company)?;
        }
        for entry in &self.education {
            check_not_blank("education.institution", &entry.institution)?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate matching
// ────────────────────────────────────────────────────────────────────────────

pub const FALLBACK_SCORE: f64 = 50.0;
pub const FALLBACK_INSIGHT: &str = "Unable to perform AI analysis";

/// Per-candidate compatibility as returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScore {
    pub overall: f64,
    pub skills: f64,
    pub experience: f64,
    pub insights: String,
}

impl MatchScore {
    /// Neutral score used when the model call for a candidate fails.
    pub fn fallback() -> Self {
        MatchScore {
            overall: FALLBACK_SCORE,
            skills: FALLBACK_SCORE,
            experience: FALLBACK_SCORE,
            insights: FALLBACK_INSIGHT.to_string(),
        }
    }
}

impl StructuredOutput for MatchScore {
    fn validate(&self) -> Result<(), String> {
        check_range("overall", self.overall, 100.0)?;
        check_range("skills", self.skills, 100.0)?;
        check_range("experience", self.experience, 100.0)?;
        check_not_blank("insights", &self.insights)
    }
}

/// One row of the matching result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatch {
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub match_score: u8,
    pub skills_match: u8,
    pub experience_match: u8,
    pub insights: String,
}

impl CandidateMatch {
    pub fn new(candidate_id: Uuid, candidate_name: String, score: MatchScore) -> Self {
        CandidateMatch {
            candidate_id,
            candidate_name,
            match_score: as_percent(score.overall),
            skills_match: as_percent(score.skills),
            experience_match: as_percent(score.experience),
            insights: score.insights,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resume analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub keywords: Vec<String>,
    pub overall_score: f64,
}

impl StructuredOutput for ResumeAnalysis {
    fn validate(&self) -> Result<(), String> {
        check_range("overallScore", self.overall_score, 100.0)?;
        check_items("strengths", &self.strengths)?;
        check_items("weaknesses", &self.weaknesses)?;
        check_items("recommendations", &self.recommendations)?;
        check_items("keywords", &self.keywords)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sentiment
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub emotions: Vec<String>,
    pub summary: String,
}

impl StructuredOutput for SentimentAnalysis {
    fn validate(&self) -> Result<(), String> {
        check_range("confidence", self.confidence, 1.0)?;
        check_items("emotions", &self.emotions)?;
        check_not_blank("summary", &self.summary)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job description
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    pub title: String,
    pub overview: String,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub preferred_qualifications: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl StructuredOutput for JobDescription {
    fn validate(&self) -> Result<(), String> {
        check_not_blank("title", &self.title)?;
        if self.responsibilities.is_empty() {
            return Err("responsibilities must not be empty".to_string());
        }
        if self.qualifications.is_empty() {
            return Err("qualifications must not be empty".to_string());
        }
        check_items("responsibilities", &self.responsibilities)?;
        check_items("qualifications", &self.qualifications)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interview questions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestions {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub behavioral: Vec<String>,
    #[serde(default)]
    pub situational: Vec<String>,
}

impl InterviewQuestions {
    pub fn total(&self) -> usize {
        self.technical.len() + self.behavioral.len() + self.situational.len()
    }
}

impl StructuredOutput for InterviewQuestions {
    fn validate(&self) -> Result<(), String> {
        if self.total() == 0 {
            return Err("no questions were generated".to_string());
        }
        check_items("technical", &self.technical)?;
        check_items("behavioral", &self.behavioral)?;
        check_items("situational", &self.situational)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Success prediction
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiringRecommendation {
    Hire,
    Interview,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessPrediction {
    pub success_probability: f64,
    pub risk_factors: Vec<String>,
    pub strengths: Vec<String>,
    pub recommendation: HiringRecommendation,
    pub reasoning: String,
}

impl StructuredOutput for SuccessPrediction {
    fn validate(&self) -> Result<(), String> {
        check_range("successProbability", self.success_probability, 100.0)?;
        check_items("riskFactors", &self.risk_factors)?;
        check_items("strengths", &self.strengths)?;
        check_not_blank("reasoning", &self.reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_resume_accepts_numeric_and_text_years() {
        let json = r#"{
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@navy.mil",
            "phoneNumber": null,
            "skills": ["COBOL", "Compilers"],
            "experience": [{"company": "US Navy", "position": "Rear Admiral", "duration": "1943-1986"}],
            "education": [
                {"institution": "Yale", "degree": "PhD", "fieldOfStudy": "Mathematics", "graduationYear": 1934},
                {"institution": "Vassar", "graduationYear": "1928"}
            ],
            "summary": "Pioneer of compilers."
        }"#;
        let resume: ParsedResume = serde_json::from_str(json).unwrap();
        assert!(resume.validate().is_ok());
        assert_eq!(resume.education[0].graduation_year, Some(GraduationYear::Year(1934)));
        assert_eq!(
            resume.education[1].graduation_year,
            Some(GraduationYear::Text("1928".to_string()))
        );
        assert!(resume.phone_number.is_none());
    }

    #[test]
    fn test_parsed_resume_without_name_is_rejected() {
        let resume = ParsedResume {
            first_name: " ".to_string(),
            last_name: String::new(),
            email: None,
            phone_number: None,
            skills: vec![],
            experience: vec![],
            education: vec![],
            summary: String::new(),
        };
        assert!(resume.validate().is_err());
    }

    #[test]
    fn test_parsed_resume_requires_skill_list() {
        let json = r#"{"firstName": "A", "lastName": "B", "skills": "Rust, Go",
                       "experience": [], "education": [], "summary": ""}"#;
        assert!(serde_json::from_str::<ParsedResume>(json).is_err());
    }

    #[test]
    fn test_match_score_range_is_enforced() {
        let mut score = MatchScore {
            overall: 87.0,
            skills: 90.0,
            experience: 80.0,
            insights: "Strong Rust background".to_string(),
        };
        assert!(score.validate().is_ok());
        score.overall = 120.0;
        assert!(score.validate().is_err());
        score.overall = -1.0;
        assert!(score.validate().is_err());
    }

    #[test]
    fn test_fallback_is_neutral() {
        let m = CandidateMatch::new(Uuid::nil(), "X Y".to_string(), MatchScore::fallback());
        assert_eq!((m.match_score, m.skills_match, m.experience_match), (50, 50, 50));
        assert_eq!(m.insights, FALLBACK_INSIGHT);
    }

    #[test]
    fn test_candidate_match_rounds_scores() {
        let score = MatchScore {
            overall: 72.6,
            skills: 64.4,
            experience: 99.5,
            insights: "ok".to_string(),
        };
        let m = CandidateMatch::new(Uuid::nil(), "X Y".to_string(), score);
        assert_eq!((m.match_score, m.skills_match, m.experience_match), (73, 64, 100));
    }

    #[test]
    fn test_sentiment_label_must_be_known() {
        let ok = r#"{"sentiment": "positive", "confidence": 0.9, "emotions": ["joy"], "summary": "Happy"}"#;
        let parsed: SentimentAnalysis = serde_json::from_str(ok).unwrap();
        assert_eq!(parsed.sentiment, Sentiment::Positive);
        assert!(parsed.validate().is_ok());

        let bad = r#"{"sentiment": "ecstatic", "confidence": 0.9, "emotions": [], "summary": "x"}"#;
        assert!(serde_json::from_str::<SentimentAnalysis>(bad).is_err());
    }

    #[test]
    fn test_sentiment_confidence_is_a_probability() {
        let parsed: SentimentAnalysis = serde_json::from_str(
            r#"{"sentiment": "neutral", "confidence": 85, "emotions": [], "summary": "Flat"}"#,
        )
        .unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_job_description_needs_core_sections() {
        let json = r#"{
            "title": "Backend Engineer",
            "overview": "Build APIs.",
            "responsibilities": ["Design services"],
            "qualifications": ["3+ years Rust"]
        }"#;
        let jd: JobDescription = serde_json::from_str(json).unwrap();
        assert!(jd.validate().is_ok());
        assert!(jd.benefits.is_empty());

        let empty = JobDescription {
            responsibilities: vec![],
            ..jd
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_interview_questions_must_not_be_empty() {
        let none: InterviewQuestions = serde_json::from_str("{}").unwrap();
        assert!(none.validate().is_err());

        let some: InterviewQuestions =
            serde_json::from_str(r#"{"behavioral": ["Tell me about a conflict."]}"#).unwrap();
        assert_eq!(some.total(), 1);
        assert!(some.validate().is_ok());
    }

    #[test]
    fn test_success_prediction_recommendation_values() {
        let json = r#"{
            "successProbability": 78,
            "riskFactors": ["Short tenure"],
            "strengths": ["Relevant stack"],
            "recommendation": "interview",
            "reasoning": "Good fit with some risk."
        }"#;
        let p: SuccessPrediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.recommendation, HiringRecommendation::Interview);
        assert!(p.validate().is_ok());

        let bad = json.replace("\"interview\"", "\"maybe\"");
        assert!(serde_json::from_str::<SuccessPrediction>(&bad).is_err());
    }
}
