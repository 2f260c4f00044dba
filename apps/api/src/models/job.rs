use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub department: String,
    pub location: String,
    pub job_type: String,
    pub skills: Vec<String>,
    pub requirements: Vec<String>,
    pub experience_level: String,
    pub created_at: DateTime<Utc>,
}
