//! Storage seams. Handlers and services only see these traits; `AppState`
//! carries `Arc<dyn ...>` so tests can swap in in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::models::user::{NewUser, ProfileUpdate, User};

pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Inserts a user. A taken email yields `AppError::Conflict`.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, AppError>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError>;
}

/// Read access to jobs, candidates and the applications linking them.
#[async_trait]
pub trait RecruitingStore: Send + Sync {
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, AppError>;

    async fn find_candidate(&self, id: Uuid) -> Result<Option<Candidate>, AppError>;

    /// Candidates that applied to `job_id`, in application order.
    async fn candidates_for_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, AppError>;
}

pub(crate) const DUPLICATE_EMAIL: &str = "User already exists";
