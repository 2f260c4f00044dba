//! In-memory fakes for the store and provider seams, shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::ai::AiService;
use crate::auth::TokenKeys;
use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError, PromptRequest, TextGenerator};
use crate::models::candidate::Candidate;
use crate::models::job::Job;
use crate::models::user::{NewUser, ProfileUpdate, Role, User};
use crate::state::AppState;
use crate::store::{RecruitingStore, UserStore, DUPLICATE_EMAIL};

pub const TEST_JWT_SECRET: &[u8] = b"test-jwt-secret";

// ────────────────────────────────────────────────────────────────────────────
// Provider fake
// ────────────────────────────────────────────────────────────────────────────

type Script = dyn Fn(&PromptRequest<'_>) -> Result<String, LlmError> + Send + Sync;

/// A `TextGenerator` whose replies come from a closure. Records every prompt.
pub struct ScriptedGenerator {
    script: Box<Script>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(
        script: impl Fn(&PromptRequest<'_>) -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn always(reply: &str) -> Arc<Self> {
        let reply = reply.to_string();
        Self::new(move |_| Ok(reply.clone()))
    }

    pub fn failing() -> Arc<Self> {
        Self::new(|_| Err(provider_down()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

pub fn provider_down() -> LlmError {
    LlmError::Api {
        status: 503,
        message: "provider unavailable".to_string(),
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &PromptRequest<'_>) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        (self.script)(request)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store fake
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    jobs: Mutex<HashMap<Uuid, Job>>,
    candidates: Mutex<HashMap<Uuid, Candidate>>,
    applications: Mutex<Vec<(Uuid, Uuid)>>,
}

impl MemoryStore {
    pub fn add_job(&self, title: &str, skills: &[&str], experience_level: &str) -> Job {
        let job = Job {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{title} role"),
            department: "Engineering".to_string(),
            location: "Remote".to_string(),
            job_type: "FULL_TIME".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            requirements: vec!["Team player".to_string()],
            experience_level: experience_level.to_string(),
            created_at: Utc::now(),
        };
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        job
    }

    pub fn add_candidate(&self, first: &str, last: &str, skills: &[&str], years: i32) -> Candidate {
        let candidate = Candidate {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@example.com", first, last).to_lowercase(),
            phone_number: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            years_of_experience: years,
            current_position: Some("Engineer".to_string()),
            created_at: Utc::now(),
        };
        self.candidates
            .lock()
            .unwrap()
            .insert(candidate.id, candidate.clone());
        candidate
    }

    pub fn apply(&self, job_id: Uuid, candidate_id: Uuid) {
        self.applications.lock().unwrap().push((job_id, candidate_id));
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.user_by_email(email))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            role: new_user.role,
            phone_number: None,
            department: None,
            position: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if let Some(v) = update.first_name {
            user.first_name = v;
        }
        if let Some(v) = update.last_name {
            user.last_name = v;
        }
        if let Some(v) = update.phone_number {
            user.phone_number = Some(v);
        }
        if let Some(v) = update.department {
            user.department = Some(v);
        }
        if let Some(v) = update.position {
            user.position = Some(v);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[async_trait]
impl RecruitingStore for MemoryStore {
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    async fn find_candidate(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        Ok(self.candidates.lock().unwrap().get(&id).cloned())
    }

    async fn candidates_for_job(&self, job_id: Uuid) -> Result<Vec<Candidate>, AppError> {
        let candidates = self.candidates.lock().unwrap();
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|(job, _)| *job == job_id)
            .filter_map(|(_, candidate)| candidates.get(candidate).cloned())
            .collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wiring
// ────────────────────────────────────────────────────────────────────────────

pub fn ai_service(generator: Arc<ScriptedGenerator>, store: Arc<MemoryStore>) -> AiService {
    AiService::new(LlmClient::new(generator), store)
}

/// Full application state over in-memory fakes.
pub fn test_state(generator: Arc<ScriptedGenerator>) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState {
        users: store.clone(),
        ai: ai_service(generator, store.clone()),
        tokens: TokenKeys::new(TEST_JWT_SECRET, Duration::hours(1)),
        started_at: Instant::now(),
    };
    (state, store)
}

/// A bearer header value for a synthetic user with `role`.
pub fn bearer_for(state: &AppState, role: Role) -> String {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", role.as_str().to_lowercase()),
        password_hash: String::new(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role,
        phone_number: None,
        department: None,
        position: None,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    };
    format!("Bearer {}", state.tokens.issue(&user).unwrap())
}

const TEST_BOUNDARY: &str = "talent-test-boundary";

/// A POST request carrying one multipart file field.
pub fn multipart_request(
    uri: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = format!(
        "--{TEST_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{TEST_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={TEST_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A real DOCX package with one paragraph per line.
pub fn sample_docx(paragraphs: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run};

    let docx = paragraphs.iter().fold(Docx::new(), |docx, line| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)))
    });
    let mut cursor = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}
