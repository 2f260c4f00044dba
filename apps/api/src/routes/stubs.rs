//! Placeholder job, candidate and application routes. They authenticate and
//! authorize like the real thing but only echo what they would do.

use axum::{extract::Path, Json};

use crate::auth::{AuthUser, Authorized, HiringTeam, HrLeads};
use crate::response::ApiResponse;

type Echo = Json<ApiResponse<()>>;

// Jobs

pub async fn list_jobs(_user: AuthUser) -> Echo {
    ApiResponse::message("Get all jobs")
}

pub async fn create_job(_auth: Authorized<HiringTeam>) -> Echo {
    ApiResponse::message("Create job")
}

pub async fn get_job(_user: AuthUser, Path(id): Path<String>) -> Echo {
    ApiResponse::message(format!("Get job {id}"))
}

pub async fn update_job(_auth: Authorized<HiringTeam>, Path(id): Path<String>) -> Echo {
    ApiResponse::message(format!("Update job {id}"))
}

pub async fn delete_job(_auth: Authorized<HrLeads>, Path(id): Path<String>) -> Echo {
    ApiResponse::message(format!("Delete job {id}"))
}

// Candidates

pub async fn list_candidates(_user: AuthUser) -> Echo {
    ApiResponse::message("Get all candidates")
}

pub async fn create_candidate(_auth: Authorized<HiringTeam>) -> Echo {
    ApiResponse::message("Create candidate")
}

pub async fn get_candidate(_user: AuthUser, Path(id): Path<String>) -> Echo {
    ApiResponse::message(format!("Get candidate {id}"))
}

pub async fn update_candidate(_user: AuthUser, Path(id): Path<String>) -> Echo {
    ApiResponse::message(format!("Update candidate {id}"))
}

// Applications

pub async fn list_applications(_user: AuthUser) -> Echo {
    ApiResponse::message("Get all applications")
}

pub async fn create_application(_user: AuthUser) -> Echo {
    ApiResponse::message("Create application")
}

pub async fn get_application(_user: AuthUser, Path(id): Path<String>) -> Echo {
    ApiResponse::message(format!("Get application {id}"))
}

pub async fn update_application_status(
    _auth: Authorized<HiringTeam>,
    Path(id): Path<String>,
) -> Echo {
    ApiResponse::message(format!("Update application status {id}"))
}
