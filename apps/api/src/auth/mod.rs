// Authentication: password hashing, signed tokens, role-gated extractors
// and the /api/auth handlers.

pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use extractors::{AuthUser, Authorized, HiringTeam, HrLeads, InterviewPanel};
pub use jwt::TokenKeys;
