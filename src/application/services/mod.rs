//! Application services: business logic over the repository contracts.

mod auth_service;
mod link_service;
mod redirect_service;

pub use auth_service::{AuthContext, AuthService, hash_token};
pub use link_service::{LinkService, MAX_URL_LENGTH};
pub use redirect_service::{RedirectDecision, RedirectService};
