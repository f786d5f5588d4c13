//! PostgreSQL-backed repository implementations.

mod pg_click_repository;
mod pg_link_repository;
mod pg_token_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
