//! Repository traits: the contracts the application layer depends on.
//!
//! Concrete implementations live in [`crate::infrastructure::persistence`];
//! tests substitute mocks or in-memory doubles.

mod click_repository;
mod link_repository;
mod token_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
