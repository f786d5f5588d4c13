//! Shared utilities: code generation and client IP extraction.

pub mod client_ip;
pub mod code_generator;
