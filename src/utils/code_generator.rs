//! Short code generation and validation.
//!
//! Codes are drawn uniformly from a fixed alphabet with a cryptographically
//! secure random source, so live links cannot be enumerated by guessing.

use crate::error::AppError;

/// Default length of generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Alphabet for generated codes: the 62 ASCII alphanumerics.
pub const CODE_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Minimum accepted length for custom codes.
pub const MIN_CODE_LENGTH: usize = 3;

/// Maximum accepted length for custom codes.
pub const MAX_CODE_LENGTH: usize = 20;

/// Codes reserved for service routes; never valid as short links.
const RESERVED_CODES: &[&str] = &["api", "health", "admin", "static"];

/// Generates a random code of exactly `length` characters from `alphabet`.
///
/// Entropy comes from `getrandom`. Bytes are mapped onto the alphabet with
/// rejection sampling so every character is chosen uniformly regardless of
/// the alphabet size.
///
/// # Panics
///
/// Panics if `alphabet` is empty, longer than 256 characters, or if the
/// system random number generator fails (extremely rare).
pub fn generate(length: usize, alphabet: &str) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    assert!(
        !chars.is_empty() && chars.len() <= 256,
        "alphabet must contain between 1 and 256 characters"
    );

    // Largest multiple of the alphabet size that fits in a byte; bytes at or
    // above it are rejected to keep the distribution uniform.
    let accept_below = (256 / chars.len()) * chars.len();

    let mut code = String::with_capacity(length);
    let mut buffer = [0u8; 32];

    while code.len() < length {
        getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

        for &byte in &buffer {
            if (byte as usize) < accept_below {
                code.push(chars[byte as usize % chars.len()]);
                if code.len() == length {
                    break;
                }
            }
        }
    }

    code
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters, digits, underscore, hyphen
/// - Cannot be a reserved route word (`api`, `health`, ...)
///
/// # Errors
///
/// Returns [`AppError::InvalidCodeFormat`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        return Err(AppError::InvalidCodeFormat(format!(
            "Custom code must be {}-{} characters",
            MIN_CODE_LENGTH, MAX_CODE_LENGTH
        )));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::InvalidCodeFormat(
            "Custom code can only contain letters, digits, underscores, and hyphens".to_string(),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
    {
        return Err(AppError::InvalidCodeFormat(
            "This code is reserved".to_string(),
        ));
    }

    Ok(())
}

/// Strips every character outside the code alphabet from an untrusted
/// inbound path segment. Codes are case-sensitive, so case is preserved.
pub fn sanitize_code(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
