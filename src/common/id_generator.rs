// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXXXXXX (e.g., B_K7NP3XY2QA for badges)
//!
//! The alphabet has no ambiguous characters (I, L, O, U are excluded), so IDs
//! survive being read aloud or copied out of a URL by hand.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random characters per entity ID (32^10 combinations).
const ID_LENGTH: usize = 10;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Badge (B_)
    Badge,
    /// Course (C_)
    Course,
    /// Status check (S_)
    StatusCheck,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Badge => "B",
            EntityPrefix::Course => "C",
            EntityPrefix::StatusCheck => "S",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(ID_LENGTH))
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_badge_id() -> String {
    generate_id(EntityPrefix::Badge)
}

pub fn generate_course_id() -> String {
    generate_id(EntityPrefix::Course)
}

pub fn generate_status_check_id() -> String {
    generate_id(EntityPrefix::StatusCheck)
}
