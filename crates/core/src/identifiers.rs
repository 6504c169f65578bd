//! Public token and template identifier generation.
//!
//! Both identifiers come from the thread-local CSPRNG. Uniqueness is not
//! pre-checked here: a collision surfaces as a unique-constraint conflict
//! when the form is persisted.

use rand::RngCore;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Random bytes behind a public form token (32 hex characters).
pub const TOKEN_BYTES: usize = 16;

/// Random bytes behind a template identifier (16 hex characters).
pub const TEMPLATE_ID_BYTES: usize = 8;

/// Hex characters per hyphen-separated template identifier group.
pub const TEMPLATE_ID_GROUP_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate the opaque public token used to view and submit a form.
///
/// Returns 32 lowercase hexadecimal characters.
pub fn new_token() -> String {
    hex::encode(random_bytes::<TOKEN_BYTES>())
}

/// Generate an administrative template identifier.
///
/// Returns 16 lowercase hexadecimal characters grouped in fours, e.g.
/// `a1b2-c3d4-e5f6-0718`.
pub fn new_template_id() -> String {
    let digits = hex::encode(random_bytes::<TEMPLATE_ID_BYTES>());
    digits
        .as_bytes()
        .chunks(TEMPLATE_ID_GROUP_LEN)
        .map(|group| std::str::from_utf8(group).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-")
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
