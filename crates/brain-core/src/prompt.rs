//! System prompt fingerprints.
//!
//! Prompts are rebuilt on every turn from the user profile, so the full text
//! is too noisy to log. A short SHA-256 prefix is enough to tell two prompt
//! versions apart in the logs.

use sha2::{Digest, Sha256};

/// Hex characters kept by [`prompt_fingerprint`].
pub const FINGERPRINT_LEN: usize = 12;

/// Full lowercase hex SHA-256 of a prompt.
pub fn hash_prompt(prompt: &str) -> String {
    Sha256::digest(prompt.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// First [`FINGERPRINT_LEN`] hex characters of [`hash_prompt`].
pub fn prompt_fingerprint(prompt: &str) -> String {
    let mut hash = hash_prompt(prompt);
    hash.truncate(FINGERPRINT_LEN);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_hex() {
        let hash = hash_prompt("Sos un asistente de nutrición");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, hash_prompt("Sos un asistente de nutrición"));
        assert_ne!(hash, hash_prompt("Sos un asistente de nutrición."));
    }

    #[test]
    fn test_fingerprint_is_prefix() {
        let prompt = "Hoy es 2024-05-01";
        let fingerprint = prompt_fingerprint(prompt);
        assert_eq!(fingerprint.len(), FINGERPRINT_LEN);
        assert!(hash_prompt(prompt).starts_with(&fingerprint));
    }
}
