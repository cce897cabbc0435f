//! Salted password digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 digest of `salt || password`, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    pub salt: String,
    pub digest: String,
}

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    pub fn new(password: &str) -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        let digest = digest(&salt, password);
        Self { salt, digest }
    }

    /// Exact, case-sensitive match against the stored digest.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = digest(&self.salt, password);
        constant_time_eq(candidate.as_bytes(), self.digest.as_bytes())
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_correct_password() {
        let hash = PasswordHash::new("x");
        assert!(hash.verify("x"));
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let hash = PasswordHash::new("Secret");
        assert!(!hash.verify("secret"));
        assert!(!hash.verify("Secret "));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = PasswordHash::new("same");
        let b = PasswordHash::new("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn test_digest_does_not_contain_password() {
        let hash = PasswordHash::new("hunter2");
        let json = serde_json::to_string(&hash).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
