//! Stored login credential.
//!
//! A user's password is kept as a tagged variant rather than a bare string,
//! so the two verification paths (modern hash vs legacy plaintext) are
//! explicit and exhaustively handled at the call site.

use serde::{Deserialize, Serialize};

/// A stored login credential.
///
/// `Hashed` holds an argon2 hash in PHC string format (`$argon2id$...`).
/// `LegacyPlaintext` exists for the pre-migration admin seed account and for
/// the degraded-mode fallback when hashing is unavailable; new records must
/// always use `Hashed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StoredCredential {
    /// Argon2 hash in PHC string format.
    Hashed(String),
    /// Plaintext password from a legacy record.
    LegacyPlaintext(String),
}

impl StoredCredential {
    /// Classify a raw stored string into the right variant.
    ///
    /// PHC-format hashes always start with a `$` separator; anything else is
    /// a legacy plaintext value.
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        if raw.starts_with('$') {
            Self::Hashed(raw.to_owned())
        } else {
            Self::LegacyPlaintext(raw.to_owned())
        }
    }

    /// Whether this credential uses the modern hashed format.
    #[must_use]
    pub const fn is_hashed(&self) -> bool {
        matches!(self, Self::Hashed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored_detects_phc_hash() {
        let cred = StoredCredential::from_stored("$argon2id$v=19$m=19456,t=2,p=1$abc$def");
        assert!(cred.is_hashed());
    }

    #[test]
    fn test_from_stored_detects_legacy_plaintext() {
        let cred = StoredCredential::from_stored("hunter2");
        assert!(!cred.is_hashed());
        assert_eq!(
            cred,
            StoredCredential::LegacyPlaintext("hunter2".to_owned())
        );
    }

    #[test]
    fn test_serde_tagged_representation() {
        let cred = StoredCredential::LegacyPlaintext("hunter2".to_owned());
        let json = serde_json::to_string(&cred).expect("serialize");
        assert_eq!(json, r#"{"kind":"legacy_plaintext","value":"hunter2"}"#);
    }
}
