//! Secret key handling
//!
//! The field-encryption key is a 32-byte AES-256 key supplied through the
//! environment as URL-safe base64. It is loaded once at startup and never
//! derived, rotated, or written to disk by this crate.

use std::fmt;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AimsError, AimsResult};

/// Length of the AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// A symmetric key for the field codec, zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; KEY_SIZE],
}

impl SecretKey {
    /// Wrap raw key bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh random key
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Parse a key from URL-safe base64 (trailing `=` padding is tolerated)
    pub fn from_base64(encoded: &str) -> AimsResult<Self> {
        let trimmed = encoded.trim().trim_end_matches('=');
        let mut decoded = URL_SAFE_NO_PAD
            .decode(trimmed)
            .map_err(|e| AimsError::Encryption(format!("Invalid key encoding: {}", e)))?;

        if decoded.len() != KEY_SIZE {
            let len = decoded.len();
            decoded.zeroize();
            return Err(AimsError::Encryption(format!(
                "Invalid key length: expected {} bytes, got {}",
                KEY_SIZE, len
            )));
        }

        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { bytes })
    }

    /// Load the key from an environment variable
    ///
    /// A missing or empty variable is a configuration error; there is no
    /// fallback key.
    pub fn from_env(var: &str) -> AimsResult<Self> {
        let value = std::env::var(var).map_err(|_| {
            AimsError::Config(format!(
                "{} is not set; generate a key with `aims keygen` and export it",
                var
            ))
        })?;

        if value.trim().is_empty() {
            return Err(AimsError::Config(format!("{} is empty", var)));
        }

        Self::from_base64(&value)
    }

    /// Encode the key as URL-safe base64 without padding
    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.bytes)
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

// Never print key material
impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_random() {
        let a = SecretKey::generate();
        let b = SecretKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_base64_round_trip() {
        let key = SecretKey::generate();
        let encoded = key.to_base64();
        let parsed = SecretKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), parsed.as_bytes());
    }

    #[test]
    fn test_padded_key_accepted() {
        let key = SecretKey::from_bytes([7u8; KEY_SIZE]);
        let padded = format!("{}=", key.to_base64());
        let parsed = SecretKey::from_base64(&padded).unwrap();
        assert_eq!(parsed.as_bytes(), &[7u8; KEY_SIZE]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = URL_SAFE_NO_PAD.encode([1u8; 16]);
        let err = SecretKey::from_base64(&short).unwrap_err();
        assert!(matches!(err, AimsError::Encryption(_)));
    }

    #[test]
    fn test_bad_encoding_rejected() {
        let err = SecretKey::from_base64("not base64 at all!").unwrap_err();
        assert!(matches!(err, AimsError::Encryption(_)));
    }

    #[test]
    fn test_from_env_missing_is_config_error() {
        let err = SecretKey::from_env("AIMS_KEY_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(matches!(err, AimsError::Config(_)));
    }

    #[test]
    fn test_from_env_reads_key() {
        let key = SecretKey::generate();
        std::env::set_var("AIMS_KEY_TEST_PRESENT", key.to_base64());

        let loaded = SecretKey::from_env("AIMS_KEY_TEST_PRESENT").unwrap();
        assert_eq!(loaded.as_bytes(), key.as_bytes());

        std::env::remove_var("AIMS_KEY_TEST_PRESENT");
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = SecretKey::from_bytes([0xAB; KEY_SIZE]);
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }
}
