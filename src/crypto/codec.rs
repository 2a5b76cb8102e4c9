//! AES-256-GCM field codec
//!
//! Turns a plaintext string into a self-contained ciphertext token and back.
//! A token is URL-safe base64 (no padding) of:
//!
//! ```text
//! version (1 byte) || nonce (12 bytes) || ciphertext + tag
//! ```
//!
//! Every call to `encrypt` uses a fresh random nonce, so the same plaintext
//! yields a different token each time. Any failure to open a token is a
//! `Decryption` error; the raw token is never handed back as if it were
//! plaintext.

use std::fmt;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{AimsError, AimsResult};

use super::SecretKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes
const TAG_SIZE: usize = 16;

/// Current token layout version
const TOKEN_VERSION: u8 = 1;

/// A sealed text value as stored in a row
///
/// Serializes as the bare token string. The only way to get plaintext out
/// is `FieldCodec::decrypt`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedField(String);

impl EncryptedField {
    /// Wrap a token read from somewhere other than the codec
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The opaque token text
    pub fn token(&self) -> &str {
        &self.0
    }
}

// Tokens are safe to print, but keep them short in debug output
impl fmt::Debug for EncryptedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(12).collect();
        write!(f, "EncryptedField({}…)", prefix)
    }
}

/// Encrypts and decrypts single text fields with one key
#[derive(Debug, Clone)]
pub struct FieldCodec {
    key: SecretKey,
}

impl FieldCodec {
    /// Create a codec bound to `key`
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }

    fn cipher(&self) -> AimsResult<Aes256Gcm> {
        Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|e| AimsError::Encryption(format!("Failed to create cipher: {}", e)))
    }

    /// Seal a plaintext string
    pub fn encrypt(&self, plaintext: &str) -> AimsResult<EncryptedField> {
        let cipher = self.cipher()?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| AimsError::Encryption(format!("Encryption failed: {}", e)))?;

        let mut raw = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
        raw.push(TOKEN_VERSION);
        raw.extend_from_slice(&nonce_bytes);
        raw.extend_from_slice(&ciphertext);

        Ok(EncryptedField(URL_SAFE_NO_PAD.encode(raw)))
    }

    /// Open a sealed field
    ///
    /// Fails with `Decryption` when the token is malformed, truncated,
    /// tampered with, or was sealed under a different key.
    pub fn decrypt(&self, field: &EncryptedField) -> AimsResult<String> {
        let raw = URL_SAFE_NO_PAD
            .decode(field.token())
            .map_err(|e| AimsError::Decryption(format!("Invalid token encoding: {}", e)))?;

        if raw.len() < 1 + NONCE_SIZE + TAG_SIZE {
            return Err(AimsError::Decryption(format!(
                "Token too short: {} bytes",
                raw.len()
            )));
        }

        let (version, rest) = raw.split_at(1);
        if version[0] != TOKEN_VERSION {
            return Err(AimsError::Decryption(format!(
                "Unsupported token version: {}",
                version[0]
            )));
        }

        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher = self.cipher()?;
        let plaintext = cipher.decrypt(nonce, ciphertext).map_err(|_| {
            AimsError::Decryption("Authentication failed: wrong key or corrupted token".into())
        })?;

        String::from_utf8(plaintext)
            .map_err(|e| AimsError::Decryption(format!("Invalid UTF-8 in decrypted data: {}", e)))
    }

    /// Seal an optional value, keeping `None` as `None`
    pub fn encrypt_opt(&self, plaintext: Option<&str>) -> AimsResult<Option<EncryptedField>> {
        plaintext.map(|p| self.encrypt(p)).transpose()
    }
}
