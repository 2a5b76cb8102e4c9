//! Field-level encryption for AIMS
//!
//! Sensitive text columns (mood, journal entries) are sealed with
//! AES-256-GCM under a single process-wide key before they reach storage,
//! and opened again on read. The key is passed in explicitly so several
//! keys can coexist (tests, re-keying tools).

pub mod codec;
pub mod key;

pub use codec::{EncryptedField, FieldCodec};
pub use key::SecretKey;
