//! Payload sealing and subject pseudonymisation.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pbkdf2::pbkdf2_hmac;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::StorageError;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const KEY_LENGTH: usize = 32;
const NONCE_LENGTH: usize = 12;
const TAG_LENGTH: usize = 16;

/// AES-256-GCM key, zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SealingKey {
    key_bytes: [u8; KEY_LENGTH],
}

impl SealingKey {
    /// PBKDF2-HMAC-SHA256 over `secret` and `salt`.
    pub fn derive(secret: &str, salt: &[u8]) -> Self {
        Self::derive_with_iterations(secret, salt, PBKDF2_ITERATIONS)
    }

    pub fn derive_with_iterations(secret: &str, salt: &[u8], iterations: u32) -> Self {
        let mut key_bytes = [0u8; KEY_LENGTH];
        pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, iterations, &mut key_bytes);
        Self { key_bytes }
    }

    pub fn from_bytes(key_bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key_bytes }
    }

    /// Encrypt with a random nonce. Output is base64 of `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<String, StorageError> {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key_bytes));

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| StorageError::Seal)?;

        let mut bytes = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        bytes.extend_from_slice(&nonce_bytes);
        bytes.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(bytes))
    }

    pub fn unseal(&self, sealed: &str) -> Result<Vec<u8>, StorageError> {
        let bytes = STANDARD.decode(sealed).map_err(|_| StorageError::Unseal)?;
        if bytes.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(StorageError::Unseal);
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_LENGTH);

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key_bytes));
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StorageError::Unseal)
    }

    pub fn seal_json<T: Serialize>(&self, value: &T) -> Result<String, StorageError> {
        self.seal(&serde_json::to_vec(value)?)
    }

    pub fn unseal_json<T: DeserializeOwned>(&self, sealed: &str) -> Result<T, StorageError> {
        Ok(serde_json::from_slice(&self.unseal(sealed)?)?)
    }
}

/// Salted SHA-256 of a subject identifier, lowercase hex.
pub fn hash_subject(salt: &str, subject: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(subject.trim().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Fresh random salt, base64 encoded.
pub fn generate_salt() -> String {
    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);
    STANDARD.encode(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SealingKey {
        SealingKey::derive_with_iterations("test-secret", b"salt", 1_000)
    }

    #[test]
    fn seal_round_trip() {
        let key = test_key();
        let sealed = key.seal(b"phq9 responses").unwrap();
        assert_eq!(key.unseal(&sealed).unwrap(), b"phq9 responses");
    }

    #[test]
    fn nonces_differ_between_seals() {
        let key = test_key();
        assert_ne!(key.seal(b"same").unwrap(), key.seal(b"same").unwrap());
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = test_key().seal(b"secret").unwrap();
        let other = SealingKey::derive_with_iterations("other-secret", b"salt", 1_000);
        assert!(matches!(other.unseal(&sealed), Err(StorageError::Unseal)));
    }

    #[test]
    fn tampered_or_short_payloads_fail() {
        let key = test_key();
        let mut bytes = STANDARD.decode(key.seal(b"secret").unwrap()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(key.unseal(&STANDARD.encode(&bytes)).is_err());
        assert!(key.unseal(&STANDARD.encode([0u8; 8])).is_err());
        assert!(key.unseal("not base64 !!").is_err());
    }

    #[test]
    fn subject_hash_is_salted_and_stable() {
        let a = hash_subject("salt-a", "patient-42");
        assert_eq!(a.len(), 64);
        assert_eq!(a, hash_subject("salt-a", " patient-42 "));
        assert_ne!(a, hash_subject("salt-b", "patient-42"));
    }
}
