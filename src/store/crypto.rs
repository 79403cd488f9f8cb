//! Authenticated encryption for stored user records.
//!
//! Records are sealed with ChaCha20-Poly1305 under a key derived from the
//! configured secret (SHA-256 of the secret string). The sealed form is a
//! self-describing string: `v1:` + base64(nonce ‖ ciphertext).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{ChaCha20Poly1305, Key, KeyInit, Nonce};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::UnseiError;

const NONCE_LEN: usize = 12;
const VERSION_PREFIX: &str = "v1:";

pub struct SecretBox {
    cipher: ChaCha20Poly1305,
}

impl SecretBox {
    pub fn new(secret: &str) -> SecretBox {
        let key: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        SecretBox {
            cipher: ChaCha20Poly1305::new(Key::from_slice(&key)),
        }
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<String, UnseiError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| UnseiError::Crypto(e.to_string()))?;
        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        Ok(format!("{VERSION_PREFIX}{}", BASE64.encode(combined)))
    }

    pub fn open(&self, sealed: &str) -> Result<Vec<u8>, UnseiError> {
        let encoded = sealed
            .strip_prefix(VERSION_PREFIX)
            .ok_or_else(|| UnseiError::Crypto("unknown ciphertext version".to_string()))?;
        let combined = BASE64
            .decode(encoded)
            .map_err(|e| UnseiError::Crypto(e.to_string()))?;
        if combined.len() < NONCE_LEN {
            return Err(UnseiError::Crypto("ciphertext too short".to_string()));
        }
        let (nonce, ciphertext) = combined.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| UnseiError::Crypto("authentication failed".to_string()))
    }
}
