//! Password-based authenticated encryption for stegdetect.
//!
//! This module provides the encryption envelope applied to compressed secrets:
//! - PBKDF2-HMAC-SHA256 (100,000 rounds) for key derivation from a password
//! - AES-256-GCM for authenticated encryption
//!
//! Envelope layout: salt (16 bytes) || nonce (12 bytes) || ciphertext || tag (16 bytes)

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

/// PBKDF2 iteration count.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Salt size in bytes.
pub const SALT_SIZE: usize = 16;

/// Nonce size for AES-256-GCM.
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size for AES-256-GCM.
pub const TAG_SIZE: usize = 16;

/// Derived key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Errors that can occur in the encryption envelope.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed: wrong password or tampered data")]
    AuthenticationFailed,

    #[error("Encrypted payload too short: {0} bytes")]
    EnvelopeTooShort(usize),
}

/// Derives the 256-bit envelope key from a password and salt
/// (PBKDF2-HMAC-SHA256, [`PBKDF2_ROUNDS`] iterations).
pub fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_SIZE]> {
    stretch(password, salt, PBKDF2_ROUNDS)
}

fn stretch(password: &str, salt: &[u8], rounds: u32) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut *key);
    key
}

/// Encrypts data with a password.
///
/// A fresh salt and nonce are drawn from `rng` on every call.
pub fn encrypt<R>(plaintext: &[u8], password: &str, rng: &mut R) -> Result<Vec<u8>, CryptoError>
where
    R: RngCore + CryptoRng,
{
    let mut salt = [0u8; SALT_SIZE];
    rng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt);
    let cipher = Aes256Gcm::new_from_slice(&*key)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut envelope = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);

    Ok(envelope)
}

/// Decrypts an envelope produced by [`encrypt`].
pub fn decrypt(envelope: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    if envelope.len() < SALT_SIZE + NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::EnvelopeTooShort(envelope.len()));
    }

    let (salt, rest) = envelope.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = derive_key(password, salt);
    let cipher =
        Aes256Gcm::new_from_slice(&*key).map_err(|_| CryptoError::AuthenticationFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}
