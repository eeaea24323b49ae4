//! AES-256-GCM sealing for credentials stored at rest.
//!
//! One-shot seal/open over `ring`'s `LessSafeKey`. Each operation uses a
//! fresh random nonce, so single-use nonce safety holds without a nonce
//! sequence. Key material is derived from a passphrase with PBKDF2.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;
use zeroize::Zeroize;

use crate::types::credential::SealedSecret;
use crate::types::errors::CipherError;

/// PBKDF2 iteration count for key derivation.
const PBKDF2_ITERATIONS: u32 = 120_000;

/// AES-256-GCM key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-256-GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;

/// Trait defining the sealing operations used by the credential vault.
pub trait SecretCipherTrait {
    /// Derives a 32-byte key from a passphrase and salt using PBKDF2.
    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> Result<Vec<u8>, CipherError>;

    /// Seals plaintext under `key`, returning ciphertext, nonce and tag.
    fn seal(&self, plaintext: &[u8], key: &[u8]) -> Result<SealedSecret, CipherError>;

    /// Opens a sealed secret under `key`.
    fn open(&self, sealed: &SealedSecret, key: &[u8]) -> Result<Vec<u8>, CipherError>;

    /// Overwrites sensitive bytes with zeros.
    fn wipe(&self, data: &mut [u8]);
}

/// Cipher implementation backed by `ring`.
pub struct SecretCipher {
    rng: SystemRandom,
}

impl SecretCipher {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    fn aead_key(key: &[u8]) -> Result<LessSafeKey, CipherError> {
        if key.len() != KEY_LEN {
            return Err(CipherError::InvalidKey(format!(
                "key must be {} bytes, got {}",
                KEY_LEN,
                key.len()
            )));
        }
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| CipherError::InvalidKey("unusable key material".to_string()))?;
        Ok(LessSafeKey::new(unbound))
    }
}

impl Default for SecretCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretCipherTrait for SecretCipher {
    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> Result<Vec<u8>, CipherError> {
        let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
            .ok_or_else(|| CipherError::InvalidKey("zero iteration count".to_string()))?;

        let mut key = vec![0u8; KEY_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            salt,
            passphrase.as_bytes(),
            &mut key,
        );
        Ok(key)
    }

    fn seal(&self, plaintext: &[u8], key: &[u8]) -> Result<SealedSecret, CipherError> {
        let aead = Self::aead_key(key)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CipherError::Random("nonce generation failed".to_string()))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut buffer = plaintext.to_vec();
        let tag = aead
            .seal_in_place_separate_tag(nonce, Aad::empty(), &mut buffer)
            .map_err(|_| CipherError::Seal("seal operation failed".to_string()))?;

        Ok(SealedSecret {
            ciphertext: buffer,
            nonce: nonce_bytes.to_vec(),
            auth_tag: tag.as_ref().to_vec(),
        })
    }

    fn open(&self, sealed: &SealedSecret, key: &[u8]) -> Result<Vec<u8>, CipherError> {
        let aead = Self::aead_key(key)?;

        if sealed.nonce.len() != NONCE_LEN {
            return Err(CipherError::Open(format!(
                "nonce must be {} bytes, got {}",
                NONCE_LEN,
                sealed.nonce.len()
            )));
        }
        if sealed.auth_tag.len() != TAG_LEN {
            return Err(CipherError::Open(format!(
                "tag must be {} bytes, got {}",
                TAG_LEN,
                sealed.auth_tag.len()
            )));
        }

        let nonce = Nonce::try_assume_unique_for_key(&sealed.nonce)
            .map_err(|_| CipherError::Open("bad nonce".to_string()))?;

        // ring expects ciphertext and tag concatenated.
        let mut buffer = Vec::with_capacity(sealed.ciphertext.len() + sealed.auth_tag.len());
        buffer.extend_from_slice(&sealed.ciphertext);
        buffer.extend_from_slice(&sealed.auth_tag);

        let plaintext = aead
            .open_in_place(nonce, Aad::empty(), &mut buffer)
            .map_err(|_| CipherError::Open("wrong key or corrupted data".to_string()))?;

        Ok(plaintext.to_vec())
    }

    fn wipe(&self, data: &mut [u8]) {
        data.zeroize();
    }
}
