//! Encrypted credential storage for Gitpulse.
//!
//! Holds the GitHub GraphQL bearer token and the assistant API key sealed
//! at rest in the `credentials` table. The sealing key is derived once per
//! vault from a fixed install passphrase.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use zeroize::Zeroize;

use crate::database::connection::Database;
use crate::services::secret_cipher::{SecretCipher, SecretCipherTrait};
use crate::types::credential::SealedSecret;
use crate::types::errors::{CipherError, CredentialError};

const VAULT_PASSPHRASE: &str = "gitpulse-vault-v1";
const VAULT_SALT: &[u8] = b"gitpulse-crdntls";

/// Credential id for the GitHub GraphQL bearer token.
pub const GITHUB_TOKEN_ID: &str = "github_graphql_token";

/// Credential id for the generative-language API key.
pub const ASSISTANT_KEY_ID: &str = "assistant_api_key";

/// Trait defining credential vault operations.
pub trait CredentialVaultTrait {
    fn store_secret(&self, id: &str, value: &str) -> Result<(), CredentialError>;
    fn get_secret(&self, id: &str) -> Result<Option<String>, CredentialError>;
    fn delete_secret(&self, id: &str) -> Result<(), CredentialError>;

    fn store_github_token(&self, token: &str) -> Result<(), CredentialError>;
    fn github_token(&self) -> Result<Option<String>, CredentialError>;
    fn store_assistant_key(&self, key: &str) -> Result<(), CredentialError>;
    fn assistant_key(&self) -> Result<Option<String>, CredentialError>;
}

/// Vault backed by SQLite + [`SecretCipher`].
pub struct CredentialVault {
    db: Arc<Database>,
    cipher: SecretCipher,
    key: Vec<u8>,
}

impl CredentialVault {
    pub fn new(db: Arc<Database>) -> Result<Self, CipherError> {
        let cipher = SecretCipher::new();
        let key = cipher.derive_key(VAULT_PASSPHRASE, VAULT_SALT)?;
        Ok(Self { db, cipher, key })
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl Drop for CredentialVault {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl CredentialVaultTrait for CredentialVault {
    fn store_secret(&self, id: &str, value: &str) -> Result<(), CredentialError> {
        let sealed = self
            .cipher
            .seal(value.as_bytes(), &self.key)
            .map_err(|e| CredentialError::Cipher(e.to_string()))?;
        let now = Self::now();

        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO credentials \
                 (id, ciphertext, nonce, auth_tag, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, sealed.ciphertext, sealed.nonce, sealed.auth_tag, now, now],
            )
            .map_err(|e| CredentialError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_secret(&self, id: &str) -> Result<Option<String>, CredentialError> {
        let conn = self.db.connection();
        let result = conn.query_row(
            "SELECT ciphertext, nonce, auth_tag FROM credentials WHERE id = ?1",
            params![id],
            |row| {
                Ok(SealedSecret {
                    ciphertext: row.get(0)?,
                    nonce: row.get(1)?,
                    auth_tag: row.get(2)?,
                })
            },
        );

        match result {
            Ok(sealed) => {
                let opened = self
                    .cipher
                    .open(&sealed, &self.key)
                    .map_err(|e| CredentialError::Cipher(e.to_string()))?;
                let value = String::from_utf8(opened)
                    .map_err(|e| CredentialError::Cipher(e.to_string()))?;
                Ok(Some(value))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CredentialError::Database(e.to_string())),
        }
    }

    fn delete_secret(&self, id: &str) -> Result<(), CredentialError> {
        self.db
            .connection()
            .execute("DELETE FROM credentials WHERE id = ?1", params![id])
            .map_err(|e| CredentialError::Database(e.to_string()))?;
        Ok(())
    }

    fn store_github_token(&self, token: &str) -> Result<(), CredentialError> {
        self.store_secret(GITHUB_TOKEN_ID, token)
    }

    fn github_token(&self) -> Result<Option<String>, CredentialError> {
        self.get_secret(GITHUB_TOKEN_ID)
    }

    fn store_assistant_key(&self, key: &str) -> Result<(), CredentialError> {
        self.store_secret(ASSISTANT_KEY_ID, key)
    }

    fn assistant_key(&self) -> Result<Option<String>, CredentialError> {
        self.get_secret(ASSISTANT_KEY_ID)
    }
}
