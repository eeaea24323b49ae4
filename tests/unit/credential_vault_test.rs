//! Unit tests for the encrypted credential vault.

use std::sync::Arc;

use gitpulse::database::Database;
use gitpulse::services::credential_vault::{
    CredentialVault, CredentialVaultTrait, ASSISTANT_KEY_ID, GITHUB_TOKEN_ID,
};

fn setup() -> CredentialVault {
    let db = Arc::new(Database::open_in_memory().unwrap());
    CredentialVault::new(db).unwrap()
}

#[test]
fn test_store_and_get_github_token() {
    let vault = setup();
    vault.store_github_token("gho_abc123").unwrap();
    assert_eq!(vault.github_token().unwrap(), Some("gho_abc123".to_string()));
}

#[test]
fn test_get_when_nothing_stored() {
    let vault = setup();
    assert_eq!(vault.github_token().unwrap(), None);
    assert_eq!(vault.assistant_key().unwrap(), None);
}

#[test]
fn test_store_overwrites_previous_value() {
    let vault = setup();
    vault.store_assistant_key("key-one").unwrap();
    vault.store_assistant_key("key-two").unwrap();
    assert_eq!(vault.assistant_key().unwrap(), Some("key-two".to_string()));
}

#[test]
fn test_secrets_are_isolated_by_id() {
    let vault = setup();
    vault.store_github_token("gho_token").unwrap();
    vault.store_assistant_key("ai-key").unwrap();

    assert_eq!(vault.get_secret(GITHUB_TOKEN_ID).unwrap(), Some("gho_token".to_string()));
    assert_eq!(vault.get_secret(ASSISTANT_KEY_ID).unwrap(), Some("ai-key".to_string()));
}

#[test]
fn test_delete_secret() {
    let vault = setup();
    vault.store_github_token("gho_token").unwrap();
    vault.delete_secret(GITHUB_TOKEN_ID).unwrap();
    assert_eq!(vault.github_token().unwrap(), None);
}

#[test]
fn test_delete_missing_secret_is_noop() {
    let vault = setup();
    vault.delete_secret("never_stored").unwrap();
}

#[test]
fn test_values_are_encrypted_at_rest() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let vault = CredentialVault::new(db.clone()).unwrap();
    vault.store_github_token("gho_plaintext_token").unwrap();

    let ciphertext: Vec<u8> = db
        .connection()
        .query_row(
            "SELECT ciphertext FROM credentials WHERE id = ?1",
            rusqlite::params![GITHUB_TOKEN_ID],
            |row| row.get(0),
        )
        .unwrap();

    assert_ne!(ciphertext, b"gho_plaintext_token".to_vec());
}

#[test]
fn test_second_vault_on_same_database_reads_secret() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let vault_a = CredentialVault::new(db.clone()).unwrap();
    vault_a.store_github_token("gho_shared").unwrap();

    let vault_b = CredentialVault::new(db).unwrap();
    assert_eq!(vault_b.github_token().unwrap(), Some("gho_shared".to_string()));
}
