// Gitpulse services
// Services provide core functionality: remote data gateway, response cache,
// contribution calendars, AI assistant, favorites, credentials, settings.

pub mod assistant;
pub mod contribution_service;
pub mod credential_vault;
pub mod favorites_store;
pub mod github_gateway;
pub mod intent;
pub mod language_stats;
pub mod response_cache;
pub mod secret_cipher;
pub mod settings_engine;
