use std::fmt;

// === GatewayError ===

/// Errors surfaced by the GitHub data gateway.
///
/// Transport and unclassified API failures deliberately display the same
/// generic message; only rate limits, not-found and parse failures are
/// classified for the user.
#[derive(Debug)]
pub enum GatewayError {
    /// HTTP 429, or 403 carrying a rate-limit body.
    RateLimited,
    /// HTTP 404: the user or repository does not exist.
    NotFound(String),
    /// Connectivity or timeout failure before a status was received.
    Network(String),
    /// Any other non-success HTTP status.
    Api(String),
    /// The response body could not be deserialized.
    Parse(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::RateLimited => {
                write!(f, "API rate limit exceeded. Please try again later.")
            }
            GatewayError::NotFound(what) => write!(f, "Not found: {}", what),
            GatewayError::Network(_) | GatewayError::Api(_) => write!(f, "An error occurred"),
            GatewayError::Parse(msg) => write!(f, "Response parse error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

// === CalendarError ===

/// Errors related to contribution calendar retrieval.
#[derive(Debug)]
pub enum CalendarError {
    /// No GraphQL bearer token is stored.
    MissingToken,
    /// Connectivity or timeout failure.
    Network(String),
    /// The GraphQL endpoint returned an error status or error payload.
    Api(String),
    /// The GraphQL response shape did not match the query.
    Parse(String),
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::MissingToken => {
                write!(f, "A GitHub access token is required for contribution data")
            }
            CalendarError::Network(_) => write!(f, "An error occurred"),
            CalendarError::Api(msg) => write!(f, "Contribution query failed: {}", msg),
            CalendarError::Parse(msg) => write!(f, "Contribution parse error: {}", msg),
        }
    }
}

impl std::error::Error for CalendarError {}

// === AssistantError ===

/// Errors related to the AI assistant gateway.
///
/// These surface in the chat transcript as message-level error bubbles,
/// never as a global app error.
#[derive(Debug)]
pub enum AssistantError {
    /// No completion API key has been stored.
    MissingApiKey,
    /// Connectivity or timeout failure reaching the completion endpoint.
    Network(String),
    /// The completion endpoint returned an error status.
    Provider(String),
    /// The completion payload could not be deserialized.
    Parse(String),
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantError::MissingApiKey => write!(f, "No assistant API key configured"),
            AssistantError::Network(msg) => write!(f, "Assistant network error: {}", msg),
            AssistantError::Provider(msg) => write!(f, "Assistant provider error: {}", msg),
            AssistantError::Parse(msg) => write!(f, "Assistant response parse error: {}", msg),
        }
    }
}

impl std::error::Error for AssistantError {}

// === FavoriteError ===

/// Errors related to the local favorites store.
#[derive(Debug)]
pub enum FavoriteError {
    /// Database operation failed.
    Database(String),
    /// A row field (e.g. the topics list) could not be encoded or decoded.
    Serialization(String),
}

impl fmt::Display for FavoriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FavoriteError::Database(msg) => write!(f, "Favorites database error: {}", msg),
            FavoriteError::Serialization(msg) => {
                write!(f, "Favorites serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for FavoriteError {}

// === CipherError ===

/// Errors related to sealing and opening stored secrets.
#[derive(Debug)]
pub enum CipherError {
    /// The provided key has the wrong length or is otherwise unusable.
    InvalidKey(String),
    /// Sealing (encryption) failed.
    Seal(String),
    /// Opening (decryption) failed; wrong key or corrupted data.
    Open(String),
    /// Random byte generation failed.
    Random(String),
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherError::InvalidKey(msg) => write!(f, "Invalid cipher key: {}", msg),
            CipherError::Seal(msg) => write!(f, "Seal failed: {}", msg),
            CipherError::Open(msg) => write!(f, "Open failed: {}", msg),
            CipherError::Random(msg) => write!(f, "Random generation failed: {}", msg),
        }
    }
}

impl std::error::Error for CipherError {}

// === CredentialError ===

/// Errors related to the encrypted credential vault.
#[derive(Debug)]
pub enum CredentialError {
    /// Sealing or opening the secret failed.
    Cipher(String),
    /// Database operation failed.
    Database(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Cipher(msg) => write!(f, "Credential cipher error: {}", msg),
            CredentialError::Database(msg) => write!(f, "Credential database error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing the settings file.
    Io(String),
    /// Failed to serialize or deserialize settings.
    Serialization(String),
    /// The provided settings key is not recognized.
    UnknownKey(String),
    /// The provided settings value has the wrong type or range.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::Serialization(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::UnknownKey(key) => write!(f, "Unknown settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}
