use serde::{Deserialize, Serialize};

/// Top-level application settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    pub github: GitHubSettings,
    pub assistant: AssistantSettings,
    pub display: DisplaySettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            github: GitHubSettings::default(),
            assistant: AssistantSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

/// GitHub data fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubSettings {
    /// Results requested per search call.
    pub per_page: u32,
    /// How far back the trending query looks, in days.
    pub trending_window_days: u32,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            per_page: 30,
            trending_window_days: 7,
        }
    }
}

/// AI assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantSettings {
    /// Generative-language model identifier used for completions.
    pub model: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// Display preferences forwarded to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    pub theme: ThemeMode,
    pub language: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            language: "en".to_string(),
        }
    }
}

/// Theme mode selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ThemeMode {
    Dark,
    Light,
    System,
}
