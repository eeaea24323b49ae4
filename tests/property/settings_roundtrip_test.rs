//! Property-based tests for settings persistence.
//!
//! Any settings value written through the engine survives a save/load
//! roundtrip through the JSON file unchanged.

use proptest::prelude::*;
use tempfile::TempDir;

use gitpulse::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use gitpulse::types::settings::{AppSettings, ThemeMode};

fn arb_model() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{3,24}"
}

fn arb_theme() -> impl Strategy<Value = ThemeMode> {
    prop_oneof![
        Just(ThemeMode::Dark),
        Just(ThemeMode::Light),
        Just(ThemeMode::System),
    ]
}

fn arb_settings() -> impl Strategy<Value = AppSettings> {
    (arb_model(), 1u32..100, 1u32..30, arb_theme(), "[a-z]{2}").prop_map(
        |(model, per_page, window, theme, language)| {
            let mut settings = AppSettings::default();
            settings.assistant.model = model;
            settings.github.per_page = per_page;
            settings.github.trending_window_days = window;
            settings.display.theme = theme;
            settings.display.language = language;
            settings
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn settings_survive_save_load_roundtrip(settings in arb_settings()) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.json").to_string_lossy().to_string();

        let mut engine = SettingsEngine::new(Some(path.clone()));
        engine.load().unwrap();
        engine
            .set_value("assistant.model", serde_json::json!(settings.assistant.model.clone()))
            .unwrap();
        engine
            .set_value("github.per_page", serde_json::json!(settings.github.per_page))
            .unwrap();
        engine
            .set_value(
                "github.trending_window_days",
                serde_json::json!(settings.github.trending_window_days),
            )
            .unwrap();
        engine
            .set_value("display.theme", serde_json::to_value(&settings.display.theme).unwrap())
            .unwrap();
        engine
            .set_value("display.language", serde_json::json!(settings.display.language.clone()))
            .unwrap();

        let mut reloaded = SettingsEngine::new(Some(path));
        let loaded = reloaded.load().unwrap();
        prop_assert_eq!(loaded, settings);
    }
}
