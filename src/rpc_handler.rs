//! RPC method handler for the Gitpulse JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! appropriate services and managers via the `App` struct. This is the
//! seam the presentation layer talks through.

use serde_json::{json, Value};

use crate::app::App;
use crate::services::credential_vault::CredentialVaultTrait;
use crate::services::favorites_store::FavoritesStoreTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::errors::CalendarError;
use crate::types::github::{RemoteRepository, RemoteUser};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Serializes the repository search screen state, annotating each visible
/// item with its favorite flag recomputed from the store.
fn repo_search_state(app: &App) -> Result<Value, String> {
    let favorite_ids: Vec<u64> = app
        .favorites
        .list_repositories()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|f| f.id)
        .collect();

    let items: Vec<Value> = app
        .repo_search
        .page_items()
        .iter()
        .map(|repo| {
            let mut value = serde_json::to_value(repo).unwrap_or(Value::Null);
            if let Value::Object(map) = &mut value {
                map.insert(
                    "is_favorite".to_string(),
                    json!(favorite_ids.contains(&repo.id)),
                );
            }
            value
        })
        .collect();

    Ok(json!({
        "phase": serde_json::to_value(app.repo_search.phase()).map_err(|e| e.to_string())?,
        "current_page": app.repo_search.current_page(),
        "total_pages": app.repo_search.total_pages(),
        "items": items,
    }))
}

/// Serializes the user search screen state with favorite flags.
fn user_search_state(app: &App) -> Result<Value, String> {
    let favorite_ids: Vec<u64> = app
        .favorites
        .list_users()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|f| f.id)
        .collect();

    let items: Vec<Value> = app
        .user_search
        .page_items()
        .iter()
        .map(|user| {
            let mut value = serde_json::to_value(user).unwrap_or(Value::Null);
            if let Value::Object(map) = &mut value {
                map.insert(
                    "is_favorite".to_string(),
                    json!(favorite_ids.contains(&user.id)),
                );
            }
            value
        })
        .collect();

    Ok(json!({
        "phase": serde_json::to_value(app.user_search.phase()).map_err(|e| e.to_string())?,
        "current_page": app.user_search.current_page(),
        "total_pages": app.user_search.total_pages(),
        "items": items,
    }))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Repository search screen ───
        "repo_search.input" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            app.repo_search.input(query, now_ms());
            repo_search_state(app)
        }
        "repo_search.tick" => {
            let fetched = app.repo_search.tick(now_ms()).await;
            let mut state = repo_search_state(app)?;
            if let Value::Object(map) = &mut state {
                map.insert("fetched".to_string(), json!(fetched));
            }
            Ok(state)
        }
        "repo_search.state" => repo_search_state(app),
        "repo_search.next_page" => {
            app.repo_search.next_page();
            repo_search_state(app)
        }
        "repo_search.previous_page" => {
            app.repo_search.previous_page();
            repo_search_state(app)
        }

        // ─── User search screen ───
        "user_search.input" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            app.user_search.input(query, now_ms());
            user_search_state(app)
        }
        "user_search.tick" => {
            let fetched = app.user_search.tick(now_ms()).await;
            let mut state = user_search_state(app)?;
            if let Value::Object(map) = &mut state {
                map.insert("fetched".to_string(), json!(fetched));
            }
            Ok(state)
        }
        "user_search.state" => user_search_state(app),
        "user_search.next_page" => {
            app.user_search.next_page();
            user_search_state(app)
        }
        "user_search.previous_page" => {
            app.user_search.previous_page();
            user_search_state(app)
        }

        // ─── Direct gateway lookups (profile and repo screens) ───
        "gateway.user" => {
            let username = params.get("username").and_then(|v| v.as_str()).ok_or("missing username")?;
            let user = app.gateway.get_user_details(username).await.map_err(|e| e.to_string())?;
            serde_json::to_value(user).map_err(|e| e.to_string())
        }
        "gateway.user_repos" => {
            let username = params.get("username").and_then(|v| v.as_str()).ok_or("missing username")?;
            let repos = app.gateway.get_user_repositories(username).await.map_err(|e| e.to_string())?;
            serde_json::to_value(repos).map_err(|e| e.to_string())
        }
        "gateway.repo" => {
            let owner = params.get("owner").and_then(|v| v.as_str()).ok_or("missing owner")?;
            let name = params.get("name").and_then(|v| v.as_str()).ok_or("missing name")?;
            let repo = app.gateway.get_repository(owner, name).await.map_err(|e| e.to_string())?;
            serde_json::to_value(repo).map_err(|e| e.to_string())
        }
        "gateway.trending" => {
            let window = app.settings_engine.get_settings().github.trending_window_days;
            let repos = app.gateway.get_trending_repositories(window).await.map_err(|e| e.to_string())?;
            serde_json::to_value(repos).map_err(|e| e.to_string())
        }

        // ─── Contribution calendar ───
        "calendar.fetch" => {
            let login = params.get("login").and_then(|v| v.as_str()).ok_or("missing login")?;
            let token = app
                .vault
                .github_token()
                .map_err(|e| e.to_string())?
                .ok_or_else(|| CalendarError::MissingToken.to_string())?;
            let calendar = app
                .contribution_service
                .fetch_calendar(login, &token)
                .await
                .map_err(|e| e.to_string())?;
            serde_json::to_value(calendar).map_err(|e| e.to_string())
        }

        // ─── Favorites ───
        "favorites.toggle_repo" => {
            let repo: RemoteRepository = serde_json::from_value(
                params.get("repo").cloned().ok_or("missing repo")?,
            )
            .map_err(|e| format!("invalid repo: {}", e))?;
            let favorited = app.favorites.toggle_repository(&repo).map_err(|e| e.to_string())?;
            Ok(json!({"is_favorite": favorited}))
        }
        "favorites.toggle_user" => {
            let user: RemoteUser = serde_json::from_value(
                params.get("user").cloned().ok_or("missing user")?,
            )
            .map_err(|e| format!("invalid user: {}", e))?;
            let favorited = app.favorites.toggle_user(&user).map_err(|e| e.to_string())?;
            Ok(json!({"is_favorite": favorited}))
        }
        "favorites.list_repos" => {
            let favorites = app.favorites.list_repositories().map_err(|e| e.to_string())?;
            serde_json::to_value(favorites).map_err(|e| e.to_string())
        }
        "favorites.list_users" => {
            let favorites = app.favorites.list_users().map_err(|e| e.to_string())?;
            serde_json::to_value(favorites).map_err(|e| e.to_string())
        }
        "favorites.revision" => {
            let revision = *app.favorites.subscribe().borrow();
            Ok(json!({"revision": revision}))
        }

        // ─── Chat ───
        "chat.send" => {
            let text = params.get("text").and_then(|v| v.as_str()).ok_or("missing text")?;
            let api_key = app
                .vault
                .assistant_key()
                .map_err(|e| e.to_string())?
                .unwrap_or_default();
            let model = app.settings_engine.get_settings().assistant.model.clone();
            let reply = app.chat.send(text, &app.assistant, &api_key, &model).await;
            serde_json::to_value(reply).map_err(|e| e.to_string())
        }
        "chat.transcript" => {
            serde_json::to_value(app.chat.transcript()).map_err(|e| e.to_string())
        }
        "chat.clear" => {
            app.chat.clear();
            Ok(json!({"ok": true}))
        }

        // ─── Credentials ───
        "credentials.store_github_token" => {
            let token = params.get("token").and_then(|v| v.as_str()).ok_or("missing token")?;
            app.vault.store_github_token(token).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "credentials.store_assistant_key" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            app.vault.store_assistant_key(key).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "credentials.delete" => {
            let id = params.get("id").and_then(|v| v.as_str()).ok_or("missing id")?;
            app.vault.delete_secret(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "credentials.status" => {
            let github = app.vault.github_token().map_err(|e| e.to_string())?.is_some();
            let assistant = app.vault.assistant_key().map_err(|e| e.to_string())?.is_some();
            Ok(json!({"github_token": github, "assistant_key": assistant}))
        }

        // ─── Settings ───
        "settings.get" => {
            let settings = app.settings_engine.get_settings();
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            app.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Statistics ───
        "stats.languages" => {
            let shares = app.language_stats.popularity().await;
            serde_json::to_value(shares).map_err(|e| e.to_string())
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
