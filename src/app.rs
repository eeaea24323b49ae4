//! App Core for Gitpulse.
//!
//! Central struct holding the database, services and per-screen managers,
//! managing application lifecycle.

use std::sync::Arc;

use crate::database::connection::Database;
use crate::managers::chat_manager::ChatManager;
use crate::managers::repo_search_manager::RepositorySearchManager;
use crate::managers::user_search_manager::UserSearchManager;
use crate::services::assistant::AssistantGateway;
use crate::services::contribution_service::ContributionService;
use crate::services::credential_vault::CredentialVault;
use crate::services::favorites_store::FavoritesStore;
use crate::services::github_gateway::GitHubGateway;
use crate::services::language_stats::LanguageStatsService;
use crate::services::settings_engine::SettingsEngine;

/// Central application struct holding all services and managers.
///
/// The GitHub gateway is shared (`Arc`) between both search managers, the
/// assistant and the statistics service, so they all see one response
/// cache.
pub struct App {
    pub db: Arc<Database>,
    pub gateway: Arc<GitHubGateway>,
    pub contribution_service: ContributionService,
    pub assistant: AssistantGateway,
    pub favorites: FavoritesStore,
    pub vault: CredentialVault,
    pub settings_engine: SettingsEngine,
    pub language_stats: LanguageStatsService,
    pub repo_search: RepositorySearchManager,
    pub user_search: UserSearchManager,
    pub chat: ChatManager,
}

impl App {
    /// Creates a new App, initializing all services and managers.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        let gateway = Arc::new(GitHubGateway::new());

        let favorites = FavoritesStore::new(db.clone());
        let vault = CredentialVault::new(db.clone())
            .map_err(|e| format!("CredentialVault init failed: {}", e))?;
        let assistant = AssistantGateway::new(gateway.clone());
        let contribution_service = ContributionService::new();
        let language_stats = LanguageStatsService::new(gateway.clone());
        let repo_search = RepositorySearchManager::new(gateway.clone());
        let user_search = UserSearchManager::new(gateway.clone());
        let chat = ChatManager::new();
        let settings_engine = SettingsEngine::new(None);

        Ok(Self {
            db,
            gateway,
            contribution_service,
            assistant,
            favorites,
            vault,
            settings_engine,
            language_stats,
            repo_search,
            user_search,
            chat,
        })
    }

    /// Startup sequence: load persisted settings.
    pub fn startup(&mut self) {
        use crate::services::settings_engine::SettingsEngineTrait;
        let _ = self.settings_engine.load();
    }
}
