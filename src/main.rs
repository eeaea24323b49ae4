//! Gitpulse, a GitHub client core.
//!
//! Entry point: runs an interactive console demo of the offline components.
//! The UI integrates through the `gitpulse-rpc` binary instead.

use std::sync::Arc;

use gitpulse::database::connection::Database;
use gitpulse::database::migrations;
use gitpulse::managers::search_session::{SearchSession, DEBOUNCE_MS, PAGE_SIZE};
use gitpulse::services::assistant::{build_prompt, AssistantContext};
use gitpulse::services::contribution_service::intensity_level;
use gitpulse::services::credential_vault::{CredentialVault, CredentialVaultTrait};
use gitpulse::services::favorites_store::{FavoritesStore, FavoritesStoreTrait};
use gitpulse::services::intent::{detect_intent, Intent};
use gitpulse::services::language_stats::fallback_distribution;
use gitpulse::types::github::{RemoteRepository, RepositoryOwner};

fn main() {
    println!();
    println!("Gitpulse v{} (demo mode)", env!("CARGO_PKG_VERSION"));
    println!("GitHub client core: search, favorites, calendars, AI assistant");
    println!();

    demo_database();
    demo_favorites();
    demo_credential_vault();
    demo_intent_detection();
    demo_contribution_bucketing();
    demo_search_session();
    demo_prompt_builder();
    demo_language_stats();

    println!();
    println!("All offline components demonstrated. Network-backed screens run");
    println!("through the gitpulse-rpc binary.");
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────");
}

fn sample_repo(id: u64, name: &str, stars: u32) -> RemoteRepository {
    RemoteRepository {
        id,
        name: name.to_string(),
        full_name: format!("octocat/{}", name),
        owner: RepositoryOwner {
            id: 1,
            login: "octocat".to_string(),
            avatar_url: "https://avatars.githubusercontent.com/u/1".to_string(),
            owner_type: "User".to_string(),
        },
        description: Some("demo repository".to_string()),
        language: Some("Rust".to_string()),
        stargazers_count: stars,
        forks_count: stars / 4,
        watchers_count: stars,
        open_issues_count: 3,
        topics: vec!["demo".to_string()],
        visibility: Some("public".to_string()),
        archived: false,
        fork: false,
        created_at: Some("2024-01-01T00:00:00Z".to_string()),
        updated_at: Some("2026-08-01T00:00:00Z".to_string()),
    }
}

fn demo_database() {
    section("Database Layer");
    let db = Database::open_in_memory().expect("in-memory database");
    let version = migrations::get_schema_version(db.connection());
    println!("  schema version: {}", version);
}

fn demo_favorites() {
    section("Favorites Store");
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    let store = FavoritesStore::new(db);

    let repo = sample_repo(42, "demo-repo", 120);
    let now_favorite = store.toggle_repository(&repo).expect("toggle");
    println!("  toggled octocat/demo-repo → favorite = {}", now_favorite);

    let listed = store.list_repositories().expect("list");
    println!("  stored favorites: {}", listed.len());

    let now_favorite = store.toggle_repository(&repo).expect("toggle");
    println!("  toggled again → favorite = {}", now_favorite);
}

fn demo_credential_vault() {
    section("Credential Vault");
    let db = Arc::new(Database::open_in_memory().expect("in-memory database"));
    let vault = CredentialVault::new(db).expect("vault");

    vault.store_github_token("ghp_demo_token").expect("store");
    let token = vault.github_token().expect("get");
    println!("  stored and recovered token: {}", token.is_some());
}

fn demo_intent_detection() {
    section("Assistant Intent Rules");
    for message in [
        "show me facebook/react",
        "who is @torvalds",
        "find a good rust web framework",
        "hello there",
    ] {
        let intent = detect_intent(message);
        let label = match &intent {
            Some(Intent::Repository { owner, name }) => format!("repository {}/{}", owner, name),
            Some(Intent::User { login }) => format!("user @{}", login),
            Some(Intent::RepositorySearch { query }) => format!("repo search '{}'", query),
            Some(Intent::DeveloperSearch { query }) => format!("dev search '{}'", query),
            None => "no supplementary context".to_string(),
        };
        println!("  {:<35} → {}", format!("\"{}\"", message), label);
    }
}

fn demo_contribution_bucketing() {
    section("Contribution Intensity Buckets");
    for count in [0u32, 1, 3, 4, 6, 7, 9, 10, 42] {
        println!("  count {:>2} → level {}", count, intensity_level(count));
    }
}

fn demo_search_session() {
    section("Search Session (debounce + pagination)");
    let mut session: SearchSession<RemoteRepository> = SearchSession::new();

    session.input("ru", 0);
    println!("  after \"ru\": {:?}", session.phase());

    session.input("rust", 100);
    assert!(session.poll_due(100 + DEBOUNCE_MS - 1).is_none());
    let (query, generation) = session.poll_due(100 + DEBOUNCE_MS).expect("debounce elapsed");
    println!("  debounce fired for \"{}\"", query);

    let results: Vec<RemoteRepository> = (0..25)
        .map(|i| sample_repo(i, &format!("repo-{}", i), 10 * i as u32))
        .collect();
    session.apply_success(generation, results);
    println!(
        "  25 results → {} pages of {} (page {})",
        session.total_pages(),
        PAGE_SIZE,
        session.current_page()
    );

    session.next_page();
    session.next_page();
    session.next_page(); // clamped at the last page
    println!("  after three next_page calls: page {}", session.current_page());
}

fn demo_prompt_builder() {
    section("Assistant Prompt Builder");
    let repo = sample_repo(7, "gitpulse", 900);
    let prompt = build_prompt(
        Some(&AssistantContext::Repository(repo)),
        "what is this repo about?",
    );
    let preview: String = prompt.lines().take(2).collect::<Vec<_>>().join(" | ");
    println!("  prompt head: {}", preview);
    println!("  contains [DATA FOUND]: {}", prompt.contains("[DATA FOUND]"));
}

fn demo_language_stats() {
    section("Language Popularity (fallback distribution)");
    let shares = fallback_distribution();
    let total: f64 = shares.iter().map(|s| s.percent).sum();
    for share in shares.iter().take(3) {
        println!("  {:<12} {:>5.1}%", share.language, share.percent);
    }
    println!("  ... ({} languages, total {:.1}%)", shares.len(), total);
}
