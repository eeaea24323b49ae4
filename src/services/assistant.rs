//! AI assistant gateway for Gitpulse.
//!
//! Turns a free-text user message into a grounded, on-topic completion:
//! pattern-match the message (see [`crate::services::intent`]), optionally
//! fetch live GitHub data through the shared gateway, assemble a
//! system-prompted request and call the generative-language endpoint.
//! Each call is stateless from the endpoint's perspective: no multi-turn
//! history is sent even though the UI shows a running transcript.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::services::github_gateway::GitHubGateway;
use crate::services::intent::{rules, Intent};
use crate::types::chat::{LinkKind, MessageLink};
use crate::types::errors::AssistantError;
use crate::types::github::{RemoteRepository, RemoteUser};

/// Production generative-language endpoint base.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Fixed persona/instruction block prepended to every prompt.
pub const SYSTEM_PERSONA: &str = "You are the assistant inside a GitHub client app. \
You only answer questions about GitHub: repositories, developers, organizations, \
languages and open-source activity. Keep answers short and factual. \
When a [DATA FOUND] block is present, ground your answer in it and do not invent numbers.";

/// Fixed decline template for off-topic questions.
///
/// The guard is prompt-level only; the model is instructed to reply with
/// this template, nothing client-side enforces it.
pub const OFF_TOPIC_DECLINE: &str = "I can only help with GitHub topics such as \
repositories, developers and open source projects. Please ask me something GitHub related.";

/// Substituted when the completion contains no usable text part.
pub const FALLBACK_APOLOGY: &str = "Sorry, I couldn't come up with a response. \
Please try rephrasing your question.";

/// How many list items are serialized into the prompt and linked in the UI.
const CONTEXT_LIST_LIMIT: usize = 5;

/// Live GitHub data resolved for one chat message.
#[derive(Debug, Clone)]
pub enum AssistantContext {
    Repository(RemoteRepository),
    User(RemoteUser),
    Repositories(Vec<RemoteRepository>),
    Developers(Vec<RemoteUser>),
}

/// A finished assistant turn: the completion text plus navigation metadata.
#[derive(Debug, Clone)]
pub struct AssistantReply {
    pub text: String,
    pub links: Vec<MessageLink>,
}

// Wire shapes for the generateContent response.

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Assembles the full prompt: persona block, optional data block, raw
/// user message. Exposed for tests.
pub fn build_prompt(context: Option<&AssistantContext>, message: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(SYSTEM_PERSONA);
    prompt.push_str("\nIf the question is not about GitHub, reply exactly with: \"");
    prompt.push_str(OFF_TOPIC_DECLINE);
    prompt.push_str("\"\n");

    if let Some(ctx) = context {
        prompt.push_str("\n[DATA FOUND]\n");
        prompt.push_str(&serialize_context(ctx));
        prompt.push('\n');
    }

    prompt.push_str("\nUser message: ");
    prompt.push_str(message);
    prompt
}

fn serialize_repository(repo: &RemoteRepository) -> String {
    format!(
        "{} — {} | language: {} | stars: {} | forks: {} | open issues: {}",
        repo.full_name,
        repo.description.as_deref().unwrap_or("no description"),
        repo.language.as_deref().unwrap_or("unknown"),
        repo.stargazers_count,
        repo.forks_count,
        repo.open_issues_count,
    )
}

fn serialize_user(user: &RemoteUser) -> String {
    format!(
        "@{} | {} | location: {} | public repos: {} | followers: {}",
        user.login,
        user.bio.as_deref().unwrap_or("no bio"),
        user.location.as_deref().unwrap_or("unknown"),
        user.public_repos,
        user.followers,
    )
}

fn serialize_context(context: &AssistantContext) -> String {
    match context {
        AssistantContext::Repository(repo) => serialize_repository(repo),
        AssistantContext::User(user) => serialize_user(user),
        AssistantContext::Repositories(repos) => repos
            .iter()
            .map(serialize_repository)
            .collect::<Vec<_>>()
            .join("\n"),
        AssistantContext::Developers(users) => users
            .iter()
            .map(serialize_user)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Builds tap-through navigation records for a resolved context.
///
/// This is metadata alongside the completion text, never derived from it.
pub fn links_for_context(context: &AssistantContext) -> Vec<MessageLink> {
    match context {
        AssistantContext::Repository(repo) => vec![MessageLink {
            label: repo.full_name.clone(),
            target: repo.full_name.clone(),
            kind: LinkKind::Repository,
        }],
        AssistantContext::User(user) => vec![MessageLink {
            label: format!("@{}", user.login),
            target: user.login.clone(),
            kind: LinkKind::User,
        }],
        AssistantContext::Repositories(repos) => repos
            .iter()
            .map(|repo| MessageLink {
                label: repo.full_name.clone(),
                target: repo.full_name.clone(),
                kind: LinkKind::Repository,
            })
            .collect(),
        AssistantContext::Developers(users) => users
            .iter()
            .map(|user| MessageLink {
                label: format!("@{}", user.login),
                target: user.login.clone(),
                kind: LinkKind::User,
            })
            .collect(),
    }
}

/// Gateway to the generative-language completion endpoint.
pub struct AssistantGateway {
    http: reqwest::Client,
    base_url: String,
    github: Arc<GitHubGateway>,
}

impl AssistantGateway {
    pub fn new(github: Arc<GitHubGateway>) -> Self {
        Self::with_base_url(github, GEMINI_API_BASE)
    }

    /// Gateway against an arbitrary completion endpoint (tests).
    pub fn with_base_url(github: Arc<GitHubGateway>, base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            github,
        }
    }

    /// Resolves supplementary GitHub context for `message`.
    ///
    /// Rules run in table order; a rule whose fetch fails (user deleted,
    /// rate limited, offline) falls through to the next one rather than
    /// aborting the chat turn.
    pub async fn resolve_context(&self, message: &str) -> Option<AssistantContext> {
        for rule in rules() {
            let Some(intent) = rule.apply(message) else {
                continue;
            };
            debug!(rule = rule.name, "intent rule matched");
            match intent {
                Intent::Repository { owner, name } => {
                    if let Ok(repo) = self.github.get_repository(&owner, &name).await {
                        return Some(AssistantContext::Repository(repo));
                    }
                }
                Intent::User { login } => {
                    if let Ok(user) = self.github.get_user_details(&login).await {
                        return Some(AssistantContext::User(user));
                    }
                }
                Intent::RepositorySearch { query } => {
                    if let Ok(mut repos) = self.github.search_repositories(&query).await {
                        if !repos.is_empty() {
                            repos.truncate(CONTEXT_LIST_LIMIT);
                            return Some(AssistantContext::Repositories(repos));
                        }
                    }
                }
                Intent::DeveloperSearch { query } => {
                    if let Ok(mut users) = self.github.search_users(&query).await {
                        if !users.is_empty() {
                            users.truncate(CONTEXT_LIST_LIMIT);
                            return Some(AssistantContext::Developers(users));
                        }
                    }
                }
            }
        }
        None
    }

    /// Full assistant turn: resolve context, assemble the prompt, call the
    /// completion endpoint and extract the reply text.
    pub async fn send_message(
        &self,
        api_key: &str,
        model: &str,
        message: &str,
    ) -> Result<AssistantReply, AssistantError> {
        if api_key.is_empty() {
            return Err(AssistantError::MissingApiKey);
        }

        let context = self.resolve_context(message).await;
        let prompt = build_prompt(context.as_ref(), message);
        let response = self.complete(api_key, model, &prompt).await?;

        let text = extract_text(&response).unwrap_or_else(|| FALLBACK_APOLOGY.to_string());
        let links = context.as_ref().map(links_for_context).unwrap_or_default();

        Ok(AssistantReply { text, links })
    }

    async fn complete(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, AssistantError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );
        let body = serde_json::json!({
            "contents": [ { "parts": [ { "text": prompt } ] } ],
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Provider(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| AssistantError::Parse(e.to_string()))
    }
}

/// First non-blank text part of the first candidate, if any.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
