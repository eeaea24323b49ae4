//! Intent and entity extraction for the AI assistant.
//!
//! A free-text chat message is matched against an ordered list of
//! (predicate, handler) rules. First match wins, and the order is load
//! bearing: an explicit `owner/repo` reference must beat a keyword-based
//! search fallback.

use std::sync::OnceLock;

use regex::Regex;

/// What a chat message is asking for, as far as pattern matching can tell.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// An explicit `owner/repo` reference.
    Repository { owner: String, name: String },
    /// An explicit `@username` mention.
    User { login: String },
    /// Repository-flavored keywords; `query` is the stopword-stripped rest.
    RepositorySearch { query: String },
    /// Developer-flavored keywords; `query` is the stopword-stripped rest.
    DeveloperSearch { query: String },
}

/// One entry in the ordered rule table.
pub struct IntentRule {
    pub name: &'static str,
    matcher: fn(&str) -> Option<Intent>,
}

impl IntentRule {
    pub fn apply(&self, message: &str) -> Option<Intent> {
        (self.matcher)(message)
    }
}

/// Keywords that flag a repository-flavored request.
const REPO_KEYWORDS: [&str; 8] = [
    "repo",
    "repositor",
    "project",
    "find",
    "search",
    "trending",
    "library",
    "framework",
];

/// Keywords that flag a developer-flavored request.
const DEV_KEYWORDS: [&str; 6] = [
    "developer",
    "who is",
    "contributor",
    "maintainer",
    "engineer",
    "programmer",
];

/// Filler words stripped before a keyword-derived search query is built.
const STOPWORDS: [&str; 30] = [
    "a", "an", "the", "show", "me", "find", "search", "for", "repo", "repos", "repository",
    "repositories", "project", "projects", "trending", "library", "libraries", "about", "on",
    "in", "of", "is", "who", "what", "developer", "developers", "please", "some", "good", "best",
];

fn owner_repo_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)/([A-Za-z0-9_.-]+)").unwrap()
    })
}

fn mention_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Za-z0-9](?:[A-Za-z0-9-]{0,38})?)").unwrap())
}

fn match_owner_repo(message: &str) -> Option<Intent> {
    let caps = owner_repo_pattern().captures(message)?;
    Some(Intent::Repository {
        owner: caps[1].to_string(),
        name: caps[2].trim_end_matches('.').to_string(),
    })
}

fn match_mention(message: &str) -> Option<Intent> {
    let caps = mention_pattern().captures(message)?;
    Some(Intent::User {
        login: caps[1].to_string(),
    })
}

fn match_repo_keywords(message: &str) -> Option<Intent> {
    let lower = message.to_lowercase();
    if !REPO_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return None;
    }
    let query = strip_stopwords(message);
    if query.len() > 2 {
        Some(Intent::RepositorySearch { query })
    } else {
        None
    }
}

fn match_dev_keywords(message: &str) -> Option<Intent> {
    let lower = message.to_lowercase();
    if !DEV_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return None;
    }
    let query = strip_stopwords(message);
    if query.len() > 2 {
        Some(Intent::DeveloperSearch { query })
    } else {
        None
    }
}

/// The ordered rule table. First match wins.
static RULES: [IntentRule; 4] = [
    IntentRule {
        name: "owner_repo",
        matcher: match_owner_repo,
    },
    IntentRule {
        name: "mention",
        matcher: match_mention,
    },
    IntentRule {
        name: "repo_keywords",
        matcher: match_repo_keywords,
    },
    IntentRule {
        name: "dev_keywords",
        matcher: match_dev_keywords,
    },
];

pub fn rules() -> &'static [IntentRule] {
    &RULES
}

/// Runs the rule table against `message` and returns the first match.
pub fn detect_intent(message: &str) -> Option<Intent> {
    rules().iter().find_map(|rule| rule.apply(message))
}

/// Removes stopwords and trailing punctuation, keeping word order.
pub fn strip_stopwords(message: &str) -> String {
    message
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '@'))
        .filter(|word| !word.is_empty())
        .filter(|word| !STOPWORDS.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}
