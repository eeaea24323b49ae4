//! Language popularity statistics for the home screen.
//!
//! Computes a percentage distribution over a fixed set of popular
//! languages from live repository counts. This is one of the two
//! documented silent-recovery sites: on any failure the hardcoded
//! distribution below is served instead of an error state.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::services::github_gateway::GitHubGateway;

/// Languages included in the distribution, in display order.
pub const TRACKED_LANGUAGES: [&str; 12] = [
    "JavaScript",
    "Python",
    "Java",
    "TypeScript",
    "C#",
    "C++",
    "PHP",
    "C",
    "Go",
    "Rust",
    "Kotlin",
    "Swift",
];

/// One slice of the popularity distribution.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageShare {
    pub language: String,
    pub percent: f64,
}

/// Hardcoded distribution served when live counts are unavailable.
pub fn fallback_distribution() -> Vec<LanguageShare> {
    const SHARES: [f64; 12] = [
        18.2, 16.9, 11.4, 10.1, 7.3, 6.8, 5.6, 5.2, 4.9, 4.6, 4.5, 4.5,
    ];
    TRACKED_LANGUAGES
        .iter()
        .zip(SHARES.iter())
        .map(|(language, percent)| LanguageShare {
            language: (*language).to_string(),
            percent: *percent,
        })
        .collect()
}

/// Language statistics over live repository counts.
pub struct LanguageStatsService {
    github: Arc<GitHubGateway>,
}

impl LanguageStatsService {
    pub fn new(github: Arc<GitHubGateway>) -> Self {
        Self { github }
    }

    /// Returns the live popularity distribution, or the hardcoded fallback
    /// if any counted search fails.
    ///
    /// Uses the cache-bypassing counted search; the aggregate numbers are
    /// the point here, so freshness beats latency.
    pub async fn popularity(&self) -> Vec<LanguageShare> {
        let mut counts = Vec::with_capacity(TRACKED_LANGUAGES.len());
        for language in TRACKED_LANGUAGES {
            let query = format!("language:\"{}\"", language);
            match self
                .github
                .search_repositories_with_count(&query, 1, 1)
                .await
            {
                Ok(result) => counts.push((language, result.total_count)),
                Err(e) => {
                    warn!(language, error = %e, "language count failed, using fallback");
                    return fallback_distribution();
                }
            }
        }

        let total: u64 = counts.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return fallback_distribution();
        }

        counts
            .into_iter()
            .map(|(language, count)| LanguageShare {
                language: language.to_string(),
                percent: (count as f64 / total as f64 * 1000.0).round() / 10.0,
            })
            .collect()
    }
}
