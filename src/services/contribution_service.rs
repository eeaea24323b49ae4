//! Contribution calendar retrieval and transform.
//!
//! Fetches a year of daily contribution counts through the GitHub GraphQL
//! API and converts the raw counts into a rendering-ready calendar with
//! bucketed intensity levels. GitHub returns raw counts only, so the
//! levels are always computed client-side.

use serde::Deserialize;

use crate::types::contribution::{ContributionCalendar, ContributionDay, ContributionWeek};
use crate::types::errors::CalendarError;

/// Production GraphQL endpoint.
pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Fixed query template. Weeks arrive chronologically, days Sunday-first,
/// and the transform preserves that ordering exactly.
const CALENDAR_QUERY: &str = "query($login: String!) { user(login: $login) { \
contributionsCollection { contributionCalendar { totalContributions \
weeks { contributionDays { date contributionCount weekday color } } } } } }";

/// Buckets a daily contribution count into an intensity level 0-4.
///
/// Fixed thresholds matching GitHub's public convention; monotonic in
/// `count` and deterministic.
pub fn intensity_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        _ => 4,
    }
}

// Wire shapes for the GraphQL response.

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<EnvelopeData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: RawCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCalendar {
    pub(crate) total_contributions: u32,
    pub(crate) weeks: Vec<RawWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawWeek {
    pub(crate) contribution_days: Vec<RawDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDay {
    pub(crate) date: String,
    pub(crate) contribution_count: u32,
    pub(crate) weekday: u8,
    #[serde(default)]
    #[allow(dead_code)]
    pub(crate) color: Option<String>,
}

/// Converts the raw calendar into the domain type, bucketing each day.
pub(crate) fn transform(raw: RawCalendar) -> ContributionCalendar {
    ContributionCalendar {
        total_contributions: raw.total_contributions,
        weeks: raw
            .weeks
            .into_iter()
            .map(|week| ContributionWeek {
                days: week
                    .contribution_days
                    .into_iter()
                    .map(|day| ContributionDay {
                        level: intensity_level(day.contribution_count),
                        date: day.date,
                        count: day.contribution_count,
                        weekday: day.weekday,
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Contribution calendar service over the GraphQL endpoint.
pub struct ContributionService {
    http: reqwest::Client,
    endpoint: String,
}

impl ContributionService {
    pub fn new() -> Self {
        Self::with_endpoint(GITHUB_GRAPHQL_URL)
    }

    /// Service against an arbitrary endpoint (tests).
    pub fn with_endpoint(endpoint: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gitpulse/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(std::time::Duration::from_secs(30))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            endpoint: endpoint.to_string(),
        }
    }

    /// Fetches and transforms the contribution calendar for `login`.
    ///
    /// The GraphQL API requires a bearer token even for public data.
    pub async fn fetch_calendar(
        &self,
        login: &str,
        token: &str,
    ) -> Result<ContributionCalendar, CalendarError> {
        if token.is_empty() {
            return Err(CalendarError::MissingToken);
        }

        let body = serde_json::json!({
            "query": CALENDAR_QUERY,
            "variables": { "login": login },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CalendarError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CalendarError::Api(format!("HTTP {}", status.as_u16())));
        }

        let text = response
            .text()
            .await
            .map_err(|e| CalendarError::Network(e.to_string()))?;
        let envelope: GraphQlEnvelope =
            serde_json::from_str(&text).map_err(|e| CalendarError::Parse(e.to_string()))?;

        if let Some(errors) = envelope.errors {
            if let Some(first) = errors.first() {
                return Err(CalendarError::Api(first.message.clone()));
            }
        }

        let user = envelope
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| CalendarError::Api(format!("no such user: {}", login)))?;

        Ok(transform(user.contributions_collection.contribution_calendar))
    }
}

impl Default for ContributionService {
    fn default() -> Self {
        Self::new()
    }
}
