//! Orchestrator configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::domain::ResultId;

/// User-facing notices sent by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notices {
    /// Sent when a chat has used up its quota.
    pub quota_exceeded: String,
    /// Sent in place of a result when the provider or store failed.
    pub temporary_error: String,
    /// Confirms a history deletion.
    pub history_deleted: String,
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            quota_exceeded: "rate limit exceeded, try again later".to_string(),
            temporary_error: "temporary error, please try again later".to_string(),
            history_deleted: "history deleted".to_string(),
        }
    }
}

impl Notices {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            quota_exceeded: env::var("NOTICE_QUOTA").unwrap_or(defaults.quota_exceeded),
            temporary_error: env::var("NOTICE_TEMPORARY_ERROR")
                .unwrap_or(defaults.temporary_error),
            history_deleted: env::var("NOTICE_HISTORY_DELETED")
                .unwrap_or(defaults.history_deleted),
        }
    }
}

/// Command orchestrator configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Longest accepted claim, in UTF-8 bytes.
    pub max_prompt_bytes: usize,
    /// Number of results returned by `/status`.
    pub recent_limit: u64,
    /// Base URL result links are built from.
    pub docs_base_url: String,
    /// Upper bound on each individual collaborator call.
    pub call_timeout: Duration,
    pub notices: Notices,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_prompt_bytes: 8000,
            recent_limit: 5,
            docs_base_url: "https://example.com/docs".to_string(),
            call_timeout: Duration::from_secs(30),
            notices: Notices::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_prompt_bytes: env::var("MAX_PROMPT_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_prompt_bytes),
            recent_limit: env::var("RECENT_RESULTS_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.recent_limit),
            docs_base_url: env::var("DOCS_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.docs_base_url),
            call_timeout: env::var("COLLABORATOR_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.call_timeout),
            notices: Notices::from_env(),
        }
    }

    /// Public link to a stored result.
    pub fn result_link(&self, id: ResultId) -> String {
        format!("{}/{}", self.docs_base_url.trim_end_matches('/'), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_link_trims_trailing_slash() {
        let config = OrchestratorConfig {
            docs_base_url: "http://d/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.result_link(42), "http://d/42");
    }
}
