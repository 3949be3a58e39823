use std::env;
use std::time::Duration;

use dotenv::dotenv;
use tracing::{debug, warn};

use crate::Args;

/// Repository search endpoint of the public GitHub API.
pub const DEFAULT_SEARCH_URL: &str = "https://api.github.com/search/repositories";

/// Results requested per search. Only the first page is ever fetched.
pub const PER_PAGE: u32 = 20;

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LENGTH: usize = 3;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential sent verbatim as `Authorization: token {token}`.
    /// May be empty; the API then rejects the request.
    pub token: String,
    pub search_url: String,
    pub per_page: u32,
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            per_page: PER_PAGE,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_len: MIN_QUERY_LENGTH,
        }
    }
}

impl Config {
    /// Build the configuration from command line arguments and the process
    /// environment (including a `.env` file, if one exists).
    pub fn from_env(args: &Args) -> Self {
        if dotenv().is_ok() {
            debug!("Loaded .env file");
        }
        Self::resolve(args, env::var("GITHUB_TOKEN").ok())
    }

    /// Merge arguments with an already looked-up environment token.
    pub fn resolve(args: &Args, env_token: Option<String>) -> Self {
        // Get GitHub API token from arguments or environment
        let token = match &args.token {
            Some(t) if !t.trim().is_empty() => t.clone(),
            _ => match env_token {
                Some(token) if !token.trim().is_empty() => token,
                _ => {
                    warn!("GitHub token not provided or found in environment; requests will be unauthenticated");
                    String::new()
                }
            },
        };

        Self {
            token,
            search_url: args
                .search_url
                .clone()
                .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            debounce: Duration::from_millis(args.debounce_ms),
            ..Self::default()
        }
    }
}
