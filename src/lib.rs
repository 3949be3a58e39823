//! # GitHub Repository Search
//!
//! A Rust library for searching GitHub repositories by keyword, with a
//! debounced, cancellable search box and a per-repository language lookup.
//!
//! ## Main Components
//!
//! - [`GitHubSearcher`]: HTTP client for the search and languages endpoints
//! - [`SearchController`]: owns the query, debounces input and makes sure only
//!   the latest request can update the visible [`SearchState`]
//! - [`RepoDetail`]: the detail view of one result, including its languages
//! - [`Args`] and [`Config`]: command line and environment configuration
//!
//! ## Example
//!
//! ```no_run
//! use github_repo_search_lib::{Args, Config, ControllerSettings, GitHubSearcher, SearchController};
//! use clap::Parser;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = Config::from_env(&Args::parse());
//!     let searcher = GitHubSearcher::new(&config)?;
//!
//!     let controller = SearchController::new(searcher, ControllerSettings::from(&config));
//!     let mut updates = controller.subscribe();
//!
//!     controller.set_query("tokio");
//!     while updates.changed().await.is_ok() {
//!         let state = updates.borrow_and_update().clone();
//!         if !state.loading {
//!             println!("{} results", state.results.len());
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod args;
mod config;
mod controller;
mod detail;
mod error;
mod github_searcher;
mod models;
pub mod presentation;

// Re-export main components for documentation and external use
pub use crate::args::Args;
pub use crate::config::{Config, DEFAULT_SEARCH_URL, MIN_QUERY_LENGTH, PER_PAGE};
pub use crate::controller::{ControllerSettings, SearchController, SearchState};
pub use crate::detail::{format_count, RepoDetail};
pub use crate::error::{FetchError, SearchError};
pub use crate::github_searcher::{GitHubSearcher, RepoSource};
pub use crate::models::{LanguageSet, Owner, RawHit, ResultRecord, SearchResponse};
