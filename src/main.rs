use clap::Parser;
use github_repo_search_lib::presentation::{render_detail, Screen};
use github_repo_search_lib::{
    Args, Config, ControllerSettings, GitHubSearcher, RepoDetail, RepoSource, ResultRecord,
    SearchController, MIN_QUERY_LENGTH,
};
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// A line typed in interactive mode.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Query(String),
    Open(usize),
    Clear,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let Some(command) = line.trim_end().strip_prefix(':') else {
            return Command::Query(line.to_string());
        };

        let mut words = command.split_whitespace();
        match (words.next(), words.next()) {
            (Some("q" | "quit"), None) => Command::Quit,
            (Some("c" | "clear"), None) => Command::Clear,
            (Some("o" | "open"), Some(index)) => match index.parse() {
                Ok(index) => Command::Open(index),
                Err(_) => Command::Unknown(line.to_string()),
            },
            _ => Command::Unknown(line.to_string()),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Logs go to stderr so they do not interleave with results
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let config = Config::from_env(&args);
    let searcher = GitHubSearcher::new(&config)?;
    let controller = SearchController::new(searcher, ControllerSettings::from(&config));

    match args.query {
        Some(query) => run_once(&controller, query, args.details).await,
        None => run_interactive(&controller).await,
    }
}

/// Search once, print the list and optionally one detail view.
async fn run_once<S: RepoSource>(
    controller: &SearchController<S>,
    query: String,
    details: Option<usize>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut screen = Screen::new();
    let mut updates = controller.subscribe();

    controller.set_query(query.clone());
    let mut state = controller.state();
    while state.loading {
        screen.update(&state);
        updates.changed().await?;
        state = updates.borrow_and_update().clone();
    }
    screen.update(&state);

    if let Some(error) = state.error {
        return Err(format!("Search for '{}' failed: {}", query, error).into());
    }
    if state.last_fetched_query != query {
        return Err(format!(
            "Query '{}' is too short; use at least {} characters",
            query, MIN_QUERY_LENGTH
        )
        .into());
    }
    info!("Search for '{}' returned {} repositories", query, state.results.len());

    if let Some(index) = details {
        let record = state
            .results
            .get(index)
            .cloned()
            .ok_or_else(|| format!("No result at index {}", index))?;
        show_detail(controller, &mut screen, record).await;
    }
    Ok(())
}

/// Every stdin line replaces the search box content.
async fn run_interactive<S: RepoSource>(
    controller: &SearchController<S>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut screen = Screen::new();
    let mut updates = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match Command::parse(&line) {
                    Command::Query(query) => controller.set_query(query),
                    Command::Clear => controller.clear_query(),
                    Command::Open(index) => match controller.state().results.get(index).cloned() {
                        Some(record) => show_detail(controller, &mut screen, record).await,
                        None => warn!("No result at index {}", index),
                    },
                    Command::Quit => break,
                    Command::Unknown(line) => warn!("Unknown command '{}'", line),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                screen.update(&state);
            }
        }
    }

    screen.stop_spinner();
    Ok(())
}

async fn show_detail<S: RepoSource>(
    controller: &SearchController<S>,
    screen: &mut Screen,
    record: ResultRecord,
) {
    screen.start_spinner(format!("Loading {}", record.full_name()));
    let detail = RepoDetail::load(controller.source(), record).await;
    screen.stop_spinner();
    println!("{}", render_detail(&detail));
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use github_repo_search_lib::{FetchError, LanguageSet, RawHit, SearchError};
    use reqwest::StatusCode;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct Unauthorized;

    impl RepoSource for Unauthorized {
        fn search<'a>(
            &'a self,
            _query: &'a str,
            _cancel: CancellationToken,
        ) -> BoxFuture<'a, Result<Vec<RawHit>, SearchError>> {
            async {
                Err(SearchError::Fetch(FetchError::Status {
                    status: StatusCode::UNAUTHORIZED,
                    url: "https://api.github.com/search/repositories".to_string(),
                }))
            }
            .boxed()
        }

        fn fetch_languages<'a>(
            &'a self,
            _languages_url: &'a str,
        ) -> BoxFuture<'a, Result<LanguageSet, FetchError>> {
            async { Ok(LanguageSet::default()) }.boxed()
        }
    }

    fn controller() -> SearchController<Unauthorized> {
        SearchController::new(
            Unauthorized,
            ControllerSettings {
                debounce: Duration::from_millis(10),
                min_query_len: MIN_QUERY_LENGTH,
            },
        )
    }

    #[tokio::test]
    async fn test_run_once_reports_search_failure() {
        let err = run_once(&controller(), "react".to_string(), None)
            .await
            .unwrap_err()
            .to_string();

        assert!(err.contains("failed"));
        assert!(err.contains("401"));
    }

    #[tokio::test]
    async fn test_run_once_rejects_short_query() {
        let err = run_once(&controller(), "re".to_string(), None)
            .await
            .unwrap_err()
            .to_string();

        assert!(err.contains("too short"));
    }

    #[test]
    fn test_plain_lines_are_queries() {
        assert_eq!(Command::parse("react"), Command::Query("react".to_string()));
        assert_eq!(Command::parse(""), Command::Query(String::new()));
        assert_eq!(Command::parse("state machine"), Command::Query("state machine".to_string()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse(":quit"), Command::Quit);
        assert_eq!(Command::parse(":c"), Command::Clear);
        assert_eq!(Command::parse(":open 3"), Command::Open(3));
        assert_eq!(Command::parse(":open x"), Command::Unknown(":open x".to_string()));
        assert_eq!(Command::parse(":frobnicate"), Command::Unknown(":frobnicate".to_string()));
    }
}
