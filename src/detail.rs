use tracing::{debug, error};

use crate::github_searcher::RepoSource;
use crate::models::{LanguageSet, ResultRecord};

/// Everything the detail screen shows for one selected repository.
///
/// Languages are fetched anew on every visit and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDetail {
    pub record: ResultRecord,
    pub languages: LanguageSet,
}

impl RepoDetail {
    /// Look up the languages of `record`. A failed lookup is logged and
    /// shown as an empty language list; the rest of the detail stays usable.
    pub async fn load<S: RepoSource + ?Sized>(source: &S, record: ResultRecord) -> Self {
        let languages = match source.fetch_languages(&record.languages_url).await {
            Ok(languages) => {
                debug!("{} uses {} languages", record.full_name(), languages.len());
                languages
            }
            Err(e) => {
                error!("Failed to fetch languages for {}: {}", record.full_name(), e);
                LanguageSet::default()
            }
        };

        Self { record, languages }
    }

    pub fn watchers(&self) -> String {
        format_count(self.record.watchers_count)
    }

    pub fn forks(&self) -> String {
        format_count(self.record.forks_count)
    }

    pub fn stars(&self) -> String {
        format_count(self.record.stargazers_count)
    }
}

/// Compact a statistic for display: `999`, `1.5k`, `123k`.
pub fn format_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=99_999 => format!("{:.1}k", count as f64 / 1000.0),
        _ => format!("{}k", count / 1000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, SearchError};
    use crate::models::RawHit;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use reqwest::StatusCode;
    use tokio_util::sync::CancellationToken;

    struct Languages(Option<Vec<&'static str>>);

    impl RepoSource for Languages {
        fn search<'a>(
            &'a self,
            _query: &'a str,
            _cancel: CancellationToken,
        ) -> BoxFuture<'a, Result<Vec<RawHit>, SearchError>> {
            async { Ok(Vec::new()) }.boxed()
        }

        fn fetch_languages<'a>(
            &'a self,
            languages_url: &'a str,
        ) -> BoxFuture<'a, Result<LanguageSet, FetchError>> {
            async move {
                assert_eq!(languages_url, "https://api.github.com/repos/facebook/react/languages");
                match &self.0 {
                    Some(names) => Ok(names.iter().copied().collect::<LanguageSet>()),
                    None => Err(FetchError::Status {
                        status: StatusCode::NOT_FOUND,
                        url: languages_url.to_string(),
                    }),
                }
            }
            .boxed()
        }
    }

    fn record() -> ResultRecord {
        ResultRecord {
            name: "react".to_string(),
            login: "facebook".to_string(),
            languages_url: "https://api.github.com/repos/facebook/react/languages".to_string(),
            watchers_count: 1500,
            forks_count: 999,
            stargazers_count: 230_400,
            ..ResultRecord::default()
        }
    }

    #[tokio::test]
    async fn test_load_fetches_languages() {
        let source = Languages(Some(vec!["JavaScript", "TypeScript"]));
        let detail = RepoDetail::load(&source, record()).await;

        assert_eq!(detail.languages.names(), ["JavaScript", "TypeScript"]);
        assert_eq!(detail.record, record());
    }

    #[tokio::test]
    async fn test_failed_lookup_degrades_to_no_languages() {
        let detail = RepoDetail::load(&Languages(None), record()).await;

        assert!(detail.languages.is_empty());
        assert_eq!(detail.record.name, "react");
    }

    #[tokio::test]
    async fn test_stat_formatting() {
        let detail = RepoDetail::load(&Languages(Some(vec![])), record()).await;

        assert_eq!(detail.watchers(), "1.5k");
        assert_eq!(detail.forks(), "999");
        assert_eq!(detail.stars(), "230k");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1.0k");
        assert_eq!(format_count(12_345), "12.3k");
        assert_eq!(format_count(99_999), "100.0k");
        assert_eq!(format_count(100_000), "100k");
        assert_eq!(format_count(1_234_567), "1234k");
    }
}
