use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `GET /search/repositories`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<RawHit>,
}

/// One repository as returned by the search API. Only the fields the client
/// displays are decoded; any of them may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawHit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub svn_url: Option<String>,
    pub languages_url: Option<String>,
    pub owner: Option<Owner>,
    pub watchers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub stargazers_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Owner {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}

/// A search hit as the presentation layer sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub description: Option<String>,
    pub url: String,
    pub avatar_url: String,
    pub login: String,
    pub name: String,
    pub languages_url: String,
    pub watchers_count: u64,
    pub forks_count: u64,
    pub stargazers_count: u64,
}

impl ResultRecord {
    /// `owner/name`, as shown on a result card.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.login, self.name)
    }
}

impl From<RawHit> for ResultRecord {
    fn from(hit: RawHit) -> Self {
        let owner = hit.owner.unwrap_or_default();
        Self {
            description: hit.description,
            url: hit.svn_url.unwrap_or_default(),
            avatar_url: owner.avatar_url.unwrap_or_default(),
            login: owner.login.unwrap_or_default(),
            name: hit.name.unwrap_or_default(),
            languages_url: hit.languages_url.unwrap_or_default(),
            watchers_count: hit.watchers_count.unwrap_or_default(),
            forks_count: hit.forks_count.unwrap_or_default(),
            stargazers_count: hit.stargazers_count.unwrap_or_default(),
        }
    }
}

/// Languages of one repository, in the order the API listed them
/// (largest byte count first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageSet(Vec<String>);

impl LanguageSet {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// The languages endpoint maps language name to byte count; only the names
/// are kept.
impl From<Map<String, Value>> for LanguageSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map.into_iter().map(|(name, _bytes)| name).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for LanguageSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_maps_to_record() {
        let hit: RawHit = serde_json::from_value(json!({
            "name": "react",
            "description": "The library for web and native user interfaces.",
            "svn_url": "https://github.com/facebook/react",
            "languages_url": "https://api.github.com/repos/facebook/react/languages",
            "owner": {
                "login": "facebook",
                "avatar_url": "https://avatars.githubusercontent.com/u/69631?v=4"
            },
            "watchers_count": 230000,
            "forks_count": 47000,
            "stargazers_count": 230000,
            "html_url": "https://github.com/facebook/react"
        }))
        .unwrap();

        let record = ResultRecord::from(hit);
        assert_eq!(record.full_name(), "facebook/react");
        assert_eq!(record.url, "https://github.com/facebook/react");
        assert_eq!(
            record.languages_url,
            "https://api.github.com/repos/facebook/react/languages"
        );
        assert_eq!(
            record.avatar_url,
            "https://avatars.githubusercontent.com/u/69631?v=4"
        );
        assert_eq!(record.forks_count, 47000);
        assert_eq!(record.stargazers_count, 230000);
        assert!(record.description.is_some());
    }

    #[test]
    fn test_null_and_missing_fields_do_not_fail() {
        let response: SearchResponse = serde_json::from_value(json!({
            "total_count": 2,
            "items": [
                { "name": "bare", "description": null, "owner": null },
                {}
            ]
        }))
        .unwrap();

        let records: Vec<ResultRecord> = response.items.into_iter().map(Into::into).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "bare");
        assert_eq!(records[0].description, None);
        assert_eq!(records[0].login, "");
        assert_eq!(records[1], ResultRecord::default());
    }

    #[test]
    fn test_missing_items_is_empty() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_language_set_keeps_response_order() {
        let map: Map<String, Value> =
            serde_json::from_str(r#"{"TypeScript": 900, "JavaScript": 500, "CSS": 10}"#).unwrap();

        let languages = LanguageSet::from(map);
        assert_eq!(languages.names(), ["TypeScript", "JavaScript", "CSS"]);
        assert_eq!(languages.len(), 3);
    }
}
