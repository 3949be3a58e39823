use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::MIN_QUERY_LENGTH;
use crate::controller::SearchState;
use crate::detail::RepoDetail;
use crate::models::ResultRecord;

/// Piece of a repository name, flagged when it matches the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Split `text` around every ASCII case-insensitive occurrence of `query`.
pub fn highlight_segments<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    if query.is_empty() {
        return vec![Segment { text, matched: false }];
    }

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;
    while i < text.len() {
        let end = i + query.len();
        if end <= text.len()
            && text.is_char_boundary(end)
            && text[i..end].eq_ignore_ascii_case(query)
        {
            if plain_start < i {
                segments.push(Segment { text: &text[plain_start..i], matched: false });
            }
            segments.push(Segment { text: &text[i..end], matched: true });
            i = end;
            plain_start = end;
        } else {
            i += text[i..].chars().next().map_or(1, char::len_utf8);
        }
    }
    if plain_start < text.len() {
        segments.push(Segment { text: &text[plain_start..], matched: false });
    }
    segments
}

/// One result card: `owner/name` with the query in bold, then the
/// description.
pub fn render_card(index: usize, record: &ResultRecord, query: &str) -> String {
    let name: String = highlight_segments(&record.name, query)
        .into_iter()
        .map(|segment| {
            if segment.matched {
                segment.text.bold().to_string()
            } else {
                segment.text.to_string()
            }
        })
        .collect();

    let mut card = format!("{:>3}. {}/{}", index, record.login, name);
    if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
        card.push_str("\n     ");
        card.push_str(description);
    }
    card
}

pub fn render_detail(detail: &RepoDetail) -> String {
    let record = &detail.record;
    let mut lines = vec![
        format!("{}/{}", record.login, record.name.bold()),
        format!("avatar: {}", record.avatar_url),
        format!(
            "watchers {}  forks {}  stars {}",
            detail.watchers(),
            detail.forks(),
            detail.stars()
        ),
    ];
    if let Some(description) = record.description.as_deref() {
        lines.push(String::new());
        lines.push(description.to_string());
    }

    lines.push(String::new());
    lines.push("Languages".bold().to_string());
    if detail.languages.is_empty() {
        lines.push("  (none known)".dimmed().to_string());
    }
    lines.extend(detail.languages.iter().map(|language| format!("  {}", language)));

    lines.push(String::new());
    lines.push(format!("Go to repo: {}", record.url.underline()));
    lines.join("\n")
}

/// Lines printed for a settled (not loading) search screen.
pub fn render_results(state: &SearchState) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(error) = &state.error {
        lines.push(format!("Search for '{}' failed: {}", state.query, error).red().to_string());
    } else if state.results.is_empty() && state.query.chars().count() >= MIN_QUERY_LENGTH {
        lines.push("No repositories".dimmed().to_string());
    }
    lines.extend(
        state
            .results
            .iter()
            .enumerate()
            .map(|(index, record)| render_card(index, record, &state.query)),
    );
    lines
}

/// Draws the search screen on the terminal, redrawing only when the result
/// list, the loading flag or the error change.
pub struct Screen {
    spinner: Option<ProgressBar>,
    shown: Option<(Vec<ResultRecord>, bool, Option<String>)>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            spinner: None,
            shown: None,
        }
    }

    pub fn update(&mut self, state: &SearchState) {
        if let Some((results, loading, error)) = &self.shown {
            if *loading == state.loading && *results == state.results && *error == state.error {
                return;
            }
        }
        self.shown = Some((state.results.clone(), state.loading, state.error.clone()));

        if state.loading {
            self.start_spinner(format!("Searching '{}'", state.query));
            return;
        }
        self.stop_spinner();

        for line in render_results(state) {
            println!("{}", line);
        }
    }

    pub fn start_spinner(&mut self, message: String) {
        let spinner = self.spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} {wide_msg}")
            {
                pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        });
        spinner.set_message(message);
    }

    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}
