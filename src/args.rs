use clap::Parser;

/// GitHub repository search CLI with debounced, cancellable queries and a
/// per-repository language breakdown.
#[derive(Parser, Debug, Clone)]
#[clap(
    author,
    version,
    about,
    long_about = "Search GitHub repositories by keyword. Without --query every line typed on stdin replaces the search box; ':open N' shows details, ':clear' resets and ':quit' exits."
)]
pub struct Args {
    /// Run a single search for this keyword and print the results.
    #[clap(short, long)]
    pub query: Option<String>,

    /// With --query, also show the detail view for the result at this index.
    #[clap(short = 'D', long, value_name = "INDEX", requires = "query")]
    pub details: Option<usize>,

    /// GitHub API token for authentication.
    /// Falls back to the GITHUB_TOKEN environment variable.
    #[clap(short, long)]
    pub token: Option<String>,

    /// Quiet period after the last keystroke before a search is sent.
    #[clap(short, long, value_name = "MS", default_value = "500")]
    pub debounce_ms: u64,

    /// Repository search endpoint.
    #[clap(long, value_name = "URL")]
    pub search_url: Option<String>,
}
