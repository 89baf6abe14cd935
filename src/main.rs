use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use serp_visibility::analysis::{KeywordAnalyzer, parse_keywords};
use serp_visibility::config::{AnalysisConfig, ENV_DEFAULTS, GoogleDomain, Scope};
use serp_visibility::export::{Table, export};
use serp_visibility::platforms::PlatformRegistry;
use serp_visibility::provider::SerperClient;
use serp_visibility::report;

#[derive(Parser)]
#[command(
    name = "serp-visibility",
    about = "Check whether YouTube, TikTok and Instagram show up in Google results for a list of keywords"
)]
struct Cli {
    /// Serper.dev API key (falls back to SERPER_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Google domain to query
    #[arg(short = 'd', long, value_enum, default_value_t = GoogleDomain::It)]
    domain: GoogleDomain,

    /// Response language (hl); defaults from the domain
    #[arg(long)]
    lang: Option<String>,

    /// Response country (gl); defaults from the domain
    #[arg(long)]
    country: Option<String>,

    /// Organic results to request (10-50)
    #[arg(short = 'n', long, default_value = "10")]
    num: u8,

    /// Also match bare platform keywords when no domain matches
    #[arg(long)]
    relaxed: bool,

    /// Show the raw response of the first keyword (stderr, or inside --json output)
    #[arg(long)]
    debug_payload: bool,

    /// Payload area searched for "anywhere" presence
    #[arg(long, value_enum, default_value_t = Scope::Anywhere)]
    scope: Scope,

    /// Add matched snippets and paths to the output
    #[arg(long)]
    diagnostics: bool,

    /// Example hits kept per platform
    #[arg(long, default_value = "5")]
    max_hits: usize,

    /// Provider calls in flight at once
    #[arg(short = 'j', long, default_value = "1")]
    concurrency: usize,

    /// Keyword to analyze (repeatable)
    #[arg(short = 'k', long = "keyword")]
    keywords: Vec<String>,

    /// File with one keyword per line ("-" for stdin)
    #[arg(short = 'f', long)]
    keywords_file: Option<PathBuf>,

    /// Export results; format follows the extension (.csv or .xlsx). Repeatable.
    #[arg(short = 'o', long = "output")]
    outputs: Vec<PathBuf>,

    /// Print rows, failures and any debug payload as one JSON document
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn keywords(&self) -> Result<Vec<String>> {
        let mut text = self.keywords.join("\n");
        match &self.keywords_file {
            Some(path) if path.as_os_str() == "-" => {
                let mut stdin = String::new();
                std::io::stdin()
                    .read_to_string(&mut stdin)
                    .context("Failed to read keywords from stdin")?;
                text.push('\n');
                text.push_str(&stdin);
            }
            Some(path) => {
                let file = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read keywords file {}", path.display()))?;
                text.push('\n');
                text.push_str(&file);
            }
            None => {}
        }
        Ok(parse_keywords(&text))
    }

    fn config(&self) -> AnalysisConfig {
        let api_key = self
            .api_key
            .clone()
            .or_else(|| ENV_DEFAULTS.api_key.clone())
            .unwrap_or_default();

        let mut config = AnalysisConfig::new(api_key, self.domain);
        config.endpoint = ENV_DEFAULTS.endpoint.clone();
        config.timeout = Duration::from_secs(ENV_DEFAULTS.timeout_secs);
        if let Some(lang) = &self.lang {
            config.language = lang.clone();
        }
        if let Some(country) = &self.country {
            config.country = country.clone();
        }
        config.num_results = self.num;
        config.relaxed = self.relaxed;
        config.debug_payload = self.debug_payload;
        config.scope = self.scope;
        config.max_hits = if self.diagnostics || self.json { self.max_hits } else { 0 };
        config.concurrency = self.concurrency;
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let keywords = cli.keywords()?;
    let config = cli.config();
    config.validate(&keywords).context("Invalid input, analysis not started")?;

    let registry = PlatformRegistry::default();
    let provider = SerperClient::new(&config).context("Failed to build HTTP client")?;
    let analyzer = KeywordAnalyzer::from_config(provider, &registry, &config);

    tracing::info!(
        keywords = keywords.len(),
        domain = config.google_domain.host(),
        gl = %config.country,
        hl = %config.language,
        relaxed = config.relaxed,
        "starting analysis"
    );
    let report = analyzer.run(&keywords).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report::json_output(&report))?);
    } else {
        if let Some((keyword, payload)) = &report.debug_payload {
            eprintln!("--- Raw response for \"{keyword}\" ---");
            eprintln!("{}", serde_json::to_string_pretty(payload)?);
            eprintln!();
        }
        print!("{}", report::render(&report, &registry, cli.diagnostics));
    }

    let table = Table::build(&report.rows, &registry, cli.diagnostics);
    for path in &cli.outputs {
        export(&table, path).with_context(|| format!("Failed to export {}", path.display()))?;
        println!("Saved {}", path.display());
    }

    Ok(())
}
