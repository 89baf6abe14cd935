use std::env;
use std::time::Duration;

use clap::ValueEnum;
use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://google.serper.dev/search";
pub const MIN_RESULTS: u8 = 10;
pub const MAX_RESULTS: u8 = 50;

/// Values read once from the environment (and `.env`, when present).
pub static ENV_DEFAULTS: Lazy<EnvDefaults> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    EnvDefaults {
        api_key: get_env("SERPER_API_KEY"),
        endpoint: get_env_or_default("SERPER_ENDPOINT", DEFAULT_ENDPOINT),
        timeout_secs: get_env_or_default("SERPER_TIMEOUT_SECS", "30")
            .parse()
            .unwrap_or(30),
    }
});

pub struct EnvDefaults {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

fn get_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Google front-ends the operator can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GoogleDomain {
    #[default]
    #[value(name = "google.it")]
    It,
    #[value(name = "google.com")]
    Com,
    #[value(name = "google.es")]
    Es,
    #[value(name = "google.fr")]
    Fr,
}

impl GoogleDomain {
    pub fn host(&self) -> &'static str {
        match self {
            GoogleDomain::It => "google.it",
            GoogleDomain::Com => "google.com",
            GoogleDomain::Es => "google.es",
            GoogleDomain::Fr => "google.fr",
        }
    }

    /// Country code (`gl`) implied by the domain.
    pub fn country(&self) -> &'static str {
        match self {
            GoogleDomain::It => "it",
            GoogleDomain::Com => "us",
            GoogleDomain::Es => "es",
            GoogleDomain::Fr => "fr",
        }
    }

    /// Interface language (`hl`) implied by the domain.
    pub fn language(&self) -> &'static str {
        match self {
            GoogleDomain::It => "it",
            GoogleDomain::Com => "en",
            GoogleDomain::Es => "es",
            GoogleDomain::Fr => "fr",
        }
    }
}

/// Which part of the payload the "anywhere" matcher looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scope {
    /// Every string in the response except the echoed request parameters.
    #[default]
    Anywhere,
    /// Only the known result sections and organic entries typed as video.
    VideoSections,
}

/// Immutable settings for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub api_key: String,
    pub endpoint: String,
    pub google_domain: GoogleDomain,
    pub language: String,
    pub country: String,
    pub num_results: u8,
    pub relaxed: bool,
    pub debug_payload: bool,
    pub scope: Scope,
    pub max_hits: usize,
    pub timeout: Duration,
    pub concurrency: usize,
}

impl AnalysisConfig {
    /// A config with defaults derived from `google_domain`.
    pub fn new(api_key: impl Into<String>, google_domain: GoogleDomain) -> Self {
        AnalysisConfig {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            google_domain,
            language: google_domain.language().to_string(),
            country: google_domain.country().to_string(),
            num_results: MIN_RESULTS,
            relaxed: false,
            debug_payload: false,
            scope: Scope::default(),
            max_hits: crate::matcher::DEFAULT_MAX_HITS,
            timeout: Duration::from_secs(30),
            concurrency: 1,
        }
    }

    /// Checks everything that must hold before the first provider call.
    pub fn validate(&self, keywords: &[String]) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if keywords.is_empty() {
            return Err(ConfigError::NoKeywords);
        }
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&self.num_results) {
            return Err(ConfigError::ResultCount {
                min: MIN_RESULTS,
                max: MAX_RESULTS,
                got: self.num_results,
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Concurrency);
        }
        Ok(())
    }
}
