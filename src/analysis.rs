use std::pin::pin;

use futures::StreamExt;
use serde_json::Value;

use crate::config::{AnalysisConfig, Scope};
use crate::data_models::{KeywordFailure, KeywordRow, PlatformPresence};
use crate::flatten::{FlatString, flatten, flatten_at};
use crate::matcher::{DEFAULT_MAX_HITS, PlatformMatcher};
use crate::platforms::PlatformRegistry;
use crate::provider::SearchProvider;
use crate::ranker::{organic_section, rank_top10};

/// Result sections consulted when the scope is [`Scope::VideoSections`].
pub const VIDEO_SECTIONS: [&str; 8] = [
    "organic",
    "videos",
    "inlineVideos",
    "shortVideos",
    "video_results",
    "top_videos",
    "inline_videos",
    "videoResults",
];

/// One keyword per line, trimmed; blank lines dropped, duplicates kept.
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Knobs of the detection engine, independent of the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionOptions {
    pub relaxed: bool,
    pub max_hits: usize,
    pub scope: Scope,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        DetectionOptions {
            relaxed: false,
            max_hits: DEFAULT_MAX_HITS,
            scope: Scope::Anywhere,
        }
    }
}

impl From<&AnalysisConfig> for DetectionOptions {
    fn from(config: &AnalysisConfig) -> Self {
        DetectionOptions {
            relaxed: config.relaxed,
            max_hits: config.max_hits,
            scope: config.scope,
        }
    }
}

/// Top-level sections that echo the request rather than carry results.
pub const REQUEST_ECHO_SECTIONS: [&str; 1] = ["searchParameters"];

/// Every top-level section except the request echo, flattened in document order.
fn result_strings(payload: &Value) -> Vec<FlatString> {
    match payload.as_object() {
        Some(map) => map
            .iter()
            .filter(|(key, _)| !REQUEST_ECHO_SECTIONS.contains(&key.as_str()))
            .flat_map(|(key, section)| flatten_at(section, key))
            .collect(),
        None => flatten(payload),
    }
}

/// Strings the "anywhere" matcher sees for the given scope.
pub fn scoped_strings(payload: &Value, scope: Scope) -> Vec<FlatString> {
    match scope {
        Scope::Anywhere => result_strings(payload),
        Scope::VideoSections => VIDEO_SECTIONS
            .iter()
            .filter_map(|key| payload.get(*key).filter(|v| v.is_array()).map(|v| (key, v)))
            .flat_map(|(key, section)| flatten_at(section, key))
            .collect(),
    }
}

/// Runs both detectors over one response and builds its row.
///
/// Pure: no I/O, and any payload shape is accepted.
pub fn analyze_payload(
    keyword: &str,
    payload: &Value,
    registry: &PlatformRegistry,
    options: &DetectionOptions,
) -> KeywordRow {
    let strings = scoped_strings(payload, options.scope);
    let matches = PlatformMatcher::new(registry)
        .with_relaxed(options.relaxed)
        .with_max_hits(options.max_hits)
        .match_strings(&strings);
    let ranks = rank_top10(organic_section(payload), registry);

    tracing::debug!(keyword, strings = strings.len(), "analyzed payload");

    let platforms = matches
        .platforms
        .into_iter()
        .map(|(label, m)| PlatformPresence {
            top10: ranks.get(&label),
            label,
            anywhere: m.present,
            hits: m.hits,
        })
        .collect();

    KeywordRow::new(keyword.to_string(), platforms)
}

/// Rows for the keywords that succeeded and reasons for those that did not.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    pub rows: Vec<KeywordRow>,
    pub failures: Vec<KeywordFailure>,
    /// Raw response of the first keyword, when debug display was requested.
    pub debug_payload: Option<(String, Value)>,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Drives one provider call per keyword and collects rows in input order.
pub struct KeywordAnalyzer<'a, P> {
    provider: P,
    registry: &'a PlatformRegistry,
    options: DetectionOptions,
    concurrency: usize,
    debug_payload: bool,
}

impl<'a, P: SearchProvider> KeywordAnalyzer<'a, P> {
    pub fn new(provider: P, registry: &'a PlatformRegistry) -> Self {
        KeywordAnalyzer {
            provider,
            registry,
            options: DetectionOptions::default(),
            concurrency: 1,
            debug_payload: false,
        }
    }

    pub fn from_config(provider: P, registry: &'a PlatformRegistry, config: &AnalysisConfig) -> Self {
        KeywordAnalyzer {
            provider,
            registry,
            options: DetectionOptions::from(config),
            concurrency: config.concurrency.max(1),
            debug_payload: config.debug_payload,
        }
    }

    pub fn with_options(mut self, options: DetectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of provider calls in flight at once. Output order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_debug_payload(mut self, debug_payload: bool) -> Self {
        self.debug_payload = debug_payload;
        self
    }

    /// Each keyword is attempted exactly once; a failure skips only that keyword.
    pub async fn run(&self, keywords: &[String]) -> AnalysisReport {
        let mut report = AnalysisReport::default();
        let total = keywords.len();

        let outcomes = futures::stream::iter(keywords.iter().enumerate())
            .map(|(idx, keyword)| async move {
                tracing::info!(keyword = %keyword, "analyzing {}/{}", idx + 1, total);
                (idx, keyword, self.provider.search(keyword).await)
            })
            .buffered(self.concurrency);
        let mut outcomes = pin!(outcomes);

        while let Some((idx, keyword, outcome)) = outcomes.next().await {
            match outcome {
                Ok(payload) => {
                    let row = analyze_payload(keyword, &payload, self.registry, &self.options);
                    if self.debug_payload && idx == 0 {
                        report.debug_payload = Some((keyword.clone(), payload));
                    }
                    report.rows.push(row);
                }
                Err(e) => {
                    tracing::warn!(keyword = %keyword, error = %e, "skipping keyword");
                    report.failures.push(KeywordFailure {
                        keyword: keyword.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            ok = report.rows.len(),
            failed = report.failures.len(),
            "analysis finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keywords_are_trimmed_not_deduplicated() {
        let parsed = parse_keywords("  pasta \n\n   \ncarbonara\npasta\r\n");
        assert_eq!(parsed, vec!["pasta", "carbonara", "pasta"]);
    }

    #[test]
    fn video_scope_ignores_other_sections() {
        let payload = json!({
            "knowledgeGraph": {"website": "https://instagram.com/brand"},
            "videos": [{"link": "https://www.tiktok.com/@x/video/1"}],
            "shortVideos": {"not": "a list"}
        });
        let strings = scoped_strings(&payload, Scope::VideoSections);
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].path, "videos[0].link");
    }
}
