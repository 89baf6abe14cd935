use crate::data_models::{Hit, MatchStrength};
use crate::flatten::FlatString;
use crate::platforms::{PlatformRegistry, PlatformRule};

pub const DEFAULT_MAX_HITS: usize = 5;
pub const SNIPPET_CHARS: usize = 140;

/// Outcome of matching one platform over a set of flattened strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformMatch {
    pub present: bool,
    pub hits: Vec<Hit>,
}

/// Per-platform results, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchReport {
    pub platforms: Vec<(String, PlatformMatch)>,
}

impl MatchReport {
    pub fn get(&self, label: &str) -> Option<&PlatformMatch> {
        self.platforms
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, m)| m)
    }

    pub fn present(&self, label: &str) -> bool {
        self.get(label).is_some_and(|m| m.present)
    }
}

/// Decides "anywhere" presence per platform.
///
/// Two passes: strict (domains and source tags) for every platform, then, when
/// enabled, relaxed keyword tokens for the platforms the strict pass missed.
#[derive(Debug, Clone)]
pub struct PlatformMatcher<'a> {
    registry: &'a PlatformRegistry,
    relaxed: bool,
    max_hits: usize,
}

impl<'a> PlatformMatcher<'a> {
    pub fn new(registry: &'a PlatformRegistry) -> Self {
        PlatformMatcher {
            registry,
            relaxed: false,
            max_hits: DEFAULT_MAX_HITS,
        }
    }

    pub fn with_relaxed(mut self, relaxed: bool) -> Self {
        self.relaxed = relaxed;
        self
    }

    /// Caps recorded hits per platform. Zero disables diagnostics.
    pub fn with_max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }

    pub fn match_strings(&self, strings: &[FlatString]) -> MatchReport {
        let platforms = self
            .registry
            .rules()
            .iter()
            .map(|rule| (rule.label.clone(), self.match_rule(rule, strings)))
            .collect();
        MatchReport { platforms }
    }

    fn match_rule(&self, rule: &PlatformRule, strings: &[FlatString]) -> PlatformMatch {
        let mut result = self.scan(strings, MatchStrength::Strict, |s| rule.matches_strict(s));
        if !result.present && self.relaxed {
            result = self.scan(strings, MatchStrength::Relaxed, |s| rule.matches_relaxed(s));
        }
        result
    }

    fn scan<F>(&self, strings: &[FlatString], strength: MatchStrength, is_match: F) -> PlatformMatch
    where
        F: Fn(&str) -> bool,
    {
        let mut result = PlatformMatch::default();
        for flat in strings {
            if !is_match(&flat.value) {
                continue;
            }
            result.present = true;
            if result.hits.len() >= self.max_hits {
                break;
            }
            result.hits.push(Hit {
                snippet: snippet(&flat.value),
                path: flat.path.clone(),
                strength,
            });
        }
        result
    }
}

/// Truncates to [`SNIPPET_CHARS`] characters, marking the cut with an ellipsis.
pub fn snippet(value: &str) -> String {
    match value.char_indices().nth(SNIPPET_CHARS) {
        Some((byte_idx, _)) => format!("{}…", &value[..byte_idx]),
        None => value.to_string(),
    }
}
