use std::collections::HashSet;

use serde::Serialize;

use crate::error::RegistryError;

/// Identification rules for one tracked platform.
///
/// All needles are stored lower-cased; matching is plain substring containment
/// against lower-cased haystacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformRule {
    pub label: String,
    /// Canonical domains plus CDN and short-link aliases.
    pub domains: Vec<String>,
    /// Substrings of the provider-assigned `source` tag.
    pub sources: Vec<String>,
    /// Bare keyword tokens, consulted only by the relaxed pass.
    pub relaxed: Vec<String>,
}

impl PlatformRule {
    pub fn new(label: impl Into<String>, domains: &[&str], sources: &[&str], relaxed: &[&str]) -> Self {
        let lower = |xs: &[&str]| xs.iter().map(|x| x.to_lowercase()).collect::<Vec<String>>();
        PlatformRule {
            label: label.into(),
            domains: lower(domains),
            sources: lower(sources),
            relaxed: lower(relaxed),
        }
    }

    pub fn matches_domain(&self, haystack: &str) -> bool {
        self.domains.iter().any(|d| haystack.contains(d.as_str()))
    }

    /// Domain or source-tag containment.
    pub fn matches_strict(&self, haystack: &str) -> bool {
        self.matches_domain(haystack) || self.sources.iter().any(|s| haystack.contains(s.as_str()))
    }

    pub fn matches_relaxed(&self, haystack: &str) -> bool {
        self.relaxed.iter().any(|t| haystack.contains(t.as_str()))
    }
}

/// Ordered table of platform rules handed to the matcher and the ranker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformRegistry {
    rules: Vec<PlatformRule>,
}

impl PlatformRegistry {
    /// Builds a registry, rejecting duplicate labels and rules without domains.
    pub fn new(rules: Vec<PlatformRule>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.label.trim().is_empty() {
                return Err(RegistryError::EmptyLabel);
            }
            if !seen.insert(rule.label.to_lowercase()) {
                return Err(RegistryError::DuplicateLabel(rule.label.clone()));
            }
            if rule.domains.iter().all(|d| d.is_empty()) {
                return Err(RegistryError::NoDomains(rule.label.clone()));
            }
        }
        Ok(PlatformRegistry { rules })
    }

    pub fn rules(&self) -> &[PlatformRule] {
        &self.rules
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.label.as_str())
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        PlatformRegistry {
            rules: vec![
                PlatformRule::new(
                    "YouTube",
                    &["youtube.com", "youtu.be", "ytimg.com", "youtube-nocookie.com"],
                    &["youtube"],
                    &["yt shorts", "shorts"],
                ),
                PlatformRule::new(
                    "TikTok",
                    &["tiktok.com", "tiktokcdn.com", "tiktokv.com"],
                    &["tiktok"],
                    &["tik tok"],
                ),
                PlatformRule::new(
                    "Instagram",
                    &["instagram.com", "instagr.am", "cdninstagram.com"],
                    &["instagram"],
                    &["insta ", "ig reels", "reels"],
                ),
            ],
        }
    }
}
