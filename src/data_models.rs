use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Which matcher pass produced a hit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrength {
    Strict,
    Relaxed,
}

/// A diagnostic example of a matched string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub snippet: String,
    pub path: String,
    pub strength: MatchStrength,
}

/// Top-10 organic presence for one platform.
///
/// Presence is derived from the rank, so a rank exists exactly when the
/// platform is present.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopTenPresence {
    pub rank: Option<NonZeroUsize>,
}

impl TopTenPresence {
    pub fn at(rank: NonZeroUsize) -> Self {
        TopTenPresence { rank: Some(rank) }
    }

    pub fn present(&self) -> bool {
        self.rank.is_some()
    }
}

/// Everything reported for one platform on one keyword.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlatformPresence {
    pub label: String,
    pub anywhere: bool,
    pub top10: TopTenPresence,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<Hit>,
}

/// One output row per successfully analyzed keyword.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeywordRow {
    pub keyword: String,
    /// In registry order.
    pub platforms: Vec<PlatformPresence>,
}

impl KeywordRow {
    pub fn new(keyword: String, platforms: Vec<PlatformPresence>) -> KeywordRow {
        KeywordRow { keyword, platforms }
    }

    pub fn platform(&self, label: &str) -> Option<&PlatformPresence> {
        self.platforms.iter().find(|p| p.label == label)
    }

    pub fn anywhere(&self, label: &str) -> bool {
        self.platform(label).is_some_and(|p| p.anywhere)
    }

    pub fn top10(&self, label: &str) -> bool {
        self.platform(label).is_some_and(|p| p.top10.present())
    }

    pub fn rank(&self, label: &str) -> Option<usize> {
        self.platform(label).and_then(|p| p.top10.rank).map(NonZeroUsize::get)
    }
}

/// A keyword that produced no row, with the reason shown to the operator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeywordFailure {
    pub keyword: String,
    pub reason: String,
}
