use std::num::NonZeroUsize;

use serde_json::Value;

use crate::data_models::TopTenPresence;
use crate::platforms::PlatformRegistry;

pub const TOP_N: usize = 10;

/// Per-platform top-10 results, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankReport {
    pub platforms: Vec<(String, TopTenPresence)>,
}

impl RankReport {
    pub fn get(&self, label: &str) -> TopTenPresence {
        self.platforms
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
            .unwrap_or_default()
    }
}

/// Finds the first rank of each platform among the first [`TOP_N`] organic results.
///
/// Only `link` and `displayedLink` are read, and only domain rules apply.
/// Anything that is not an array counts as an empty list.
pub fn rank_top10(organic: Option<&Value>, registry: &PlatformRegistry) -> RankReport {
    let entries: &[Value] = organic
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut platforms: Vec<(String, TopTenPresence)> = registry
        .labels()
        .map(|label| (label.to_string(), TopTenPresence::default()))
        .collect();

    for (idx, entry) in entries.iter().take(TOP_N).enumerate() {
        let link = string_field(entry, "link");
        let displayed = string_field(entry, "displayedLink");

        for (rule, (_, presence)) in registry.rules().iter().zip(platforms.iter_mut()) {
            if presence.present() {
                continue;
            }
            if rule.matches_domain(&link) || rule.matches_domain(&displayed) {
                *presence = TopTenPresence::at(NonZeroUsize::MIN.saturating_add(idx));
            }
        }
    }

    RankReport { platforms }
}

/// Organic results live under `organic`; other payload sections are ignored.
pub fn organic_section(payload: &Value) -> Option<&Value> {
    payload.get("organic")
}

fn string_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_string_link_is_ignored() {
        let organic = json!([{"link": 42, "displayedLink": null}, {"displayedLink": "www.TikTok.com › @x"}]);
        let report = rank_top10(Some(&organic), &PlatformRegistry::default());
        assert_eq!(report.get("TikTok").rank.map(NonZeroUsize::get), Some(2));
    }

    #[test]
    fn non_array_organic_is_empty() {
        let report = rank_top10(Some(&json!({"link": "youtube.com"})), &PlatformRegistry::default());
        assert!(report.platforms.iter().all(|(_, p)| !p.present()));
    }
}
