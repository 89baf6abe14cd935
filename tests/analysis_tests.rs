use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Value, json};
use serp_visibility::analysis::{DetectionOptions, KeywordAnalyzer, parse_keywords};
use serp_visibility::config::{AnalysisConfig, GoogleDomain, Scope};
use serp_visibility::error::ProviderError;
use serp_visibility::platforms::PlatformRegistry;
use serp_visibility::provider::SearchProvider;

mod test_helpers {
    use super::*;

    /// Canned responses per keyword; unknown keywords time out.
    pub struct FakeProvider {
        pub responses: HashMap<String, Value>,
        pub delays: HashMap<String, Duration>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        pub fn new(responses: Vec<(&str, Value)>) -> Self {
            FakeProvider {
                responses: responses
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                delays: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_delay(mut self, keyword: &str, delay: Duration) -> Self {
            self.delays.insert(keyword.to_string(), delay);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SearchProvider for &FakeProvider {
        async fn search(&self, keyword: &str) -> Result<Value, ProviderError> {
            self.calls.lock().unwrap().push(keyword.to_string());
            if let Some(delay) = self.delays.get(keyword) {
                tokio::time::sleep(*delay).await;
            }
            self.responses
                .get(keyword)
                .cloned()
                .ok_or(ProviderError::Timeout(Duration::from_secs(30)))
        }
    }

    pub fn youtube_first() -> Value {
        json!({"organic": [{"link": "https://youtube.com/watch?v=1"}, {"link": "https://example.com"}]})
    }

    pub fn tiktok_video() -> Value {
        json!({
            "organic": [{"link": "https://example.com"}],
            "videos": [{"link": "https://tiktok.com/@x/video/1"}]
        })
    }

    pub fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_failed_keyword_is_skipped() {
    let provider = FakeProvider::new(vec![("pasta", youtube_first()), ("pizza", tiktok_video())]);
    let registry = PlatformRegistry::default();
    let analyzer = KeywordAnalyzer::new(&provider, &registry);

    let report = analyzer.run(&keywords(&["pasta", "foo", "pizza"])).await;

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].keyword, "pasta");
    assert_eq!(report.rows[1].keyword, "pizza");
    assert!(report.rows.iter().all(|r| r.keyword != "foo"));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].keyword, "foo");
    assert!(report.failures[0].reason.contains("timed out"));

    assert_eq!(provider.calls(), vec!["pasta", "foo", "pizza"]);
}

#[tokio::test]
async fn test_rows_follow_input_order() {
    let provider = FakeProvider::new(vec![("a", youtube_first()), ("b", tiktok_video()), ("c", json!({}))])
        .with_delay("a", Duration::from_millis(60))
        .with_delay("b", Duration::from_millis(30));
    let registry = PlatformRegistry::default();
    let analyzer = KeywordAnalyzer::new(&provider, &registry).with_concurrency(3);

    let report = analyzer.run(&keywords(&["a", "b", "c"])).await;

    let order: Vec<&str> = report.rows.iter().map(|r| r.keyword.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    assert_eq!(report.rows[0].rank("YouTube"), Some(1));
    assert!(report.rows[1].anywhere("TikTok"));
    assert!(!report.rows[1].top10("TikTok"));
}

#[tokio::test]
async fn test_duplicate_keywords_each_produce_rows() {
    let provider = FakeProvider::new(vec![("pasta", youtube_first())]);
    let registry = PlatformRegistry::default();
    let analyzer = KeywordAnalyzer::new(&provider, &registry);

    let report = analyzer.run(&parse_keywords("pasta\n\n  pasta  \n")).await;

    assert_eq!(report.rows.len(), 2);
    assert_eq!(provider.calls().len(), 2);
}

#[tokio::test]
async fn test_all_failures_leave_empty_report() {
    let provider = FakeProvider::new(vec![]);
    let registry = PlatformRegistry::default();
    let analyzer = KeywordAnalyzer::new(&provider, &registry);

    let report = analyzer.run(&keywords(&["x", "y"])).await;

    assert!(report.is_empty());
    assert_eq!(report.failures.len(), 2);
}

#[tokio::test]
async fn test_debug_payload_is_first_keyword_only() {
    let provider = FakeProvider::new(vec![("a", youtube_first()), ("b", tiktok_video())]);
    let registry = PlatformRegistry::default();

    let analyzer = KeywordAnalyzer::new(&provider, &registry).with_debug_payload(true);
    let report = analyzer.run(&keywords(&["a", "b"])).await;
    let (keyword, payload) = report.debug_payload.expect("debug payload");
    assert_eq!(keyword, "a");
    assert_eq!(payload, youtube_first());

    let quiet = KeywordAnalyzer::new(&provider, &registry).run(&keywords(&["a"])).await;
    assert!(quiet.debug_payload.is_none());
}

#[tokio::test]
async fn test_relaxed_option_reaches_matcher() {
    let payload = json!({"organic": [{"title": "Top tik tok dances"}]});
    let provider = FakeProvider::new(vec![("dance", payload)]);
    let registry = PlatformRegistry::default();

    let strict = KeywordAnalyzer::new(&provider, &registry)
        .run(&keywords(&["dance"]))
        .await;
    assert!(!strict.rows[0].anywhere("TikTok"));

    let relaxed = KeywordAnalyzer::new(&provider, &registry)
        .with_options(DetectionOptions {
            relaxed: true,
            ..Default::default()
        })
        .run(&keywords(&["dance"]))
        .await;
    assert!(relaxed.rows[0].anywhere("TikTok"));
    assert!(!relaxed.rows[0].top10("TikTok"));
}

#[tokio::test]
async fn test_from_config_uses_scope() {
    let payload = json!({
        "knowledgeGraph": {"website": "https://www.instagram.com/brand"},
        "organic": [{"link": "https://example.com"}]
    });
    let provider = FakeProvider::new(vec![("brand", payload)]);
    let registry = PlatformRegistry::default();

    let mut config = AnalysisConfig::new("key", GoogleDomain::It);
    config.scope = Scope::VideoSections;
    let report = KeywordAnalyzer::from_config(&provider, &registry, &config)
        .run(&keywords(&["brand"]))
        .await;
    assert!(!report.rows[0].anywhere("Instagram"));

    config.scope = Scope::Anywhere;
    let report = KeywordAnalyzer::from_config(&provider, &registry, &config)
        .run(&keywords(&["brand"]))
        .await;
    assert!(report.rows[0].anywhere("Instagram"));
}
