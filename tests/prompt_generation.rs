//! Integration coverage of the tiered remediation-hint strategy against a
//! mocked external endpoint, and of cache persistence across a reload.

use sitewatch_scan_engine::model::{Defect, DefectType, Severity};
use sitewatch_scan_engine::prompt::{generate, PromptCache};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn openai_style_body(hints: &[&str]) -> serde_json::Value {
    let array = serde_json::to_string(hints).unwrap();
    serde_json::json!({
        "choices": [{"message": {"content": array}}]
    })
}

#[tokio::test]
async fn external_endpoint_success_populates_hints_and_warms_the_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_style_body(&["Add an alt attribute to the image."])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = PromptCache::load(dir.path().join("cache.json")).await;
    let defect = Defect::new(DefectType::BrokenImage, Severity::Warning, "Broken image: logo.png", "Image failed to load: /logo.png", "http://site/");

    let endpoint = format!("{}/v1/chat/completions", server.uri());
    let result = generate(vec![defect], &cache, Some("test-key"), &endpoint).await;

    assert!(!result.used_fallback);
    assert_eq!(result.cache_misses, 1);
    assert_eq!(result.defects[0].fix_prompt, "Add an alt attribute to the image.");
}

#[tokio::test]
async fn malformed_external_response_falls_back_to_templates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = PromptCache::load(dir.path().join("cache.json")).await;
    let defect = Defect::new(DefectType::ConsoleError, Severity::Critical, "Uncaught exception: x", "TypeError: x", "http://site/");

    let endpoint = format!("{}/v1/chat/completions", server.uri());
    let result = generate(vec![defect], &cache, Some("test-key"), &endpoint).await;

    assert!(result.used_fallback);
    assert!(result.fallback_reason.is_some());
    assert!(!result.defects[0].fix_prompt.is_empty());
}

/// A hint written by one `PromptCache` is observed by a fresh instance
/// loaded from the same path, matching the "prompt cache hit" scenario.
#[tokio::test]
async fn hint_survives_a_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let defect = Defect::new(DefectType::BrokenLink, Severity::Warning, "Broken link: /x", "Returned 404", "http://site/");

    {
        let cache = PromptCache::load(path.clone()).await;
        let result = generate(vec![defect.clone()], &cache, None, "http://unused").await;
        assert!(result.used_fallback);
    }

    let reloaded = PromptCache::load(path).await;
    let result = generate(vec![defect], &reloaded, None, "http://unused").await;
    assert_eq!(result.cache_hits, 1);
    assert_eq!(result.cache_misses, 0);
    assert!(!result.used_fallback);
}
