//! Broken-link tester (`broken-link`, §4.2.4).

use std::collections::HashSet;
use std::time::Duration;

use chromiumoxide::Browser;
use reqwest::Client;
use url::Url;

use crate::model::{Defect, DefectType, Severity};

use super::common::settle;
use super::js_scripts::{ANCHOR_HREFS_SCRIPT, COOKIE_CONSENT_DISMISS_SCRIPT};

const EXCLUDED_SCHEMES: &[&str] = &["mailto", "tel", "javascript", "data", "blob"];

const BOT_BLOCKED_HOSTS: &[&str] = &[
    "linkedin.com",
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "pinterest.com",
    "reddit.com",
    "threads.net",
];

const MAX_LINKS_PER_PAGE: usize = 50;

fn host_is_bot_blocked(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    BOT_BLOCKED_HOSTS
        .iter()
        .any(|blocked| host == *blocked || host.ends_with(&format!(".{blocked}")))
}

enum Verdict {
    Ok,
    Broken(String),
    Uncertain,
}

fn classify_connect_error(err: &reqwest::Error) -> Verdict {
    let lower = err.to_string().to_ascii_lowercase();
    if err.is_connect()
        && (lower.contains("dns") || lower.contains("resolve") || lower.contains("refused"))
    {
        Verdict::Broken("Domain not found or connection refused".to_string())
    } else {
        Verdict::Uncertain
    }
}

async fn check_link(client: &Client, url: &str, timeout: Duration) -> Verdict {
    if let Ok(resp) = client.head(url).timeout(timeout).send().await {
        let status = resp.status().as_u16();
        if status < 400 {
            return Verdict::Ok;
        }
        if status == 404 || status == 410 {
            return Verdict::Broken(format!("Returned {status}"));
        }
    }

    match client.get(url).timeout(timeout).send().await {
        Ok(resp) => {
            let status = resp.status().as_u16();
            if status < 400 {
                Verdict::Ok
            } else if status == 404 || status == 410 {
                Verdict::Broken(format!("Returned {status}"))
            } else {
                Verdict::Uncertain
            }
        }
        Err(e) => classify_connect_error(&e),
    }
}

/// Dismisses a cookie-consent overlay (best effort), collects unique
/// same-request anchor targets, then runs the HEAD→GET check on each.
pub async fn run(browser: &Browser, url: &str, link_check_timeout: Duration) -> Vec<Defect> {
    let Ok(page) = browser.new_page("about:blank").await else {
        return Vec::new();
    };

    let _ = tokio::time::timeout(std::time::Duration::from_secs(15), page.goto(url)).await;
    let _ = page.wait_for_navigation().await;
    settle(300).await;
    let _ = page.evaluate(COOKIE_CONSENT_DISMISS_SCRIPT).await;

    let hrefs: Vec<String> = page
        .evaluate(ANCHOR_HREFS_SCRIPT)
        .await
        .ok()
        .and_then(|v| v.into_value().ok())
        .unwrap_or_default();

    let _ = page.close().await;

    let mut targets = Vec::new();
    let mut seen = HashSet::new();
    for href in hrefs {
        let Ok(mut parsed) = Url::parse(&href) else { continue };
        parsed.set_fragment(None);
        if EXCLUDED_SCHEMES.contains(&parsed.scheme()) {
            continue;
        }
        let Some(host) = parsed.host_str() else { continue };
        if host_is_bot_blocked(host) {
            continue;
        }
        let key = parsed.to_string();
        if key.is_empty() || key.starts_with('#') {
            continue;
        }
        if seen.insert(key.clone()) {
            targets.push(key);
            if targets.len() >= MAX_LINKS_PER_PAGE {
                break;
            }
        }
    }

    let client = Client::new();
    let mut defects = Vec::new();
    for target in targets {
        if let Verdict::Broken(detail) = check_link(&client, &target, link_check_timeout).await {
            defects.push(Defect::new(
                DefectType::BrokenLink,
                Severity::Warning,
                format!("Broken link: {target}"),
                detail,
                url,
            ));
        }
    }
    defects
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_TIMEOUT: Duration = Duration::from_secs(8);

    #[test]
    fn bot_blocked_matches_exact_and_subdomain() {
        assert!(host_is_bot_blocked("linkedin.com"));
        assert!(host_is_bot_blocked("www.linkedin.com"));
        assert!(!host_is_bot_blocked("linkedin.com.evil.example"));
    }

    #[test]
    fn bot_blocked_is_case_insensitive() {
        assert!(host_is_bot_blocked("LinkedIn.com"));
    }

    #[tokio::test]
    async fn ok_status_from_head_short_circuits_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let verdict = check_link(&client, &format!("{}/ok", server.uri()), TEST_TIMEOUT).await;
        assert!(matches!(verdict, Verdict::Ok));
    }

    #[tokio::test]
    async fn not_found_on_head_is_confirmed_broken_without_a_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let verdict = check_link(&client, &format!("{}/missing", server.uri()), TEST_TIMEOUT).await;
        assert!(matches!(verdict, Verdict::Broken(_)));
    }

    #[tokio::test]
    async fn head_method_not_allowed_falls_back_to_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/weird"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/weird"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let verdict = check_link(&client, &format!("{}/weird", server.uri()), TEST_TIMEOUT).await;
        assert!(matches!(verdict, Verdict::Ok));
    }

    #[tokio::test]
    async fn server_error_is_uncertain_not_broken() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("HEAD", "/down").with_status(500).create_async().await;
        let _m2 = server.mock("GET", "/down").with_status(500).create_async().await;

        let client = Client::new();
        let verdict = check_link(&client, &format!("{}/down", server.url()), TEST_TIMEOUT).await;
        assert!(matches!(verdict, Verdict::Uncertain));
    }
}
