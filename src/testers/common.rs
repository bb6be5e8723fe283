//! Shared helpers used by more than one tester: noise-set filtering and
//! the settle delay after navigation.

use std::time::Duration;

/// Filter used by both the script-error and sub-resource testers: anything
/// matching one of these substrings originates from third-party
/// infrastructure a site owner cannot fix.
pub fn matches_noise(haystack: &str, patterns: &[&str]) -> bool {
    let lower = haystack.to_ascii_lowercase();
    patterns.iter().any(|p| lower.contains(p))
}

/// 500 ms window given to async errors / in-flight requests to settle
/// after navigation completes.
pub async fn settle(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

pub const CONSOLE_NOISE: &[&str] = &[
    "favicon",
    "/cdn-cgi/",
    "googletagmanager",
    "gtag/js",
    "google-analytics.com",
    "doubleclick",
    "clarity.ms",
    "failed to load resource",
];

pub const NETWORK_NOISE: &[&str] = &[
    "favicon",
    "google-analytics.com",
    "googletagmanager",
    "hotjar",
    "sentry",
    "cdn-cgi",
    "cloudflareinsights",
    "clarity.ms",
    "doubleclick",
    "googlesyndication",
];

/// First line of a (possibly multi-line) message.
#[must_use]
pub fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}

/// First `n` characters, by `char`, not byte.
#[must_use]
pub fn truncate_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}
