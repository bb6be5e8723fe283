//! Sub-resource tester (`network-error`, §4.2.2).

use std::sync::Arc;

use chromiumoxide::Browser;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventRequestWillBeSent, EventResponseReceived, RequestId,
};
use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::model::{Defect, DefectType, Severity};

use super::common::{matches_noise, settle, NETWORK_NOISE};

enum RawEvent {
    Response { url: String, method: String, status: i64 },
    Failed { url: String, method: String, error_text: String },
}

fn path_of(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| {
            let p = u.path();
            if p.is_empty() { "/".to_string() } else { p.to_string() }
        })
        .unwrap_or_else(|_| url.to_string())
}

/// Attaches response/failure listeners before navigating, as required by
/// §4.2.2, then gives in-flight requests a 500 ms settle window.
pub async fn run(browser: &Browser, url: &str) -> Vec<Defect> {
    let Ok(page) = browser.new_page("about:blank").await else {
        return Vec::new();
    };

    let requests: Arc<DashMap<RequestId, (String, String)>> = Arc::new(DashMap::new());
    let (tx, mut rx) = mpsc::unbounded_channel::<RawEvent>();

    if let Ok(mut stream) = page.event_listener::<EventRequestWillBeSent>().await {
        let requests = requests.clone();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                requests.insert(
                    event.request_id.clone(),
                    (event.request.url.clone(), event.request.method.clone()),
                );
            }
        });
    }

    if let Ok(mut stream) = page.event_listener::<EventResponseReceived>().await {
        let tx = tx.clone();
        let requests = requests.clone();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                let status = event.response.status;
                if status < 400 {
                    continue;
                }
                let method = requests
                    .get(&event.request_id)
                    .map(|e| e.1.clone())
                    .unwrap_or_else(|| "GET".to_string());
                let _ = tx.send(RawEvent::Response {
                    url: event.response.url.clone(),
                    method,
                    status,
                });
            }
        });
    }

    if let Ok(mut stream) = page.event_listener::<EventLoadingFailed>().await {
        let tx = tx.clone();
        let requests = requests.clone();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                let (req_url, method) = requests
                    .get(&event.request_id)
                    .map(|e| e.value().clone())
                    .unwrap_or_else(|| (String::new(), "GET".to_string()));
                let _ = tx.send(RawEvent::Failed {
                    url: req_url,
                    method,
                    error_text: event.error_text.clone(),
                });
            }
        });
    }
    drop(tx);

    let _ = tokio::time::timeout(std::time::Duration::from_secs(15), page.goto(url)).await;
    let _ = page.wait_for_navigation().await;
    settle(500).await;

    let mut defects = Vec::new();
    while let Ok(raw) = rx.try_recv() {
        match raw {
            RawEvent::Response { url: resp_url, method, status } => {
                if resp_url == url || matches_noise(&resp_url, NETWORK_NOISE) {
                    continue;
                }
                let severity = if status >= 500 { Severity::Critical } else { Severity::Warning };
                let kind = if status >= 500 { "Server error" } else { "Client error" };
                defects.push(Defect::new(
                    DefectType::NetworkError,
                    severity,
                    format!("{kind} {status} on {}", path_of(&resp_url)),
                    format!("{method} {resp_url} returned {status}"),
                    url,
                ));
            }
            RawEvent::Failed { url: req_url, method, error_text } => {
                if req_url.is_empty() || req_url == url || matches_noise(&req_url, NETWORK_NOISE) {
                    continue;
                }
                defects.push(Defect::new(
                    DefectType::NetworkError,
                    Severity::Critical,
                    format!("Request failed: {}", path_of(&req_url)),
                    format!("{method} {req_url} failed: {error_text}"),
                    url,
                ));
            }
        }
    }

    let _ = page.close().await;
    defects
}
