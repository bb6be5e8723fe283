//! Script-error tester (`console-error`, §4.2.1).

use chromiumoxide::Browser;
use chromiumoxide::cdp::js_protocol::runtime::{ConsoleApiCalledType, EventConsoleApiCalled, EventExceptionThrown};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::model::{Defect, DefectType, Severity};

use super::common::{matches_noise, settle, CONSOLE_NOISE};

enum RawEvent {
    Exception { first_line: String, stack_or_message: String },
    ConsoleError { text: String },
}

fn remote_object_text(obj: &chromiumoxide::cdp::js_protocol::runtime::RemoteObject) -> String {
    obj.description
        .clone()
        .or_else(|| obj.value.as_ref().map(std::string::ToString::to_string))
        .unwrap_or_default()
}

/// Attaches exception/console listeners before navigating, as required by
/// §4.2.1, then navigates and gives async errors a 500 ms settle window.
pub async fn run(browser: &Browser, url: &str) -> Vec<Defect> {
    let Ok(page) = browser.new_page("about:blank").await else {
        return Vec::new();
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<RawEvent>();

    if let Ok(mut stream) = page.event_listener::<EventExceptionThrown>().await {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                let details = &event.exception_details;
                let message = details
                    .exception
                    .as_ref()
                    .map(remote_object_text)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| details.text.clone());
                let stack_or_message = details
                    .stack_trace
                    .as_ref()
                    .and_then(|st| st.description.clone())
                    .unwrap_or_else(|| message.clone());
                let first_line = message.lines().next().unwrap_or(&message).to_string();
                let _ = tx.send(RawEvent::Exception { first_line, stack_or_message });
            }
        });
    }

    if let Ok(mut stream) = page.event_listener::<EventConsoleApiCalled>().await {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                if event.r#type != ConsoleApiCalledType::Error {
                    continue;
                }
                let text = event
                    .args
                    .iter()
                    .map(remote_object_text)
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = tx.send(RawEvent::ConsoleError { text });
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
            RawEvent::Exception { first_line, stack_or_message } => {
                if matches_noise(&stack_or_message, CONSOLE_NOISE) {
                    continue;
                }
                defects.push(Defect::new(
                    DefectType::ConsoleError,
                    Severity::Critical,
                    format!("Uncaught exception: {first_line}"),
                    stack_or_message,
                    url,
                ));
            }
            RawEvent::ConsoleError { text } => {
                if matches_noise(&text, CONSOLE_NOISE) {
                    continue;
                }
                let truncated = super::common::truncate_chars(&text, 100);
                defects.push(Defect::new(
                    DefectType::ConsoleError,
                    Severity::Warning,
                    format!("Console error: {truncated}"),
                    text,
                    url,
                ));
            }
        }
    }

    let _ = page.close().await;
    defects
}
