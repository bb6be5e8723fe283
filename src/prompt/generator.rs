//! Tiered remediation-hint generation: cache → external LLM → template
//! (§4.5).

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::model::Defect;

use super::cache::PromptCache;
use super::templates;

/// `<type>::<title>::<first 12 hex chars of SHA-256(details)>` — coarser
/// than the defect fingerprint so near-identical details share a hint.
#[must_use]
pub fn cache_key(defect: &Defect) -> String {
    let mut hasher = Sha256::new();
    hasher.update(defect.details.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest[..6].iter().map(|b| format!("{b:02x}")).collect();
    format!("{}::{}::{hex}", defect.kind, defect.title)
}

pub struct GenerationResult {
    pub defects: Vec<Defect>,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub used_fallback: bool,
    pub fallback_reason: Option<String>,
}

const SYSTEM_INSTRUCTION: &str = "You are a web QA assistant. For each defect in the user's JSON batch, \
write a plain-language, 2-4 sentence, stack-agnostic remediation hint. \
Respond with a JSON array of strings, one per defect, in the same order, and nothing else.";

async fn call_external(client: &reqwest::Client, endpoint: &str, api_key: &str, batch: &[&Defect]) -> anyhow::Result<Vec<String>> {
    let user_content = serde_json::to_string(
        &batch
            .iter()
            .map(|d| serde_json::json!({"type": d.kind.as_str(), "title": d.title, "details": d.details}))
            .collect::<Vec<_>>(),
    )?;

    let body = serde_json::json!({
        "model": "gpt-4o-mini",
        "messages": [
            {"role": "system", "content": SYSTEM_INSTRUCTION},
            {"role": "user", "content": user_content},
        ],
    });

    let resp = client
        .post(endpoint)
        .bearer_auth(api_key)
        .json(&body)
        .timeout(std::time::Duration::from_secs(30))
        .send()
        .await?
        .error_for_status()?;

    let value: serde_json::Value = resp.json().await?;
    let text = value["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("response carried no message content"))?;

    extract_json_array(text)
}

/// Extracts the first top-level JSON array of strings from `text`,
/// tolerating surrounding prose the model may have added despite
/// instructions.
fn extract_json_array(text: &str) -> anyhow::Result<Vec<String>> {
    let start = text.find('[').ok_or_else(|| anyhow::anyhow!("no JSON array found in response"))?;
    let end = text.rfind(']').ok_or_else(|| anyhow::anyhow!("no JSON array found in response"))?;
    if end < start {
        anyhow::bail!("malformed JSON array in response");
    }
    let slice = &text[start..=end];
    Ok(serde_json::from_str(slice)?)
}

/// Runs the full tiered strategy over `defects`, returning them in the
/// same order with `fix_prompt` populated.
pub async fn generate(defects: Vec<Defect>, cache: &PromptCache, api_key: Option<&str>, endpoint: &str) -> GenerationResult {
    let mut slots: Vec<Option<Defect>> = vec![None; defects.len()];
    let mut cache_hits = 0;
    let mut cache_misses = 0;
    let mut uncached = Vec::new();

    for (i, defect) in defects.iter().enumerate() {
        let key = cache_key(defect);
        if let Some(hint) = cache.get(&key).await {
            let mut d = defect.clone();
            d.fix_prompt = hint;
            slots[i] = Some(d);
            cache_hits += 1;
        } else {
            cache_misses += 1;
            uncached.push(i);
        }
    }

    let mut batch_order: Vec<String> = Vec::new();
    let mut batches: HashMap<String, Vec<usize>> = HashMap::new();
    for &i in &uncached {
        let page = defects[i].page.clone();
        if !batches.contains_key(&page) {
            batch_order.push(page.clone());
        }
        batches.entry(page).or_default().push(i);
    }

    let client = reqwest::Client::new();
    let mut any_attempted = false;
    let mut any_succeeded = false;
    let mut last_reason = None;

    for page in batch_order {
        let indices = &batches[&page];
        any_attempted = true;
        let batch_defects: Vec<&Defect> = indices.iter().map(|&i| &defects[i]).collect();

        let hints = match api_key {
            None => {
                last_reason = Some("no external LLM credential configured".to_string());
                None
            }
            Some(key) => match call_external(&client, endpoint, key, &batch_defects).await {
                Ok(hints) if hints.len() == batch_defects.len() => {
                    any_succeeded = true;
                    Some(hints)
                }
                Ok(_) => {
                    last_reason = Some("external generator returned a mismatched number of hints".to_string());
                    None
                }
                Err(e) => {
                    warn!("external remediation-hint call failed: {e}");
                    last_reason = Some(format!("external generator call failed: {e}"));
                    None
                }
            },
        };

        let hints = hints.unwrap_or_else(|| batch_defects.iter().map(|d| templates::render(d)).collect());

        for (&i, hint) in indices.iter().zip(hints.into_iter()) {
            let mut d = defects[i].clone();
            d.fix_prompt = hint.clone();
            cache.put(cache_key(&d), hint).await;
            slots[i] = Some(d);
        }
    }

    let used_fallback = any_attempted && !any_succeeded;

    GenerationResult {
        defects: slots.into_iter().map(|d| d.expect("every index populated by cache hit or batch")).collect(),
        cache_hits,
        cache_misses,
        used_fallback,
        fallback_reason: if used_fallback { last_reason } else { None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DefectType, Severity};

    #[test]
    fn key_is_stable_for_identical_details() {
        let a = Defect::new(DefectType::ConsoleError, Severity::Warning, "t", "boom", "p1");
        let b = Defect::new(DefectType::ConsoleError, Severity::Warning, "t", "boom", "p2");
        assert_eq!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn extracts_array_from_surrounding_prose() {
        let text = "Sure, here you go:\n[\"one\", \"two\"]\nHope that helps!";
        assert_eq!(extract_json_array(text).unwrap(), vec!["one".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn no_credential_falls_back_to_templates_and_raises_flag() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::load(dir.path().join("c.json")).await;
        let defects = vec![Defect::new(DefectType::BrokenImage, Severity::Warning, "t", "d", "http://site/")];
        let result = generate(defects, &cache, None, "http://unused").await;
        assert!(result.used_fallback);
        assert_eq!(result.cache_misses, 1);
        assert!(!result.defects[0].fix_prompt.is_empty());
    }

    #[tokio::test]
    async fn cache_hit_short_circuits_generation() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PromptCache::load(dir.path().join("c.json")).await;
        let defect = Defect::new(DefectType::BrokenImage, Severity::Warning, "t", "d", "http://site/");
        cache.put(cache_key(&defect), "cached hint".to_string()).await;

        let result = generate(vec![defect], &cache, None, "http://unused").await;
        assert_eq!(result.cache_hits, 1);
        assert_eq!(result.cache_misses, 0);
        assert!(!result.used_fallback);
        assert_eq!(result.defects[0].fix_prompt, "cached hint");
    }
}
