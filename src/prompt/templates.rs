//! Deterministic fallback remediation hints, one per `DefectType` (§4.5
//! tier 3). Pure: identical input always yields identical output.

use crate::model::{Defect, DefectType};

fn path_of(page: &str) -> String {
    url::Url::parse(page)
        .map(|u| {
            let p = u.path();
            if p.is_empty() { "/".to_string() } else { p.to_string() }
        })
        .unwrap_or_else(|_| page.to_string())
}

fn truncated(text: &str, n: usize) -> String {
    let t: String = text.chars().take(n).collect();
    if text.chars().count() > n { format!("{t}...") } else { t }
}

/// Renders the fallback hint for `defect`, substituting the page's path
/// and a truncation of its own details/title.
#[must_use]
pub fn render(defect: &Defect) -> String {
    let path = path_of(&defect.page);
    let detail = truncated(&defect.details, 160);
    match defect.kind {
        DefectType::ConsoleError => format!(
            "A script error occurred on {path}: {detail}. Check the browser console on that page, reproduce the error, and fix or guard the throwing code path."
        ),
        DefectType::NetworkError => format!(
            "A sub-resource request on {path} failed: {detail}. Verify the resource exists at that URL, check server logs for the failing request, and fix the broken reference or endpoint."
        ),
        DefectType::BrokenLink => format!(
            "A link on {path} points to a target that appears broken: {detail}. Update the link to a valid destination or remove it if the target no longer exists."
        ),
        DefectType::BrokenImage => format!(
            "An image on {path} failed to load: {detail}. Confirm the image file exists at its source path and that the server returns it successfully."
        ),
        DefectType::Accessibility => format!(
            "An accessibility issue was found on {path}: {detail}. Review the affected elements against WCAG guidance for this rule and adjust markup or attributes accordingly."
        ),
        DefectType::Responsive => format!(
            "{path} overflows horizontally at a common viewport width: {detail}. Check fixed-width elements and media on this page and make them responsive."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    #[test]
    fn rendering_is_pure() {
        let d = Defect::new(DefectType::BrokenImage, Severity::Warning, "t", "details", "http://site/about");
        assert_eq!(render(&d), render(&d));
    }

    #[test]
    fn substitutes_page_path() {
        let d = Defect::new(DefectType::NetworkError, Severity::Warning, "t", "oops", "http://site/contact");
        assert!(render(&d).contains("/contact"));
    }
}
