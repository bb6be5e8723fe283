//! In-page JavaScript used by the testers to read DOM state the CDP
//! protocol itself doesn't expose (image natural size, scroll overflow,
//! a lightweight accessibility ruleset).

/// Every `<img>` with a non-empty, non-data-URI `src` that has finished
/// loading with a natural width of zero.
pub const BROKEN_IMAGES_SCRIPT: &str = r"
    (() => {
        return Array.from(document.querySelectorAll('img'))
            .filter(img => img.src && !img.src.startsWith('data:'))
            .filter(img => img.complete && img.naturalWidth === 0)
            .map(img => ({
                src: img.src,
                alt: img.alt || ''
            }));
    })()
";

/// Anchors resolved to absolute URLs, paired with their raw `href` so the
/// caller can apply its own scheme/host filtering.
pub const ANCHOR_HREFS_SCRIPT: &str = r"
    (() => {
        return Array.from(document.querySelectorAll('a[href]'))
            .map(a => a.href)
            .filter(href => href.length > 0);
    })()
";

/// Whether the document overflows its viewport horizontally.
pub const OVERFLOW_SCRIPT: &str = r"
    (() => {
        const el = document.documentElement;
        return {
            scrollWidth: el.scrollWidth,
            clientWidth: el.clientWidth
        };
    })()
";

/// A small, self-contained accessibility ruleset in the spirit of
/// axe-core's impact vocabulary (critical/serious/moderate/minor), covering
/// the checks that dominate real-world scans: missing alt text, unlabeled
/// form controls, empty links/buttons, missing document language, heading
/// level skips, and insufficient-looking color contrast is intentionally
/// not attempted here since it needs layout measurement this ruleset
/// doesn't do.
pub const ACCESSIBILITY_AUDIT_SCRIPT: &str = r#"
    (() => {
        const violations = [];
        const snippet = (el) => {
            const clone = el.cloneNode(false);
            const html = clone.outerHTML || '';
            return html.length > 160 ? html.slice(0, 160) + '...' : html;
        };
        const addViolation = (ruleId, help, description, impact, nodes) => {
            if (nodes.length === 0) return;
            violations.push({
                ruleId,
                help,
                description,
                impact,
                nodes: nodes.slice(0, 3).map(snippet)
            });
        };

        addViolation(
            'image-alt',
            'Images must have alternate text',
            'Informative images must have short, descriptive alternate text; decorative images must have an empty alt attribute',
            'critical',
            Array.from(document.querySelectorAll('img')).filter(img => !img.hasAttribute('alt'))
        );

        addViolation(
            'label',
            'Form elements must have labels',
            'Every form input must be programmatically associated with a label',
            'critical',
            Array.from(document.querySelectorAll('input, select, textarea')).filter(el => {
                if (el.type === 'hidden' || el.type === 'submit' || el.type === 'button') return false;
                if (el.getAttribute('aria-label') || el.getAttribute('aria-labelledby')) return false;
                if (el.id && document.querySelector(`label[for="${el.id}"]`)) return false;
                if (el.closest('label')) return false;
                return true;
            })
        );

        addViolation(
            'link-name',
            'Links must have discernible text',
            'Anchor elements must have a text alternative so assistive technology can announce their purpose',
            'serious',
            Array.from(document.querySelectorAll('a[href]')).filter(a => {
                const text = (a.textContent || '').trim();
                return text.length === 0 && !a.getAttribute('aria-label') && !a.querySelector('img[alt]');
            })
        );

        addViolation(
            'button-name',
            'Buttons must have discernible text',
            'Button elements must have a text alternative so assistive technology can announce their purpose',
            'serious',
            Array.from(document.querySelectorAll('button')).filter(btn => {
                const text = (btn.textContent || '').trim();
                return text.length === 0 && !btn.getAttribute('aria-label');
            })
        );

        addViolation(
            'html-has-lang',
            'Document must have a lang attribute',
            'The html element must have a lang attribute so screen readers announce the page in the right language',
            'serious',
            document.documentElement.hasAttribute('lang') ? [] : [document.documentElement]
        );

        const headings = Array.from(document.querySelectorAll('h1, h2, h3, h4, h5, h6'));
        const skipped = [];
        let previousLevel = 0;
        for (const heading of headings) {
            const level = parseInt(heading.tagName.substring(1), 10);
            if (previousLevel > 0 && level > previousLevel + 1) {
                skipped.push(heading);
            }
            previousLevel = level;
        }
        addViolation(
            'heading-order',
            'Heading levels should only increase by one',
            'Skipping heading levels makes the document outline harder to follow for screen reader users',
            'moderate',
            skipped
        );

        return violations;
    })()
"#;

/// Best-effort cookie-consent dismissal: clicks the first visible element
/// matching a fixed text or selector list. Never throws; returns whether it
/// clicked anything.
pub const COOKIE_CONSENT_DISMISS_SCRIPT: &str = r#"
    (() => {
        const texts = ['accept all', 'accept', 'ok', 'agree', 'allow all',
                        'aceptar todo', 'tout accepter', 'alle akzeptieren'];
        const isVisible = (el) => {
            const rect = el.getBoundingClientRect();
            return rect.width > 0 && rect.height > 0 && getComputedStyle(el).visibility !== 'hidden';
        };
        const candidates = Array.from(document.querySelectorAll('button, a, [role="button"]'));
        for (const el of candidates) {
            const text = (el.textContent || '').trim().toLowerCase();
            if (texts.includes(text) && isVisible(el)) {
                el.click();
                return true;
            }
        }
        const selectorMatches = document.querySelectorAll(
            "[id*='accept-all' i], [class*='accept-all' i], [aria-label*='Accept' i][role='button']"
        );
        for (const el of selectorMatches) {
            if (isVisible(el)) {
                el.click();
                return true;
            }
        }
        return false;
    })()
"#;
