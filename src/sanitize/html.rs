//! Regex-based HTML sanitizer.
//!
//! Removes a fixed denylist of dangerous tags, event-handler attributes and
//! script-carrying URL schemes from user-supplied HTML. This is a
//! best-effort filter built on tag-matching regexes, not an HTML parser: it
//! does not guarantee complete XSS elimination for adversarial nested or
//! obfuscated markup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tags stripped from outbound HTML, including their content when paired.
const DANGEROUS_TAGS: &[&str] = &[
    "script", "iframe", "object", "embed", "form", "input", "button", "select", "textarea",
    "applet", "meta", "link", "base", "frame", "frameset", "layer", "ilayer", "bgsound", "xml",
];

/// Event-handler attributes stripped from outbound HTML.
const EVENT_ATTRIBUTES: &[&str] = &[
    "onclick",
    "ondblclick",
    "onload",
    "onunload",
    "onerror",
    "onabort",
    "onblur",
    "onchange",
    "onfocus",
    "oninput",
    "onkeydown",
    "onkeypress",
    "onkeyup",
    "onmousedown",
    "onmousemove",
    "onmouseout",
    "onmouseover",
    "onmouseup",
    "onmousewheel",
    "onwheel",
    "onscroll",
    "onsubmit",
    "onreset",
    "onresize",
    "onselect",
    "oncontextmenu",
    "ondrag",
    "ondrop",
    "onpointerdown",
    "onanimationstart",
    "ontransitionend",
];

// One regex per tag for the paired form; the regex crate has no
// backreferences, so a single combined pattern cannot match open/close pairs.
static PAIRED_TAG_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    DANGEROUS_TAGS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<\s*{tag}\b[^>]*>.*?<\s*/\s*{tag}\s*>"))
                .expect("paired tag pattern")
        })
        .collect()
});

// Stray open, close, or self-closing dangerous tags left over after the
// paired pass (unclosed `<script ...>`, lone `</iframe>`, `<meta ... />`).
static SINGLE_TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let tags = DANGEROUS_TAGS.join("|");
    Regex::new(&format!(r"(?i)<\s*/?\s*(?:{tags})\b[^>]*/?\s*>")).expect("single tag pattern")
});

static EVENT_ATTRIBUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let attrs = EVENT_ATTRIBUTES.join("|");
    Regex::new(&format!(
        r#"(?i)\s+(?:{attrs})\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#
    ))
    .expect("event attribute pattern")
});

// href/src values starting with a script-carrying scheme, quoted or not.
static URL_SCHEME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(href|src)\s*=\s*(?:"\s*(?:javascript|data):[^"]*"|'\s*(?:javascript|data):[^']*'|\s*(?:javascript|data):[^\s>]*)"#,
    )
    .expect("url scheme pattern")
});

// Any remaining attribute whose value is a dangerous scheme, regardless of
// attribute name (e.g. style/formaction/poster carrying vbscript:).
static SCHEME_VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)=\s*(?:"\s*(?:javascript|vbscript|data):[^"]*"|'\s*(?:javascript|vbscript|data):[^']*'|\s*(?:javascript|vbscript|data):[^\s>]*)"#,
    )
    .expect("scheme value pattern")
});

/// Strip dangerous tags, event handlers and script-carrying URL schemes
/// from an HTML fragment.
///
/// Best-effort: regex-based, case-insensitive, applied in passes (paired
/// tags with content, stray tags, `href`/`src` scheme neutralization to
/// `"#"`, event-handler removal, remaining scheme-valued attributes).
///
/// # Examples
///
/// ```
/// use metigan::sanitize::sanitize_html;
///
/// let clean = sanitize_html("<script>alert(1)</script><p>ok</p>");
/// assert_eq!(clean, "<p>ok</p>");
///
/// let clean = sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#);
/// assert_eq!(clean, r##"<a href="#">x</a>"##);
/// ```
pub fn sanitize_html(input: &str) -> String {
    let mut out = input.to_string();

    for pattern in PAIRED_TAG_PATTERNS.iter() {
        out = pattern.replace_all(&out, "").into_owned();
    }
    out = SINGLE_TAG_PATTERN.replace_all(&out, "").into_owned();
    out = URL_SCHEME_PATTERN
        .replace_all(&out, r##"$1="#""##)
        .into_owned();
    out = EVENT_ATTRIBUTE_PATTERN.replace_all(&out, "").into_owned();
    out = SCHEME_VALUE_PATTERN.replace_all(&out, r##"="#""##).into_owned();

    out
}
