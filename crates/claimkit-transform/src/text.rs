//! Text safety: escaping plain text into HTML and sanitizing HTML
//!
//! Both operations are total. Anything the policy does not allow is stripped
//! or escaped rather than reported.

use ammonia::Builder;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

/// Contract the engine relies on when building text claims
pub trait TextSafety {
    /// HTML-escape plain text, link bare URLs and emails, turn line breaks into `<br>`
    fn escape(&self, text: &str) -> String;

    /// Strip disallowed elements, attributes and URL schemes from HTML
    fn sanitize(&self, html: &str) -> String;
}

/// URL schemes links may use after sanitizing
pub const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// `rel` set on every link after sanitizing
pub const LINK_REL: &str = "nofollow noreferrer noopener";

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<url>https?://[^\s<>"']+)|(?P<email>[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,})"#,
    )
    .expect("link pattern is valid")
});

// Escaped forms of characters that terminate a URL.
const URL_TERMINATORS: [&str; 4] = ["&quot;", "&#39;", "&lt;", "&gt;"];

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Allow-list HTML policy backed by `ammonia`
pub struct HtmlPolicy {
    cleaner: Builder<'static>,
}

impl HtmlPolicy {
    /// Create the policy with the fixed allow-list
    pub fn new() -> Self {
        let mut cleaner = Builder::default();
        cleaner
            .url_schemes(HashSet::from(ALLOWED_SCHEMES))
            .link_rel(Some(LINK_REL));
        Self { cleaner }
    }
}

impl Default for HtmlPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HtmlPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlPolicy").finish_non_exhaustive()
    }
}

impl TextSafety for HtmlPolicy {
    fn escape(&self, text: &str) -> String {
        let escaped = escape_html(text);
        let linked = linkify(&escaped);
        line_breaks(&linked)
    }

    fn sanitize(&self, html: &str) -> String {
        self.cleaner.clean(html).to_string()
    }
}

/// Escape the characters that are significant in HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap bare URLs and email addresses of already-escaped text in links
fn linkify(escaped: &str) -> String {
    LINK_PATTERN
        .replace_all(escaped, |caps: &Captures<'_>| {
            if let Some(email) = caps.name("email") {
                let email = email.as_str();
                return format!("<a href=\"mailto:{}\">{}</a>", email, email);
            }

            let whole = &caps[0];
            let cut = URL_TERMINATORS
                .iter()
                .filter_map(|t| whole.find(t))
                .min()
                .unwrap_or(whole.len());
            let (candidate, tail) = whole.split_at(cut);
            let url = candidate.trim_end_matches(TRAILING_PUNCTUATION);
            let rest = &candidate[url.len()..];

            if url.len() <= "https://".len() {
                return whole.to_string();
            }
            format!("<a href=\"{}\">{}</a>{}{}", url, url, rest, tail)
        })
        .into_owned()
}

fn line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>\n")
}
