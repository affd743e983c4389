//! Source-level rewrites applied before markdown conversion.

use regex::Regex;
use std::sync::LazyLock;

/// Bare image URLs on the upstream media hosts.
static IMAGE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://(?:preview\.redd\.it|i\.redd\.it)/\S+?\.(?:png|jpg|jpeg|gif|webp)(?:\?\S+)?",
    )
    .expect("image URL regex should compile")
});

/// `r/name` and `u/name` shorthand starting at a word boundary.
static LOCAL_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<prefix>[ru])/(?P<name>[A-Za-z0-9_]+)")
        .expect("local reference regex should compile")
});

/// Wraps bare media-host image URLs in markdown image syntax.
///
/// URLs directly after `(` or `"` are already link targets or attribute
/// values and are left alone.
///
/// # Arguments
///
/// * `text`: Raw markdown
///
/// # Returns
///
/// Markdown with bare image URLs turned into `![](url)`
pub fn embed_image_links(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for m in IMAGE_URL_RE.find_iter(text) {
        let before = &text[..m.start()];
        result.push_str(&text[last..m.start()]);

        if before.ends_with('(') || before.ends_with('"') {
            result.push_str(m.as_str());
        } else {
            result.push_str("![](");
            result.push_str(m.as_str());
            result.push(')');
        }

        last = m.end();
    }

    result.push_str(&text[last..]);
    result
}

/// Turns `r/name` and `u/name` shorthand into local links.
///
/// References preceded by a word character or `/` are skipped, which
/// leaves URL paths such as `https://host/r/name` untouched.
///
/// # Arguments
///
/// * `text`: Raw markdown
///
/// # Returns
///
/// Markdown with shorthand rewritten to `[r/name](/r/name)`
pub fn rewrite_local_refs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;

    while let Some(caps) = LOCAL_REF_RE.captures_at(text, pos) {
        let (Some(whole), Some(prefix), Some(name)) =
            (caps.get(0), caps.name("prefix"), caps.name("name"))
        else {
            break;
        };

        if text[..whole.start()].ends_with('/') {
            // prefix is a single ASCII letter
            pos = whole.start() + 1;
            continue;
        }

        let reference = format!("{}/{}", prefix.as_str(), name.as_str());
        result.push_str(&text[last..whole.start()]);
        result.push_str(&format!("[{reference}](/{reference})"));

        last = whole.end();
        pos = whole.end();
    }

    result.push_str(&text[last..]);
    result
}
