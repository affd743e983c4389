//! HTML allow-list sanitization and bare URL linking.

use ammonia::Builder;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Elements kept by the sanitizer.
pub const ALLOWED_TAGS: &[&str] = &[
    "a",
    "blockquote",
    "br",
    "code",
    "em",
    "hr",
    "img",
    "li",
    "ol",
    "p",
    "pre",
    "strong",
    "ul",
];

/// Attributes kept per element. No attribute is allowed on other elements.
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "rel"]),
    ("img", &["src", "alt", "title", "loading"]),
];

static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("URL regex should compile"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex should compile"));

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\''];

/// Builds the allow-list sanitizer.
///
/// Disallowed elements are stripped with their text kept, except script
/// and style whose contents are dropped too. No `rel` is forced onto
/// links since `rel` is itself an allowed attribute.
pub fn sanitizer() -> Builder<'static> {
    let tag_attributes: HashMap<&'static str, HashSet<&'static str>> = ALLOWED_ATTRIBUTES
        .iter()
        .map(|(tag, attrs)| (*tag, attrs.iter().copied().collect()))
        .collect();

    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .tag_attributes(tag_attributes)
        .generic_attributes(HashSet::new())
        .link_rel(None);
    builder
}

/// Converts bare URLs in text content into anchors.
///
/// Text inside existing anchors and inside tags is left untouched.
///
/// # Arguments
///
/// * `html`: Sanitized HTML
///
/// # Returns
///
/// HTML with bare URLs wrapped in `<a href="…" rel="nofollow">`
pub fn linkify(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut anchor_depth = 0usize;
    let mut last = 0;

    for tag in TAG_RE.find_iter(html) {
        push_text(&mut result, &html[last..tag.start()], anchor_depth > 0);

        let name = tag_name(tag.as_str());
        if name.eq_ignore_ascii_case("a") {
            anchor_depth += 1;
        } else if name.eq_ignore_ascii_case("/a") {
            anchor_depth = anchor_depth.saturating_sub(1);
        }

        result.push_str(tag.as_str());
        last = tag.end();
    }

    push_text(&mut result, &html[last..], anchor_depth > 0);
    result
}

/// Returns `a` for `<a href=…>` and `/a` for `</a>`.
fn tag_name(tag: &str) -> &str {
    let inner = tag.trim_start_matches('<');
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '>')
        .unwrap_or(inner.len());
    inner[..end].trim_end_matches('/')
}

fn push_text(out: &mut String, text: &str, inside_anchor: bool) {
    if inside_anchor {
        out.push_str(text);
        return;
    }

    let mut last = 0;
    for m in BARE_URL_RE.find_iter(text) {
        let url = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if url.len() <= "https://".len() {
            continue;
        }
        let end = m.start() + url.len();

        out.push_str(&text[last..m.start()]);
        out.push_str("<a href=\"");
        out.push_str(url);
        out.push_str("\" rel=\"nofollow\">");
        out.push_str(url);
        out.push_str("</a>");
        last = end;
    }
    out.push_str(&text[last..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(html: &str) -> String {
        sanitizer().clean(html).to_string()
    }

    #[test]
    fn test_script_removed_with_contents() {
        // Arrange
        let html = "<script>alert(1)</script>hello";

        // Act
        let cleaned = clean(html);

        // Assert
        assert_eq!(cleaned, "hello");
    }

    #[test]
    fn test_disallowed_tags_stripped_text_kept() {
        // Arrange
        let html = "<h1>Title</h1><table><tr><td>cell</td></tr></table><p>ok</p>";

        // Act
        let cleaned = clean(html);

        // Assert
        assert!(!cleaned.contains("<h1"), "{}", cleaned);
        assert!(!cleaned.contains("<table"), "{}", cleaned);
        assert!(cleaned.contains("Title"));
        assert!(cleaned.contains("cell"));
        assert!(cleaned.contains("<p>ok</p>"));
    }

    #[test]
    fn test_disallowed_attributes_removed() {
        // Arrange
        let html = r#"<p class="x" style="color:red" onclick="evil()"><a href="/r/rust" rel="nofollow" target="_blank" onclick="x()">r/rust</a><img src="https://i.redd.it/a.png" alt="" width="9" loading="lazy"></p>"#;

        // Act
        let cleaned = clean(html);

        // Assert
        for forbidden in ["class=", "style=", "onclick=", "target=", "width="] {
            assert!(!cleaned.contains(forbidden), "{} in {}", forbidden, cleaned);
        }
        assert!(cleaned.contains(r#"href="/r/rust""#));
        assert!(cleaned.contains(r#"rel="nofollow""#));
        assert!(cleaned.contains(r#"src="https://i.redd.it/a.png""#));
        assert!(cleaned.contains(r#"loading="lazy""#));
    }

    #[test]
    fn test_javascript_urls_dropped() {
        let cleaned = clean(r#"<a href="javascript:alert(1)">x</a>"#);

        assert!(!cleaned.contains("javascript"), "{}", cleaned);
        assert!(cleaned.contains('x'));
    }

    #[test]
    fn test_linkify_bare_url() {
        // Arrange
        let html = "<p>see https://example.com/page.</p>";

        // Act
        let linked = linkify(html);

        // Assert
        assert_eq!(
            linked,
            r#"<p>see <a href="https://example.com/page" rel="nofollow">https://example.com/page</a>.</p>"#
        );
    }

    #[test]
    fn test_linkify_skips_existing_anchors_and_attributes() {
        // Arrange
        let html = r#"<p><a href="https://example.com">https://example.com</a> <img src="https://i.redd.it/a.png" alt=""></p>"#;

        // Act
        let linked = linkify(html);

        // Assert
        assert_eq!(linked, html);
    }

    #[test]
    fn test_linkify_resumes_after_anchor() {
        let html = r#"<a href="/r/x">r/x</a> http://example.org"#;

        let linked = linkify(html);

        assert!(linked.ends_with(
            r#"<a href="http://example.org" rel="nofollow">http://example.org</a>"#
        ));
    }

    #[test]
    fn test_linkify_keeps_escaped_query() {
        let html = "<p>https://example.com/?a=1&amp;b=2</p>";

        let linked = linkify(html);

        assert!(linked.contains(r#"href="https://example.com/?a=1&amp;b=2""#));
    }
}
