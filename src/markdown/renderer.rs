//! Markdown rendering to sanitized HTML.

use ammonia::Builder;
use comrak::Options;

use super::rewrite::{embed_image_links, rewrite_local_refs};
use super::sanitize::{linkify, sanitizer};
use crate::comments::CommentNode;
use crate::listing::Listing;
use crate::post::Post;

/// Renders user-supplied markdown to HTML safe for direct embedding.
///
/// Rendering runs five ordered stages: bare image URL embedding,
/// `r/` and `u/` shorthand rewriting, markdown conversion with comrak,
/// allow-list sanitization with ammonia, and linking of remaining bare
/// URLs. Output depends only on the input text, so rendering the same
/// text twice yields identical HTML.
pub struct MarkdownRenderer<'a> {
    options: Options<'a>,
    sanitizer: Builder<'static>,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates renderer with extended markdown options.
    ///
    /// Configures:
    /// - Tables, strikethrough, footnotes, description lists
    /// - Hard line breaks (every newline becomes `<br>`)
    /// - Raw HTML passed through, since the sanitizer removes it afterwards
    pub fn new() -> Self {
        let mut options = Options::default();

        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.footnotes = true;
        options.extension.description_lists = true;

        options.render.hardbreaks = true;
        options.render.unsafe_ = true;

        Self {
            options,
            sanitizer: sanitizer(),
        }
    }

    /// Renders markdown content to sanitized HTML.
    ///
    /// # Arguments
    ///
    /// * `content`: Raw markdown
    ///
    /// # Returns
    ///
    /// Sanitized HTML, or an empty string for empty input
    pub fn render(&self, content: &str) -> String {
        if content.is_empty() {
            return String::new();
        }

        let text = embed_image_links(content);
        let text = rewrite_local_refs(&text);
        let html = self.to_html(&text);
        let html = self.sanitize(&html);
        linkify(&html)
    }

    /// Converts markdown to unsanitized HTML.
    pub fn to_html(&self, content: &str) -> String {
        comrak::markdown_to_html(content, &self.options)
    }

    /// Strips every element and attribute outside the allow-list.
    pub fn sanitize(&self, html: &str) -> String {
        self.sanitizer.clean(html).to_string()
    }

    /// Populates rendered fields of a post and every comment in its tree.
    ///
    /// Sets `brief_html` and `selftext_html`, then `body_html` on each
    /// comment. Placeholders have no content and are skipped.
    pub fn enrich_post(&self, post: &mut Post) {
        post.brief_html = Some(self.render(&post.brief));
        post.selftext_html = Some(self.render(post.selftext.as_deref().unwrap_or("")));

        let mut stack: Vec<&mut CommentNode> = post.comments.iter_mut().collect();
        while let Some(node) = stack.pop() {
            if let CommentNode::Comment(comment) = node {
                comment.body_html = Some(self.render(&comment.body));
                stack.extend(comment.children.iter_mut());
            }
        }
    }

    /// Enriches every post of a listing.
    pub fn enrich_listing(&self, listing: &mut Listing) {
        for post in &mut listing.posts {
            self.enrich_post(post);
        }
    }
}

impl<'a> Default for MarkdownRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}
