//! Post normalization.
//!
//! Maps one raw upstream link object into a [`Post`]. Derived fields
//! (relative time, brief, media URLs, subreddit icon) are computed from the
//! object alone; nothing here touches the network.

use serde::Serialize;
use serde_json::Value;

use crate::comments::CommentNode;
use crate::error::{Error, Result};
use crate::fullname::Fullname;
use crate::util::{
    format_relative_time, opt_blob, opt_bool, opt_f64, opt_i64, opt_object, opt_str, opt_u64,
    req_str, truncate_brief,
};

/// Upstream site root, prepended to relative permalinks.
pub const UPSTREAM_BASE_URL: &str = "https://www.reddit.com";

/// Brief length for single post views.
pub const DEFAULT_BRIEF_LEN: usize = 150;

/// Brief length for listing views.
pub const LISTING_BRIEF_LEN: usize = 500;

/// Post hints whose override URL is shown as the post image.
const IMAGE_HINTS: &[&str] = &["image", "link", "rich:video"];

const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".gifv", ".bmp", ".svg",
];

const IMAGE_HOSTS: &[&str] = &[
    "imgur.com",
    "i.redd.it",
    "preview.redd.it",
    "giphy.com",
    "gfycat.com",
];

/// Normalized link post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: String,
    pub fullname: Fullname,
    pub subreddit: String,
    pub subreddit_full: String,
    pub subreddit_id: Option<String>,
    pub author: String,
    pub author_fullname: Option<String>,
    pub permalink: String,
    pub url: String,
    pub domain: String,
    pub title: Option<String>,
    pub selftext: Option<String>,
    pub brief: String,
    pub flair: Option<String>,
    pub is_self: bool,
    pub nsfw: bool,
    pub spoiler: bool,
    pub locked: bool,
    pub stickied: bool,
    pub archived: bool,
    pub is_video: bool,
    pub score: Option<i64>,
    pub upvotes: Option<i64>,
    pub downvotes: Option<i64>,
    pub ratio: Option<f64>,
    pub comments_count: Option<u64>,
    pub awards: Option<u64>,
    pub created_utc: Option<f64>,
    pub edited: Option<f64>,
    pub created_rel: String,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub video_mp4: Option<String>,
    pub video_hls: Option<String>,
    pub subreddit_icon: Option<String>,
    pub media: Option<Value>,
    pub preview: Option<Value>,
    pub gallery: Option<Value>,
    /// Rendered brief, set by enrichment.
    pub brief_html: Option<String>,
    /// Rendered selftext, set by enrichment.
    pub selftext_html: Option<String>,
    /// Comment forest, empty for listing entries.
    pub comments: Vec<CommentNode>,
}

/// Video and icon references pulled from nested media objects.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MediaRefs {
    pub video_mp4: Option<String>,
    pub video_hls: Option<String>,
    pub subreddit_icon: Option<String>,
}

/// Builds [`Post`] records from raw link objects.
#[derive(Debug, Clone)]
pub struct PostNormalizer {
    base_url: String,
    brief_len: usize,
}

impl PostNormalizer {
    /// Creates normalizer for the given upstream root and brief length.
    pub fn new(base_url: impl Into<String>, brief_len: usize) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            brief_len,
        }
    }

    /// Normalizer used for listing pages, with the longer brief.
    pub fn for_listing(base_url: impl Into<String>) -> Self {
        Self::new(base_url, LISTING_BRIEF_LEN)
    }

    /// Normalizes one raw link object.
    ///
    /// # Arguments
    ///
    /// * `raw`: The `data` object of a `t3` thing
    ///
    /// # Returns
    ///
    /// Post with derived fields populated and rendered fields empty
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] when an identifying field is missing
    pub fn normalize(&self, raw: &Value) -> Result<Post> {
        if !raw.is_object() {
            return Err(Error::Malformed("post is not an object".to_string()));
        }

        let id = req_str(raw, "id")?;
        let fullname: Fullname = req_str(raw, "name")?.parse()?;
        let subreddit = req_str(raw, "subreddit")?;
        let subreddit_full = req_str(raw, "subreddit_name_prefixed")?;
        let author = req_str(raw, "author")?;
        let permalink = req_str(raw, "permalink")?;
        let url = req_str(raw, "url")?;
        let domain = req_str(raw, "domain")?;

        let selftext = opt_str(raw, "selftext");
        let brief = truncate_brief(selftext.as_deref().unwrap_or(""), self.brief_len);
        let created_utc = opt_f64(raw, "created_utc");
        let media_refs = extract_media_refs(raw);
        let image = detect_image(raw, &url, &domain);

        Ok(Post {
            id,
            fullname,
            subreddit,
            subreddit_full,
            subreddit_id: opt_str(raw, "subreddit_id"),
            author,
            author_fullname: opt_str(raw, "author_fullname"),
            permalink: format!("{}{}", self.base_url, permalink),
            url,
            domain,
            title: opt_str(raw, "title"),
            selftext,
            brief,
            flair: opt_str(raw, "link_flair_text"),
            is_self: opt_bool(raw, "is_self"),
            nsfw: opt_bool(raw, "over_18"),
            spoiler: opt_bool(raw, "spoiler"),
            locked: opt_bool(raw, "locked"),
            stickied: opt_bool(raw, "stickied"),
            archived: opt_bool(raw, "archived"),
            is_video: opt_bool(raw, "is_video"),
            score: opt_i64(raw, "score"),
            upvotes: opt_i64(raw, "ups"),
            downvotes: opt_i64(raw, "downs"),
            ratio: opt_f64(raw, "upvote_ratio"),
            comments_count: opt_u64(raw, "num_comments"),
            awards: opt_u64(raw, "total_awards_received"),
            created_utc,
            // `edited` is `false` or an edit timestamp
            edited: opt_f64(raw, "edited"),
            created_rel: format_relative_time(created_utc),
            image,
            thumbnail: opt_str(raw, "thumbnail"),
            video_mp4: media_refs.video_mp4,
            video_hls: media_refs.video_hls,
            subreddit_icon: media_refs.subreddit_icon,
            media: opt_blob(raw, "secure_media"),
            preview: opt_blob(raw, "preview"),
            gallery: opt_blob(raw, "gallery_data"),
            brief_html: None,
            selftext_html: None,
            comments: Vec::new(),
        })
    }
}

impl Default for PostNormalizer {
    fn default() -> Self {
        Self::new(UPSTREAM_BASE_URL, DEFAULT_BRIEF_LEN)
    }
}

/// Normalizes a raw link object with default settings.
///
/// # Errors
///
/// Returns [`Error::Malformed`] when an identifying field is missing
pub fn normalize_post(raw: &Value) -> Result<Post> {
    PostNormalizer::default().normalize(raw)
}

/// Picks the image URL for a post, if any.
///
/// Checks in order: an image-like post hint, an image file extension on
/// the URL path, then a known image host.
fn detect_image(raw: &Value, url: &str, domain: &str) -> Option<String> {
    let override_url = opt_str(raw, "url_overridden_by_dest");

    let hinted = raw
        .get("post_hint")
        .and_then(Value::as_str)
        .is_some_and(|hint| IMAGE_HINTS.contains(&hint));

    if hinted || has_image_extension(url) || is_image_host(domain) {
        return override_url.or_else(|| Some(url.to_string()));
    }

    None
}

/// Case-insensitive extension check with the query string stripped.
pub fn has_image_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    let path = lower.split('?').next().unwrap_or("");
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

pub fn is_image_host(domain: &str) -> bool {
    let lower = domain.to_lowercase();
    IMAGE_HOSTS.contains(&lower.as_str())
}

/// Extracts hosted video URLs and the subreddit icon.
///
/// Nested structures that are missing or of the wrong shape are treated as
/// absent rather than failing the post.
pub fn extract_media_refs(raw: &Value) -> MediaRefs {
    let video = opt_object(raw, "secure_media")
        .or_else(|| opt_object(raw, "media"))
        .and_then(|media| opt_object(media, "reddit_video"));

    let subreddit_icon = opt_object(raw, "sr_detail").and_then(|detail| {
        ["icon_img", "community_icon"]
            .iter()
            .filter_map(|key| opt_str(detail, key))
            .find(|icon| !icon.is_empty())
            .map(|icon| icon.replace("&amp;", "&"))
    });

    MediaRefs {
        video_mp4: video.and_then(|v| opt_str(v, "fallback_url")),
        video_hls: video.and_then(|v| opt_str(v, "hls_url")),
        subreddit_icon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ELLIPSIS;
    use serde_json::json;

    fn raw_post() -> Value {
        json!({
            "id": "1abcde",
            "name": "t3_1abcde",
            "subreddit": "rust",
            "subreddit_name_prefixed": "r/rust",
            "subreddit_id": "t5_2s7lj",
            "author": "ferris",
            "author_fullname": "t2_ferris",
            "permalink": "/r/rust/comments/1abcde/hello/",
            "url": "https://www.reddit.com/r/rust/comments/1abcde/hello/",
            "domain": "self.rust",
            "title": "Hello",
            "selftext": "Body text",
            "is_self": true,
            "score": 42,
            "ups": 42,
            "downs": 0,
            "upvote_ratio": 0.98,
            "num_comments": 7,
            "created_utc": 1_700_000_000.0,
            "edited": false,
            "over_18": false
        })
    }

    #[test]
    fn test_normalize_required_and_optional_fields() {
        // Arrange
        let raw = raw_post();

        // Act
        let post = normalize_post(&raw).expect("Should normalize");

        // Assert
        assert_eq!(post.id, "1abcde");
        assert_eq!(post.fullname.to_string(), "t3_1abcde");
        assert_eq!(post.subreddit_full, "r/rust");
        assert_eq!(
            post.permalink,
            "https://www.reddit.com/r/rust/comments/1abcde/hello/"
        );
        assert_eq!(post.score, Some(42));
        assert_eq!(post.comments_count, Some(7));
        assert_eq!(post.edited, None);
        assert!(post.is_self);
        assert!(!post.nsfw);
        assert_eq!(post.brief, "Body text");
        assert!(!post.created_rel.is_empty());
        assert!(post.brief_html.is_none(), "Rendering happens at enrichment");
        assert!(post.selftext_html.is_none());
        assert!(post.comments.is_empty());
    }

    #[test]
    fn test_normalize_tolerates_missing_optional_fields() {
        // Arrange
        let raw = json!({
            "id": "x",
            "name": "t3_x",
            "subreddit": "pics",
            "subreddit_name_prefixed": "r/pics",
            "author": "someone",
            "permalink": "/r/pics/comments/x/",
            "url": "https://example.com/page",
            "domain": "example.com"
        });

        // Act
        let post = normalize_post(&raw).expect("Optional fields may be absent");

        // Assert
        assert_eq!(post.title, None);
        assert_eq!(post.selftext, None);
        assert_eq!(post.brief, "");
        assert_eq!(post.created_rel, "");
        assert_eq!(post.image, None);
        assert_eq!(post.video_mp4, None);
        assert_eq!(post.media, None);
    }

    #[test]
    fn test_normalize_missing_required_field_is_malformed() {
        for field in [
            "id",
            "name",
            "subreddit",
            "subreddit_name_prefixed",
            "author",
            "permalink",
            "url",
            "domain",
        ] {
            // Arrange
            let mut raw = raw_post();
            raw.as_object_mut()
                .expect("Fixture is an object")
                .remove(field);

            // Act
            let result = normalize_post(&raw);

            // Assert
            match result {
                Err(Error::Malformed(msg)) => {
                    assert!(msg.contains(field), "Error should name {}: {}", field, msg)
                }
                other => panic!("Missing {} should be malformed, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_normalize_null_required_field_is_malformed() {
        let mut raw = raw_post();
        raw["author"] = Value::Null;

        assert!(matches!(normalize_post(&raw), Err(Error::Malformed(_))));
    }

    #[test]
    fn test_brief_truncates_with_ellipsis() {
        // Arrange
        let mut raw = raw_post();
        let long = "a".repeat(200);
        raw["selftext"] = json!(long);

        // Act
        let post = normalize_post(&raw).expect("Should normalize");
        let listing_post = PostNormalizer::for_listing(UPSTREAM_BASE_URL)
            .normalize(&raw)
            .expect("Should normalize");

        // Assert
        assert_eq!(post.brief.chars().count(), DEFAULT_BRIEF_LEN + 1);
        assert!(post.brief.ends_with(ELLIPSIS));
        assert_eq!(listing_post.brief, long, "Listing brief fits in 500 chars");
    }

    #[test]
    fn test_image_from_post_hint_uses_override() {
        // Arrange
        let mut raw = raw_post();
        raw["post_hint"] = json!("image");
        raw["url_overridden_by_dest"] = json!("https://i.redd.it/abc.jpg");

        // Act
        let post = normalize_post(&raw).expect("Should normalize");

        // Assert
        assert_eq!(post.image.as_deref(), Some("https://i.redd.it/abc.jpg"));
    }

    #[test]
    fn test_image_from_extension_ignores_query_and_case() {
        // Arrange
        let mut raw = raw_post();
        raw["url"] = json!("https://cdn.example.com/Photo.PNG?width=640");
        raw["domain"] = json!("cdn.example.com");

        // Act
        let post = normalize_post(&raw).expect("Should normalize");

        // Assert
        assert_eq!(
            post.image.as_deref(),
            Some("https://cdn.example.com/Photo.PNG?width=640")
        );
    }

    #[test]
    fn test_image_from_known_host() {
        let mut raw = raw_post();
        raw["url"] = json!("https://imgur.com/gallery/xyz");
        raw["domain"] = json!("Imgur.com");

        let post = normalize_post(&raw).expect("Should normalize");

        assert_eq!(post.image.as_deref(), Some("https://imgur.com/gallery/xyz"));
    }

    #[test]
    fn test_image_absent_for_plain_link() {
        let mut raw = raw_post();
        raw["url"] = json!("https://example.com/article.html");
        raw["domain"] = json!("example.com");
        raw["post_hint"] = json!("self");

        let post = normalize_post(&raw).expect("Should normalize");

        assert_eq!(post.image, None);
    }

    #[test]
    fn test_video_urls_extracted() {
        // Arrange
        let mut raw = raw_post();
        raw["secure_media"] = json!({
            "reddit_video": {
                "fallback_url": "https://v.redd.it/abc/DASH_720.mp4",
                "hls_url": "https://v.redd.it/abc/HLSPlaylist.m3u8"
            }
        });

        // Act
        let post = normalize_post(&raw).expect("Should normalize");

        // Assert
        assert_eq!(
            post.video_mp4.as_deref(),
            Some("https://v.redd.it/abc/DASH_720.mp4")
        );
        assert_eq!(
            post.video_hls.as_deref(),
            Some("https://v.redd.it/abc/HLSPlaylist.m3u8")
        );
        assert!(post.media.is_some());
    }

    #[test]
    fn test_video_falls_back_to_media() {
        let raw = json!({
            "secure_media": null,
            "media": {"reddit_video": {"fallback_url": "https://v.redd.it/x.mp4"}}
        });

        let refs = extract_media_refs(&raw);

        assert_eq!(refs.video_mp4.as_deref(), Some("https://v.redd.it/x.mp4"));
        assert_eq!(refs.video_hls, None);
    }

    #[test]
    fn test_malformed_media_is_absent() {
        // Arrange
        let shapes = [
            json!({"secure_media": "not an object"}),
            json!({"secure_media": {"reddit_video": []}}),
            json!({"secure_media": {"reddit_video": {"fallback_url": 12, "hls_url": null}}}),
            json!({"sr_detail": "nope"}),
        ];

        for raw in shapes {
            // Act
            let refs = extract_media_refs(&raw);

            // Assert
            assert_eq!(refs, MediaRefs::default(), "Should ignore {}", raw);
        }
    }

    #[test]
    fn test_subreddit_icon_unescapes_ampersand() {
        // Arrange
        let raw = json!({
            "sr_detail": {
                "icon_img": "",
                "community_icon": "https://styles.redditmedia.com/icon.png?width=256&amp;s=abc"
            }
        });

        // Act
        let refs = extract_media_refs(&raw);

        // Assert
        assert_eq!(
            refs.subreddit_icon.as_deref(),
            Some("https://styles.redditmedia.com/icon.png?width=256&s=abc")
        );
    }
}
