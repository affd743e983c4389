//! CSS asset bundling

use anyhow::{Context, Result};
use std::{fs, path::Path};

const BASE: &str = include_str!("../assets/base.css");
const LAYOUT: &str = include_str!("../assets/components/layout.css");
const NAV: &str = include_str!("../assets/components/nav.css");
const POST_CARD: &str = include_str!("../assets/components/post-card.css");
const COMMENT: &str = include_str!("../assets/components/comment.css");

const LISTING_PAGE: &str = include_str!("../assets/page-listing.css");
const POST_PAGE: &str = include_str!("../assets/page-post.css");
const WIKI_PAGE: &str = include_str!("../assets/page-wiki.css");
const MARKDOWN: &str = include_str!("../assets/markdown.css");

/// Stylesheets written by [`write_css_assets`].
pub const CSS_ASSETS: &[&str] = &["listing.css", "post.css", "wiki.css", "markdown.css"];

/// Writes all bundled CSS assets to output directory
pub fn write_css_assets(assets_dir: &Path) -> Result<()> {
    fs::create_dir_all(assets_dir).with_context(|| {
        format!(
            "Failed to create assets directory {}",
            assets_dir.display()
        )
    })?;

    write_bundled(
        assets_dir,
        "listing.css",
        &[BASE, LAYOUT, NAV, POST_CARD, LISTING_PAGE],
    )?;
    write_bundled(
        assets_dir,
        "post.css",
        &[BASE, LAYOUT, NAV, POST_CARD, COMMENT, POST_PAGE],
    )?;
    write_bundled(assets_dir, "wiki.css", &[BASE, LAYOUT, NAV, WIKI_PAGE])?;
    write_bundled(assets_dir, "markdown.css", &[MARKDOWN])?;
    Ok(())
}

fn write_bundled(dir: &Path, name: &str, parts: &[&str]) -> Result<()> {
    let css = parts.join("\n");
    fs::write(dir.join(name), css)
        .with_context(|| format!("Failed to write CSS asset: {}", name))?;
    Ok(())
}
