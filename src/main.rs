use anyhow::{Context, Result, bail};
use lurkview::{
    Command, Config, HttpClient, generate_not_found_page, generate_page, write_css_assets,
    write_page,
};
use std::fs;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Describes what a command asked for, for the not found page.
fn describe(command: &Command) -> String {
    match command {
        Command::Listing {
            subreddit: Some(name),
            ..
        } => format!("r/{name}"),
        Command::Listing { user: Some(name), .. } => format!("u/{name}"),
        Command::Listing { .. } => "front page".to_string(),
        Command::Post { id, .. } => format!("post {id}"),
        Command::Wiki { subreddit, page } => format!("r/{subreddit} wiki page {page}"),
        Command::WikiPages { subreddit } => format!("r/{subreddit} wiki"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    let client = HttpClient::new(config.base_url.as_str(), config.timeout())
        .context("Failed to create HTTP client")?;

    fs::create_dir_all(&config.output).context("Failed to create output directory")?;
    write_css_assets(&config.output.join("assets")).context("Failed to write CSS assets")?;

    let page = match generate_page(&client, &config.command, &config.listing_options()) {
        Ok(page) => page,
        Err(e) if e.is_not_found() => {
            let what = describe(&config.command);
            warn!(error = %e, "upstream has no {}", what);
            let path = write_page(&config.output, &generate_not_found_page(&what))?;
            println!("Generated: {}", path.display());
            bail!("Not found: {}", what);
        }
        Err(e) => return Err(e).context("Failed to load page from upstream"),
    };

    let path = write_page(&config.output, &page)?;
    println!("Generated: {}", path.display());

    if !config.no_open {
        open::that(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    }

    Ok(())
}
