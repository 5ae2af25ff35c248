use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use feedpaper::config::Config;
use feedpaper::feed::keys::extract_keys;
use feedpaper::feed::load::load_posts;
use feedpaper::feed::timestamp::parse_timestamp;
use feedpaper::feed::window::DateWindow;
use feedpaper::output::terminal;
use feedpaper::pipeline::feed::build_feed;

/// Feedpaper: read a timeline as conversations instead of a firehose.
///
/// Groups scraped posts into conversations, orders related conversations
/// next to each other, and hides the low-relevance ones.
#[derive(Parser)]
#[command(name = "feedpaper", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group a post dump into ordered conversations
    Feed {
        /// JSON file with a post array or {"items": [...]} rows
        #[arg(long, short)]
        input: PathBuf,

        /// Only posts after this time (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Only posts before this time (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Only posts from this calendar day (UTC); overrides --start/--end
        #[arg(long)]
        day: Option<NaiveDate>,

        /// Also list the hidden low-relevance conversations
        #[arg(long)]
        show_hidden: bool,

        /// Print the feed as JSON instead of the terminal view
        #[arg(long)]
        json: bool,
    },

    /// Show the identity keys extracted from one post
    Keys {
        /// JSON file with a post array or {"items": [...]} rows
        #[arg(long, short)]
        input: PathBuf,

        /// The post id to inspect
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("feedpaper=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Feed {
            input,
            start,
            end,
            day,
            show_hidden,
            json,
        } => {
            let config = Config::load()?;
            let posts = load_posts(&input)?;

            let window = match day {
                Some(day) => DateWindow::day(day),
                None => DateWindow {
                    start: start.as_deref().map(parse_bound).transpose()?,
                    end: end.as_deref().map(parse_bound).transpose()?,
                },
            };
            let options = feedpaper::pipeline::feed::FeedOptions {
                window,
                ..config.feed_options()
            };

            info!(posts = posts.len(), input = %input.display(), "Building feed");
            let feed = build_feed(&posts, &options)
                .with_context(|| format!("Failed to build feed from {}", input.display()))?;

            if json {
                let view = feed.view(show_hidden);
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                terminal::display_feed(&feed, show_hidden);
            }
        }

        Commands::Keys { input, id } => {
            let posts = load_posts(&input)?;
            let Some(post) = posts.iter().find(|p| p.id == id) else {
                warn!(id = %id, "Post not found");
                anyhow::bail!("No post with id {id} in {}", input.display());
            };

            let keys = extract_keys(post)?;
            println!(
                "\n{}",
                format!("=== Keys for post {} ({}) ===", post.id, keys.len()).bold()
            );
            for key in &keys {
                println!("  {key}");
            }
        }
    }

    Ok(())
}

/// Parse a --start/--end bound. A bare date means midnight UTC.
fn parse_bound(raw: &str) -> Result<DateTime<Utc>> {
    if let Some(at) = parse_timestamp(raw) {
        return Ok(at);
    }
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date {raw:?} (expected RFC 3339 or YYYY-MM-DD)"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .with_context(|| format!("Invalid date {raw:?}"))
}
