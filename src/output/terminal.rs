// Colored terminal output for the conversation feed.
//
// The CLI's display functions delegate here. Each conversation prints a
// header (topics, relevance, engagement, who took part) followed by its
// deduplicated posts in chronological order.

use colored::Colorize;

use super::{single_line, truncate_chars};
use crate::cluster::conversation::{Conversation, ConversationItem};
use crate::pipeline::feed::Feed;

/// How many main entities to name in a conversation header.
const HEADER_ENTITIES: usize = 3;

/// Characters of post text shown per row.
const PREVIEW_CHARS: usize = 140;

/// Display the feed: visible conversations, then either the hidden ones or
/// just their count.
pub fn display_feed(feed: &Feed<'_>, show_hidden: bool) {
    if feed.visible.is_empty() && feed.hidden.is_empty() {
        println!("No posts in this window.");
        return;
    }

    println!(
        "\n{}",
        format!(
            "=== Feed ({} conversations, {} hidden) ===",
            feed.visible.len(),
            feed.hidden_count()
        )
        .bold()
    );

    for (i, conversation) in feed.visible.iter().enumerate() {
        display_conversation(i + 1, conversation);
    }

    if feed.hidden.is_empty() {
        return;
    }

    if show_hidden {
        println!(
            "\n{}",
            format!("=== Hidden ({}) ===", feed.hidden_count()).dimmed()
        );
        for (i, conversation) in feed.hidden.iter().enumerate() {
            display_conversation(i + 1, conversation);
        }
    } else {
        println!(
            "\n  {} {} low-relevance conversations hidden (use --show-hidden)",
            "~".dimmed(),
            feed.hidden_count()
        );
    }
}

/// Display one conversation with its rows.
pub fn display_conversation(rank: usize, conversation: &Conversation<'_>) {
    let topics: Vec<&str> = conversation
        .main_entities()
        .top(HEADER_ENTITIES)
        .into_iter()
        .map(|(entity, _)| entity)
        .collect();
    let topics = if topics.is_empty() {
        "(no topics)".dimmed().to_string()
    } else {
        topics.join(", ").bold().to_string()
    };

    let followed = conversation.followed_sources();
    let sources: Vec<String> = conversation
        .sources()
        .into_iter()
        .map(|handle| {
            if followed.contains(&handle) {
                format!("@{handle}").green().to_string()
            } else {
                format!("@{handle}")
            }
        })
        .collect();

    println!();
    println!(
        "  {:>3}. {} {}  {}  {}",
        rank,
        conversation.id().to_string().dimmed(),
        topics,
        colorize_relevance(conversation.relevance()),
        format!("{} upvotes", conversation.upvotes()).dimmed(),
    );
    println!("       {}", sources.join(" "));

    for item in conversation.items() {
        display_item(item);
    }
}

fn display_item(item: &ConversationItem) {
    let preview = truncate_chars(&single_line(item.post.text()), PREVIEW_CHARS);
    let time = item.post.created_at.format("%H:%M");
    println!(
        "       {} @{}: {}",
        time.to_string().dimmed(),
        item.post.handle().bold(),
        preview
    );
    if !item.retweeted_by.is_empty() {
        let by: Vec<String> = item.retweeted_by.iter().map(|h| format!("@{h}")).collect();
        println!("             {} {}", "RT by".dimmed(), by.join(", ").dimmed());
    }
}

/// Colorize a relevance score (1 low to 5 high).
fn colorize_relevance(relevance: f64) -> colored::ColoredString {
    let label = format!("rel {relevance:.0}");
    match relevance {
        r if r >= 4.0 => label.bright_green(),
        r if r > 2.0 => label.yellow(),
        _ => label.dimmed(),
    }
}
