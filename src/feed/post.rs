// The post record: the shape the scraper stores and the engine reads.
//
// Field names follow the platform's timeline JSON so stored dumps
// deserialize without a mapping layer. Quoted and retweeted posts are owned
// by value; `walk` visits them with a depth and ancestor guard so bad data
// surfaces as an error instead of unbounded recursion.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Nesting deeper than this is treated as corrupt data.
pub const MAX_NESTING_DEPTH: usize = 16;

/// The author of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    /// Whether the reading account follows this author.
    #[serde(default)]
    pub following: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlEntity {
    /// The shortened link as it appears in the text.
    #[serde(default)]
    pub url: String,
    /// The de-shortened target, when the platform resolved it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_url: Option<String>,
    #[serde(default)]
    pub indices: [usize; 2],
}

impl UrlEntity {
    /// The link target, preferring the expanded form.
    pub fn target(&self) -> Option<&str> {
        self.expanded_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| Some(self.url.as_str()).filter(|u| !u.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HashtagEntity {
    pub text: String,
    #[serde(default)]
    pub indices: [usize; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionEntity {
    pub screen_name: String,
    #[serde(default)]
    pub indices: [usize; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaEntity {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub media_url_https: String,
    #[serde(default)]
    pub indices: [usize; 2],
}

/// Positioned references inside the post text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
    #[serde(default)]
    pub user_mentions: Vec<MentionEntity>,
    #[serde(default)]
    pub media: Vec<MediaEntity>,
}

/// A link-preview card, flattened to name → string attributes.
///
/// Accepts both the flattened form and the platform's raw
/// `legacy.binding_values` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCard")]
pub struct Card {
    pub name: String,
    pub url: String,
    pub attributes: BTreeMap<String, String>,
}

impl Card {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// `"{domain}:{title}"`. Identifies the same article shared through
    /// different shorteners. Falls back to `vanity_url` for the domain.
    pub fn preview_key(&self) -> Option<String> {
        let domain = self
            .attribute("domain")
            .or_else(|| self.attribute("vanity_url"))?;
        let title = self.attribute("title")?;
        Some(format!("{domain}:{title}"))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCard {
    Legacy {
        legacy: LegacyCard,
    },
    Flat {
        #[serde(default)]
        name: String,
        #[serde(default)]
        url: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
    },
}

#[derive(Deserialize)]
struct LegacyCard {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    binding_values: Vec<Binding>,
}

#[derive(Deserialize)]
struct Binding {
    key: String,
    value: BindingValue,
}

#[derive(Deserialize)]
struct BindingValue {
    #[serde(default)]
    string_value: Option<String>,
}

impl From<RawCard> for Card {
    fn from(raw: RawCard) -> Self {
        match raw {
            RawCard::Legacy { legacy } => Card {
                name: legacy.name,
                url: legacy.url,
                // Only string bindings carry preview text; images and
                // booleans are dropped.
                attributes: legacy
                    .binding_values
                    .into_iter()
                    .filter_map(|b| b.value.string_value.map(|v| (b.key, v)))
                    .collect(),
            },
            RawCard::Flat {
                name,
                url,
                attributes,
            } => Card {
                name,
                url,
                attributes,
            },
        }
    }
}

/// Marker pointing at the root of a self-thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfThread {
    pub id_str: String,
}

/// Long-form text for posts over the classic length limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteTweet {
    pub text: String,
}

/// Topic labels attached out-of-band by the enrichment job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(default)]
    pub main_entity: Option<String>,
    #[serde(default)]
    pub entities: Vec<String>,
    /// 1 (low) to 5 (high) against the reader's interests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

/// A single timeline post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(with = "crate::feed::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub full_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_tweet: Option<NoteTweet>,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_thread: Option<SelfThread>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_tweet: Option<Box<Post>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweeted_tweet: Option<Box<Post>>,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub is_promoted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

impl Post {
    /// The author's handle, or "" for a post without a user.
    pub fn handle(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.screen_name.as_str())
    }

    /// Full text, preferring the long-form note when present.
    pub fn text(&self) -> &str {
        self.note_tweet
            .as_ref()
            .map_or(self.full_text.as_str(), |n| n.text.as_str())
    }

    /// Directly nested posts: the quoted post, then the retweeted post.
    pub fn nested(&self) -> impl Iterator<Item = &Post> {
        self.quoted_tweet
            .as_deref()
            .into_iter()
            .chain(self.retweeted_tweet.as_deref())
    }

    /// If this is a repost with no added commentary, the original post.
    ///
    /// A plain retweet's text is exactly "RT @{original_author}: ...";
    /// anything else is treated as commentary.
    pub fn plain_retweet_of(&self) -> Option<&Post> {
        let original = self.retweeted_tweet.as_deref()?;
        let author = &original.user.as_ref()?.screen_name;
        let prefix = format!("RT @{author}: ");
        self.full_text.starts_with(&prefix).then_some(original)
    }

    /// Visit this post and every nested post depth-first.
    ///
    /// `visit` receives each post with its nesting depth (0 for self).
    /// Fails if a nested post repeats an ancestor's id or nesting exceeds
    /// [`MAX_NESTING_DEPTH`].
    pub fn walk<'a, F>(&'a self, visit: &mut F) -> Result<(), FeedError>
    where
        F: FnMut(&'a Post, usize) -> Result<(), FeedError>,
    {
        let mut ancestors = Vec::new();
        walk_from(self, 0, &mut ancestors, visit)
    }

    /// Check the fields the engine relies on, including nested posts.
    pub fn validate(&self) -> Result<(), FeedError> {
        let root = self.id.as_str();
        self.walk(&mut |post, depth| {
            let label = if depth == 0 {
                ""
            } else {
                " (nested quoted/retweeted post)"
            };
            if post.id.trim().is_empty() {
                return Err(FeedError::malformed(root, format!("empty id{label}")));
            }
            if post.user.is_none() {
                return Err(FeedError::malformed(
                    &post.id,
                    format!("missing user{label}"),
                ));
            }
            Ok(())
        })
    }
}

fn walk_from<'a, F>(
    post: &'a Post,
    depth: usize,
    ancestors: &mut Vec<&'a str>,
    visit: &mut F,
) -> Result<(), FeedError>
where
    F: FnMut(&'a Post, usize) -> Result<(), FeedError>,
{
    if depth > MAX_NESTING_DEPTH {
        return Err(FeedError::NestingTooDeep {
            id: post.id.clone(),
            depth,
        });
    }
    if ancestors.contains(&post.id.as_str()) {
        return Err(FeedError::CyclicReference {
            id: post.id.clone(),
        });
    }

    visit(post, depth)?;

    ancestors.push(post.id.as_str());
    for child in post.nested() {
        walk_from(child, depth + 1, ancestors, visit)?;
    }
    ancestors.pop();
    Ok(())
}
