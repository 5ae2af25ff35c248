// Conversation: one cluster of posts and the statistics built from it.
//
// Posts are borrowed from the caller's slice, never copied or mutated.
// The deduplicated, chronological view is computed on first read and
// cached; every `add_item` drops the cache.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

use crate::feed::keys::Key;
use crate::feed::post::Post;
use crate::topics::entity::{EntityProfile, EntityTally};

/// Relevance assumed when no member carries a score. Mid-scale, so
/// un-enriched conversations are never hidden on relevance alone.
pub const DEFAULT_RELEVANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConversationId(pub u64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out conversation ids for one clustering run.
///
/// Each run (or each date window processed in parallel) owns its own
/// counter; nothing is shared between runs.
#[derive(Debug, Default)]
pub struct ConversationIds {
    next: u64,
}

impl ConversationIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> ConversationId {
        let id = ConversationId(self.next);
        self.next += 1;
        id
    }
}

/// A display row: a copy of a member post plus who reposted it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationItem {
    #[serde(flatten)]
    pub post: Post,
    /// Handles of accounts whose plain retweets were folded into this row,
    /// in chronological order.
    pub retweeted_by: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Conversation<'a> {
    id: ConversationId,
    members: Vec<&'a Post>,
    member_index: HashMap<&'a str, usize>,
    keys: BTreeSet<Key>,
    entities: EntityProfile,
    rows: OnceCell<Vec<ConversationItem>>,
}

impl<'a> Conversation<'a> {
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            members: Vec::new(),
            member_index: HashMap::new(),
            keys: BTreeSet::new(),
            entities: EntityProfile::default(),
            rows: OnceCell::new(),
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    /// Add a post and its keys.
    ///
    /// Returns false if a post with the same id is already a member; its
    /// keys are still merged in. Only enriched posts touch the tallies.
    pub fn add_item<I>(&mut self, post: &'a Post, keys: I) -> bool
    where
        I: IntoIterator<Item = Key>,
    {
        self.keys.extend(keys);
        if self.member_index.contains_key(post.id.as_str()) {
            return false;
        }

        self.member_index.insert(post.id.as_str(), self.members.len());
        self.members.push(post);
        if let Some(enrichment) = &post.enrichment {
            self.entities.record(enrichment);
        }
        self.rows = OnceCell::new();
        true
    }

    /// Add every quoted/retweeted post nested under `post` as a member.
    pub fn add_nested(&mut self, post: &'a Post) {
        let mut pending: Vec<&'a Post> = post.nested().collect();
        while let Some(nested) = pending.pop() {
            self.add_item(nested, std::iter::empty());
            pending.extend(nested.nested());
        }
    }

    /// Add a post, then the posts nested under it.
    pub fn add_post<I>(&mut self, post: &'a Post, keys: I)
    where
        I: IntoIterator<Item = Key>,
    {
        self.add_item(post, keys);
        self.add_nested(post);
    }

    /// Absorb another conversation. Its members go through `add_item`, so
    /// tallies and the cache are maintained exactly as for new posts.
    pub fn merge(&mut self, other: Conversation<'a>) {
        for post in other.members {
            self.add_item(post, std::iter::empty());
        }
        self.keys.extend(other.keys);
    }

    pub fn keys(&self) -> &BTreeSet<Key> {
        &self.keys
    }

    pub fn shares_key(&self, other: &Conversation<'_>) -> bool {
        !self.keys.is_disjoint(&other.keys)
    }

    pub fn shares_any(&self, keys: &BTreeSet<Key>) -> bool {
        !self.keys.is_disjoint(keys)
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.member_index.contains_key(post_id)
    }

    /// Members in insertion order, before deduplication.
    pub fn members(&self) -> &[&'a Post] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn entities(&self) -> &EntityProfile {
        &self.entities
    }

    pub fn main_entities(&self) -> &EntityTally {
        &self.entities.main
    }

    pub fn all_entities(&self) -> &EntityTally {
        &self.entities.all
    }

    /// Members sorted by (created_at, id), with plain retweets of a member
    /// folded into the original's `retweeted_by`.
    ///
    /// The result does not depend on the order posts were added.
    pub fn items(&self) -> &[ConversationItem] {
        self.rows.get_or_init(|| self.dedupe())
    }

    fn dedupe(&self) -> Vec<ConversationItem> {
        let mut ordered = self.members.clone();
        ordered.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut rows: Vec<ConversationItem> = Vec::with_capacity(ordered.len());
        let mut row_of: HashMap<&str, usize> = HashMap::new();
        let mut reposts: Vec<(&str, &str)> = Vec::new();

        for post in ordered {
            if let Some(original) = self.collapses_into(post) {
                reposts.push((original, post.handle()));
                continue;
            }
            row_of.insert(post.id.as_str(), rows.len());
            rows.push(ConversationItem {
                post: post.clone(),
                retweeted_by: Vec::new(),
            });
        }

        for (original, reposter) in reposts {
            if let Some(&row) = row_of.get(original) {
                let by = &mut rows[row].retweeted_by;
                if !by.iter().any(|h| h == reposter) {
                    by.push(reposter.to_string());
                }
            }
        }

        rows
    }

    /// The member id a plain retweet folds into, if any.
    ///
    /// The original must be a member that is not itself a plain retweet, so
    /// it is guaranteed its own row.
    fn collapses_into(&self, post: &Post) -> Option<&'a str> {
        let original = post.plain_retweet_of()?;
        if original.id == post.id {
            return None;
        }
        let member = self.members[*self.member_index.get(original.id.as_str())?];
        member
            .plain_retweet_of()
            .is_none()
            .then_some(member.id.as_str())
    }

    /// Highest enrichment relevance among members, or [`DEFAULT_RELEVANCE`].
    pub fn relevance(&self) -> f64 {
        self.members
            .iter()
            .filter_map(|p| p.enrichment.as_ref()?.relevance)
            .fold(None, |best: Option<f64>, r| {
                Some(best.map_or(r, |b| b.max(r)))
            })
            .unwrap_or(DEFAULT_RELEVANCE)
    }

    /// Likes plus reposts over all members. Retweet rows are counted before
    /// deduplication, so shared engagement can be counted twice.
    pub fn upvotes(&self) -> u64 {
        self.members
            .iter()
            .map(|p| p.favorite_count + p.retweet_count)
            .sum()
    }

    /// Every author handle in the conversation, nested authors included,
    /// mapped to whether the reader follows them.
    fn source_accounts(&self) -> BTreeMap<&'a str, bool> {
        let mut accounts: BTreeMap<&'a str, bool> = BTreeMap::new();
        let mut pending: Vec<&'a Post> = self.members.clone();
        while let Some(post) = pending.pop() {
            if let Some(user) = &post.user {
                let followed = accounts.entry(user.screen_name.as_str()).or_insert(false);
                *followed |= user.following;
            }
            pending.extend(post.nested());
        }
        accounts
    }

    pub fn sources(&self) -> BTreeSet<String> {
        self.source_accounts()
            .into_keys()
            .map(str::to_string)
            .collect()
    }

    pub fn followed_sources(&self) -> BTreeSet<String> {
        self.source_accounts()
            .into_iter()
            .filter(|(_, followed)| *followed)
            .map(|(handle, _)| handle.to_string())
            .collect()
    }

    /// Owned, serializable snapshot for rendering.
    pub fn view(&self) -> ConversationView {
        ConversationView {
            id: self.id,
            items: self.items().to_vec(),
            main_entities: self.entities.main.clone(),
            all_entities: self.entities.all.clone(),
            relevance: self.relevance(),
            upvotes: self.upvotes(),
            sources: self.sources().into_iter().collect(),
            followed_sources: self.followed_sources().into_iter().collect(),
        }
    }
}

/// What the rendering side receives for one conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub id: ConversationId,
    pub items: Vec<ConversationItem>,
    pub main_entities: EntityTally,
    pub all_entities: EntityTally,
    pub relevance: f64,
    pub upvotes: u64,
    pub sources: Vec<String>,
    pub followed_sources: Vec<String>,
}
