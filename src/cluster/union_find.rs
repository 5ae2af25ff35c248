// Union-find clustering.
//
// Every key remembers the first post that carried it. A later post carrying
// the same key is unioned with that post, which links all posts sharing any
// key transitively in one pass over the input.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::conversation::{Conversation, ConversationIds};
use crate::feed::keys::Key;
use crate::feed::post::Post;

/// Disjoint-set forest over `0..n` with union by rank and path halving.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Join the sets containing `a` and `b`. Returns false if they were
    /// already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

pub(super) fn cluster_keyed<'a>(
    keyed: Vec<(&'a Post, BTreeSet<Key>)>,
    ids: &mut ConversationIds,
) -> Vec<Conversation<'a>> {
    let mut sets = DisjointSet::new(keyed.len());

    let mut unions = 0usize;
    {
        let mut first_carrier: HashMap<&str, usize> = HashMap::new();
        for (i, (_, keys)) in keyed.iter().enumerate() {
            for key in keys {
                match first_carrier.entry(key.as_str()) {
                    Entry::Occupied(e) => {
                        if sets.union(*e.get(), i) {
                            unions += 1;
                        }
                    }
                    Entry::Vacant(e) => {
                        e.insert(i);
                    }
                }
            }
        }
    }

    let mut conversations: Vec<Conversation<'a>> = Vec::new();
    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut placed: Vec<(usize, &'a Post)> = Vec::with_capacity(keyed.len());

    // Top-level posts first, so a standalone copy of a post wins over the
    // same post seen nested inside a quote or retweet.
    for (i, (post, keys)) in keyed.into_iter().enumerate() {
        let root = sets.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            conversations.push(Conversation::new(ids.next_id()));
            conversations.len() - 1
        });
        conversations[slot].add_item(post, keys);
        placed.push((slot, post));
    }
    for (slot, post) in placed {
        conversations[slot].add_nested(post);
    }

    debug!(
        posts = sets.len(),
        unions,
        conversations = conversations.len(),
        "Union-find clustering complete"
    );

    conversations
}
