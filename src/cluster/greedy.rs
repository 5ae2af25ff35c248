// Greedy clustering with a corrective merge.
//
// Pass 1 puts each post into the first existing conversation that shares a
// key with it, or starts a new one. First-match can split a component when a
// later post bridges two conversations that were created apart, so pass 2
// merges any pair of conversations that still share a key. Quoted and
// retweeted sub-posts are attached after both passes.

use std::collections::BTreeSet;

use tracing::debug;

use super::conversation::{Conversation, ConversationIds};
use crate::feed::keys::Key;
use crate::feed::post::Post;

pub(super) fn cluster_keyed<'a>(
    keyed: Vec<(&'a Post, BTreeSet<Key>)>,
    ids: &mut ConversationIds,
) -> Vec<Conversation<'a>> {
    let mut conversations: Vec<Conversation<'a>> = Vec::new();

    for (post, keys) in keyed {
        match conversations.iter_mut().find(|c| c.shares_any(&keys)) {
            Some(home) => {
                home.add_item(post, keys);
            }
            None => {
                let mut fresh = Conversation::new(ids.next_id());
                fresh.add_item(post, keys);
                conversations.push(fresh);
            }
        }
    }

    let first_pass = conversations.len();
    let merges = merge_overlapping(&mut conversations);

    // Nested copies go in last so a standalone copy of the same post, with
    // its enrichment and engagement, is always the member.
    for conversation in &mut conversations {
        let top_level: Vec<&'a Post> = conversation.members().to_vec();
        for post in top_level {
            conversation.add_nested(post);
        }
    }

    debug!(
        first_pass,
        merges,
        conversations = conversations.len(),
        "Greedy clustering complete"
    );

    conversations
}

/// Merge conversations that share a key until none do.
///
/// Later conversations fold into earlier ones, so the survivor keeps the
/// earlier position and id. After a merge the scan for `i` restarts because
/// its key set grew. Returns the number of merges.
pub fn merge_overlapping(conversations: &mut Vec<Conversation<'_>>) -> usize {
    let mut merges = 0;
    let mut i = 0;
    while i < conversations.len() {
        let mut j = i + 1;
        while j < conversations.len() {
            if conversations[i].shares_key(&conversations[j]) {
                let absorbed = conversations.remove(j);
                conversations[i].merge(absorbed);
                merges += 1;
                j = i + 1;
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    merges
}
