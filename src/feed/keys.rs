// Identity keys: the tokens that decide conversation membership.
//
// Two posts land in the same conversation when their key sets intersect.
// A post's keys name the post itself, the thread/reply it belongs to, every
// post it quotes or retweets (recursively), the links it shares, and its
// hashtags.

use std::collections::BTreeSet;

use crate::error::FeedError;
use crate::feed::post::Post;

/// An identity token. Ids, URLs, hashtags and preview keys share one space.
pub type Key = String;

/// Extract the identity keys of a post and everything nested in it.
///
/// Always contains `post.id`. Deterministic: the same post always yields the
/// same set. Fails only on corrupt nesting (see [`Post::walk`]).
pub fn extract_keys(post: &Post) -> Result<BTreeSet<Key>, FeedError> {
    let mut keys = BTreeSet::new();
    post.walk(&mut |p, _depth| {
        own_keys(p, &mut keys);
        Ok(())
    })?;
    Ok(keys)
}

/// Keys contributed by a single post, ignoring nested posts.
fn own_keys(post: &Post, keys: &mut BTreeSet<Key>) {
    keys.insert(post.id.clone());

    if let Some(conversation_id) = non_empty(post.conversation_id.as_deref()) {
        keys.insert(conversation_id.to_string());
    }

    // Only a thread root other than the post itself adds information.
    if let Some(thread) = &post.self_thread {
        if !thread.id_str.is_empty() && thread.id_str != post.id {
            keys.insert(thread.id_str.clone());
        }
    }

    if let Some(parent) = non_empty(post.in_reply_to_status_id.as_deref()) {
        keys.insert(parent.to_string());
    }

    for url in &post.entities.urls {
        if let Some(target) = url.target() {
            keys.insert(target.to_string());
        }
    }

    for hashtag in &post.entities.hashtags {
        if !hashtag.text.is_empty() {
            keys.insert(hashtag.text.to_lowercase());
        }
    }

    if let Some(preview) = post.card.as_ref().and_then(|c| c.preview_key()) {
        keys.insert(preview);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
