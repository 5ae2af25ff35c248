// Property tests for clustering.
//
// Random posts carry hashtags drawn from a small pool so that chains of
// shared keys form often. The partition must not depend on input order or
// on the clustering strategy, and must be exactly the connected components
// of the shared-key relation.

use std::collections::{BTreeMap, BTreeSet};

use feedpaper::cluster::conversation::{Conversation, ConversationIds};
use feedpaper::cluster::{cluster, ClusterStrategy};
use feedpaper::feed::post::Post;
use proptest::prelude::*;
use serde_json::json;

type Partition = BTreeSet<BTreeSet<String>>;

fn build_posts(tags: &[Vec<u8>]) -> Vec<Post> {
    tags.iter()
        .enumerate()
        .map(|(i, tags)| {
            let hashtags: Vec<_> = tags.iter().map(|t| json!({"text": format!("t{t}")})).collect();
            serde_json::from_value(json!({
                "id": format!("p{i}"),
                "created_at": "2023-05-01T12:00:00Z",
                "user": {"screen_name": format!("u{i}")},
                "entities": {"hashtags": hashtags}
            }))
            .expect("valid post")
        })
        .collect()
}

fn partition(conversations: &[Conversation<'_>]) -> Partition {
    conversations
        .iter()
        .map(|c| c.members().iter().map(|p| p.id.clone()).collect())
        .collect()
}

fn run<'a>(posts: impl IntoIterator<Item = &'a Post>, strategy: ClusterStrategy) -> Partition {
    let conversations =
        cluster(posts, strategy, &mut ConversationIds::new()).expect("posts are valid");
    partition(&conversations)
}

/// Connected components computed the slow way: flood-fill over posts that
/// share a hashtag.
fn components(tags: &[Vec<u8>]) -> Partition {
    let mut component: Vec<usize> = (0..tags.len()).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for i in 0..tags.len() {
            for j in 0..tags.len() {
                let shared = tags[i].iter().any(|t| tags[j].contains(t));
                if shared && component[j] > component[i] {
                    component[j] = component[i];
                    changed = true;
                }
            }
        }
    }

    let mut groups: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
    for (i, c) in component.into_iter().enumerate() {
        groups.entry(c).or_default().insert(format!("p{i}"));
    }
    groups.into_values().collect()
}

fn arb_tags() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<usize>)> {
    prop::collection::vec(prop::collection::vec(0u8..6, 0..3), 0..14).prop_flat_map(|tags| {
        let order: Vec<usize> = (0..tags.len()).collect();
        (Just(tags), Just(order).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn partition_ignores_input_order((tags, order) in arb_tags()) {
        let posts = build_posts(&tags);
        let forward = run(&posts, ClusterStrategy::UnionFind);
        let shuffled = run(order.iter().map(|&i| &posts[i]), ClusterStrategy::UnionFind);
        prop_assert_eq!(forward, shuffled);
    }

    #[test]
    fn strategies_agree((tags, order) in arb_tags()) {
        let posts = build_posts(&tags);
        let shuffled: Vec<&Post> = order.iter().map(|&i| &posts[i]).collect();
        let union_find = run(shuffled.iter().copied(), ClusterStrategy::UnionFind);
        let greedy = run(shuffled.iter().copied(), ClusterStrategy::Greedy);
        prop_assert_eq!(union_find, greedy);
    }

    #[test]
    fn partition_is_shared_key_components((tags, _order) in arb_tags()) {
        let posts = build_posts(&tags);
        prop_assert_eq!(run(&posts, ClusterStrategy::UnionFind), components(&tags));
    }

    #[test]
    fn every_post_in_exactly_one_conversation((tags, order) in arb_tags()) {
        let posts = build_posts(&tags);
        let shuffled: Vec<&Post> = order.iter().map(|&i| &posts[i]).collect();
        let conversations = cluster(shuffled.iter().copied(), ClusterStrategy::Greedy, &mut ConversationIds::new())
            .expect("posts are valid");
        let mut seen = BTreeSet::new();
        for c in &conversations {
            for p in c.members() {
                prop_assert!(seen.insert(p.id.clone()), "{} placed twice", p.id);
            }
        }
        prop_assert_eq!(seen.len(), posts.len());
        for (i, a) in conversations.iter().enumerate() {
            for b in conversations.iter().skip(i + 1) {
                prop_assert!(a.keys().is_disjoint(b.keys()));
            }
        }
    }
}
