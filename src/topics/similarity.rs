// Entity-overlap similarity between two conversations.
//
// Additive, unnormalized scoring over the entity tallies:
//
//   +shared_main      each main entity present in both main tallies
//   +main_substring   each of a's main entities found in b's main entities
//                     run together, and the same from b to a
//   +all_in_main      each of a's entities that is one of b's main entities
//   +all_in_all       otherwise, each of a's entities that b also mentions
//
// The last two rules only look from a to b, so `similarity` is directional.
// `pair_weight` sums both directions and is what the graph uses for edges.

use crate::topics::entity::EntityProfile;

/// Points awarded by each overlap rule.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityWeights {
    /// Same primary subject on both sides (default 10.0)
    pub shared_main: f64,
    /// Partial or compound-name match between main entities (default 3.0)
    pub main_substring: f64,
    /// A mentioned entity that is the other side's primary subject (default 2.0)
    pub all_in_main: f64,
    /// A mentioned entity the other side also mentions (default 1.0)
    pub all_in_all: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            shared_main: 10.0,
            main_substring: 3.0,
            all_in_main: 2.0,
            all_in_all: 1.0,
        }
    }
}

/// Directed similarity of `a` toward `b`. Never negative.
pub fn similarity(a: &EntityProfile, b: &EntityProfile, weights: &SimilarityWeights) -> f64 {
    let mut score = 0.0;

    for entity in a.main.entities() {
        if b.main.contains(entity) {
            score += weights.shared_main;
        }
    }

    score += weights.main_substring * substring_hits(a, b) as f64;
    score += weights.main_substring * substring_hits(b, a) as f64;

    for entity in a.all.entities() {
        if b.main.contains(entity) {
            score += weights.all_in_main;
        } else if b.all.contains(entity) {
            score += weights.all_in_all;
        }
    }

    score
}

/// Symmetric edge weight: `similarity(a, b) + similarity(b, a)`.
pub fn pair_weight(a: &EntityProfile, b: &EntityProfile, weights: &SimilarityWeights) -> f64 {
    similarity(a, b, weights) + similarity(b, a, weights)
}

/// How many of `from`'s main entities appear inside the concatenation of
/// `to`'s main entities.
fn substring_hits(from: &EntityProfile, to: &EntityProfile) -> usize {
    let haystack: String = to.main.entities().collect();
    from.main
        .entities()
        .filter(|needle| haystack.contains(needle))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(main: &[&str], all: &[&str]) -> EntityProfile {
        let mut p = EntityProfile::default();
        for m in main {
            p.main.add(m);
        }
        for e in all {
            p.all.add(e);
        }
        p
    }

    #[test]
    fn test_exact_main_match() {
        let w = SimilarityWeights::default();
        let a = profile(&["gpt-4"], &[]);
        let b = profile(&["GPT4"], &[]);
        // shared main (10) + substring both ways (3 + 3)
        assert!((similarity(&a, &b, &w) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_compound_name_substring() {
        let w = SimilarityWeights::default();
        let a = profile(&["llama"], &[]);
        let b = profile(&["llama 2"], &[]);
        // "llama" is inside "llama 2", not the other way round
        assert!((similarity(&a, &b, &w) - 3.0).abs() < 1e-9);
        assert!((similarity(&b, &a, &w) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_substring_spans_concatenated_names() {
        let w = SimilarityWeights::default();
        // b's names run together as "openaisora"; "sora" is also inside "aisora"
        let a = profile(&["aisora"], &[]);
        let b = profile(&["openai", "sora"], &[]);
        assert!((similarity(&a, &b, &w) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_entities_are_directional() {
        let w = SimilarityWeights::default();
        let a = profile(&[], &["rust", "wasm"]);
        let b = profile(&["rust"], &["wasm"]);
        // a→b: rust is b's main (2), wasm is in b's all (1)
        assert!((similarity(&a, &b, &w) - 3.0).abs() < 1e-9);
        // b→a: wasm is in a's all (1); b's main "rust" has no main on a's side
        assert!((similarity(&b, &a, &w) - 1.0).abs() < 1e-9);
        assert!((pair_weight(&a, &b, &w) - 4.0).abs() < 1e-9);
        assert!((pair_weight(&b, &a, &w) - pair_weight(&a, &b, &w)).abs() < 1e-9);
    }

    #[test]
    fn test_self_similarity_is_positive() {
        let w = SimilarityWeights::default();
        let a = profile(&["rust"], &["cargo"]);
        assert!(similarity(&a, &a, &w) > 0.0);
    }

    #[test]
    fn test_empty_profiles_score_zero() {
        let w = SimilarityWeights::default();
        let empty = EntityProfile::default();
        let a = profile(&["rust"], &["cargo"]);
        assert_eq!(similarity(&empty, &a, &w), 0.0);
        assert_eq!(pair_weight(&empty, &empty, &w), 0.0);
    }
}
