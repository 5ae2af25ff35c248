// Conversation similarity trait: swap-ready abstraction.
//
// The ordering stage only needs a pairwise score. The default compares
// enrichment entity tallies; an embeddings-based scorer could replace it
// without touching the graph code.

use crate::cluster::conversation::Conversation;
use crate::topics::entity::EntityProfile;
use crate::topics::similarity::{pair_weight, SimilarityWeights};

/// Pairwise relatedness of two conversations. Zero or less means unrelated.
pub trait ConversationSimilarity {
    fn score(&self, a: &Conversation<'_>, b: &Conversation<'_>) -> f64;
}

/// Entity-overlap scoring over both directions (see [`pair_weight`]).
#[derive(Debug, Clone, Default)]
pub struct EntityOverlap {
    pub weights: SimilarityWeights,
}

impl EntityOverlap {
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    pub fn score_profiles(&self, a: &EntityProfile, b: &EntityProfile) -> f64 {
        pair_weight(a, b, &self.weights)
    }
}

impl ConversationSimilarity for EntityOverlap {
    fn score(&self, a: &Conversation<'_>, b: &Conversation<'_>) -> f64 {
        self.score_profiles(a.entities(), b.entities())
    }
}
