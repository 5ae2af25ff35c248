// Entity tallies: per-conversation counts of enrichment labels.
//
// Enrichment produces free-form entity strings ("@OpenAI", "Web-LLM").
// Normalization folds the common spelling variants together before
// counting; it is a heuristic, so "GPT 4" and "gpt-4" stay distinct.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::feed::post::Enrichment;

/// Lower-case and strip `@` and `-`.
pub fn normalize_entity(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '@' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Frequency map from normalized entity to count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntityTally(BTreeMap<String, u32>);

impl EntityTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `raw` after normalizing it. Strings that
    /// normalize to nothing are ignored.
    pub fn add(&mut self, raw: &str) {
        let entity = normalize_entity(raw);
        if entity.is_empty() {
            return;
        }
        *self.0.entry(entity).or_insert(0) += 1;
    }

    pub fn count(&self, entity: &str) -> u32 {
        self.0.get(entity).copied().unwrap_or(0)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.0.contains_key(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `n` most frequent entities, ties broken alphabetically.
    pub fn top(&self, n: usize) -> Vec<(&str, u32)> {
        let mut ranked: Vec<(&str, u32)> = self.0.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

/// The two tallies a conversation keeps: primary subjects and every
/// mentioned entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityProfile {
    pub main: EntityTally,
    pub all: EntityTally,
}

impl EntityProfile {
    /// Fold one post's enrichment into the tallies.
    pub fn record(&mut self, enrichment: &Enrichment) {
        if let Some(main) = &enrichment.main_entity {
            self.main.add(main);
        }
        for entity in &enrichment.entities {
            self.all.add(entity);
        }
    }
}
