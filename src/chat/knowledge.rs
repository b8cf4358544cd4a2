// ABOUTME: Static knowledge base of topic/guidance pairs with keyword-overlap retrieval
// ABOUTME: Loaded once from a JSON question/answer file and never mutated afterwards
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

//! # Knowledge Base
//!
//! Retrieval is a heuristic relevance filter. Each whitespace token of the
//! query earns 2 points if it overlaps any topic token and 1 point if it
//! overlaps any guidance token, where "overlap" means either token contains the
//! other. Entries scoring zero are never returned.

use crate::constants::chat::NO_RELEVANT_GUIDANCE;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Reverse;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

/// Points for a query token overlapping a topic token
const TOPIC_MATCH_POINTS: u32 = 2;
/// Points for a query token overlapping a guidance token
const GUIDANCE_MATCH_POINTS: u32 = 1;

/// One topic and the guidance text attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Short topic, usually phrased as a question
    pub topic: String,
    /// Guidance text
    pub guidance: String,
}

impl KnowledgeEntry {
    /// Create an entry
    #[must_use]
    pub fn new(topic: impl Into<String>, guidance: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            guidance: guidance.into(),
        }
    }
}

/// Read-only topic/guidance corpus
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Knowledge base over the given entries, in insertion order
    #[must_use]
    pub const fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Knowledge base with no entries
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a JSON array of `{"question": .., "answer": ..}` objects
    ///
    /// Items missing either string field are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the text is not a JSON array
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let items: Vec<Value> = serde_json::from_str(json).map_err(|e| {
            AppError::serialization(format!("Knowledge base is not a JSON array: {e}"))
        })?;

        let mut entries = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let question = item.get("question").and_then(Value::as_str);
            let answer = item.get("answer").and_then(Value::as_str);
            match (question, answer) {
                (Some(q), Some(a)) if !q.trim().is_empty() && !a.trim().is_empty() => {
                    entries.push(KnowledgeEntry::new(q, a));
                }
                _ => warn!(index, "Skipping malformed knowledge base item"),
            }
        }

        Ok(Self::new(entries))
    }

    /// Load from a file, degrading to an empty knowledge base on any failure
    pub async fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Knowledge base unavailable, continuing without it");
                return Self::empty();
            }
        };

        match Self::from_json_str(&text) {
            Ok(kb) => {
                info!(path = %path.display(), entries = kb.len(), "Loaded knowledge base");
                kb
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Knowledge base unreadable, continuing without it");
                Self::empty()
            }
        }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Keyword-overlap score of one entry against a query
    #[must_use]
    pub fn score(entry: &KnowledgeEntry, query: &str) -> u32 {
        let topic_tokens = tokenize(&entry.topic);
        let guidance_tokens = tokenize(&entry.guidance);

        tokenize(query)
            .iter()
            .map(|word| {
                let mut points = 0;
                if overlaps_any(word, &topic_tokens) {
                    points += TOPIC_MATCH_POINTS;
                }
                if overlaps_any(word, &guidance_tokens) {
                    points += GUIDANCE_MATCH_POINTS;
                }
                points
            })
            .sum()
    }

    /// Up to `top_k` entries with a positive score, best first
    ///
    /// Equal scores keep insertion order.
    #[must_use]
    pub fn rank(&self, query: &str, top_k: usize) -> Vec<(&KnowledgeEntry, u32)> {
        let mut scored: Vec<(&KnowledgeEntry, u32)> = self
            .entries
            .iter()
            .map(|entry| (entry, Self::score(entry, query)))
            .filter(|(_, score)| *score > 0)
            .collect();

        // stable
        scored.sort_by_key(|(_, score)| Reverse(*score));
        scored.truncate(top_k);
        scored
    }

    /// Retrieved guidance rendered for prompt injection
    ///
    /// Never empty: with no overlap the "no relevant guidance" sentinel is
    /// returned so the prompt stays well-formed.
    #[must_use]
    pub fn retrieve(&self, query: &str, top_k: usize) -> String {
        let ranked = self.rank(query, top_k);
        if ranked.is_empty() {
            return NO_RELEVANT_GUIDANCE.to_owned();
        }

        ranked
            .iter()
            .map(|(entry, _)| format!("Topic: {}\nGuidance: {}", entry.topic, entry.guidance))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn overlaps_any(word: &str, tokens: &[String]) -> bool {
    tokens
        .iter()
        .any(|token| token.contains(word) || word.contains(token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_counts_topic_and_guidance_overlap() {
        let entry = KnowledgeEntry::new("Coping with anxiety", "Try slow breathing");
        // "anxiety" hits the topic, "breathing" hits the guidance
        assert_eq!(KnowledgeBase::score(&entry, "anxiety breathing"), 3);
        assert_eq!(KnowledgeBase::score(&entry, "zzz"), 0);
    }

    #[test]
    fn test_overlap_is_bidirectional() {
        let entry = KnowledgeEntry::new("stress", "rest");
        // "stressed" contains the topic token "stress"
        assert_eq!(KnowledgeBase::score(&entry, "stressed"), 2);
    }
}
