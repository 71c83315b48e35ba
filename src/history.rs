//! Per-topic memory of recently generated question text.
//!
//! Used to steer later prompts away from repeats. The store sits behind a trait so a
//! shared cache can replace the in-process default in multi-instance deployments.
//! Eviction is strictly oldest-first.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[async_trait]
pub trait QuestionHistory: Send + Sync {
  /// Up to `limit` of the most recently recorded questions for `topic_key`, oldest first.
  async fn recent(&self, topic_key: &str, limit: usize) -> Vec<String>;

  /// Remember `questions` under `topic_key`, evicting the oldest beyond capacity.
  async fn record(&self, topic_key: &str, questions: &[String]);
}

/// Process-local history guarded by a tokio `RwLock`.
///
/// Each topic is an `LruCache` that is only ever touched through `contains`,
/// `put` on new keys and `iter`, none of which promote an existing entry, so
/// least-recently-used is the same as oldest-inserted.
pub struct InMemoryHistory {
  capacity: NonZeroUsize,
  topics: RwLock<HashMap<String, LruCache<String, ()>>>,
}

impl InMemoryHistory {
  /// A zero capacity is raised to one.
  pub fn new(capacity: usize) -> Self {
    let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
    Self { capacity, topics: RwLock::new(HashMap::new()) }
  }

  #[cfg(test)]
  async fn len(&self, topic_key: &str) -> usize {
    self.topics.read().await.get(topic_key).map_or(0, |c| c.len())
  }
}

#[async_trait]
impl QuestionHistory for InMemoryHistory {
  async fn recent(&self, topic_key: &str, limit: usize) -> Vec<String> {
    let topics = self.topics.read().await;
    let Some(cache) = topics.get(topic_key) else {
      return Vec::new();
    };
    // `iter` runs newest first.
    let mut out: Vec<String> = cache.iter().take(limit).map(|(q, _)| q.clone()).collect();
    out.reverse();
    out
  }

  #[instrument(level = "debug", skip_all, fields(%topic_key, added = questions.len()))]
  async fn record(&self, topic_key: &str, questions: &[String]) {
    let mut topics = self.topics.write().await;
    let capacity = self.capacity;
    let cache = topics.entry(topic_key.to_string()).or_insert_with(|| LruCache::new(capacity));
    let mut evicted = 0usize;
    for q in questions {
      if !cache.contains(q) && cache.push(q.clone(), ()).is_some() {
        evicted += 1;
      }
    }
    debug!(target: "quiz", size = cache.len(), evicted, "Topic history updated");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn qs(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("question {i}")).collect()
  }

  #[tokio::test]
  async fn unknown_topic_is_empty() {
    let h = InMemoryHistory::new(100);
    assert!(h.recent("stablecoins", 10).await.is_empty());
  }

  #[tokio::test]
  async fn overflow_evicts_back_to_capacity() {
    let h = InMemoryHistory::new(100);
    for chunk in 0..10 {
      h.record("stablecoins", &qs(chunk * 10..chunk * 10 + 10)).await;
    }
    assert_eq!(h.len("stablecoins").await, 100);

    h.record("stablecoins", &qs(100..105)).await;
    assert_eq!(h.len("stablecoins").await, 100);

    let all = h.recent("stablecoins", 200).await;
    assert_eq!(all.first().map(String::as_str), Some("question 5"));
    assert_eq!(all.last().map(String::as_str), Some("question 104"));
  }

  #[tokio::test]
  async fn duplicates_are_not_double_counted() {
    let h = InMemoryHistory::new(100);
    h.record("governance", &qs(0..3)).await;
    h.record("governance", &qs(1..4)).await;
    assert_eq!(h.recent("governance", 10).await, qs(0..4));
  }

  #[tokio::test]
  async fn recent_returns_latest_entries() {
    let h = InMemoryHistory::new(100);
    h.record("minipay", &qs(0..25)).await;
    assert_eq!(h.recent("minipay", 10).await, qs(15..25));
  }

  #[tokio::test]
  async fn small_capacity_keeps_newest_in_insertion_order() {
    let h = InMemoryHistory::new(3);
    h.record("celo", &qs(0..2)).await;
    h.record("celo", &qs(0..5)).await;
    assert_eq!(h.len("celo").await, 3);
    assert_eq!(h.recent("celo", 10).await, qs(2..5));
  }

  #[tokio::test]
  async fn topics_are_isolated() {
    let h = InMemoryHistory::new(100);
    h.record("a", &qs(0..2)).await;
    assert!(h.recent("b", 10).await.is_empty());
  }
}
