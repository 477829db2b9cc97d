//! Usage accounting — call and cost counters since process start.

use tokio::sync::Mutex;
use tracing::debug;

use crate::types::UsageStats;

/// Thread-safe usage counters.
#[derive(Default)]
pub struct UsageTracker {
    stats: Mutex<UsageStats>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successful call against `model_name`.
    pub async fn record(&self, model_name: &str, cost: f64) {
        let mut stats = self.stats.lock().await;
        stats.total_calls += 1;
        stats.total_cost += cost;
        *stats.by_model.entry(model_name.to_string()).or_insert(0) += 1;
        debug!(
            model = model_name,
            cost,
            total_calls = stats.total_calls,
            "usage recorded"
        );
    }

    /// Copy of the current counters.
    pub async fn snapshot(&self) -> UsageStats {
        self.stats.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_empty() {
        let tracker = UsageTracker::new();
        assert_eq!(tracker.snapshot().await, UsageStats::default());
    }

    #[tokio::test]
    async fn test_record_accumulates() {
        let tracker = UsageTracker::new();
        tracker.record("Gemini Pro", 0.02).await;
        tracker.record("Gemini Pro", 0.02).await;
        tracker.record("OpenAI DALL-E 3", 0.1).await;

        let stats = tracker.snapshot().await;
        assert_eq!(stats.total_calls, 3);
        assert!((stats.total_cost - 0.14).abs() < 1e-9);
        assert_eq!(stats.by_model["Gemini Pro"], 2);
        assert_eq!(stats.by_model["OpenAI DALL-E 3"], 1);
    }
}
