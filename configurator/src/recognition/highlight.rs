//! Fresh-match highlighting
//!
//! Keys filled by recognition are highlighted for a short while. The set is
//! owned by the current recognition result: a new recognition cancels the
//! pending clear task and replaces the set wholesale, and editing a key drops
//! its highlight at once so a late clear can never bring it back.

use parking_lot::Mutex;
use shared::SelectionKey;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shared "freshly matched" key set
pub type FreshMatches = Arc<Mutex<BTreeSet<SelectionKey>>>;

#[derive(Debug)]
pub struct HighlightTimer {
    fresh: FreshMatches,
    delay: Duration,
    cancel: Option<CancellationToken>,
}

impl HighlightTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            fresh: Arc::new(Mutex::new(BTreeSet::new())),
            delay,
            cancel: None,
        }
    }

    /// Highlight `keys`, replacing the previous set and its clear task
    pub fn start(&mut self, keys: impl IntoIterator<Item = SelectionKey>) {
        let token = CancellationToken::new();
        {
            let mut fresh = self.fresh.lock();
            if let Some(previous) = self.cancel.replace(token.clone()) {
                previous.cancel();
            }
            *fresh = keys.into_iter().collect();
            if fresh.is_empty() {
                return;
            }
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, highlights will not clear automatically");
            return;
        };
        let fresh = self.fresh.clone();
        let delay = self.delay;
        handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let mut fresh = fresh.lock();
                    // Cancellation happens under the lock, so this check is final
                    if !token.is_cancelled() {
                        fresh.clear();
                        tracing::debug!("Fresh-match highlights cleared");
                    }
                }
            }
        });
    }

    /// Cancel the clear task and drop every highlight
    pub fn cancel(&mut self) {
        let mut fresh = self.fresh.lock();
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        fresh.clear();
    }

    /// Drop the highlight of one edited key
    pub fn clear_key(&self, key: &SelectionKey) {
        self.fresh.lock().remove(key);
    }

    pub fn is_fresh(&self, key: &SelectionKey) -> bool {
        self.fresh.lock().contains(key)
    }

    pub fn snapshot(&self) -> Vec<SelectionKey> {
        self.fresh.lock().iter().cloned().collect()
    }

    /// Handle to the live set (for renderers polling it)
    pub fn shared(&self) -> FreshMatches {
        self.fresh.clone()
    }
}

impl Drop for HighlightTimer {
    fn drop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(attr: &str) -> SelectionKey {
        SelectionKey::attribute("case", attr, 1)
    }

    #[tokio::test]
    async fn test_clears_after_delay() {
        let mut timer = HighlightTimer::new(Duration::from_millis(30));
        timer.start([key("m"), key("c")]);
        assert!(timer.is_fresh(&key("m")));
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(timer.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_restart_replaces_set_and_task() {
        let mut timer = HighlightTimer::new(Duration::from_millis(60));
        timer.start([key("m")]);
        tokio::time::sleep(Duration::from_millis(40)).await;
        timer.start([key("c")]);
        assert!(!timer.is_fresh(&key("m")));

        // The first task's deadline passes without touching the new set
        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(timer.is_fresh(&key("c")));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!timer.is_fresh(&key("c")));
    }

    #[tokio::test]
    async fn test_edit_clears_immediately() {
        let mut timer = HighlightTimer::new(Duration::from_secs(10));
        timer.start([key("m"), key("c")]);
        timer.clear_key(&key("m"));
        assert_eq!(timer.snapshot(), vec![key("c")]);
        timer.cancel();
        assert!(timer.snapshot().is_empty());
    }

    #[test]
    fn test_without_runtime_keeps_set() {
        let mut timer = HighlightTimer::new(Duration::from_millis(1));
        timer.start([key("m")]);
        assert!(timer.is_fresh(&key("m")));
    }
}
