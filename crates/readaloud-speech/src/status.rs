//! Which tab is currently speaking.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, warn};

use readaloud_core::TabId;

/// Result of [`SpeakingStatus::mark_speaking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Nothing was speaking before.
    Marked,
    /// The same tab was already marked.
    AlreadySpeakingSameTab,
    /// Another tab was still marked and has been replaced.
    PreemptedTab(TabId),
}

/// Shared record of the tab whose text is being spoken.
///
/// At most one tab is marked at a time. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct SpeakingStatus {
    speaking: Arc<Mutex<Option<TabId>>>,
}

impl SpeakingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<TabId>> {
        self.speaking.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `tab` as speaking. The mark is always taken; a leftover mark
    /// is reported but never blocks.
    pub fn mark_speaking(&self, tab: TabId) -> MarkOutcome {
        let previous = self.slot().replace(tab);
        match previous {
            None => {
                debug!(?tab, "Tab marked as speaking");
                MarkOutcome::Marked
            }
            Some(prev) if prev == tab => {
                warn!(?tab, "Tab was already marked as speaking");
                MarkOutcome::AlreadySpeakingSameTab
            }
            Some(prev) => {
                error!(?prev, ?tab, "Another tab was still marked as speaking");
                MarkOutcome::PreemptedTab(prev)
            }
        }
    }

    /// Clear the mark, whichever tab holds it.
    pub fn mark_done(&self) -> Option<TabId> {
        let previous = self.slot().take();
        if previous.is_some() {
            debug!(tab = ?previous, "Tab marked as done speaking");
        }
        previous
    }

    /// Clear the mark only if `tab` holds it. Returns whether it did.
    pub fn mark_tab_done(&self, tab: TabId) -> bool {
        let mut slot = self.slot();
        if *slot == Some(tab) {
            *slot = None;
            debug!(?tab, "Tab marked as done speaking");
            true
        } else {
            false
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.slot().is_some()
    }

    pub fn is_speaking_tab(&self, tab: TabId) -> bool {
        *self.slot() == Some(tab)
    }

    pub fn speaking_tab(&self) -> Option<TabId> {
        *self.slot()
    }
}

/// Marks a tab as speaking for as long as it lives.
///
/// Dropping the guard clears the mark if the tab still holds it, so the
/// mark is released on every exit path of a session, panics included.
#[derive(Debug)]
pub struct SpeakingGuard {
    status: SpeakingStatus,
    tab: TabId,
}

impl SpeakingGuard {
    pub fn mark(status: &SpeakingStatus, tab: TabId) -> Self {
        if let MarkOutcome::PreemptedTab(previous) = status.mark_speaking(tab) {
            debug!(
                tab_id = tab.0,
                previous_tab_id = previous.0,
                "Speaking guard took over from another tab"
            );
        }
        Self {
            status: status.clone(),
            tab,
        }
    }
}

impl Drop for SpeakingGuard {
    fn drop(&mut self) {
        self.status.mark_tab_done(self.tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_clear() {
        let status = SpeakingStatus::new();
        assert!(!status.is_speaking());

        assert_eq!(status.mark_speaking(TabId(1)), MarkOutcome::Marked);
        assert!(status.is_speaking_tab(TabId(1)));
        assert!(!status.is_speaking_tab(TabId(2)));

        assert_eq!(status.mark_done(), Some(TabId(1)));
        assert!(!status.is_speaking());
        assert_eq!(status.mark_done(), None);
    }

    #[test]
    fn test_leftover_mark_is_replaced() {
        let status = SpeakingStatus::new();
        status.mark_speaking(TabId(1));
        assert_eq!(
            status.mark_speaking(TabId(1)),
            MarkOutcome::AlreadySpeakingSameTab
        );
        assert_eq!(
            status.mark_speaking(TabId(2)),
            MarkOutcome::PreemptedTab(TabId(1))
        );
        assert_eq!(status.speaking_tab(), Some(TabId(2)));
    }

    #[test]
    fn test_mark_tab_done_only_clears_own_mark() {
        let status = SpeakingStatus::new();
        let shared = status.clone();
        status.mark_speaking(TabId(5));

        assert!(!shared.mark_tab_done(TabId(4)));
        assert!(shared.is_speaking_tab(TabId(5)));
        assert!(shared.mark_tab_done(TabId(5)));
        assert!(!status.is_speaking());
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let status = SpeakingStatus::new();
        {
            let _guard = SpeakingGuard::mark(&status, TabId(8));
            assert!(status.is_speaking_tab(TabId(8)));
        }
        assert!(!status.is_speaking());
    }

    #[test]
    fn test_guard_leaves_newer_mark_alone() {
        let status = SpeakingStatus::new();
        let guard = SpeakingGuard::mark(&status, TabId(1));
        status.mark_speaking(TabId(2));
        drop(guard);
        assert!(status.is_speaking_tab(TabId(2)));
    }

    #[test]
    fn test_guard_takes_over_from_another_tab() {
        let status = SpeakingStatus::new();
        let first = SpeakingGuard::mark(&status, TabId(1));
        let second = SpeakingGuard::mark(&status, TabId(2));
        assert_eq!(status.speaking_tab(), Some(TabId(2)));

        drop(first);
        assert!(status.is_speaking_tab(TabId(2)));
        drop(second);
        assert!(!status.is_speaking());
    }
}
