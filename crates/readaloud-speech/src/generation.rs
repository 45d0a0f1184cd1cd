//! Request generations.
//!
//! Every speech request draws a new generation from a shared counter. Work
//! belonging to a request checks its [`Continuation`] before each step; once
//! a newer request has drawn a generation the older work winds down on its
//! own. Nothing is ever cancelled from the outside.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter shared by everything that issues speech requests.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the next generation, superseding every outstanding continuation.
    pub fn issue(&self) -> Continuation {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Continuation {
            latest: Arc::clone(&self.latest),
            generation,
        }
    }

    /// The most recently issued generation (0 before the first request).
    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Permission to keep working on behalf of one request.
#[derive(Debug, Clone)]
pub struct Continuation {
    latest: Arc<AtomicU64>,
    generation: u64,
}

impl Continuation {
    /// True while no newer generation has been issued.
    pub fn should_continue(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_generation_supersedes_older() {
        let counter = GenerationCounter::new();
        assert_eq!(counter.current(), 0);

        let first = counter.issue();
        assert!(first.should_continue());
        assert_eq!(first.generation(), 1);

        let second = counter.issue();
        assert!(!first.should_continue());
        assert!(second.should_continue());
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_clones_share_the_counter() {
        let counter = GenerationCounter::new();
        let continuation = counter.issue();
        let other_handle = counter.clone();
        let copy = continuation.clone();

        other_handle.issue();
        assert!(!continuation.should_continue());
        assert!(!copy.should_continue());
    }

    #[test]
    fn test_concurrent_issues_are_unique() {
        let counter = GenerationCounter::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    (0..100)
                        .map(|_| counter.issue().generation())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
        assert_eq!(counter.current(), 800);
    }
}
