//! Event emitter trait for speech lifecycle broadcasting.
//!
//! This module defines the abstraction for emitting speech events.
//! Implementations handle transport details (channels, extension message
//! bus, logging, etc.). Emission never fails from the caller's point of
//! view: a broken or absent listener must not affect the speech queue.

use std::collections::HashSet;

use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::events::{SpeechEvent, SpeechTopic};

/// Default capacity of the [`BroadcastEmitter`] ring buffer.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Trait for emitting speech events.
///
/// # Implementations
///
/// - [`NoopEmitter`] - For tests and contexts without listeners
/// - [`BroadcastEmitter`] - In-process publish/subscribe
pub trait SpeechEventEmitter: Send + Sync {
    /// Emit a speech event.
    ///
    /// This method must not block and must not fail.
    fn emit(&self, event: SpeechEvent);
}

/// A no-op event emitter.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    pub const fn new() -> Self {
        Self
    }
}

impl SpeechEventEmitter for NoopEmitter {
    fn emit(&self, _event: SpeechEvent) {
        // Intentionally do nothing
    }
}

/// Publish/subscribe emitter backed by a tokio broadcast channel.
///
/// Subscribers that fall behind lose the oldest events rather than slowing
/// down the publisher.
#[derive(Debug, Clone)]
pub struct BroadcastEmitter {
    tx: broadcast::Sender<SpeechEvent>,
}

impl BroadcastEmitter {
    /// Create an emitter buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to every topic.
    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription {
            rx: self.tx.subscribe(),
            topics: None,
        }
    }

    /// Subscribe to the given topics only.
    pub fn subscribe_to(&self, topics: &[SpeechTopic]) -> EventSubscription {
        EventSubscription {
            rx: self.tx.subscribe(),
            topics: Some(topics.iter().copied().collect()),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl SpeechEventEmitter for BroadcastEmitter {
    fn emit(&self, event: SpeechEvent) {
        let topic = event.topic();
        if self.tx.send(event).is_err() {
            trace!(?topic, "No speech event subscribers");
        }
    }
}

/// A topic-filtered view on a [`BroadcastEmitter`].
#[derive(Debug)]
pub struct EventSubscription {
    rx: broadcast::Receiver<SpeechEvent>,
    topics: Option<HashSet<SpeechTopic>>,
}

impl EventSubscription {
    fn wants(&self, event: &SpeechEvent) -> bool {
        self.topics
            .as_ref()
            .is_none_or(|topics| topics.contains(&event.topic()))
    }

    /// Wait for the next matching event. Returns `None` once every emitter
    /// has been dropped.
    pub async fn recv(&mut self) -> Option<SpeechEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Speech event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next matching event if one is already buffered.
    pub fn try_recv(&mut self) -> Option<SpeechEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Speech event subscriber lagged");
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }

    /// Drain every buffered matching event.
    pub fn drain(&mut self) -> Vec<SpeechEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
