//! Sequential speech queue.
//!
//! A single worker task pulls one unit of work at a time from an unbounded
//! channel and runs it to completion before taking the next, so no two
//! sessions ever speak at once.
//!
//! # Design Principles
//!
//! - Enqueueing is synchronous: submission order is execution order
//! - A failing or panicking unit of work is logged, the engine is reset,
//!   and the worker moves on; only that unit's caller sees the error
//! - Each unit runs in its own task so a panic cannot take the worker down

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use readaloud_core::{SessionId, SpeechEnginePort};

use crate::engine::stop_engine;
use crate::error::SpeechError;

/// How a session that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every part was spoken.
    Completed { parts_spoken: usize },
    /// A newer request took over; the remaining parts were skipped.
    Superseded { parts_spoken: usize },
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Speaking { part_index: usize },
    Completed,
    Superseded,
    Failed,
}

/// Point-in-time view of the session the worker is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub state: SessionState,
}

type SessionResult = Result<SessionOutcome, SpeechError>;
type SessionFuture = Pin<Box<dyn Future<Output = SessionResult> + Send>>;
type SessionFactory = Box<dyn FnOnce(SessionContext) -> SessionFuture + Send>;

struct Job {
    id: SessionId,
    factory: SessionFactory,
    reply: oneshot::Sender<SessionResult>,
}

// ── Tracking ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Tracker {
    current: Option<SessionSnapshot>,
    processed: u64,
}

type SharedTracker = Arc<Mutex<Tracker>>;

fn lock(tracker: &SharedTracker) -> MutexGuard<'_, Tracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle given to a running unit of work.
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: SessionId,
    tracker: SharedTracker,
}

impl SessionContext {
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Record that the session is about to speak `part_index`.
    pub fn mark_speaking(&self, part_index: usize) {
        let mut tracker = lock(&self.tracker);
        if let Some(current) = tracker.current.as_mut() {
            if current.id == self.id {
                current.state = SessionState::Speaking { part_index };
            }
        }
    }

    /// A context not attached to any queue.
    #[cfg(test)]
    pub(crate) fn detached(id: SessionId) -> Self {
        Self {
            id,
            tracker: SharedTracker::default(),
        }
    }
}

// ── Queue ───────────────────────────────────────────────────────────────────

/// Serialized chain of speech sessions.
///
/// Must be created inside a tokio runtime. The worker stops once the queue
/// is dropped and every queued unit has run.
pub struct SpeechQueue {
    tx: mpsc::UnboundedSender<Job>,
    engine: Arc<dyn SpeechEnginePort>,
    tracker: SharedTracker,
    next_id: AtomicU64,
}

impl SpeechQueue {
    /// Start the worker task.
    pub fn spawn(engine: Arc<dyn SpeechEnginePort>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tracker = SharedTracker::default();

        tokio::spawn(run_worker(rx, Arc::clone(&engine), Arc::clone(&tracker)));

        Self {
            tx,
            engine,
            tracker,
            next_id: AtomicU64::new(1),
        }
    }

    /// Append a unit of work to the chain.
    ///
    /// `factory` is called once the worker reaches this unit. The returned
    /// [`PendingSession`] settles with this unit's own result.
    pub fn enqueue<F, Fut>(&self, factory: F) -> PendingSession
    where
        F: FnOnce(SessionContext) -> Fut + Send + 'static,
        Fut: Future<Output = SessionResult> + Send + 'static,
    {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (reply, rx) = oneshot::channel();
        let job = Job {
            id,
            factory: Box::new(move |ctx| Box::pin(factory(ctx)) as SessionFuture),
            reply,
        };

        if self.tx.send(job).is_err() {
            warn!(session_id = %id, "Speech queue worker is gone, dropping session");
        } else {
            debug!(session_id = %id, "Session enqueued");
        }

        PendingSession { id, rx }
    }

    /// Cancel the active utterance and resume the engine.
    ///
    /// Queued sessions are not removed; superseded ones end on their own at
    /// their next continuation check.
    pub fn stop(&self) {
        info!("Stopping current utterance");
        stop_engine(self.engine.as_ref());
    }

    /// The session the worker is currently running, if any.
    pub fn current(&self) -> Option<SessionSnapshot> {
        lock(&self.tracker).current
    }

    /// Number of units that have settled.
    pub fn processed(&self) -> u64 {
        lock(&self.tracker).processed
    }

    pub fn is_idle(&self) -> bool {
        lock(&self.tracker).current.is_none()
    }
}

impl std::fmt::Debug for SpeechQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechQueue")
            .field("current", &self.current())
            .field("processed", &self.processed())
            .finish_non_exhaustive()
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Job>,
    engine: Arc<dyn SpeechEnginePort>,
    tracker: SharedTracker,
) {
    while let Some(job) = rx.recv().await {
        let Job { id, factory, reply } = job;

        lock(&tracker).current = Some(SessionSnapshot {
            id,
            state: SessionState::Pending,
        });

        let ctx = SessionContext {
            id,
            tracker: Arc::clone(&tracker),
        };

        let result = match tokio::spawn(factory(ctx)).await {
            Ok(result) => result,
            Err(join_error) => {
                error!(session_id = %id, error = %join_error, "Speech session task died");
                Err(SpeechError::SessionPanicked { session_id: id })
            }
        };

        let state = match &result {
            Ok(SessionOutcome::Completed { .. }) => SessionState::Completed,
            Ok(SessionOutcome::Superseded { .. }) => SessionState::Superseded,
            Err(e) => {
                warn!(session_id = %id, error = %e, "Speech session failed, resetting engine");
                stop_engine(engine.as_ref());
                SessionState::Failed
            }
        };

        {
            let mut tracker = lock(&tracker);
            tracker.current = None;
            tracker.processed += 1;
        }
        debug!(session_id = %id, ?state, "Session settled");

        if reply.send(result).is_err() {
            debug!(session_id = %id, "Session caller stopped waiting");
        }
    }

    debug!("Speech queue worker stopped");
}

/// Caller's handle on an enqueued session.
#[derive(Debug)]
pub struct PendingSession {
    id: SessionId,
    rx: oneshot::Receiver<SessionResult>,
}

impl PendingSession {
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Wait until the session settles.
    pub async fn wait(self) -> SessionResult {
        self.rx.await.unwrap_or(Err(SpeechError::QueueClosed))
    }
}
