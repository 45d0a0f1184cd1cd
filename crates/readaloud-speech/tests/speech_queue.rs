//! Integration tests for the sequential speech queue.
//!
//! Real `SpeechSession`s are pushed through a `SpeechQueue` backed by the
//! recording mock engine.

mod common;

use std::sync::Arc;

use readaloud_core::{NoopEmitter, SpeechEventEmitter, Voice};
use readaloud_speech::{
    GenerationCounter, PendingSession, SessionOutcome, SpeechError, SpeechQueue, SpeechSession,
};

use common::MockEngine;

fn enqueue_text(
    queue: &SpeechQueue,
    engine: &Arc<MockEngine>,
    counter: &GenerationCounter,
    text: &str,
) -> PendingSession {
    let session = SpeechSession::new(
        counter.issue(),
        Voice::new("Samantha", "en-US"),
        1.0,
        1.0,
        vec![text.to_string()],
    );
    let engine = Arc::clone(engine);
    let emitter: Arc<dyn SpeechEventEmitter> = Arc::new(NoopEmitter::new());

    queue.enqueue(move |ctx| async move {
        session
            .run(&ctx, engine.as_ref(), emitter.as_ref())
            .await
    })
}

#[tokio::test]
async fn chain_survives_any_failing_session() {
    for failing in 0..5 {
        let engine = Arc::new(MockEngine::new(Vec::new()));
        let texts: Vec<String> = (0..5).map(|i| format!("part {i}")).collect();
        engine.fail_on(&texts[failing]);

        let queue = SpeechQueue::spawn(engine.clone());
        // Sessions share one generation so none supersedes another.
        let counter = GenerationCounter::new();
        let shared = counter.issue();

        let pending: Vec<PendingSession> = texts
            .iter()
            .map(|text| {
                let session = SpeechSession::new(
                    shared.clone(),
                    Voice::new("Samantha", "en-US"),
                    1.0,
                    1.0,
                    vec![text.clone()],
                );
                let engine = Arc::clone(&engine);
                queue.enqueue(move |ctx| async move {
                    session.run(&ctx, engine.as_ref(), &NoopEmitter::new()).await
                })
            })
            .collect();

        for (index, session) in pending.into_iter().enumerate() {
            let result = session.wait().await;
            if index == failing {
                assert!(matches!(result, Err(SpeechError::Engine(_))));
            } else {
                assert_eq!(result, Ok(SessionOutcome::Completed { parts_spoken: 1 }));
            }
        }

        assert_eq!(engine.spoken_texts(), texts);
        assert_eq!(queue.processed(), 5);
    }
}

#[tokio::test]
async fn only_the_latest_request_speaks() {
    let engine = Arc::new(MockEngine::new(Vec::new()));
    let queue = SpeechQueue::spawn(engine.clone());
    let counter = GenerationCounter::new();

    let older = enqueue_text(&queue, &engine, &counter, "older");
    let newer = enqueue_text(&queue, &engine, &counter, "newer");

    assert_eq!(
        older.wait().await,
        Ok(SessionOutcome::Superseded { parts_spoken: 0 })
    );
    assert_eq!(
        newer.wait().await,
        Ok(SessionOutcome::Completed { parts_spoken: 1 })
    );
    assert_eq!(engine.spoken_texts(), vec!["newer"]);
}

#[tokio::test]
async fn dropped_queue_still_settles_queued_sessions() {
    let engine = Arc::new(MockEngine::new(Vec::new()));
    let queue = SpeechQueue::spawn(engine.clone());
    let counter = GenerationCounter::new();

    let pending = enqueue_text(&queue, &engine, &counter, "last words");
    drop(queue);

    assert!(pending.wait().await.is_ok());
    assert_eq!(engine.spoken_texts(), vec!["last words"]);
}
