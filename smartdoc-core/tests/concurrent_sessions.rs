//! Concurrent session store access tests.
//!
//! Tests that the store's locking discipline holds up under parallel use:
//! - Appends on one session from many threads are never lost
//! - Creates racing past capacity never leave the store over its bound
//! - Lookups racing eviction see a session whole or not at all

use smartdoc_core::{CoreError, DocType, SessionStore};
use std::sync::{Arc, Barrier};
use std::thread;

/// Test that concurrent appends on the same session all land.
#[test]
fn test_concurrent_appends_same_session() {
    let store = Arc::new(SessionStore::new(10));
    let id = store.create("shared.pdf", DocType::Pdf, "content".to_string());

    let threads = 8;
    let per_thread = 50;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let id = id.clone();

            thread::spawn(move || {
                barrier.wait();
                for i in 0..per_thread {
                    store
                        .append_history(&id, &format!("t{}-q{}", t, i), "a")
                        .unwrap_or_else(|e| panic!("Thread {} append failed: {}", t, e));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Append thread panicked");
    }

    let history = store.get(&id).expect("Session should exist").history;
    assert_eq!(history.len(), threads * per_thread);

    // Each thread's own appends stay in the order it made them
    for t in 0..threads {
        let prefix = format!("t{}-", t);
        let mine: Vec<&str> = history
            .iter()
            .map(|e| e.question.as_str())
            .filter(|q| q.starts_with(&prefix))
            .collect();
        let expected: Vec<String> = (0..per_thread).map(|i| format!("t{}-q{}", t, i)).collect();
        assert_eq!(mine, expected);
    }
}

/// Test that racing creates never exceed capacity.
#[test]
fn test_concurrent_creates_respect_capacity() {
    let capacity = 20;
    let store = Arc::new(SessionStore::new(capacity));
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6)
        .map(|t| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                (0..40)
                    .map(|i| {
                        let id = store.create(
                            &format!("t{}-{}.pdf", t, i),
                            DocType::Pdf,
                            String::new(),
                        );
                        assert!(store.count() <= capacity, "Store exceeded capacity");
                        id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        created += handle.join().expect("Create thread panicked").len();
    }

    assert_eq!(created, 240);
    assert_eq!(store.count(), capacity);
    assert_eq!(store.ids().len(), capacity);
}

/// Test that readers and appenders racing eviction never see partial state.
#[test]
fn test_access_during_eviction() {
    let store = Arc::new(SessionStore::new(5));
    let victims: Vec<String> = (0..5)
        .map(|i| store.create(&format!("old{}.pdf", i), DocType::Pdf, format!("body {}", i)))
        .collect();

    let barrier = Arc::new(Barrier::new(2));

    let reader = {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        let victims = victims.clone();
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..200 {
                for (i, id) in victims.iter().enumerate() {
                    if let Some(session) = store.get(id) {
                        assert_eq!(session.content, format!("body {}", i));
                        assert_eq!(session.filename, format!("old{}.pdf", i));
                    }
                    match store.append_history(id, "q", "a") {
                        Ok(()) | Err(CoreError::SessionNotFound(_)) => {}
                        Err(e) => panic!("Unexpected error: {}", e),
                    }
                }
            }
        })
    };

    let writer = {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..5 {
                store.create(&format!("new{}.pdf", i), DocType::Pdf, String::new());
            }
        })
    };

    reader.join().expect("Reader thread panicked");
    writer.join().expect("Writer thread panicked");

    assert_eq!(store.count(), 5);
    for id in &victims {
        assert!(store.get(id).is_none(), "Old session should be evicted");
    }
}
