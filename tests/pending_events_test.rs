#![cfg(not(target_arch = "wasm32"))]

use std::time::{Duration, Instant};

use starscape::flow::PendingEvents;

#[derive(Debug, PartialEq)]
enum Loaded {
    Fast,
    Slow,
    Missing(bool),
}

fn boxed<F: Future<Output = Loaded> + 'static>(future: F) -> Box<dyn Future<Output = Loaded>> {
    Box::new(future)
}

#[test]
fn finished_events_do_not_wait_for_slow_ones() {
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let mut pending = PendingEvents::new();
    pending.push(vec![
        boxed(async move {
            let _ = rx.await;
            Loaded::Slow
        }),
        boxed(async { Loaded::Fast }),
    ]);
    assert_eq!(pending.len(), 2);

    assert_eq!(pending.take_ready(), vec![Loaded::Fast]);
    assert_eq!(pending.len(), 1);
    // still blocked, polling again must not block or yield anything
    assert!(pending.take_ready().is_empty());

    tx.send(()).expect("receiver alive");
    assert_eq!(pending.take_ready(), vec![Loaded::Slow]);
    assert!(pending.is_empty());
}

#[test]
fn file_loads_resolve_across_frames() {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut pending = PendingEvents::new();
    pending.push(vec![boxed(async {
        let loaded = starscape::resources::load_binary("no-such-texture.png").await;
        Loaded::Missing(loaded.is_err())
    })]);

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while events.is_empty() && Instant::now() < deadline {
        let _guard = runtime.enter();
        events = pending.take_ready();
        if events.is_empty() {
            std::thread::sleep(Duration::from_millis(5));
        }
    }
    assert_eq!(events, vec![Loaded::Missing(true)]);
    assert!(pending.is_empty());
}

#[test]
fn nothing_pending_yields_nothing() {
    let mut pending: PendingEvents<Loaded> = PendingEvents::default();
    assert!(pending.is_empty());
    assert!(pending.take_ready().is_empty());
}
