use parking_lot::Mutex;
use sb::core::{Block, BlockRegistry, Session, TriggerOutcome};
use sb::error::Result;
use sb::platform::{MemorySink, StatusSink};
use sb::providers::{factory, PollResult, ProviderFactory, ProviderSettings};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Provider whose next output is set by the test.
#[derive(Clone, Default)]
struct Script {
    value: Arc<Mutex<String>>,
    calls: Arc<AtomicUsize>,
}

impl Script {
    fn new(value: &str) -> Self {
        let script = Self::default();
        script.set(value);
        script
    }

    fn set(&self, value: &str) {
        *self.value.lock() = value.to_string();
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn factory(&self) -> ProviderFactory {
        let script = self.clone();
        factory(move |_| {
            let script = script.clone();
            move || -> PollResult {
                script.calls.fetch_add(1, Ordering::SeqCst);
                Ok(script.value.lock().clone())
            }
        })
    }
}

async fn wait_for<F: Fn() -> bool>(what: &str, condition: F) {
    for _ in 0..300 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

fn start(registry: &BlockRegistry, sink: Arc<MemorySink>) -> Session {
    Session::start(registry, &ProviderSettings::default(), " | ", sink)
}

#[tokio::test]
async fn test_example_scenario() {
    let cpu = Script::new("45%");
    let time = Script::new("12:30");
    let registry = BlockRegistry::new(vec![
        Block::new("cpu", true, 10, cpu.factory()),
        Block::new("time", true, 60, time.factory()),
    ]);
    let sink = Arc::new(MemorySink::new());
    let session = start(&registry, sink.clone());

    wait_for("initial status", || sink.last().as_deref() == Some("45% | 12:30")).await;

    // Unchanged output: polled, but nothing rendered
    let rendered = sink.history().len();
    session.dispatcher().fire(0);
    wait_for("cpu re-poll", || cpu.calls() == 2).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.history().len(), rendered);

    cpu.set("46%");
    session.dispatcher().fire(0);
    wait_for("cpu update", || sink.last().as_deref() == Some("46% | 12:30")).await;

    time.set("12:31");
    assert_eq!(session.dispatcher().fire(1), TriggerOutcome::Queued);
    wait_for("time update", || sink.last().as_deref() == Some("46% | 12:31")).await;

    assert_eq!(time.calls(), 2);
    session.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_trigger_targets_exactly_one_block() {
    let scripts: Vec<_> = (0..3).map(|i| Script::new(&format!("s{}", i))).collect();
    let registry = BlockRegistry::new(
        scripts
            .iter()
            .enumerate()
            .map(|(i, s)| Block::new(&format!("b{}", i), true, 0, s.factory()))
            .collect(),
    );
    let sink = Arc::new(MemorySink::new());
    let session = start(&registry, sink.clone());

    wait_for("initial polls", || scripts.iter().all(|s| s.calls() == 1)).await;

    scripts[1].set("changed");
    session.dispatcher().fire(1);
    wait_for("triggered block", || scripts[1].calls() == 2).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(scripts[0].calls(), 1);
    assert_eq!(scripts[2].calls(), 1);
    assert_eq!(session.aggregator().fragment(0).as_deref(), Some("s0 | "));
    assert_eq!(session.aggregator().fragment(2).as_deref(), Some("s2 | "));
    wait_for("render", || sink.last().as_deref() == Some("s0 | changed | s2")).await;

    session.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_trigger_for_disabled_block_is_ignored() {
    let on = Script::new("on");
    let off = Script::new("off");
    let registry = BlockRegistry::new(vec![
        Block::new("on", true, 0, on.factory()),
        Block::new("off", false, 0, off.factory()),
    ]);
    let session = start(&registry, Arc::new(MemorySink::new()));

    assert_eq!(session.dispatcher().fire(1), TriggerOutcome::Ignored);
    assert_eq!(session.dispatcher().fire(99), TriggerOutcome::Ignored);
    wait_for("initial poll", || on.calls() == 1).await;
    assert_eq!(off.calls(), 0);

    session.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_polls_of_one_block_never_overlap() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));

    let provider = {
        let (in_flight, max_in_flight, calls) =
            (in_flight.clone(), max_in_flight.clone(), calls.clone());
        factory(move |_| {
            let (in_flight, max_in_flight, calls) =
                (in_flight.clone(), max_in_flight.clone(), calls.clone());
            move || -> PollResult {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_in_flight.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(30));
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(format!("{}", calls.fetch_add(1, Ordering::SeqCst)))
            }
        })
    };

    let registry = BlockRegistry::new(vec![Block::with_interval(
        "slow",
        true,
        Duration::from_millis(10),
        provider,
    )]);
    let session = start(&registry, Arc::new(MemorySink::new()));

    let outcomes: Vec<_> = (0..20).map(|_| session.dispatcher().fire(0)).collect();
    assert!(outcomes.contains(&TriggerOutcome::Coalesced));
    assert!(!outcomes.contains(&TriggerOutcome::Ignored));

    wait_for("several polls", || calls.load(Ordering::SeqCst) >= 5).await;
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);

    session.shutdown(Duration::from_secs(1)).await;
}

/// Sink that takes a long time per call.
struct SlowSink {
    inner: MemorySink,
}

impl StatusSink for SlowSink {
    fn set_status(&self, status: &str) -> Result<()> {
        std::thread::sleep(Duration::from_millis(20));
        self.inner.set_status(status)
    }
}

#[tokio::test]
async fn test_slow_sink_does_not_stall_publishers() {
    let script = Script::new("first");
    let registry = BlockRegistry::new(vec![Block::new("b", true, 0, script.factory())]);
    let sink = Arc::new(SlowSink {
        inner: MemorySink::new(),
    });
    let session = Session::start(&registry, &ProviderSettings::default(), " | ", sink.clone());

    wait_for("initial poll", || session.aggregator().snapshot().text == "first").await;

    let started = Instant::now();
    for i in 0..20 {
        session.aggregator().publish(0, &Ok(format!("v{}", i)));
    }
    assert!(started.elapsed() < Duration::from_millis(200));

    // Every status reaches the sink, in publish order
    wait_for("final render", || sink.inner.last().as_deref() == Some("v19")).await;
    let mut expected = vec!["first".to_string()];
    expected.extend((0..20).map(|i| format!("v{}", i)));
    assert_eq!(sink.inner.history(), expected);

    session.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_shutdown_aborts_stuck_provider() {
    let registry = BlockRegistry::new(vec![Block::new(
        "stuck",
        true,
        0,
        factory(|_| {
            || -> PollResult {
                std::thread::sleep(Duration::from_millis(500));
                Ok("late".to_string())
            }
        }),
    )]);
    let sink = Arc::new(MemorySink::new());
    let session = start(&registry, sink.clone());
    let aggregator = Arc::clone(session.aggregator());

    let started = Instant::now();
    session.shutdown(Duration::from_millis(50)).await;
    assert!(started.elapsed() < Duration::from_millis(400));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(aggregator.snapshot().text, "");
}
