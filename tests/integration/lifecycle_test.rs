use sb::core::{
    Block, BlockRegistry, Config, ConfigSource, ControlRequest, Controller, LifecycleState,
};
use sb::error::SbError;
use sb::platform::MemorySink;
use sb::providers::{factory, PollResult, ProviderFactory};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;

fn fixed(text: &'static str) -> ProviderFactory {
    factory(move |_| move || -> PollResult { Ok(text.to_string()) })
}

fn registry() -> BlockRegistry {
    BlockRegistry::new(vec![
        Block::new("alpha", true, 0, fixed("alpha")),
        Block::new("beta", false, 0, fixed("beta")),
    ])
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

async fn reach(state: &mut watch::Receiver<LifecycleState>, target: LifecycleState) {
    tokio::time::timeout(Duration::from_secs(3), state.wait_for(|s| *s == target))
        .await
        .expect("state not reached")
        .expect("controller dropped");
}

#[tokio::test]
async fn test_restart_rereads_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "delimiter = \" | \"\n").unwrap();

    let sink = Arc::new(MemorySink::new());
    let controller = Controller::new(registry(), ConfigSource::File(path.clone()), sink.clone());
    let handle = controller.handle();
    let mut state = controller.state();
    let run = tokio::spawn(controller.run());

    reach(&mut state, LifecycleState::Running).await;
    wait_for("first session", || sink.last().as_deref() == Some("alpha")).await;

    fs::write(&path, "delimiter = \" / \"\n[blocks]\nbeta = true\n").unwrap();
    handle.send(ControlRequest::Restart).await.unwrap();
    wait_for("second session", || sink.last().as_deref() == Some("alpha / beta")).await;
    assert_eq!(*state.borrow(), LifecycleState::Running);

    // Removing the override restores beta's default on the next restart
    fs::write(&path, "delimiter = \" / \"\n[blocks]\nalpha = false\n").unwrap();
    handle.send(ControlRequest::Restart).await.unwrap();
    wait_for("third session", || sink.last().as_deref() == Some("")).await;

    handle.send(ControlRequest::Terminate).await.unwrap();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_terminate_publishes_empty_status() {
    let sink = Arc::new(MemorySink::new());
    let controller = Controller::new(
        registry(),
        ConfigSource::Static(Config::default()),
        sink.clone(),
    );
    let handle = controller.handle();
    let mut state = controller.state();
    let run = tokio::spawn(controller.run());

    reach(&mut state, LifecycleState::Running).await;
    wait_for("status", || sink.last().as_deref() == Some("alpha")).await;

    handle.send(ControlRequest::Terminate).await.unwrap();
    run.await.unwrap().unwrap();

    assert_eq!(*state.borrow(), LifecycleState::Terminated);
    let history = sink.history();
    assert_eq!(history.last().map(String::as_str), Some(""));
    assert_eq!(history.iter().filter(|s| s.is_empty()).count(), 1);
}

#[tokio::test]
async fn test_trigger_request_reaches_block() {
    let sink = Arc::new(MemorySink::new());
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = calls.clone();
    let registry = BlockRegistry::new(vec![Block::new(
        "counter",
        true,
        0,
        factory(move |_| {
            let counter = counter.clone();
            move || -> PollResult {
                let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
                Ok(n.to_string())
            }
        }),
    )]);

    let controller = Controller::new(
        registry,
        ConfigSource::Static(Config::default()),
        sink.clone(),
    );
    let handle = controller.handle();
    let run = tokio::spawn(controller.run());

    wait_for("first poll", || sink.last().as_deref() == Some("1")).await;
    handle.send(ControlRequest::Trigger(0)).await.unwrap();
    wait_for("triggered poll", || sink.last().as_deref() == Some("2")).await;

    // Unknown index is ignored, controller keeps running
    handle.send(ControlRequest::Trigger(7)).await.unwrap();
    handle.send(ControlRequest::Terminate).await.unwrap();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_malformed_config_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[blocks]\nalpha = maybe\n").unwrap();

    let sink = Arc::new(MemorySink::new());
    let controller = Controller::new(registry(), ConfigSource::File(path), sink.clone());
    let state = controller.state();

    let result = controller.run().await;
    assert!(matches!(result, Err(SbError::ConfigParse { .. })));
    assert_eq!(*state.borrow(), LifecycleState::Terminated);
    assert!(sink.history().is_empty());
}

#[tokio::test]
async fn test_malformed_config_on_restart_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    let sink = Arc::new(MemorySink::new());
    let controller = Controller::new(registry(), ConfigSource::File(path.clone()), sink.clone());
    let handle = controller.handle();
    let mut state = controller.state();
    let run = tokio::spawn(controller.run());

    // Missing file: defaults
    reach(&mut state, LifecycleState::Running).await;

    fs::write(&path, "delimiter = ").unwrap();
    handle.send(ControlRequest::Restart).await.unwrap();
    let result = run.await.unwrap();
    assert!(matches!(result, Err(SbError::ConfigParse { .. })));
}
