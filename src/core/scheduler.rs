//! Block workers and the render task.
//!
//! A session runs one task per enabled block plus one render task:
//!
//! ```text
//! block worker ──publish──▶ Aggregator ──queue──▶ render task ──▶ StatusSink
//!      ▲
//!      └── TriggerDispatcher (one-slot channel per block)
//! ```
//!
//! Workers only ever poll their own provider, and only one poll per block is
//! in flight at a time: ticks and triggers are handled by the same loop.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::aggregator::{Aggregator, StatusSnapshot};
use super::block::BlockRegistry;
use super::trigger::TriggerDispatcher;
use crate::platform::display::StatusSink;
use crate::providers::{Provider, ProviderSettings};

type SharedProvider = Arc<Mutex<Box<dyn Provider>>>;

struct BlockWorker {
    index: usize,
    name: String,
    interval: Duration,
    provider: SharedProvider,
    aggregator: Arc<Aggregator>,
}

impl BlockWorker {
    /// Run the provider on the blocking pool and publish what it returns.
    async fn poll(&self) {
        let provider = Arc::clone(&self.provider);
        let result = tokio::task::spawn_blocking(move || provider.lock().poll()).await;

        match result {
            Ok(Ok(output)) => {
                self.aggregator.publish(self.index, &Ok(output));
            }
            Ok(Err(e)) => log::debug!("Block '{}' produced no update: {}", self.name, e),
            Err(e) => log::error!("Block '{}' provider crashed: {}", self.name, e),
        }
    }

    fn ticker(&self) -> Option<Interval> {
        if self.interval.is_zero() {
            return None;
        }
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Some(ticker)
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Poll once at start, then on every tick or trigger until shutdown.
async fn block_task(
    worker: BlockWorker,
    mut triggers: mpsc::Receiver<()>,
    mut shutdown: broadcast::Receiver<()>,
) {
    log::debug!("Block '{}' worker started ({:?})", worker.name, worker.interval);

    worker.poll().await;
    let mut ticker = worker.ticker();
    let mut triggers_open = true;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            trigger = triggers.recv(), if triggers_open => match trigger {
                Some(()) => {
                    log::debug!("Block '{}' triggered", worker.name);
                    worker.poll().await;
                }
                None => triggers_open = false,
            },
            _ = next_tick(&mut ticker) => worker.poll().await,
        }
    }

    log::debug!("Block '{}' worker stopped", worker.name);
}

/// Hand every composed status to the sink, in publish order.
async fn render_task(
    mut snapshots: mpsc::UnboundedReceiver<StatusSnapshot>,
    sink: Arc<dyn StatusSink>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => break,
            snapshot = snapshots.recv() => {
                let Some(snapshot) = snapshot else {
                    break;
                };
                let sink = Arc::clone(&sink);
                let rendered =
                    tokio::task::spawn_blocking(move || sink.set_status(&snapshot.text)).await;
                match rendered {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => log::warn!("Failed to render status: {}", e),
                    Err(e) => log::error!("Render sink crashed: {}", e),
                }
            }
        }
    }
}

/// One running generation of workers. Restarting means dropping it and starting another.
pub struct Session {
    aggregator: Arc<Aggregator>,
    dispatcher: TriggerDispatcher,
    shutdown_tx: broadcast::Sender<()>,
    tasks: Vec<JoinHandle<()>>,
}

impl Session {
    /// Build fresh providers for every enabled block and spawn their workers.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        registry: &BlockRegistry,
        settings: &ProviderSettings,
        delimiter: &str,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        let aggregator = Arc::new(Aggregator::new(registry.len(), delimiter));
        let mut dispatcher = TriggerDispatcher::new(registry.len());
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let mut tasks = Vec::new();
        tasks.push(tokio::spawn(render_task(
            aggregator.subscribe(),
            sink,
            shutdown_tx.subscribe(),
        )));

        for (index, block) in registry.enabled() {
            let Some(triggers) = dispatcher.connect(index) else {
                continue;
            };
            let worker = BlockWorker {
                index,
                name: block.name().to_string(),
                interval: block.interval(),
                provider: Arc::new(Mutex::new(block.build_provider(settings))),
                aggregator: Arc::clone(&aggregator),
            };
            tasks.push(tokio::spawn(block_task(
                worker,
                triggers,
                shutdown_tx.subscribe(),
            )));
        }

        log::info!("Started {} block workers", tasks.len() - 1);

        Self {
            aggregator,
            dispatcher,
            shutdown_tx,
            tasks,
        }
    }

    pub fn aggregator(&self) -> &Arc<Aggregator> {
        &self.aggregator
    }

    pub fn dispatcher(&self) -> &TriggerDispatcher {
        &self.dispatcher
    }

    pub fn worker_count(&self) -> usize {
        self.tasks.len().saturating_sub(1)
    }

    /// Signal every task to stop and wait up to `grace` for them.
    ///
    /// Tasks still running afterwards are aborted. A provider stuck inside a
    /// blocking call keeps its pool thread until the call returns, but it can
    /// no longer publish.
    pub async fn shutdown(mut self, grace: Duration) {
        let _ = self.shutdown_tx.send(());
        self.dispatcher.close();

        let tasks = std::mem::take(&mut self.tasks);
        let aborts: Vec<_> = tasks.iter().map(JoinHandle::abort_handle).collect();

        match tokio::time::timeout(grace, join_all(tasks)).await {
            Ok(results) => {
                for e in results.into_iter().filter_map(|r| r.err()) {
                    log::error!("Session task failed: {}", e);
                }
            }
            Err(_) => {
                let stuck = aborts.iter().filter(|h| !h.is_finished()).count();
                log::warn!(
                    "{} session task(s) still running after {:?}; aborting",
                    stuck,
                    grace
                );
                for handle in aborts {
                    handle.abort();
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Poll every enabled block exactly once and return the composed status.
pub async fn poll_once(
    registry: &BlockRegistry,
    settings: &ProviderSettings,
    delimiter: &str,
) -> StatusSnapshot {
    let aggregator = Arc::new(Aggregator::new(registry.len(), delimiter));

    let polls = registry.enabled().map(|(index, block)| {
        let mut provider = block.build_provider(settings);
        let name = block.name().to_string();
        let aggregator = Arc::clone(&aggregator);
        async move {
            match tokio::task::spawn_blocking(move || provider.poll()).await {
                Ok(result) => {
                    if let Err(e) = &result {
                        log::warn!("Block '{}' failed: {}", name, e);
                    }
                    aggregator.publish(index, &result);
                }
                Err(e) => log::error!("Block '{}' provider crashed: {}", name, e),
            }
        }
    });
    join_all(polls).await;

    aggregator.snapshot()
}
