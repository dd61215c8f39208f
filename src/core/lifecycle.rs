//! Start, restart and terminate.
//!
//! The controller owns the block registry and drives sessions through
//! `Starting → Running → Stopping → (Restarting → Starting) | Terminated`.
//! Everything that wants to influence it (OS signals, the CLI, tests) goes
//! through a [`ControlHandle`].

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::block::BlockRegistry;
use super::config::ConfigSource;
use super::scheduler::Session;
use crate::error::{Result, SbError};
use crate::platform::display::StatusSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Running,
    Stopping,
    Restarting,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    Terminate,
    Restart,
    /// Refresh the block at this registry index now
    Trigger(usize),
}

/// Cloneable way to talk to a running [`Controller`].
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::Sender<ControlRequest>,
}

impl ControlHandle {
    pub async fn send(&self, request: ControlRequest) -> Result<()> {
        self.tx
            .send(request)
            .await
            .map_err(|_| SbError::other("controller has stopped"))
    }

    /// Non-waiting variant; fails when the queue is full or the controller is gone.
    pub fn try_send(&self, request: ControlRequest) -> Result<()> {
        self.tx
            .try_send(request)
            .map_err(|e| SbError::other(format!("control request not delivered: {}", e)))
    }
}

pub struct Controller {
    registry: BlockRegistry,
    source: ConfigSource,
    sink: Arc<dyn StatusSink>,
    requests: mpsc::Receiver<ControlRequest>,
    tx: mpsc::Sender<ControlRequest>,
    state: watch::Sender<LifecycleState>,
}

impl Controller {
    pub fn new(registry: BlockRegistry, source: ConfigSource, sink: Arc<dyn StatusSink>) -> Self {
        let (tx, requests) = mpsc::channel(32);
        let (state, _) = watch::channel(LifecycleState::Starting);
        Self {
            registry,
            source,
            sink,
            requests,
            tx,
            state,
        }
    }

    pub fn handle(&self) -> ControlHandle {
        ControlHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Run sessions until terminated.
    ///
    /// Dropping every [`ControlHandle`] counts as a termination request. A
    /// configuration that fails to parse at any start is fatal.
    pub async fn run(self) -> Result<()> {
        let Controller {
            mut registry,
            source,
            sink,
            mut requests,
            tx,
            state,
        } = self;
        drop(tx);

        loop {
            state.send_replace(LifecycleState::Starting);
            let config = match source.load() {
                Ok(config) => config,
                Err(e) => {
                    state.send_replace(LifecycleState::Terminated);
                    return Err(e);
                }
            };
            log::info!("Loaded configuration from {}", source.describe());
            config.apply_to(&mut registry);

            // Nothing will publish, so drop whatever the previous session showed
            if registry.enabled().next().is_none() {
                log::warn!("No blocks enabled");
                render_blank(&sink).await;
            }

            let session = Session::start(
                &registry,
                &config.providers,
                &config.delimiter,
                Arc::clone(&sink),
            );
            state.send_replace(LifecycleState::Running);

            let restart = loop {
                match requests.recv().await {
                    Some(ControlRequest::Trigger(index)) => {
                        let outcome = session.dispatcher().fire(index);
                        log::debug!("Trigger {} -> {:?}", index, outcome);
                    }
                    Some(ControlRequest::Restart) => break true,
                    Some(ControlRequest::Terminate) | None => break false,
                }
            };

            state.send_replace(LifecycleState::Stopping);
            session.shutdown(config.shutdown_grace()).await;

            if restart {
                log::info!("Restarting");
                state.send_replace(LifecycleState::Restarting);
                continue;
            }

            render_blank(&sink).await;
            log::info!("Terminated");
            state.send_replace(LifecycleState::Terminated);
            return Ok(());
        }
    }
}

async fn render_blank(sink: &Arc<dyn StatusSink>) {
    let sink = Arc::clone(sink);
    match tokio::task::spawn_blocking(move || sink.clear()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::warn!("Failed to clear status: {}", e),
        Err(e) => log::error!("Render sink crashed: {}", e),
    }
}
