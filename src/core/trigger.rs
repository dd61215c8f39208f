//! Routing of external refresh requests to block workers.
//!
//! Every enabled block gets a one-slot channel. A trigger that arrives while
//! another one is still pending for the same block is folded into it, so a
//! burst of signals costs at most one extra poll.

use tokio::sync::mpsc::{self, error::TrySendError};

/// What happened to a trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The worker will poll once more.
    Queued,
    /// A refresh was already pending for that block.
    Coalesced,
    /// Out of range, disabled, or the worker is gone.
    Ignored,
}

/// Per-session trigger routes, indexed by block position.
#[derive(Debug, Default)]
pub struct TriggerDispatcher {
    routes: Vec<Option<mpsc::Sender<()>>>,
}

impl TriggerDispatcher {
    pub fn new(slots: usize) -> Self {
        Self {
            routes: vec![None; slots],
        }
    }

    /// Open the route for block `index` and hand back the worker's end.
    pub(crate) fn connect(&mut self, index: usize) -> Option<mpsc::Receiver<()>> {
        let route = self.routes.get_mut(index)?;
        let (tx, rx) = mpsc::channel(1);
        *route = Some(tx);
        Some(rx)
    }

    /// Ask block `index` to refresh now. Never blocks.
    pub fn fire(&self, index: usize) -> TriggerOutcome {
        let Some(Some(tx)) = self.routes.get(index) else {
            log::debug!("Trigger for block {} ignored: no route", index);
            return TriggerOutcome::Ignored;
        };

        match tx.try_send(()) {
            Ok(()) => TriggerOutcome::Queued,
            Err(TrySendError::Full(())) => TriggerOutcome::Coalesced,
            Err(TrySendError::Closed(())) => {
                log::debug!("Trigger for block {} ignored: worker stopped", index);
                TriggerOutcome::Ignored
            }
        }
    }

    /// Drop every route so workers see their trigger channel close.
    pub fn close(&mut self) {
        self.routes.iter_mut().for_each(|route| *route = None);
    }
}
