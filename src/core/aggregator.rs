//! Fragment table and composed status.
//!
//! Every block owns one fragment slot. Publishing a poll result compares it
//! against the stored fragment and, when it changed, rebuilds the composed
//! status from all slots in registry order. All of that happens under one lock,
//! so the composed status always describes a single point in time.
//!
//! The render sink is not called here. Each new composed status is queued on
//! an unbounded channel while the lock is still held, and the render task calls
//! the sink for every queued status, in order. A slow sink therefore never
//! stalls publishers and still sees every change.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::providers::PollResult;
use crate::ui::formatters::truncate_utf8;

/// Maximum bytes of provider output kept per fragment (before the delimiter).
pub const OUTPUT_MAX: usize = 27;

/// Default delimiter: a blue bar with the normal scheme restored around it.
pub const DEFAULT_DELIMITER: &str = " \x03|\x01 ";

/// A composed status together with its position in the publish history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub generation: u64,
    pub text: String,
}

/// Plain fragment table; callers provide the locking.
#[derive(Debug, Clone)]
pub struct StatusTable {
    fragments: Vec<String>,
    composed: String,
    delimiter: String,
    output_max: usize,
}

impl StatusTable {
    pub fn new(slots: usize, delimiter: &str, output_max: usize) -> Self {
        Self {
            fragments: vec![String::new(); slots],
            composed: String::new(),
            delimiter: delimiter.to_string(),
            output_max,
        }
    }

    /// Largest fragment a slot can hold.
    pub fn fragment_capacity(&self) -> usize {
        self.output_max + self.delimiter.len()
    }

    pub fn fragment(&self, index: usize) -> Option<&str> {
        self.fragments.get(index).map(String::as_str)
    }

    pub fn composed(&self) -> &str {
        &self.composed
    }

    /// Store `output` in slot `index`. Returns `true` when the composed status changed.
    pub fn apply(&mut self, index: usize, output: &str) -> bool {
        let output = output.strip_suffix('\n').unwrap_or(output);
        if output.is_empty() || index >= self.fragments.len() {
            return false;
        }

        let mut fragment = String::with_capacity(self.fragment_capacity());
        fragment.push_str(truncate_utf8(output, self.output_max));
        fragment.push_str(&self.delimiter);

        if self.fragments[index] == fragment {
            return false;
        }
        self.fragments[index] = fragment;
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        self.composed.clear();
        for fragment in &self.fragments {
            self.composed.push_str(fragment);
        }
        if self.composed.ends_with(&self.delimiter) {
            let len = self.composed.len() - self.delimiter.len();
            self.composed.truncate(len);
        }
    }
}

struct Inner {
    table: StatusTable,
    generation: u64,
    renders: Option<mpsc::UnboundedSender<StatusSnapshot>>,
}

/// Shared, lock-protected status table feeding the render task.
pub struct Aggregator {
    inner: Mutex<Inner>,
}

impl Aggregator {
    pub fn new(slots: usize, delimiter: &str) -> Self {
        Self::with_output_max(slots, delimiter, OUTPUT_MAX)
    }

    pub fn with_output_max(slots: usize, delimiter: &str, output_max: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                table: StatusTable::new(slots, delimiter, output_max),
                generation: 0,
                renders: None,
            }),
        }
    }

    /// Record one poll result for block `index`.
    ///
    /// Failures and unchanged output are no-ops and return `None`. Otherwise the
    /// new snapshot is returned and made visible to subscribers.
    pub fn publish(&self, index: usize, result: &PollResult) -> Option<StatusSnapshot> {
        let Ok(output) = result else {
            return None;
        };

        let mut inner = self.inner.lock();
        if !inner.table.apply(index, output) {
            return None;
        }

        inner.generation += 1;
        let snapshot = StatusSnapshot {
            generation: inner.generation,
            text: inner.table.composed().to_string(),
        };
        // Queued under the lock so the subscriber receives generations in order
        let closed = inner
            .renders
            .as_ref()
            .is_some_and(|renders| renders.send(snapshot.clone()).is_err());
        if closed {
            inner.renders = None;
        }
        log::trace!("Status generation {} published", snapshot.generation);

        Some(snapshot)
    }

    /// Latest composed status.
    pub fn snapshot(&self) -> StatusSnapshot {
        let inner = self.inner.lock();
        StatusSnapshot {
            generation: inner.generation,
            text: inner.table.composed().to_string(),
        }
    }

    pub fn fragment(&self, index: usize) -> Option<String> {
        self.inner.lock().table.fragment(index).map(str::to_string)
    }

    pub fn fragment_capacity(&self) -> usize {
        self.inner.lock().table.fragment_capacity()
    }

    /// Receiver for every snapshot published from now on, in publish order.
    ///
    /// There is one subscriber at a time; subscribing again replaces it.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<StatusSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().renders = Some(tx);
        rx
    }
}
