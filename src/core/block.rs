//! Block descriptors and the ordered registry.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::providers::{Provider, ProviderFactory, ProviderSettings};

/// One named, independently scheduled status source.
#[derive(Clone)]
pub struct Block {
    name: String,
    default_enabled: bool,
    enabled: bool,
    interval: Duration,
    factory: ProviderFactory,
}

impl Block {
    /// `interval_secs == 0` means "poll once at startup, then only on trigger".
    pub fn new(name: &str, enabled: bool, interval_secs: u64, factory: ProviderFactory) -> Self {
        Self {
            name: name.to_string(),
            default_enabled: enabled,
            enabled,
            interval: Duration::from_secs(interval_secs),
            factory,
        }
    }

    /// Same as [`Block::new`] with a sub-second interval.
    pub fn with_interval(name: &str, enabled: bool, interval: Duration, factory: ProviderFactory) -> Self {
        Self {
            interval,
            ..Self::new(name, enabled, 0, factory)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_enabled(&self) -> bool {
        self.default_enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Build a fresh provider for a new session.
    pub fn build_provider(&self, settings: &ProviderSettings) -> Box<dyn Provider> {
        (self.factory)(settings)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("interval", &self.interval)
            .finish()
    }
}

/// The fixed, ordered list of blocks. Order is display order.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: Vec<Block>,
}

impl BlockRegistry {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Enabled blocks with their registry index.
    pub fn enabled(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().enumerate().filter(|(_, b)| b.enabled)
    }

    /// Reset every block to its compiled-in default, then apply `overrides`.
    ///
    /// Returns the override names that match no block.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, bool>) -> Vec<String> {
        for block in &mut self.blocks {
            block.enabled = block.default_enabled;
        }

        let mut unknown = Vec::new();
        for (name, &enabled) in overrides {
            match self.blocks.iter_mut().find(|b| &b.name == name) {
                Some(block) => block.enabled = enabled,
                None => unknown.push(name.clone()),
            }
        }
        unknown.sort();
        unknown
    }
}
