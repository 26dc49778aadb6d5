//! Snapshot publishing.
//!
//! Readers take an `Arc<Settings>` and keep it for as long as they like; a
//! writer publishes a replacement with one atomic swap. Nothing is locked.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::settings::Settings;

/// Holder of the current [`Settings`] snapshot.
#[derive(Debug)]
pub struct SettingsStore {
    current: ArcSwap<Settings>,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    /// The current snapshot.
    pub fn load(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    /// Replace the current snapshot, returning the previous one.
    pub fn publish(&self, settings: Settings) -> Arc<Settings> {
        log::debug!(
            "Publishing settings snapshot ({} profiles)",
            settings.all_profiles().len()
        );
        self.current.swap(Arc::new(settings))
    }

    /// Derive a snapshot from the current one and publish it. `edit` may run
    /// more than once if another writer publishes concurrently.
    pub fn update(&self, edit: impl Fn(&Settings) -> Settings) -> Arc<Settings> {
        self.current.rcu(|current| Arc::new(edit(current)))
    }
}
