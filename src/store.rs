//! Client-side settings store
//!
//! Single authoritative holder of the user's settings. Remote reads and writes
//! go through a [`SettingsApi`]; every change is projected onto the
//! [`PresentationTarget`] handed to the store and written to the persisted
//! envelope when one is configured.
//!
//! Operations take `&self` so several of them may be in flight on one thread.
//! There is a single loading flag and no ordering between in-flight requests:
//! whichever response resolves last overwrites the in-memory settings.

use std::cell::{Ref, RefCell};
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::api::{SettingsApi, SyncResult};
use crate::config::envelope::SettingsEnvelope;
use crate::config::settings::{Settings, SettingsPatch};
use crate::presentation::{self, PresentationTarget};

/// Where the current in-memory settings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    /// Default table, nothing loaded yet
    Defaults,
    /// Restored from the envelope at start (placeholder until the first remote load)
    Persisted,
    /// Optimistic local change
    Local,
    /// Last successful remote response
    Remote,
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Fetch,
    Update,
}

impl Operation {
    fn label(self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Update => "update",
        }
    }
}

#[derive(Debug)]
struct StoreState {
    settings: Settings,
    loading: bool,
    error: Option<String>,
    source: SettingsSource,
    /// Sequence number of the most recently issued remote request
    issued: u64,
    /// Highest sequence number whose response has been applied
    applied: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            loading: false,
            error: None,
            source: SettingsSource::Defaults,
            issued: 0,
            applied: 0,
        }
    }
}

pub struct SettingsStore<A, P> {
    api: A,
    target: RefCell<P>,
    state: RefCell<StoreState>,
    envelope_path: Option<PathBuf>,
}

impl<A: SettingsApi, P: PresentationTarget> SettingsStore<A, P> {
    pub fn new(api: A, target: P) -> Self {
        Self {
            api,
            target: RefCell::new(target),
            state: RefCell::new(StoreState::default()),
            envelope_path: None,
        }
    }

    /// Persist every settings change to the envelope at `path`
    pub fn with_envelope(mut self, path: impl Into<PathBuf>) -> Self {
        self.envelope_path = Some(path.into());
        self
    }

    pub fn settings(&self) -> Settings {
        self.state.borrow().settings.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().error = None;
    }

    pub fn source(&self) -> SettingsSource {
        self.state.borrow().source
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Borrow the presentation target (read-only)
    pub fn target(&self) -> Ref<'_, P> {
        self.target.borrow()
    }

    /// Use a persisted snapshot as placeholder settings.
    /// Only replaces defaults or an earlier snapshot; remote and local changes win.
    pub fn bootstrap(&self, envelope: SettingsEnvelope) {
        {
            let mut state = self.state.borrow_mut();
            if matches!(state.source, SettingsSource::Remote | SettingsSource::Local) {
                warn!(source = ?state.source, "Ignoring persisted settings, newer settings already in place");
                return;
            }
            state.settings = envelope.settings;
            state.source = SettingsSource::Persisted;
        }
        debug!("Bootstrapped settings from persisted envelope");
        self.apply_settings();
    }

    /// Read the configured envelope and bootstrap from it.
    /// A missing or unreadable envelope leaves the defaults in place.
    pub fn restore(&self) {
        let Some(path) = self.envelope_path.as_deref() else {
            self.apply_settings();
            return;
        };
        match SettingsEnvelope::load(path) {
            Ok(Some(envelope)) => self.bootstrap(envelope),
            Ok(None) => self.apply_settings(),
            Err(e) => {
                error!(path = %path.display(), error = ?e, "Failed to restore persisted settings, using defaults");
                self.apply_settings();
            }
        }
    }

    /// Load the user's settings from the backend
    pub async fn fetch_settings(&self, user_id: Option<&str>) {
        let Some(user_id) = present(user_id) else {
            debug!("fetch_settings skipped: no user");
            return;
        };

        let seq = self.begin();
        info!(user = %user_id, seq, "Fetching settings");
        let result = self.api.get_settings(user_id).await;
        self.complete(Operation::Fetch, user_id, seq, result);
    }

    /// Write a partial settings object to the backend and adopt its response
    pub async fn update_settings(&self, user_id: Option<&str>, patch: &SettingsPatch) {
        let Some(user_id) = present(user_id) else {
            debug!("update_settings skipped: no user");
            return;
        };

        let seq = self.begin();
        info!(user = %user_id, seq, ?patch, "Updating settings");
        let result = self.api.update_settings(user_id, patch).await;
        self.complete(Operation::Update, user_id, seq, result);
    }

    /// Overwrite the remote settings with the default table
    pub async fn reset_settings(&self, user_id: Option<&str>) {
        self.update_settings(user_id, &Settings::default().to_patch()).await;
    }

    /// Optimistic local change: overlay `patch` and apply immediately, no network
    pub fn set_local_settings(&self, patch: &SettingsPatch) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            state.settings = state.settings.overlay(patch);
            state.source = SettingsSource::Local;
            state.settings.clone()
        };
        debug!(?patch, "Applied local settings");
        self.persist(&snapshot);
        self.apply_settings();
    }

    /// Project the current settings onto the presentation target
    pub fn apply_settings(&self) {
        let state = self.state.borrow();
        let mut target = self.target.borrow_mut();
        presentation::apply(&state.settings, &mut *target);
    }

    fn begin(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.loading = true;
        state.error = None;
        state.issued += 1;
        state.issued
    }

    fn complete(&self, op: Operation, user_id: &str, seq: u64, result: SyncResult<SettingsPatch>) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            state.loading = false;

            match result {
                Ok(response) => {
                    if seq < state.applied {
                        warn!(
                            op = op.label(),
                            seq,
                            newer = state.applied,
                            "Applying settings response older than one already applied"
                        );
                    }
                    state.applied = state.applied.max(seq);
                    state.settings = Settings::from_defaults(&response);
                    state.source = SettingsSource::Remote;
                    state.settings.clone()
                }
                Err(e) => {
                    error!(op = op.label(), user = %user_id, seq, error = ?e, "Settings operation failed");
                    state.error = Some(format!("settings operation failed ({}): {}", op.label(), e.summary()));
                    return;
                }
            }
        };

        info!(op = op.label(), user = %user_id, seq, "Settings synced");
        self.persist(&snapshot);
        self.apply_settings();
    }

    fn persist(&self, settings: &Settings) {
        let Some(path) = self.envelope_path.as_deref() else {
            return;
        };
        if let Err(e) = SettingsEnvelope::new(settings.clone()).save(path) {
            error!(path = %path.display(), error = ?e, "Failed to persist settings");
        }
    }
}

/// Absent and empty user ids are both treated as "no user"
fn present(user_id: Option<&str>) -> Option<&str> {
    user_id.filter(|id| !id.is_empty())
}
