//! Client-side settings store for the tailoring-shop order dashboard
//!
//! Holds the user's display preferences, applies them to a presentation
//! target, persists a local snapshot and keeps it in sync with the remote
//! settings service.

#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod constants;
pub mod presentation;
pub mod store;

pub use api::{HttpSettingsApi, SettingsApi, SyncError};
pub use config::{AppConfig, FontSize, Settings, SettingsEnvelope, SettingsPatch, Theme};
pub use presentation::{DocumentState, PresentationTarget};
pub use store::{SettingsSource, SettingsStore};
