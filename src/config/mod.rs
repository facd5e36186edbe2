//! Configuration and settings data for the dashboard
//!
//! - **settings**: the user settings model, default table and shallow merge
//! - **envelope**: persisted snapshot of the settings across restarts
//! - **app**: process configuration (API base URL, log level, storage path)

pub mod app;
pub mod envelope;
pub mod settings;

// Re-export commonly used types
pub use app::AppConfig;
pub use envelope::SettingsEnvelope;
pub use settings::{FontSize, Settings, SettingsPatch, Theme};
