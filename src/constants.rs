//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the crate, providing a single source of truth for constant values.

/// Local storage constants
pub mod storage {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "tailorboard";

    /// Fixed storage key for the persisted settings envelope
    pub const SETTINGS_KEY: &str = "settings-storage";

    /// File extension used for the envelope on disk
    pub const EXTENSION: &str = "json";
}

/// Remote settings service constants
pub mod api {
    /// Environment variable holding the base API URL
    pub const BASE_URL_ENV: &str = "TAILORBOARD_API_BASE";

    /// Base API URL used when the environment does not provide one
    pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

    /// Path segment for reading a user's settings
    pub const GET_SETTINGS: &str = "getSettings";

    /// Path segment for writing a user's settings
    pub const UPDATE_SETTINGS: &str = "updateSettings";
}

/// Logging constants
pub mod logging {
    /// Environment variable selecting the max tracing level
    pub const LEVEL_ENV: &str = "LOG_LEVEL";

    pub const DEFAULT_LEVEL: &str = "info";
}

/// Presentation markers and variables
pub mod presentation {
    /// Class toggled on the root when the dark theme is active
    pub const DARK_CLASS: &str = "dark";

    /// Class toggled on the root when compact mode is on
    pub const COMPACT_CLASS: &str = "compact";

    /// Root variable carrying the base font size
    pub const FONT_SIZE_VAR: &str = "--font-size";

    pub const FONT_SIZE_SMALL: &str = "14px";
    pub const FONT_SIZE_MEDIUM: &str = "16px";
    pub const FONT_SIZE_LARGE: &str = "18px";
    pub const FONT_SIZE_EXTRA_LARGE: &str = "20px";
}
