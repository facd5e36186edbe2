//! User settings model and default table
//!
//! `Settings` always carries every field. `SettingsPatch` is the partial form
//! exchanged with the backend and used for local overlays; merging a patch
//! onto settings is a right-biased shallow overlay.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Color theme. Unknown values from the backend are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Other(String),
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        match value.as_str() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::Other(value),
        }
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => "light".to_string(),
            Theme::Dark => "dark".to_string(),
            Theme::Other(value) => value,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
            Theme::Other(value) => f.write_str(value),
        }
    }
}

/// Base font size. Unknown values from the backend are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
    Other(String),
}

impl From<String> for FontSize {
    fn from(value: String) -> Self {
        match value.as_str() {
            "small" => FontSize::Small,
            "medium" => FontSize::Medium,
            "large" => FontSize::Large,
            "extra-large" => FontSize::ExtraLarge,
            _ => FontSize::Other(value),
        }
    }
}

impl From<FontSize> for String {
    fn from(size: FontSize) -> Self {
        size.to_string()
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSize::Small => f.write_str("small"),
            FontSize::Medium => f.write_str("medium"),
            FontSize::Large => f.write_str("large"),
            FontSize::ExtraLarge => f.write_str("extra-large"),
            FontSize::Other(value) => f.write_str(value),
        }
    }
}

/// Complete user settings
/// Missing fields in stored or received JSON fall back to the default table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub font_size: FontSize,
    pub sidebar_collapsed: bool,
    pub notifications_enabled: bool,
    pub compact_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            font_size: FontSize::Medium,
            sidebar_collapsed: false,
            notifications_enabled: true,
            compact_mode: false,
        }
    }
}

impl Settings {
    /// Right-biased shallow overlay: fields present in `patch` win
    pub fn overlay(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            theme: patch.theme.clone().unwrap_or_else(|| self.theme.clone()),
            font_size: patch.font_size.clone().unwrap_or_else(|| self.font_size.clone()),
            sidebar_collapsed: patch.sidebar_collapsed.unwrap_or(self.sidebar_collapsed),
            notifications_enabled: patch.notifications_enabled.unwrap_or(self.notifications_enabled),
            compact_mode: patch.compact_mode.unwrap_or(self.compact_mode),
        }
    }

    /// `defaults ⊕ patch`
    pub fn from_defaults(patch: &SettingsPatch) -> Settings {
        Settings::default().overlay(patch)
    }

    /// Full patch carrying every field (used to overwrite remote state)
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            theme: Some(self.theme.clone()),
            font_size: Some(self.font_size.clone()),
            sidebar_collapsed: Some(self.sidebar_collapsed),
            notifications_enabled: Some(self.notifications_enabled),
            compact_mode: Some(self.compact_mode),
        }
    }
}

/// Partial settings
/// Absent, `null`, and wrongly typed fields all deserialize to `None`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub sidebar_collapsed: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub compact_mode: Option<bool>,
}

/// Custom deserializer that drops a field instead of failing the whole object
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    match raw {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                warn!(value = %value, error = %e, "Ignoring settings field with unexpected type");
                Ok(None)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: serde_json::Value) -> SettingsPatch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_default_table() {
        let defaults = Settings::default();
        assert_eq!(defaults.theme, Theme::Light);
        assert_eq!(defaults.font_size, FontSize::Medium);
        assert!(!defaults.sidebar_collapsed);
        assert!(defaults.notifications_enabled);
        assert!(!defaults.compact_mode);
    }

    #[test]
    fn test_from_defaults_keeps_every_default_key() {
        let merged = Settings::from_defaults(&patch(json!({ "theme": "dark" })));
        assert_eq!(
            merged,
            Settings {
                theme: Theme::Dark,
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_overlay_right_bias() {
        let base = Settings {
            theme: Theme::Dark,
            compact_mode: true,
            ..Settings::default()
        };
        let merged = base.overlay(&patch(json!({
            "theme": "light",
            "font_size": "large",
            "notifications_enabled": false,
        })));

        assert_eq!(merged.theme, Theme::Light);
        assert_eq!(merged.font_size, FontSize::Large);
        assert!(!merged.notifications_enabled);
        // Untouched fields come from the base, not the defaults
        assert!(merged.compact_mode);
        assert!(!merged.sidebar_collapsed);
    }

    #[test]
    fn test_overlay_empty_patch_is_identity() {
        let base = Settings {
            font_size: FontSize::ExtraLarge,
            sidebar_collapsed: true,
            ..Settings::default()
        };
        assert_eq!(base.overlay(&SettingsPatch::default()), base);
    }

    #[test]
    fn test_patch_ignores_unknown_and_mistyped_fields() {
        let parsed = patch(json!({
            "theme": 42,
            "compact_mode": "yes",
            "sidebar_collapsed": true,
            "notifications_enabled": null,
            "user_id": "u1",
        }));

        assert_eq!(
            parsed,
            SettingsPatch {
                sidebar_collapsed: Some(true),
                ..SettingsPatch::default()
            }
        );
    }

    #[test]
    fn test_unrecognized_enum_values_preserved() {
        let parsed = patch(json!({ "theme": "sepia", "font_size": "huge" }));
        assert_eq!(parsed.theme, Some(Theme::Other("sepia".to_string())));
        assert_eq!(parsed.font_size, Some(FontSize::Other("huge".to_string())));

        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out, json!({ "theme": "sepia", "font_size": "huge" }));
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let only_compact = SettingsPatch {
            compact_mode: Some(true),
            ..SettingsPatch::default()
        };
        assert_eq!(serde_json::to_value(&only_compact).unwrap(), json!({ "compact_mode": true }));
        assert_eq!(serde_json::to_value(SettingsPatch::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_to_patch_round_trips_through_overlay() {
        let custom = Settings {
            theme: Theme::Dark,
            font_size: FontSize::Small,
            sidebar_collapsed: true,
            notifications_enabled: false,
            compact_mode: true,
        };
        assert_eq!(Settings::from_defaults(&custom.to_patch()), custom);
    }

    #[test]
    fn test_settings_wire_names() {
        let value = serde_json::to_value(Settings {
            font_size: FontSize::ExtraLarge,
            ..Settings::default()
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "theme": "light",
                "font_size": "extra-large",
                "sidebar_collapsed": false,
                "notifications_enabled": true,
                "compact_mode": false,
            })
        );
    }
}
