//! Presentation effect
//!
//! Projects settings onto a presentation target: a dark marker, a base
//! font-size variable and a compact marker. The target is passed in as an
//! explicit handle; nothing here touches global state.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::settings::{FontSize, Settings, Theme};
use crate::constants::presentation::*;

/// Handle to whatever renders the dashboard (document root, terminal UI, ...)
pub trait PresentationTarget {
    /// Add or remove a marker class on the root
    fn set_class(&mut self, name: &str, enabled: bool);

    /// Set a root-level style variable
    fn set_variable(&mut self, name: &str, value: &str);
}

/// Font-size lookup; unrecognized sizes use the medium value
pub fn font_size_value(size: &FontSize) -> &'static str {
    match size {
        FontSize::Small => FONT_SIZE_SMALL,
        FontSize::Medium => FONT_SIZE_MEDIUM,
        FontSize::Large => FONT_SIZE_LARGE,
        FontSize::ExtraLarge => FONT_SIZE_EXTRA_LARGE,
        FontSize::Other(_) => FONT_SIZE_MEDIUM,
    }
}

/// Apply settings to the target
pub fn apply(settings: &Settings, target: &mut impl PresentationTarget) {
    target.set_class(DARK_CLASS, settings.theme == Theme::Dark);
    target.set_variable(FONT_SIZE_VAR, font_size_value(&settings.font_size));
    target.set_class(COMPACT_CLASS, settings.compact_mode);
}

/// In-memory document root: class list plus style variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentState {
    classes: BTreeSet<String>,
    variables: BTreeMap<String, String>,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl PresentationTarget for DocumentState {
    fn set_class(&mut self, name: &str, enabled: bool) {
        if enabled {
            self.classes.insert(name.to_string());
        } else {
            self.classes.remove(name);
        }
    }

    fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }
}
