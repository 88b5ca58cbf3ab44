//! Persisted session preferences.
//!
//! Dark mode and language survive restarts; they default to dark mode on and
//! English until the user changes them.

use std::fmt;
use std::sync::Arc;

use log::warn;
use passatlas_core::KeyValueStore;
use serde::{Deserialize, Serialize};

/// Store key holding the preferences JSON object.
pub const PREFERENCES_KEY: &str = "preferences";

/// Display language of the interface texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// German.
    De,
    /// English.
    En,
    /// French.
    Fr,
    /// Italian.
    It,
}

impl Language {
    /// Return the language as a lowercase `&str`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
            Self::Fr => "fr",
            Self::It => "it",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            "it" => Ok(Self::It),
            _ => Err(format!("unknown language '{s}'")),
        }
    }
}

/// User-facing presentation preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Whether the dark theme is active.
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
    /// Interface language.
    #[serde(default)]
    pub language: Language,
}

fn default_dark_mode() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            language: Language::default(),
        }
    }
}

/// Preferences bound to the durable store, written through on change.
pub struct SessionPreferences {
    current: Preferences,
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for SessionPreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPreferences")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl SessionPreferences {
    /// Read the persisted preferences, falling back to the defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let current = match store.read(PREFERENCES_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Preferences>(&payload) {
                Ok(preferences) => preferences,
                Err(err) => {
                    warn!("Discarded unreadable preferences payload: {err}");
                    Preferences::default()
                }
            },
            Ok(None) => Preferences::default(),
            Err(err) => {
                warn!("Failed to read preferences: {err}");
                Preferences::default()
            }
        };
        Self { current, store }
    }

    /// The current preferences.
    pub fn get(&self) -> &Preferences {
        &self.current
    }

    /// Switch the theme and persist immediately.
    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.current.dark_mode = dark_mode;
        self.persist();
    }

    /// Switch the language and persist immediately.
    pub fn set_language(&mut self, language: Language) {
        self.current.language = language;
        self.persist();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.current) {
            Ok(payload) => {
                if let Err(err) = self.store.write(PREFERENCES_KEY, &payload) {
                    warn!("Failed to persist preferences: {err}");
                }
            }
            Err(err) => warn!("Failed to serialise preferences: {err}"),
        }
    }
}
