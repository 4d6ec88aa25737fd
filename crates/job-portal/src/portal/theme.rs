use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// What actually gets painted once `System` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ThemePreference {
    pub const fn label(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// `system_prefers_dark` is the host's current dark-mode signal.
    pub fn resolve(self, system_prefers_dark: bool) -> ColorScheme {
        match self {
            ThemePreference::Light => ColorScheme::Light,
            ThemePreference::Dark => ColorScheme::Dark,
            ThemePreference::System if system_prefers_dark => ColorScheme::Dark,
            ThemePreference::System => ColorScheme::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(other.to_string()),
        }
    }
}

/// Where the chosen theme survives between sessions.
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Option<ThemePreference>;
    fn save(&self, preference: ThemePreference);
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferenceStore {
    value: Arc<Mutex<Option<ThemePreference>>>,
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self) -> Option<ThemePreference> {
        *self.value.lock().expect("preference mutex poisoned")
    }

    fn save(&self, preference: ThemePreference) {
        *self.value.lock().expect("preference mutex poisoned") = Some(preference);
    }
}

/// Current preference backed by a store; starts from `System` when nothing was saved.
#[derive(Debug, Clone)]
pub struct ThemeSettings<S> {
    store: S,
    current: ThemePreference,
}

impl<S> ThemeSettings<S>
where
    S: PreferenceStore,
{
    pub fn load(store: S) -> Self {
        let current = store.load().unwrap_or_default();
        Self { store, current }
    }

    pub fn preference(&self) -> ThemePreference {
        self.current
    }

    pub fn set(&mut self, preference: ThemePreference) {
        self.current = preference;
        self.store.save(preference);
        tracing::debug!(theme = %preference, "theme preference saved");
    }

    pub fn scheme(&self, system_prefers_dark: bool) -> ColorScheme {
        self.current.resolve(system_prefers_dark)
    }
}
