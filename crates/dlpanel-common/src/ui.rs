//! Persisted presentation preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::persist::{PersistentStore, Record, StateStorage};

/// Storage key of the persisted UI record.
pub const UI_STORAGE_KEY: &str = "ui-storage";

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TABLE_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system preference.
    #[default]
    Auto,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Auto];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    theme: Theme,
    sidebar_collapsed: bool,
    language: String,
    compact_mode: bool,
    table_page_size: u32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            sidebar_collapsed: false,
            language: DEFAULT_LANGUAGE.to_string(),
            compact_mode: false,
            table_page_size: DEFAULT_TABLE_PAGE_SIZE,
        }
    }
}

impl UiState {
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn compact_mode(&self) -> bool {
        self.compact_mode
    }

    pub fn table_page_size(&self) -> u32 {
        self.table_page_size
    }
}

impl Record for UiState {
    const KEY: &'static str = UI_STORAGE_KEY;
}

/// Persisted UI preferences with their setters.
pub type UiStore<S> = PersistentStore<UiState, S>;

impl<S: StateStorage> PersistentStore<UiState, S> {
    pub fn set_theme(&mut self, theme: Theme) {
        self.update(|state| state.theme = theme);
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.update(|state| state.sidebar_collapsed = collapsed);
    }

    pub fn toggle_sidebar(&mut self) {
        self.update(|state| state.sidebar_collapsed = !state.sidebar_collapsed);
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        self.update(|state| state.language = language);
    }

    pub fn set_compact_mode(&mut self, compact: bool) {
        self.update(|state| state.compact_mode = compact);
    }

    /// Rows per table page; zero is bumped to one.
    pub fn set_table_page_size(&mut self, size: u32) {
        self.update(|state| state.table_page_size = size.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AUTH_STORAGE_KEY, AuthStore};
    use crate::persist::MemoryStorage;
    use serde_json::json;

    #[test]
    fn defaults() {
        let store = UiStore::init(MemoryStorage::new());
        let state = store.state();
        assert_eq!(state.theme(), Theme::Auto);
        assert!(!state.sidebar_collapsed());
        assert_eq!(state.language(), "en-US");
        assert!(!state.compact_mode());
        assert_eq!(state.table_page_size(), 20);
    }

    #[test]
    fn setters_persist_under_ui_key() {
        let storage = MemoryStorage::new();
        let mut store = UiStore::init(storage.clone());
        store.set_theme(Theme::Dark);
        store.toggle_sidebar();
        store.set_language("de-DE");
        store.set_compact_mode(true);
        store.set_table_page_size(50);

        let raw = storage.read(UI_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            json!({
                "state": {
                    "theme": "dark",
                    "sidebarCollapsed": true,
                    "language": "de-DE",
                    "compactMode": true,
                    "tablePageSize": 50
                },
                "version": 0
            })
        );

        let reloaded = UiStore::init(storage);
        assert_eq!(reloaded.state().theme(), Theme::Dark);
        assert_eq!(reloaded.state().table_page_size(), 50);
    }

    #[test]
    fn ui_and_auth_records_are_independent() {
        let storage = MemoryStorage::new();
        let mut ui = UiStore::init(storage.clone());
        let mut auth = AuthStore::init(storage.clone());

        ui.set_theme(Theme::Light);
        auth.clear_auth();

        assert!(storage.read(AUTH_STORAGE_KEY).unwrap().is_some());
        assert_eq!(UiStore::init(storage).state().theme(), Theme::Light);
    }

    #[test]
    fn zero_page_size_is_bumped() {
        let mut store = UiStore::init(MemoryStorage::new());
        store.set_table_page_size(0);
        assert_eq!(store.state().table_page_size(), 1);
    }

    #[test]
    fn theme_parses_its_own_names() {
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>(), Ok(theme));
        }
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn unknown_theme_in_storage_falls_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage
            .write(UI_STORAGE_KEY, &json!({ "state": { "theme": "sepia" }, "version": 0 }))
            .unwrap();
        assert_eq!(UiStore::init(storage).state(), &UiState::default());
    }
}
