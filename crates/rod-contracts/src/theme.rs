use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

pub const THEME_KEY: &str = "rod-ai-theme";
const THEME_FILE: &str = "theme.json";

/// UI theme preference. Exactly two values; toggling converges between
/// them and never drifts to a third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggle(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn parse(raw: &str) -> Option<Theme> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

/// The one piece of state that survives a restart: the theme preference,
/// stored as a single key in `theme.json` under the state dir.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(THEME_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file, unreadable JSON, or an unknown stored value all fall
    /// back to the default theme.
    pub fn load(&self) -> Theme {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Theme::default();
        };
        serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|payload| {
                payload
                    .get(THEME_KEY)
                    .and_then(Value::as_str)
                    .and_then(Theme::parse)
            })
            .unwrap_or_default()
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut payload = Map::new();
        payload.insert(
            THEME_KEY.to_string(),
            Value::String(theme.as_str().to_string()),
        );
        let line = serde_json::to_string(&Value::Object(payload))?;
        fs::write(&self.path, line)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn missing_file_defaults_to_dark() {
        let temp = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(temp.path());
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(temp.path());
        store.save(Theme::Light).unwrap();
        assert_eq!(store.load(), Theme::Light);
        store.save(Theme::Dark).unwrap();
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn unknown_stored_value_falls_back_to_dark() {
        let temp = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(temp.path());
        fs::write(store.path(), r#"{"rod-ai-theme":"solarized"}"#).unwrap();
        assert_eq!(store.load(), Theme::Dark);

        fs::write(store.path(), "not json").unwrap();
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn toggling_converges_between_two_values() {
        let mut theme = Theme::Dark;
        for _ in 0..5 {
            theme = theme.toggle();
        }
        assert_eq!(theme, Theme::Light);
        assert_eq!(theme.toggle().toggle(), theme);
    }
}
