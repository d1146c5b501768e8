//! Theme preference, stored as a plain string.

use std::fmt;
use std::str::FromStr;

use crate::{KeyValueStore, StoreError};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(StoreError::Other(format!("unknown theme: {other}"))),
        }
    }
}

/// Stored theme; unknown values read as unset.
pub fn load_theme(kv: &impl KeyValueStore) -> Result<Option<Theme>, StoreError> {
    Ok(kv.get(THEME_KEY)?.and_then(|raw| raw.parse().ok()))
}

pub fn save_theme(kv: &mut impl KeyValueStore, theme: Theme) -> Result<(), StoreError> {
    kv.set(THEME_KEY, theme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn theme_is_stored_plain() {
        let mut kv = MemoryStore::new();
        assert_eq!(load_theme(&kv).unwrap(), None);
        save_theme(&mut kv, Theme::Dark).unwrap();
        assert_eq!(kv.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(load_theme(&kv).unwrap(), Some(Theme::Dark));
    }

    #[test]
    fn unknown_theme_reads_unset() {
        let mut kv = MemoryStore::new();
        kv.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(load_theme(&kv).unwrap(), None);
    }
}
