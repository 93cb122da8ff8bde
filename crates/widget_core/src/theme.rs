//! Light/dark presentation state. Pure; no transcript or network effect.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Label for the toggle control, naming the mode it would switch to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Dark mode",
            ThemeMode::Dark => "Light mode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_mode_and_label() {
        let initial = ThemeMode::Light;
        let label = initial.toggle_label();

        let toggled_twice = initial.toggled().toggled();
        assert_eq!(toggled_twice, initial);
        assert_eq!(toggled_twice.toggle_label(), label);
    }

    #[test]
    fn label_names_the_next_mode() {
        assert_eq!(ThemeMode::Light.toggle_label(), "Dark mode");
        assert_eq!(ThemeMode::Dark.toggle_label(), "Light mode");
    }
}
