use serde::{Deserialize, Serialize};

/// Display preference. Stored as a bare boolean, `true` meaning dark.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "bool", into = "bool")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl From<bool> for Theme {
    fn from(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl From<Theme> for bool {
    fn from(theme: Theme) -> Self {
        theme.is_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_as_boolean() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "true");
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "false");
        assert_eq!(serde_json::from_str::<Theme>("true").unwrap(), Theme::Dark);
    }

    #[test]
    fn toggles_back_and_forth() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }
}
