use crate::error::{Result, TreeError};
use crate::palette::{Colour, Palette};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`
///
/// ```toml
/// palette = ["ff0000", "ffffff", "378b29"]
/// seed = 42
/// growth_limit = 1.5
///
/// [style]
/// decoration_scale = 3.0
/// line_scale = 0.35
/// branch_colour = "a1662f"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub palette: Option<Vec<String>>,
    pub seed: Option<u64>,
    pub growth_limit: Option<f64>,
    #[serde(default)]
    pub style: StyleSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct StyleSettings {
    pub decoration_scale: Option<f64>,
    pub line_scale: Option<f64>,
    pub branch_colour: Option<String>,
    pub background: Option<String>,
}

impl Settings {
    /// Read the user's settings; a missing or broken file yields defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let parsed = fs::read_to_string(path)
            .map_err(TreeError::from)
            .and_then(|content| Self::from_toml_str(&content));
        match parsed {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("ignoring settings at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("treeglow")
            .join("config.toml")
    }

    /// The configured palette, if the file sets one
    pub fn palette(&self) -> Result<Option<Palette>> {
        self.palette.as_ref().map(Palette::from_hex).transpose()
    }
}

impl StyleSettings {
    pub fn branch_colour(&self) -> Result<Option<Colour>> {
        self.branch_colour.as_deref().map(Colour::parse_hex).transpose()
    }

    pub fn background(&self) -> Result<Option<Colour>> {
        self.background.as_deref().map(Colour::parse_hex).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_settings() {
        let settings = Settings::from_toml_str(
            r#"
            palette = ["ff0000", "00ff00"]
            seed = 7
            growth_limit = 2.5

            [style]
            decoration_scale = 3.0
            branch_colour = "654321"
            "#,
        )
        .unwrap();

        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.growth_limit, Some(2.5));
        assert_eq!(settings.palette().unwrap().unwrap().len(), 2);
        assert_eq!(settings.style.decoration_scale, Some(3.0));
        assert_eq!(settings.style.line_scale, None);
        assert_eq!(settings.style.branch_colour().unwrap(), Some(Colour::rgb(0x65, 0x43, 0x21)));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert!(settings.palette().unwrap().is_none());
        assert!(settings.seed.is_none());
    }

    #[test]
    fn bad_palette_entry_is_reported() {
        let settings = Settings::from_toml_str(r#"palette = ["notacolour"]"#).unwrap();
        assert!(matches!(settings.palette(), Err(TreeError::InvalidColour(_))));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(Settings::from_toml_str("palette = ["), Err(TreeError::Settings(_))));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/treeglow/config.toml"));
        assert!(settings.palette.is_none());
    }
}
