use std::time::Duration;

use artconfig::{ArtConfig, ConfigError, Containers, PaletteEntry, Pick};

use crate::style::Style;
use crate::timeline::CrossfadeCurve;
use crate::types::Rgb;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown initial style '{0}'")]
    UnknownStyle(String),
    #[error("unknown initial color '{0}'")]
    UnknownColor(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Typed engine settings resolved from an [`ArtConfig`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub fade_duration: Duration,
    pub frame_interval: Duration,
    pub style_curve: CrossfadeCurve,
    pub color_curve: CrossfadeCurve,
    pub visibility_margin_px: u32,
    /// `None` picks a random style at start-up.
    pub initial_style: Option<Style>,
    /// Palette index; `None` picks a random entry at start-up.
    pub initial_color: Option<usize>,
    pub theme_storage_key: String,
    pub containers: Containers,
    pub palette: Vec<PaletteEntry>,
}

impl EngineSettings {
    pub fn from_config(config: &ArtConfig) -> Result<Self, SettingsError> {
        config.validate()?;

        let initial_style = match &config.initial_style {
            Pick::Random => None,
            Pick::Named(name) => Some(
                name.parse::<Style>()
                    .map_err(|_| SettingsError::UnknownStyle(name.clone()))?,
            ),
        };
        let initial_color = match &config.initial_color {
            Pick::Random => None,
            Pick::Named(name) => Some(
                position_of(&config.palette, name)
                    .ok_or_else(|| SettingsError::UnknownColor(name.clone()))?,
            ),
        };

        Ok(Self {
            fade_duration: config.fade_duration,
            frame_interval: config.frame_interval,
            style_curve: config.style_curve.into(),
            color_curve: config.color_curve.into(),
            visibility_margin_px: config.visibility_margin_px,
            initial_style,
            initial_color,
            theme_storage_key: config.theme_storage_key.clone(),
            containers: config.containers.clone(),
            palette: config.palette.clone(),
        })
    }

    /// Palette index of an exact palette color.
    pub fn palette_index(&self, color: Rgb) -> Option<usize> {
        self.palette
            .iter()
            .position(|entry| Rgb::from_bytes(entry.color) == color)
    }

    /// Case-insensitive palette lookup by name.
    pub fn find_color(&self, name: &str) -> Option<(usize, &PaletteEntry)> {
        position_of(&self.palette, name).map(|index| (index, &self.palette[index]))
    }
}

fn position_of(palette: &[PaletteEntry], name: &str) -> Option<usize> {
    let name = name.trim();
    palette
        .iter()
        .position(|entry| entry.name.eq_ignore_ascii_case(name))
}

impl Default for EngineSettings {
    fn default() -> Self {
        let config = ArtConfig::default();
        Self {
            fade_duration: config.fade_duration,
            frame_interval: config.frame_interval,
            style_curve: config.style_curve.into(),
            color_curve: config.color_curve.into(),
            visibility_margin_px: config.visibility_margin_px,
            initial_style: None,
            initial_color: None,
            theme_storage_key: config.theme_storage_key,
            containers: config.containers,
            palette: config.palette,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_bundled_config() {
        let settings = EngineSettings::default();
        assert_eq!(settings.fade_duration, Duration::from_millis(200));
        assert_eq!(settings.frame_interval, Duration::from_millis(33));
        assert_eq!(settings.style_curve, CrossfadeCurve::Linear);
        assert_eq!(settings.color_curve, CrossfadeCurve::Smoothstep);
        assert_eq!(settings.palette.len(), 24);
    }

    #[test]
    fn resolves_named_picks() {
        let mut config = ArtConfig::default();
        config.initial_style = Pick::Named("Ripple".into());
        config.initial_color = Pick::Named("teal".into());
        let settings = EngineSettings::from_config(&config).expect("settings");
        assert_eq!(settings.initial_style, Some(Style::Ripple));
        let (index, entry) = settings.find_color("Teal").expect("teal");
        assert_eq!(settings.initial_color, Some(index));
        assert_eq!(entry.color, [0, 148, 133]);
        assert_eq!(
            settings.palette_index(Rgb::from_bytes([0, 148, 133])),
            Some(index)
        );
    }

    #[test]
    fn unknown_style_is_reported() {
        let mut config = ArtConfig::default();
        config.initial_style = Pick::Named("plasma".into());
        let err = EngineSettings::from_config(&config).unwrap_err();
        assert!(matches!(err, SettingsError::UnknownStyle(name) if name == "plasma"));
    }
}
