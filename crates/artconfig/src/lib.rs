use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Bundled configuration shipped with the engine.
pub const BUNDLED_TOML: &str = include_str!("../defaults/borderart.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Easing shape applied to a fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveSetting {
    Linear,
    Smoothstep,
    EaseInOut,
}

/// Either a concrete name or `"random"`, resolved at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Pick {
    Random,
    Named(String),
}

impl From<String> for Pick {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("random") {
            Pick::Random
        } else {
            Pick::Named(trimmed.to_string())
        }
    }
}

impl From<Pick> for String {
    fn from(pick: Pick) -> Self {
        match pick {
            Pick::Random => "random".to_string(),
            Pick::Named(name) => name,
        }
    }
}

impl Default for Pick {
    fn default() -> Self {
        Pick::Random
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtConfig {
    pub version: u32,
    #[serde(
        default = "default_fade_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub fade_duration: Duration,
    #[serde(
        default = "default_frame_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub frame_interval: Duration,
    #[serde(default = "default_style_curve")]
    pub style_curve: CurveSetting,
    #[serde(default = "default_color_curve")]
    pub color_curve: CurveSetting,
    #[serde(default = "default_visibility_margin")]
    pub visibility_margin_px: u32,
    #[serde(default)]
    pub initial_style: Pick,
    #[serde(default)]
    pub initial_color: Pick,
    #[serde(default = "default_theme_storage_key")]
    pub theme_storage_key: String,
    #[serde(default)]
    pub containers: Containers,
    #[serde(default = "default_palette")]
    pub palette: Vec<PaletteEntry>,
}

/// DOM identifiers of the regions that receive a surface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Containers {
    #[serde(default = "default_top")]
    pub top: String,
    #[serde(default = "default_bottom")]
    pub bottom: String,
    #[serde(default = "default_border_class")]
    pub border_class: String,
}

impl Default for Containers {
    fn default() -> Self {
        Self {
            top: default_top(),
            bottom: default_bottom(),
            border_class: default_border_class(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: [u8; 3],
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, color: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

const DEFAULT_PALETTE: [(&str, [u8; 3]); 24] = [
    ("Persimmon", [240, 95, 64]),
    ("Fuchsia", [252, 92, 125]),
    ("Cantaloupe", [255, 177, 66]),
    ("Chartreuse", [180, 235, 80]),
    ("Lime", [163, 203, 56]),
    ("Mint", [85, 239, 196]),
    ("Bluebell", [120, 175, 230]),
    ("Lavender", [200, 180, 235]),
    ("Scarlet", [235, 77, 75]),
    ("Terracotta", [225, 112, 85]),
    ("Coral", [255, 159, 64]),
    ("Emerald", [39, 174, 96]),
    ("Turquoise", [26, 188, 156]),
    ("Cornflower", [100, 149, 237]),
    ("Azure", [84, 160, 255]),
    ("Periwinkle", [153, 153, 238]),
    ("Crimson", [214, 48, 49]),
    ("Burnt Orange", [245, 124, 0]),
    ("Sunflower", [241, 196, 15]),
    ("Teal", [0, 148, 133]),
    ("Sapphire", [15, 82, 186]),
    ("Cobalt", [28, 107, 196]),
    ("Lapis Lazuli", [38, 97, 156]),
    ("Amethyst", [155, 89, 182]),
];

fn default_palette() -> Vec<PaletteEntry> {
    DEFAULT_PALETTE
        .iter()
        .map(|(name, color)| PaletteEntry::new(*name, *color))
        .collect()
}

fn default_fade_duration() -> Duration {
    Duration::from_millis(200)
}

fn default_frame_interval() -> Duration {
    Duration::from_millis(33)
}

fn default_style_curve() -> CurveSetting {
    CurveSetting::Linear
}

fn default_color_curve() -> CurveSetting {
    CurveSetting::Smoothstep
}

fn default_visibility_margin() -> u32 {
    100
}

fn default_theme_storage_key() -> String {
    "theme".to_string()
}

fn default_top() -> String {
    "topbar".to_string()
}

fn default_bottom() -> String {
    "bottombar".to_string()
}

fn default_border_class() -> String {
    "block-border".to_string()
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v.trim())
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Duration::try_from_secs_f64(v)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl ArtConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: ArtConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Parses the configuration bundled with the crate.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUNDLED_TOML)
    }

    /// Looks up a palette entry by name, ignoring ASCII case.
    pub fn palette_entry(&self, name: &str) -> Option<&PaletteEntry> {
        let name = name.trim();
        self.palette
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.frame_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "frame_interval must be greater than zero".into(),
            ));
        }

        if self.palette.is_empty() {
            return Err(ConfigError::Invalid(
                "config must define at least one palette color".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for entry in &self.palette {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid(
                    "palette contains an entry with an empty name".into(),
                ));
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(ConfigError::Invalid(format!(
                    "palette color '{name}' is defined more than once"
                )));
            }
        }

        if let Pick::Named(name) = &self.initial_color {
            if self.palette_entry(name).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "initial_color references unknown palette color '{name}'"
                )));
            }
        }

        let containers = [
            ("containers.top", &self.containers.top),
            ("containers.bottom", &self.containers.bottom),
            ("containers.border_class", &self.containers.border_class),
            ("theme_storage_key", &self.theme_storage_key),
        ];
        for (field, value) in containers {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} may not be empty")));
            }
        }

        Ok(())
    }
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            version: 1,
            fade_duration: default_fade_duration(),
            frame_interval: default_frame_interval(),
            style_curve: default_style_curve(),
            color_curve: default_color_curve(),
            visibility_margin_px: default_visibility_margin(),
            initial_style: Pick::Random,
            initial_color: Pick::Random,
            theme_storage_key: default_theme_storage_key(),
            containers: Containers::default(),
            palette: default_palette(),
        }
    }
}
