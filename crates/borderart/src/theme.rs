use std::fmt;
use std::str::FromStr;

/// User theme preference as persisted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Follow the host's `prefers-color-scheme`.
    #[default]
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}' (expected auto, light or dark)")]
pub struct UnknownTheme(pub String);

impl Theme {
    pub fn key(self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self, prefers_dark: bool) -> bool {
        match self {
            Theme::Auto => prefers_dark,
            Theme::Light => false,
            Theme::Dark => true,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Theme::Auto),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(value.trim().to_string())),
        }
    }
}

/// CSS values for the floating controls, per effective theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromePalette {
    pub dark: bool,
    pub panel_background: &'static str,
    pub panel_border: &'static str,
    pub text: &'static str,
    pub segment_track: &'static str,
    pub segment_text: &'static str,
    pub active_segment_text: &'static str,
    pub active_segment_background: &'static str,
    pub active_segment_shadow: &'static str,
    pub close_background: &'static str,
}

impl ChromePalette {
    pub const LIGHT: ChromePalette = ChromePalette {
        dark: false,
        panel_background: "rgba(255, 255, 255, 0.95)",
        panel_border: "1px solid rgba(0, 0, 0, 0.15)",
        text: "#623734",
        segment_track: "rgba(0, 0, 0, 0.05)",
        segment_text: "rgba(98, 55, 52, 0.6)",
        active_segment_text: "#623734",
        active_segment_background: "white",
        active_segment_shadow: "0 1px 3px rgba(0, 0, 0, 0.1)",
        close_background: "rgba(0,0,0,0.05)",
    };

    pub const DARK: ChromePalette = ChromePalette {
        dark: true,
        panel_background: "rgba(42, 42, 42, 0.95)",
        panel_border: "1px solid rgba(255, 255, 255, 0.15)",
        text: "#e8e8e8",
        segment_track: "rgba(255, 255, 255, 0.1)",
        segment_text: "#e8e8e8",
        active_segment_text: "#623734",
        active_segment_background: "white",
        active_segment_shadow: "0 1px 3px rgba(0, 0, 0, 0.1)",
        close_background: "rgba(255,255,255,0.05)",
    };

    pub fn for_dark(dark: bool) -> ChromePalette {
        if dark {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_theme_names() {
        assert_eq!("auto".parse::<Theme>(), Ok(Theme::Auto));
        assert_eq!(" Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(
            "sepia".parse::<Theme>(),
            Err(UnknownTheme("sepia".to_string()))
        );
    }

    #[test]
    fn auto_follows_host_preference() {
        assert!(Theme::Auto.is_dark(true));
        assert!(!Theme::Auto.is_dark(false));
        assert!(!Theme::Light.is_dark(true));
        assert!(Theme::Dark.is_dark(false));
    }

    #[test]
    fn chrome_palette_matches_theme() {
        assert_eq!(ChromePalette::for_dark(true).text, "#e8e8e8");
        assert_eq!(ChromePalette::for_dark(false).text, "#623734");
        assert!(ChromePalette::for_dark(true).dark);
    }
}
