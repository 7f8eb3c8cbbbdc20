use std::fmt;
use std::str::FromStr;

/// Closed set of border-art styles. Each maps to one fragment `pattern` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Style {
    Stratus,
    Interference,
    Terrain,
    Smoke,
    Static,
    Aurora,
    Marble,
    Ripple,
    Silk,
    Voronoi,
    Kaleidoscope,
    Electric,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown border style '{0}'")]
pub struct UnknownStyle(pub String);

impl Style {
    pub const ALL: [Style; 12] = [
        Style::Stratus,
        Style::Interference,
        Style::Terrain,
        Style::Smoke,
        Style::Static,
        Style::Aurora,
        Style::Marble,
        Style::Ripple,
        Style::Silk,
        Style::Voronoi,
        Style::Kaleidoscope,
        Style::Electric,
    ];

    /// Position inside [`Style::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Identifier used by callers and `data-style-key` attributes.
    pub fn key(self) -> &'static str {
        match self {
            Style::Stratus => "stratus",
            Style::Interference => "interference",
            Style::Terrain => "terrain",
            Style::Smoke => "smoke",
            Style::Static => "static",
            Style::Aurora => "aurora",
            Style::Marble => "marble",
            Style::Ripple => "ripple",
            Style::Silk => "silk",
            Style::Voronoi => "voronoi",
            Style::Kaleidoscope => "kaleidoscope",
            Style::Electric => "electric",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Style::Stratus => "Stratus",
            Style::Interference => "Interference",
            Style::Terrain => "Terrain",
            Style::Smoke => "Smoke",
            Style::Static => "Static",
            Style::Aurora => "Aurora",
            Style::Marble => "Marble",
            Style::Ripple => "Ripple",
            Style::Silk => "Silk",
            Style::Voronoi => "Voronoi",
            Style::Kaleidoscope => "Kaleidoscope",
            Style::Electric => "Electric",
        }
    }

    /// GLSL body defining `float pattern(vec2 uv, float along, float across)`.
    pub(crate) fn pattern_source(self) -> &'static str {
        match self {
            Style::Stratus => include_str!("../shaders/stratus.frag"),
            Style::Interference => include_str!("../shaders/interference.frag"),
            Style::Terrain => include_str!("../shaders/terrain.frag"),
            Style::Smoke => include_str!("../shaders/smoke.frag"),
            Style::Static => include_str!("../shaders/static.frag"),
            Style::Aurora => include_str!("../shaders/aurora.frag"),
            Style::Marble => include_str!("../shaders/marble.frag"),
            Style::Ripple => include_str!("../shaders/ripple.frag"),
            Style::Silk => include_str!("../shaders/silk.frag"),
            Style::Voronoi => include_str!("../shaders/voronoi.frag"),
            Style::Kaleidoscope => include_str!("../shaders/kaleidoscope.frag"),
            Style::Electric => include_str!("../shaders/electric.frag"),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Style {
    type Err = UnknownStyle;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Style::ALL
            .into_iter()
            .find(|style| style.key() == normalized)
            .ok_or_else(|| UnknownStyle(value.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for style in Style::ALL {
            assert_eq!(style.key().parse::<Style>(), Ok(style));
            assert_eq!(Style::ALL[style.index()], style);
        }
        assert_eq!(" Marble ".parse::<Style>(), Ok(Style::Marble));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "plasma".parse::<Style>().unwrap_err();
        assert_eq!(err, UnknownStyle("plasma".into()));
    }

    #[test]
    fn every_style_defines_pattern() {
        for style in Style::ALL {
            assert!(
                style.pattern_source().contains("float pattern("),
                "{style} is missing its pattern function"
            );
        }
    }

    #[test]
    fn patterns_are_animated_bodies_without_their_own_entry_point() {
        for style in Style::ALL {
            let source = style.pattern_source();
            assert!(source.contains("u_time"), "{style} does not animate");
            assert!(!source.contains("void main"), "{style} defines main");
            assert!(!source.contains("uniform "), "{style} declares uniforms");
            assert!(!source.contains("gl_FragColor"), "{style} writes the output color");
        }
    }
}
