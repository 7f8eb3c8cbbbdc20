use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::settings::EngineSettings;
use crate::style::Style;
use crate::types::Rgb;

/// Style and color the engine starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartSelection {
    pub style: Style,
    pub color: Rgb,
    /// Palette position of `color`.
    pub color_index: usize,
}

/// Resolves configured start values, drawing any `random` picks from a seeded
/// generator. The same seed always yields the same selection.
pub fn pick_start(settings: &EngineSettings, seed: u64) -> StartSelection {
    let mut rng = StdRng::seed_from_u64(seed);
    let style = settings
        .initial_style
        .unwrap_or_else(|| Style::ALL[rng.gen_range(0..Style::ALL.len())]);

    let palette_len = settings.palette.len();
    let color_index = match settings.initial_color {
        Some(index) if index < palette_len => index,
        _ if palette_len == 0 => 0,
        _ => rng.gen_range(0..palette_len),
    };
    let color = settings
        .palette
        .get(color_index)
        .map(|entry| Rgb::from_bytes(entry.color))
        .unwrap_or(Rgb::new(128.0, 128.0, 128.0));

    StartSelection {
        style,
        color,
        color_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_selection() {
        let settings = EngineSettings::default();
        assert_eq!(pick_start(&settings, 42), pick_start(&settings, 42));
    }

    #[test]
    fn random_picks_stay_in_range() {
        let settings = EngineSettings::default();
        for seed in 0..64 {
            let start = pick_start(&settings, seed);
            assert!(start.color_index < settings.palette.len());
            assert_eq!(
                start.color,
                Rgb::from_bytes(settings.palette[start.color_index].color)
            );
        }
    }

    #[test]
    fn configured_values_win() {
        let settings = EngineSettings {
            initial_style: Some(Style::Silk),
            initial_color: Some(3),
            ..EngineSettings::default()
        };
        let start = pick_start(&settings, 7);
        assert_eq!(start.style, Style::Silk);
        assert_eq!(start.color_index, 3);
        assert_eq!(start.color, Rgb::from_bytes([180, 235, 80]));
    }

    #[test]
    fn seeds_spread_across_styles() {
        let settings = EngineSettings::default();
        let distinct: std::collections::BTreeSet<Style> =
            (0..200).map(|seed| pick_start(&settings, seed).style).collect();
        assert!(distinct.len() > 6);
    }
}
