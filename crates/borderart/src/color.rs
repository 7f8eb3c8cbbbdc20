//! Hyperlink accents derived from the displayed border color.
//!
//! The border base color is often too light (mint, sunflower) or too dark
//! (sapphire) to read as link text on both themes. Each accent keeps the hue
//! family but clamps lightness into a readable band per theme.

use crate::types::Rgb;

/// Hue, saturation and lightness, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let r = f64::from(color.r) / 255.0;
    let g = f64::from(color.g) / 255.0;
    let b = f64::from(color.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };
    Hsl { h, s, l }
}

/// Converts back to whole-number RGB channels.
pub fn hsl_to_rgb(Hsl { h, s, l }: Hsl) -> [u8; 3] {
    let to_byte = |value: f64| (value * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        let v = to_byte(l);
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_channel(p, q, h)),
        to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
    ]
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Four link accents, one pair per theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkColors {
    pub light: [u8; 3],
    pub light_hover: [u8; 3],
    pub dark: [u8; 3],
    pub dark_hover: [u8; 3],
}

impl LinkColors {
    /// `(custom property, css value)` pairs applied to the document root.
    pub fn css_variables(&self) -> [(&'static str, String); 4] {
        [
            ("--link-color-light", css_rgb(self.light)),
            ("--link-color-light-hover", css_rgb(self.light_hover)),
            ("--link-color-dark", css_rgb(self.dark)),
            ("--link-color-dark-hover", css_rgb(self.dark_hover)),
        ]
    }
}

pub fn css_rgb([r, g, b]: [u8; 3]) -> String {
    format!("rgb({r}, {g}, {b})")
}

/// Derives readable link accents from `base`.
pub fn link_colors(base: Rgb) -> LinkColors {
    let Hsl { h, s, l } = rgb_to_hsl(base);

    let (light_h, light_s, ceiling) = if (0.1..=0.2).contains(&h) {
        // Darkened yellow turns olive; lean toward orange instead.
        ((h - 0.04).max(0.06), s.max(0.7), 0.42)
    } else if h > 0.2 && h <= 0.45 {
        (h, s.max(0.5), 0.38)
    } else if h > 0.45 && h <= 0.55 {
        (h, s, 0.40)
    } else {
        (h, s, 0.45)
    };

    let light_l = l.min(ceiling);
    let dark_l = l.max(0.55);
    let light = |lightness| {
        hsl_to_rgb(Hsl {
            h: light_h,
            s: light_s,
            l: lightness,
        })
    };
    let dark = |lightness| hsl_to_rgb(Hsl { h, s, l: lightness });

    LinkColors {
        light: light(light_l),
        light_hover: light((light_l * 0.8).max(0.2)),
        dark: dark(dark_l),
        dark_hover: dark((dark_l * 1.1).min(0.75)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lightness(rgb: [u8; 3]) -> f64 {
        rgb_to_hsl(Rgb::from_bytes(rgb)).l
    }

    #[test]
    fn hsl_round_trips_palette_colors() {
        for rgb in [[240, 95, 64], [0, 148, 133], [155, 89, 182], [255, 255, 255]] {
            assert_eq!(hsl_to_rgb(rgb_to_hsl(Rgb::from_bytes(rgb))), rgb);
        }
    }

    #[test]
    fn gray_uses_default_ceiling() {
        let colors = link_colors(Rgb::from_bytes([128, 128, 128]));
        assert_eq!(colors.light, [115, 115, 115]);
        assert_eq!(colors.light_hover, [92, 92, 92]);
        assert_eq!(colors.dark, [140, 140, 140]);
        assert_eq!(colors.dark_hover, [154, 154, 154]);
    }

    #[test]
    fn cyan_band_caps_light_lightness() {
        // Mint sits just inside the cyan band.
        let colors = link_colors(Rgb::from_bytes([85, 239, 196]));
        assert!((lightness(colors.light) - 0.40).abs() < 0.01);
        assert!(lightness(colors.dark) >= 0.55 - 0.01);
    }

    #[test]
    fn yellow_shifts_toward_orange() {
        let base = Rgb::from_bytes([241, 196, 15]);
        let base_hue = rgb_to_hsl(base).h;
        let colors = link_colors(base);
        let light = rgb_to_hsl(Rgb::from_bytes(colors.light));
        assert!((base_hue - light.h - 0.04).abs() < 0.01);
        assert!((light.l - 0.42).abs() < 0.01);
    }

    #[test]
    fn dark_hover_never_exceeds_ceiling() {
        let colors = link_colors(Rgb::from_bytes([200, 180, 235]));
        assert!(lightness(colors.dark_hover) <= 0.75 + 0.01);
        assert!(lightness(colors.light_hover) >= 0.2 - 0.01);
    }

    #[test]
    fn css_variables_use_rgb_syntax() {
        let colors = link_colors(Rgb::from_bytes([128, 128, 128]));
        let vars = colors.css_variables();
        assert_eq!(vars[0], ("--link-color-light", "rgb(115, 115, 115)".into()));
        assert_eq!(vars[3].0, "--link-color-dark-hover");
    }
}
