//! CSS values written into the page by the web host.

use borderart::{ChromePalette, Region, SurfaceId};

/// Attribute carrying the surface id on each canvas, read back in
/// intersection callbacks.
pub const SURFACE_ID_ATTRIBUTE: &str = "data-surface-id";

/// Document class added once the first frame has been drawn.
pub const CONTENT_READY_CLASS: &str = "content-ready";

/// Inline style of a freshly created canvas. Canvases start transparent and are
/// revealed after the first drawn frame.
pub fn canvas_css(region: Region) -> &'static str {
    match region {
        Region::Top | Region::Bottom => {
            "width: 100%; height: 100%; display: block; opacity: 0; \
             transition: opacity 0.6s ease-in;"
        }
        Region::Edge(_) => {
            "width: 100%; height: 100%; display: block; opacity: 0; \
             transition: opacity 0.6s ease-in; border-radius: 4px;"
        }
    }
}

pub fn root_margin(margin_px: u32) -> String {
    format!("{margin_px}px")
}

pub fn parse_surface_id(raw: &str) -> Option<SurfaceId> {
    raw.trim().parse().ok().map(SurfaceId)
}

/// Maps `Math.random()` output onto a generator seed.
pub fn seed_from_unit(random: f64) -> u64 {
    let unit = if random.is_finite() {
        random.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (unit * u64::MAX as f64) as u64
}

/// Colors of one segment in a segmented control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStyle {
    pub color: &'static str,
    pub background: &'static str,
    pub box_shadow: &'static str,
}

pub fn segment_style(active: bool, chrome: &ChromePalette) -> SegmentStyle {
    if active {
        SegmentStyle {
            color: chrome.active_segment_text,
            background: chrome.active_segment_background,
            box_shadow: chrome.active_segment_shadow,
        }
    } else {
        SegmentStyle {
            color: chrome.segment_text,
            background: "transparent",
            box_shadow: "none",
        }
    }
}

/// `(box-shadow, transform)` of a palette swatch.
pub fn swatch_style(active: bool) -> (&'static str, &'static str) {
    if active {
        ("0 0 0 3px rgba(0,0,0,0.3)", "scale(1.15)")
    } else {
        ("0 2px 4px rgba(0,0,0,0.1)", "scale(1)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_get_rounded_corners() {
        assert!(canvas_css(Region::Edge(0)).contains("border-radius: 4px"));
        assert!(!canvas_css(Region::Top).contains("border-radius"));
        assert!(canvas_css(Region::Bottom).contains("opacity: 0;"));
    }

    #[test]
    fn surface_ids_parse_from_attributes() {
        assert_eq!(parse_surface_id("12"), Some(SurfaceId(12)));
        assert_eq!(parse_surface_id(" 3 "), Some(SurfaceId(3)));
        assert_eq!(parse_surface_id("top"), None);
        assert_eq!(parse_surface_id("-1"), None);
    }

    #[test]
    fn seeds_cover_unit_interval() {
        assert_eq!(seed_from_unit(0.0), 0);
        assert_eq!(seed_from_unit(f64::NAN), 0);
        assert!(seed_from_unit(0.5) > u64::MAX / 4);
        assert_eq!(root_margin(100), "100px");
    }

    #[test]
    fn inactive_segments_follow_theme() {
        let light = segment_style(false, &ChromePalette::LIGHT);
        let dark = segment_style(false, &ChromePalette::DARK);
        assert_eq!(light.color, "rgba(98, 55, 52, 0.6)");
        assert_eq!(dark.color, "#e8e8e8");
        assert_eq!(
            segment_style(true, &ChromePalette::DARK),
            segment_style(true, &ChromePalette::LIGHT)
        );
        assert_eq!(swatch_style(true).1, "scale(1.15)");
    }
}
