use std::fmt;

/// RGB triple on the 0-255 scale.
///
/// Palette colors are whole numbers; interpolated colors produced during a
/// color fade carry fractional channels until they are rounded for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_bytes([r, g, b]: [u8; 3]) -> Self {
        Self::new(r as f32, g as f32, b as f32)
    }

    /// Linear blend from `self` (t = 0) to `other` (t = 1).
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn to_bytes(self) -> [u8; 3] {
        let channel = |value: f32| value.round().clamp(0.0, 255.0) as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// Channels in the form the shaders expect (`u_baseColor`, still 0-255).
    pub fn as_uniform(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_bytes();
        write!(f, "rgb({r}, {g}, {b})")
    }
}

/// Long axis of a border region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// `u_orientation` value: 0 for horizontal, 1 for vertical.
    pub fn as_uniform(self) -> f32 {
        match self {
            Orientation::Horizontal => 0.0,
            Orientation::Vertical => 1.0,
        }
    }
}

/// Page region a surface decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Top,
    Bottom,
    /// Left-edge border of the n-th content block.
    Edge(usize),
}

impl Region {
    pub fn orientation(self) -> Orientation {
        match self {
            Region::Top | Region::Bottom => Orientation::Horizontal,
            Region::Edge(_) => Orientation::Vertical,
        }
    }

    /// Element id given to the canvas created for this region.
    pub fn canvas_id(self) -> String {
        match self {
            Region::Top => "border-canvas-top".to_string(),
            Region::Bottom => "border-canvas-bottom".to_string(),
            Region::Edge(index) => format!("border-canvas-left-{index}"),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Top => f.write_str("top"),
            Region::Bottom => f.write_str("bottom"),
            Region::Edge(index) => write!(f, "edge-{index}"),
        }
    }
}

/// Stable handle of a surface for the lifetime of one surface build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// CSS-pixel size of the element backing a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Backing-store size for the given device pixel ratio, truncated the way
    /// canvas dimensions are.
    pub fn to_physical(self, device_pixel_ratio: f64) -> PhysicalSize {
        let scale = |value: f64| {
            let scaled = value * device_pixel_ratio;
            if scaled.is_finite() && scaled > 0.0 {
                scaled.min(u32::MAX as f64) as u32
            } else {
                0
            }
        };
        PhysicalSize::new(scale(self.width), scale(self.height))
    }
}

/// Backing-store size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_truncates() {
        let logical = LogicalSize::new(100.5, 7.0);
        assert_eq!(logical.to_physical(1.5), PhysicalSize::new(150, 10));
        assert_eq!(logical.to_physical(2.0), PhysicalSize::new(201, 14));
    }

    #[test]
    fn physical_size_rejects_nonsense_ratio() {
        let logical = LogicalSize::new(10.0, 10.0);
        assert_eq!(logical.to_physical(f64::NAN), PhysicalSize::new(0, 0));
        assert_eq!(logical.to_physical(-1.0), PhysicalSize::new(0, 0));
    }

    #[test]
    fn rgb_lerp_hits_endpoints() {
        let from = Rgb::from_bytes([0, 100, 200]);
        let to = Rgb::from_bytes([255, 0, 100]);
        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
        assert_eq!(from.lerp(to, 0.5).to_bytes(), [128, 50, 150]);
    }

    #[test]
    fn regions_map_to_orientation_and_ids() {
        assert_eq!(Region::Top.orientation(), Orientation::Horizontal);
        assert_eq!(Region::Edge(3).orientation(), Orientation::Vertical);
        assert_eq!(Region::Edge(3).canvas_id(), "border-canvas-left-3");
        assert_eq!(Orientation::Vertical.as_uniform(), 1.0);
    }
}
