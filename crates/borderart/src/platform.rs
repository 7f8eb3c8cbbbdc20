use crate::color::LinkColors;
use crate::surface::SurfaceContext;
use crate::style::Style;
use crate::theme::{ChromePalette, Theme};
use crate::types::{Region, Rgb, SurfaceId};
use artconfig::PaletteEntry;

/// One discovered border region and the GPU context obtained for it.
///
/// `context` is `None` when the host could not get a rendering context for the
/// region's element; the engine skips such regions.
pub struct Attachment<C> {
    pub region: Region,
    pub context: Option<C>,
}

impl<C> Attachment<C> {
    pub fn new(region: Region, context: Option<C>) -> Self {
        Self { region, context }
    }
}

/// The color a caller just picked, for swatch and label updates.
#[derive(Debug, Clone, Copy)]
pub struct ColorSelection<'a> {
    pub color: Rgb,
    /// Palette position, when the color is a palette entry.
    pub index: Option<usize>,
    pub entry: Option<&'a PaletteEntry>,
}

/// Everything the engine needs from its host.
///
/// All methods are called synchronously from the engine, either inside a tick
/// or inside one of its public operations. Implementations must not call back
/// into the engine.
pub trait Platform {
    type Context: SurfaceContext;

    /// Discovers border regions in document order (top, bottom, then each
    /// edge) and prepares one drawable element per region.
    fn attach_surfaces(&mut self) -> Vec<Attachment<Self::Context>>;

    /// Starts visibility observation of the surface's element.
    fn observe(&mut self, id: SurfaceId, context: &Self::Context);

    /// Stops observing every element registered through [`Platform::observe`].
    fn disconnect_observer(&mut self);

    /// Schedules the next tick on the host's frame callback.
    fn request_frame(&mut self);

    fn page_visible(&self) -> bool;

    fn device_pixel_ratio(&self) -> f64;

    fn prefers_dark(&self) -> bool;

    /// Reads the persisted theme, if any.
    fn load_theme(&self) -> Option<Theme>;

    fn store_theme(&mut self, theme: Theme);

    /// Applies `theme` to the document and restyles floating controls.
    fn apply_theme(&mut self, theme: Theme, chrome: &ChromePalette);

    fn apply_link_colors(&mut self, colors: &LinkColors);

    /// Highlights the active style in any style picker.
    fn style_activated(&mut self, style: Style, chrome: &ChromePalette);

    /// Highlights the selected color in any color picker.
    fn color_selected(&mut self, selection: &ColorSelection<'_>);

    /// Called once, after the first frame drew real pixels.
    fn content_ready(&mut self);
}
