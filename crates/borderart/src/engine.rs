use crate::color::{link_colors, LinkColors};
use crate::compile::ShaderRegistry;
use crate::pacing::FrameThrottle;
use crate::platform::{Attachment, ColorSelection, Platform};
use crate::selection::StartSelection;
use crate::settings::{EngineSettings, SettingsError};
use crate::style::{Style, UnknownStyle};
use crate::surface::{FrameUniforms, Surface};
use crate::theme::{ChromePalette, Theme};
use crate::transition::{ColorTransition, StylePhase, StyleRequest, StyleTransition};
use crate::types::{Rgb, SurfaceId};
use crate::visibility::VisibilitySet;
use crate::Instant;

/// What one call to [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The page is in the background.
    Hidden,
    /// No surface is in or near the viewport.
    NothingVisible,
    /// Too soon after the previous executed frame.
    Throttled,
    /// Transitions advanced and `drawn` surfaces were drawn.
    Rendered { drawn: usize },
}

/// Border-art engine: owns every surface and all animation state.
///
/// Hosts drive it from their frame callback through [`Engine::tick`] and
/// forward user actions and host signals through the other methods. Signal
/// handlers only set values; the next executed tick picks them up.
pub struct Engine<P: Platform> {
    platform: P,
    settings: EngineSettings,
    registry: ShaderRegistry,
    surfaces: Vec<Surface<P::Context>>,
    visible: VisibilitySet,
    style: StyleTransition,
    color: ColorTransition,
    color_index: Option<usize>,
    throttle: FrameThrottle,
    theme: Theme,
    started_at: Instant,
    device_pixel_ratio: f64,
    page_visible: bool,
    initialized: bool,
    revealed: bool,
    content_announced: bool,
    last_links: Option<LinkColors>,
    next_id: u32,
}

impl<P: Platform> Engine<P> {
    pub fn new(platform: P, settings: EngineSettings, start: StartSelection, now: Instant) -> Self {
        let style = StyleTransition::new(
            start.style,
            settings.fade_duration,
            settings.style_curve,
            now,
        );
        let color = ColorTransition::new(start.color, settings.fade_duration, settings.color_curve);
        let throttle = FrameThrottle::new(settings.frame_interval);
        Self {
            platform,
            settings,
            registry: ShaderRegistry::new(),
            surfaces: Vec::new(),
            visible: VisibilitySet::new(),
            style,
            color,
            color_index: Some(start.color_index),
            throttle,
            theme: Theme::Auto,
            started_at: now,
            device_pixel_ratio: 1.0,
            page_visible: true,
            initialized: false,
            revealed: false,
            content_announced: false,
            last_links: None,
            next_id: 0,
        }
    }

    /// Builds surfaces from the current document and schedules the first
    /// frame. Calling it again does nothing.
    pub fn init(&mut self, now: Instant) {
        if self.initialized {
            tracing::debug!("border art already initialised");
            return;
        }
        self.initialized = true;

        self.theme = self.platform.load_theme().unwrap_or_default();
        let chrome = self.chrome();
        self.platform.apply_theme(self.theme, &chrome);

        self.page_visible = self.platform.page_visible();
        self.device_pixel_ratio = self.platform.device_pixel_ratio();

        // First-load fade-in runs from the moment rendering can begin.
        self.style = StyleTransition::new(
            self.style.active(),
            self.settings.fade_duration,
            self.settings.style_curve,
            now,
        );
        self.rebuild_surfaces();

        let color = self.color.displayed();
        self.push_link_colors(color);
        self.platform.style_activated(self.style.active(), &chrome);
        self.announce_color(color);

        tracing::info!(
            surfaces = self.surfaces.len(),
            style = %self.style.active(),
            color = %color,
            theme = %self.theme,
            "border art started"
        );
        self.platform.request_frame();
    }

    /// Discards every surface and recreates them from the document with the
    /// active style.
    pub fn rebuild_surfaces(&mut self) {
        self.platform.disconnect_observer();
        self.visible.clear();
        self.surfaces.clear();
        self.revealed = false;

        let style = self.style.active();
        for Attachment { region, context } in self.platform.attach_surfaces() {
            let Some(context) = context else {
                tracing::warn!(region = %region, "no rendering context; region skipped");
                continue;
            };
            let id = SurfaceId(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            match Surface::create(id, region, context, style, &self.registry) {
                Ok(surface) => {
                    self.platform.observe(id, surface.context());
                    self.surfaces.push(surface);
                }
                Err(err) => {
                    tracing::warn!(region = %region, error = %err, "surface skipped");
                }
            }
        }

        if self.surfaces.is_empty() {
            tracing::warn!("no border surfaces were created; render loop will idle");
        } else {
            tracing::debug!(count = self.surfaces.len(), style = %style, "surfaces built");
        }
    }

    /// Requests a crossfade to `style`.
    pub fn switch_style(&mut self, style: Style, now: Instant) -> StyleRequest {
        let request = self.style.request(style, now);
        match request {
            StyleRequest::Unchanged => {}
            StyleRequest::Redirected { previous } => {
                tracing::debug!(from = %previous, to = %style, "redirected pending style");
            }
            StyleRequest::Started => {
                tracing::debug!(from = %self.style.active(), to = %style, "fading out for style switch");
            }
        }
        request
    }

    pub fn switch_style_named(
        &mut self,
        name: &str,
        now: Instant,
    ) -> Result<StyleRequest, UnknownStyle> {
        let style = name.parse::<Style>()?;
        Ok(self.switch_style(style, now))
    }

    /// Starts a color fade toward `color`; returns `false` when `color` is
    /// already settled on screen. Pickers are updated right away.
    pub fn change_color(&mut self, color: Rgb, now: Instant) -> bool {
        if !self.color.change(color, now) {
            return false;
        }
        self.color_index = self.settings.palette_index(color);
        self.announce_color(color);
        tracing::debug!(color = %color, "color fade started");
        true
    }

    pub fn change_color_named(&mut self, name: &str, now: Instant) -> Result<bool, SettingsError> {
        let color = self
            .settings
            .find_color(name)
            .map(|(_, entry)| Rgb::from_bytes(entry.color))
            .ok_or_else(|| SettingsError::UnknownColor(name.trim().to_string()))?;
        Ok(self.change_color(color, now))
    }

    /// Persists and applies `theme`. The dark flag reaches the shaders on the
    /// next executed tick.
    pub fn switch_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.platform.store_theme(theme);
        let chrome = self.chrome();
        self.platform.apply_theme(theme, &chrome);
        self.platform.style_activated(self.style.active(), &chrome);
        tracing::debug!(theme = %theme, dark = chrome.dark, "theme switched");
    }

    /// Host color-scheme preference changed. Under [`Theme::Auto`] the chrome
    /// follows it; explicit themes ignore it. Returns whether anything was
    /// re-applied.
    pub fn color_scheme_changed(&mut self) -> bool {
        if self.theme != Theme::Auto {
            return false;
        }
        let chrome = self.chrome();
        self.platform.apply_theme(self.theme, &chrome);
        self.platform.style_activated(self.style.active(), &chrome);
        tracing::debug!(dark = chrome.dark, "system color scheme changed");
        true
    }

    /// Flags every surface for a resize on the next executed tick.
    pub fn request_resize(&mut self) {
        for surface in &mut self.surfaces {
            surface.mark_resize();
        }
    }

    pub fn set_page_visible(&mut self, visible: bool) {
        self.page_visible = visible;
    }

    pub fn set_surface_visible(&mut self, id: SurfaceId, visible: bool) {
        self.visible.set_visible(id, visible);
    }

    /// Runs one frame callback and always schedules the next one.
    pub fn tick(&mut self, now: Instant) -> FrameOutcome {
        let outcome = self.render(now);
        self.platform.request_frame();
        outcome
    }

    fn render(&mut self, now: Instant) -> FrameOutcome {
        if !self.page_visible {
            return FrameOutcome::Hidden;
        }
        if self.visible.is_empty() {
            return FrameOutcome::NothingVisible;
        }
        if !self.throttle.ready_for_frame(now) {
            return FrameOutcome::Throttled;
        }
        self.throttle.mark_rendered(now);

        let step = self.style.advance(now);
        if let Some(style) = step.swap {
            self.swap_programs(style);
        }
        let color = self.color.advance(now);
        self.push_link_colors(color);

        let dpr = self.platform.device_pixel_ratio();
        if dpr != self.device_pixel_ratio {
            tracing::debug!(from = self.device_pixel_ratio, to = dpr, "device pixel ratio changed");
            self.device_pixel_ratio = dpr;
            self.request_resize();
        }

        let uniforms = FrameUniforms {
            time: now.saturating_duration_since(self.started_at).as_secs_f32(),
            is_dark: if self.is_dark() { 1.0 } else { 0.0 },
            base_color: color.as_uniform(),
            opacity: step.opacity,
        };

        let mut drawn = 0;
        for surface in &mut self.surfaces {
            if !self.visible.is_visible(surface.id()) {
                continue;
            }
            surface.resize_if_needed(dpr);
            surface.draw(&uniforms);
            drawn += 1;
        }

        if drawn > 0 && !self.revealed {
            self.reveal();
        }
        FrameOutcome::Rendered { drawn }
    }

    fn swap_programs(&mut self, style: Style) {
        for surface in &mut self.surfaces {
            if let Err(err) = surface.rebuild_program(style, &self.registry) {
                tracing::warn!(
                    surface = %surface.id(),
                    region = %surface.region(),
                    error = %err,
                    "keeping previous program"
                );
            }
        }
        let chrome = self.chrome();
        self.platform.style_activated(style, &chrome);
        tracing::info!(style = %style, "border style switched");
    }

    fn reveal(&mut self) {
        for surface in &mut self.surfaces {
            surface.reveal();
        }
        self.revealed = true;
        if !self.content_announced {
            self.content_announced = true;
            self.platform.content_ready();
        }
    }

    fn push_link_colors(&mut self, color: Rgb) {
        let links = link_colors(color);
        if self.last_links != Some(links) {
            self.platform.apply_link_colors(&links);
            self.last_links = Some(links);
        }
    }

    fn announce_color(&mut self, color: Rgb) {
        let selection = ColorSelection {
            color,
            index: self.color_index,
            entry: self.color_index.and_then(|index| self.settings.palette.get(index)),
        };
        self.platform.color_selected(&selection);
    }

    fn chrome(&self) -> ChromePalette {
        ChromePalette::for_dark(self.is_dark())
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark(self.platform.prefers_dark())
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn registry(&self) -> &ShaderRegistry {
        &self.registry
    }

    pub fn surfaces(&self) -> &[Surface<P::Context>] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface<P::Context>> {
        self.surfaces.iter().find(|surface| surface.id() == id)
    }

    pub fn visible(&self) -> &VisibilitySet {
        &self.visible
    }

    pub fn active_style(&self) -> Style {
        self.style.active()
    }

    pub fn style_phase(&self) -> StylePhase {
        self.style.phase()
    }

    /// Fade opacity of the most recent executed tick.
    pub fn opacity(&self) -> f32 {
        self.style.opacity()
    }

    pub fn displayed_color(&self) -> Rgb {
        self.color.displayed()
    }

    pub fn selected_color(&self) -> Rgb {
        self.color.selected()
    }

    pub fn color_in_flight(&self) -> bool {
        self.color.in_flight()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}
