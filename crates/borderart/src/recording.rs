//! In-memory [`Platform`] that records every host call.
//!
//! Used by the engine tests and by `artctl simulate` to run the render loop
//! without a browser. Each context shares its log with the platform, so the
//! log stays readable after the engine has taken ownership of the context.

use std::cell::RefCell;
use std::rc::Rc;

use crate::color::LinkColors;
use crate::compile::{CompileError, ShaderStage};
use crate::platform::{Attachment, ColorSelection, Platform};
use crate::style::Style;
use crate::surface::{FrameUniforms, SurfaceContext};
use crate::theme::{ChromePalette, Theme};
use crate::types::{LogicalSize, Orientation, PhysicalSize, Region, Rgb, SurfaceId};

/// Region the recording host pretends to find in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSpec {
    pub region: Region,
    pub size: LogicalSize,
    /// `false` simulates an element whose rendering context is unavailable.
    pub gpu_available: bool,
    /// `true` makes every program compile on this region fail.
    pub fail_compile: bool,
}

impl RegionSpec {
    pub fn new(region: Region, size: LogicalSize) -> Self {
        Self {
            region,
            size,
            gpu_available: true,
            fail_compile: false,
        }
    }

    /// Top bar, bottom bar and `edges` left-edge borders with typical sizes.
    pub fn page(edges: usize) -> Vec<RegionSpec> {
        let mut regions = vec![
            RegionSpec::new(Region::Top, LogicalSize::new(1280.0, 8.0)),
            RegionSpec::new(Region::Bottom, LogicalSize::new(1280.0, 8.0)),
        ];
        regions.extend(
            (0..edges).map(|index| RegionSpec::new(Region::Edge(index), LogicalSize::new(6.0, 420.0))),
        );
        regions
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedProgram {
    pub serial: usize,
    pub fragment: String,
}

/// Everything one context was asked to do.
#[derive(Debug, Clone)]
pub struct ContextLog {
    pub region: Region,
    pub size: LogicalSize,
    pub fail_compile: bool,
    pub compiled: usize,
    pub released: usize,
    pub resizes: Vec<PhysicalSize>,
    pub orientation: Option<Orientation>,
    pub frames: Vec<FrameUniforms>,
    pub draws: usize,
    pub reveals: usize,
    /// Fragment source of the last program drawn with.
    pub drawn_fragment: Option<String>,
}

impl ContextLog {
    fn new(layout: &RegionSpec) -> Self {
        Self {
            region: layout.region,
            size: layout.size,
            fail_compile: layout.fail_compile,
            compiled: 0,
            released: 0,
            resizes: Vec::new(),
            orientation: None,
            frames: Vec::new(),
            draws: 0,
            reveals: 0,
            drawn_fragment: None,
        }
    }
}

pub struct RecordingContext {
    log: Rc<RefCell<ContextLog>>,
}

impl RecordingContext {
    pub fn log(&self) -> std::cell::Ref<'_, ContextLog> {
        self.log.borrow()
    }
}

impl SurfaceContext for RecordingContext {
    type Program = RecordedProgram;

    fn compile_program(
        &mut self,
        _vertex: &str,
        fragment: &str,
    ) -> Result<RecordedProgram, CompileError> {
        let mut log = self.log.borrow_mut();
        if log.fail_compile {
            return Err(CompileError::Stage {
                stage: ShaderStage::Fragment,
                log: "ERROR: 0:1: simulated compile failure".to_string(),
            });
        }
        log.compiled += 1;
        Ok(RecordedProgram {
            serial: log.compiled,
            fragment: fragment.to_string(),
        })
    }

    fn logical_size(&self) -> LogicalSize {
        self.log.borrow().size
    }

    fn resize_backing(&mut self, _program: &RecordedProgram, size: PhysicalSize) {
        self.log.borrow_mut().resizes.push(size);
    }

    fn set_orientation(&mut self, _program: &RecordedProgram, orientation: Orientation) {
        self.log.borrow_mut().orientation = Some(orientation);
    }

    fn write_frame(&mut self, _program: &RecordedProgram, uniforms: &FrameUniforms) {
        self.log.borrow_mut().frames.push(*uniforms);
    }

    fn draw(&mut self, program: &RecordedProgram) {
        let mut log = self.log.borrow_mut();
        log.draws += 1;
        if log.drawn_fragment.as_deref() != Some(program.fragment.as_str()) {
            log.drawn_fragment = Some(program.fragment.clone());
        }
    }

    fn reveal(&mut self) {
        self.log.borrow_mut().reveals += 1;
    }

    fn release_program(&mut self, _program: RecordedProgram) {
        self.log.borrow_mut().released += 1;
    }
}

/// Recording host with adjustable signals.
pub struct RecordingPlatform {
    pub regions: Vec<RegionSpec>,
    pub page_visible: bool,
    pub device_pixel_ratio: f64,
    pub prefers_dark: bool,
    pub persisted_theme: Option<Theme>,
    /// Surface ids in observation order, across every build.
    pub observed: Vec<SurfaceId>,
    pub disconnects: usize,
    pub frames_requested: usize,
    pub applied_themes: Vec<Theme>,
    /// `dark` flag of each chrome palette pushed with a theme.
    pub chrome_dark: Vec<bool>,
    pub link_pushes: Vec<LinkColors>,
    pub style_activations: Vec<Style>,
    pub color_selections: Vec<(Rgb, Option<usize>)>,
    pub content_ready: usize,
    logs: Vec<Rc<RefCell<ContextLog>>>,
}

impl RecordingPlatform {
    pub fn new(regions: Vec<RegionSpec>) -> Self {
        Self {
            regions,
            page_visible: true,
            device_pixel_ratio: 1.0,
            prefers_dark: false,
            persisted_theme: None,
            observed: Vec::new(),
            disconnects: 0,
            frames_requested: 0,
            applied_themes: Vec::new(),
            chrome_dark: Vec::new(),
            link_pushes: Vec::new(),
            style_activations: Vec::new(),
            color_selections: Vec::new(),
            content_ready: 0,
            logs: Vec::new(),
        }
    }

    /// Snapshot of the context logs from the latest surface build.
    pub fn context_logs(&self) -> Vec<ContextLog> {
        self.logs.iter().map(|log| log.borrow().clone()).collect()
    }

    pub fn context_log(&self, region: Region) -> Option<ContextLog> {
        self.logs
            .iter()
            .find(|log| log.borrow().region == region)
            .map(|log| log.borrow().clone())
    }

    /// Changes the element size seen by the region's context.
    pub fn set_logical_size(&mut self, region: Region, size: LogicalSize) {
        for log in &self.logs {
            let mut log = log.borrow_mut();
            if log.region == region {
                log.size = size;
            }
        }
    }

    pub fn total_draws(&self) -> usize {
        self.logs.iter().map(|log| log.borrow().draws).sum()
    }

    pub fn total_compiled(&self) -> usize {
        self.logs.iter().map(|log| log.borrow().compiled).sum()
    }
}

impl Platform for RecordingPlatform {
    type Context = RecordingContext;

    fn attach_surfaces(&mut self) -> Vec<Attachment<RecordingContext>> {
        self.logs.clear();
        self.regions
            .iter()
            .map(|layout| {
                if !layout.gpu_available {
                    return Attachment::new(layout.region, None);
                }
                let log = Rc::new(RefCell::new(ContextLog::new(layout)));
                self.logs.push(Rc::clone(&log));
                Attachment::new(layout.region, Some(RecordingContext { log }))
            })
            .collect()
    }

    fn observe(&mut self, id: SurfaceId, _context: &RecordingContext) {
        self.observed.push(id);
    }

    fn disconnect_observer(&mut self) {
        self.disconnects += 1;
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
    }

    fn page_visible(&self) -> bool {
        self.page_visible
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn load_theme(&self) -> Option<Theme> {
        self.persisted_theme
    }

    fn store_theme(&mut self, theme: Theme) {
        self.persisted_theme = Some(theme);
    }

    fn apply_theme(&mut self, theme: Theme, chrome: &ChromePalette) {
        self.applied_themes.push(theme);
        self.chrome_dark.push(chrome.dark);
    }

    fn apply_link_colors(&mut self, colors: &LinkColors) {
        self.link_pushes.push(*colors);
    }

    fn style_activated(&mut self, style: Style, _chrome: &ChromePalette) {
        self.style_activations.push(style);
    }

    fn color_selected(&mut self, selection: &ColorSelection<'_>) {
        self.color_selections.push((selection.color, selection.index));
    }

    fn content_ready(&mut self) {
        self.content_ready += 1;
    }
}
