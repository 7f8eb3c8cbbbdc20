use crate::compile::{CompileError, ShaderRegistry};
use crate::style::Style;
use crate::types::{LogicalSize, Orientation, PhysicalSize, Region, SurfaceId};

/// Per-frame uniform values, computed once per tick and shared by every
/// surface drawn in that tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Seconds since the engine was created.
    pub time: f32,
    /// 1.0 for the dark theme, 0.0 for light.
    pub is_dark: f32,
    /// Displayed base color, 0-255 per channel.
    pub base_color: [f32; 3],
    /// Fade opacity in [0, 1].
    pub opacity: f32,
}

/// One GPU context bound to one drawable element.
///
/// `Program` bundles whatever the backend needs to draw with a linked program,
/// including its uniform-location table, so swapping programs swaps locations
/// with them.
pub trait SurfaceContext {
    type Program;

    fn compile_program(&mut self, vertex: &str, fragment: &str)
        -> Result<Self::Program, CompileError>;

    /// Current CSS-pixel size of the element.
    fn logical_size(&self) -> LogicalSize;

    /// Resizes the backing store, updates the viewport and the `u_resolution`
    /// uniform of `program`.
    fn resize_backing(&mut self, program: &Self::Program, size: PhysicalSize);

    fn set_orientation(&mut self, program: &Self::Program, orientation: Orientation);

    fn write_frame(&mut self, program: &Self::Program, uniforms: &FrameUniforms);

    /// Issues one full-surface draw.
    fn draw(&mut self, program: &Self::Program);

    /// Makes the element visible once real pixels exist.
    fn reveal(&mut self);

    /// Releases a program that has been replaced.
    fn release_program(&mut self, program: Self::Program) {
        drop(program);
    }
}

/// Rendering resources for one border region.
pub struct Surface<C: SurfaceContext> {
    id: SurfaceId,
    region: Region,
    orientation: Orientation,
    style: Style,
    context: C,
    program: C::Program,
    needs_resize: bool,
    backing: Option<PhysicalSize>,
}

impl<C: SurfaceContext> Surface<C> {
    /// Builds the surface program for `style`. A compile or link failure is
    /// returned to the caller, which skips the region.
    pub fn create(
        id: SurfaceId,
        region: Region,
        mut context: C,
        style: Style,
        registry: &ShaderRegistry,
    ) -> Result<Self, CompileError> {
        let program = registry.compile(&mut context, style)?;
        let orientation = region.orientation();
        context.set_orientation(&program, orientation);
        Ok(Self {
            id,
            region,
            orientation,
            style,
            context,
            program,
            needs_resize: true,
            backing: None,
        })
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Style of the program currently linked on this surface.
    pub fn style(&self) -> Style {
        self.style
    }

    pub fn needs_resize(&self) -> bool {
        self.needs_resize
    }

    pub fn backing_size(&self) -> Option<PhysicalSize> {
        self.backing
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn mark_resize(&mut self) {
        self.needs_resize = true;
    }

    /// Recomputes the backing store from the element size and `dpr`.
    pub fn resize(&mut self, device_pixel_ratio: f64) -> PhysicalSize {
        let size = self.context.logical_size().to_physical(device_pixel_ratio);
        self.context.resize_backing(&self.program, size);
        self.backing = Some(size);
        self.needs_resize = false;
        tracing::debug!(
            surface = %self.id,
            region = %self.region,
            width = size.width,
            height = size.height,
            "resized surface"
        );
        size
    }

    /// Applies a pending resize, if any. Returns whether one happened.
    pub fn resize_if_needed(&mut self, device_pixel_ratio: f64) -> bool {
        if self.needs_resize {
            self.resize(device_pixel_ratio);
            true
        } else {
            false
        }
    }

    /// Replaces the program with a freshly compiled one for `style`, keeping the
    /// element and orientation. On failure the previous program stays active.
    pub fn rebuild_program(
        &mut self,
        style: Style,
        registry: &ShaderRegistry,
    ) -> Result<(), CompileError> {
        let program = registry.compile(&mut self.context, style)?;
        self.context.set_orientation(&program, self.orientation);
        let previous = std::mem::replace(&mut self.program, program);
        self.context.release_program(previous);
        self.style = style;
        // The new program has never seen `u_resolution`.
        self.needs_resize = true;
        Ok(())
    }

    /// Pushes this tick's uniforms and draws.
    pub fn draw(&mut self, uniforms: &FrameUniforms) {
        self.context.write_frame(&self.program, uniforms);
        self.context.draw(&self.program);
    }

    pub fn reveal(&mut self) {
        self.context.reveal();
    }
}
