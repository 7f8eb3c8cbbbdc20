use borderart::{
    CompileError, FrameUniforms, LogicalSize, Orientation, PhysicalSize, ShaderStage,
    SurfaceContext,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlContextAttributes, WebGlProgram,
    WebGlRenderingContext as GL, WebGlShader, WebGlUniformLocation,
};

/// Two triangles covering clip space, drawn as a strip.
const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

/// WebGL 1 context bound to one border canvas.
pub struct WebGlSurface {
    canvas: HtmlCanvasElement,
    gl: GL,
    quad: WebGlBuffer,
}

/// Linked program plus the locations looked up right after linking.
pub struct GlProgram {
    program: WebGlProgram,
    position: Option<u32>,
    uniforms: UniformLocations,
}

struct UniformLocations {
    resolution: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    is_dark: Option<WebGlUniformLocation>,
    base_color: Option<WebGlUniformLocation>,
    orientation: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

impl UniformLocations {
    fn lookup(gl: &GL, program: &WebGlProgram) -> Self {
        Self {
            resolution: gl.get_uniform_location(program, "u_resolution"),
            time: gl.get_uniform_location(program, "u_time"),
            is_dark: gl.get_uniform_location(program, "u_isDark"),
            base_color: gl.get_uniform_location(program, "u_baseColor"),
            orientation: gl.get_uniform_location(program, "u_orientation"),
            opacity: gl.get_uniform_location(program, "u_opacity"),
        }
    }
}

impl WebGlSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, CompileError> {
        let attributes = WebGlContextAttributes::new();
        attributes.set_antialias(true);
        attributes.set_alpha(false);

        let gl = canvas
            .get_context_with_context_options("webgl", &attributes)
            .map_err(|err| CompileError::Unavailable(describe(&err)))?
            .ok_or_else(|| CompileError::Unavailable("webgl is not supported".into()))?
            .dyn_into::<GL>()
            .map_err(|_| CompileError::Unavailable("unexpected rendering context type".into()))?;

        let quad = gl
            .create_buffer()
            .ok_or_else(|| CompileError::Unavailable("failed to allocate vertex buffer".into()))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad));
        let vertices = js_sys::Float32Array::from(&QUAD[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);

        Ok(Self { canvas, gl, quad })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn compile_stage(
        &self,
        stage: ShaderStage,
        source: &str,
    ) -> Result<WebGlShader, CompileError> {
        let kind = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        let shader = self
            .gl
            .create_shader(kind)
            .ok_or_else(|| CompileError::Unavailable(format!("failed to create {stage} shader")))?;
        self.gl.shader_source(&shader, source);
        self.gl.compile_shader(&shader);

        let compiled = self
            .gl
            .get_shader_parameter(&shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if compiled {
            Ok(shader)
        } else {
            let log = self.gl.get_shader_info_log(&shader).unwrap_or_default();
            self.gl.delete_shader(Some(&shader));
            Err(CompileError::Stage { stage, log })
        }
    }
}

impl SurfaceContext for WebGlSurface {
    type Program = GlProgram;

    fn compile_program(&mut self, vertex: &str, fragment: &str) -> Result<GlProgram, CompileError> {
        let vertex = self.compile_stage(ShaderStage::Vertex, vertex)?;
        let fragment = match self.compile_stage(ShaderStage::Fragment, fragment) {
            Ok(shader) => shader,
            Err(err) => {
                self.gl.delete_shader(Some(&vertex));
                return Err(err);
            }
        };

        let program = self
            .gl
            .create_program()
            .ok_or_else(|| CompileError::Unavailable("failed to create program".into()))?;
        self.gl.attach_shader(&program, &vertex);
        self.gl.attach_shader(&program, &fragment);
        self.gl.link_program(&program);
        // Attached shaders are freed together with the program.
        self.gl.delete_shader(Some(&vertex));
        self.gl.delete_shader(Some(&fragment));

        let linked = self
            .gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let log = self.gl.get_program_info_log(&program).unwrap_or_default();
            self.gl.delete_program(Some(&program));
            return Err(CompileError::Link { log });
        }

        let position = u32::try_from(self.gl.get_attrib_location(&program, "a_position")).ok();
        let uniforms = UniformLocations::lookup(&self.gl, &program);
        Ok(GlProgram {
            program,
            position,
            uniforms,
        })
    }

    fn logical_size(&self) -> LogicalSize {
        LogicalSize::new(
            f64::from(self.canvas.offset_width()),
            f64::from(self.canvas.offset_height()),
        )
    }

    fn resize_backing(&mut self, program: &GlProgram, size: PhysicalSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        self.gl.viewport(0, 0, size.width as i32, size.height as i32);
        self.gl.use_program(Some(&program.program));
        self.gl.uniform2f(
            program.uniforms.resolution.as_ref(),
            size.width as f32,
            size.height as f32,
        );
    }

    fn set_orientation(&mut self, program: &GlProgram, orientation: Orientation) {
        self.gl.use_program(Some(&program.program));
        self.gl
            .uniform1f(program.uniforms.orientation.as_ref(), orientation.as_uniform());
    }

    fn write_frame(&mut self, program: &GlProgram, uniforms: &FrameUniforms) {
        let locations = &program.uniforms;
        let [r, g, b] = uniforms.base_color;
        self.gl.use_program(Some(&program.program));
        self.gl.uniform1f(locations.time.as_ref(), uniforms.time);
        self.gl.uniform1f(locations.is_dark.as_ref(), uniforms.is_dark);
        self.gl.uniform3f(locations.base_color.as_ref(), r, g, b);
        self.gl.uniform1f(locations.opacity.as_ref(), uniforms.opacity);
    }

    fn draw(&mut self, program: &GlProgram) {
        self.gl.use_program(Some(&program.program));
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.quad));
        if let Some(position) = program.position {
            self.gl.enable_vertex_attrib_array(position);
            self.gl
                .vertex_attrib_pointer_with_i32(position, 2, GL::FLOAT, false, 0, 0);
        }
        self.gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
    }

    fn reveal(&mut self) {
        if let Err(err) = self.canvas.style().set_property("opacity", "1") {
            tracing::debug!(error = %describe(&err), "failed to reveal canvas");
        }
    }

    fn release_program(&mut self, program: GlProgram) {
        self.gl.delete_program(Some(&program.program));
    }
}

pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
