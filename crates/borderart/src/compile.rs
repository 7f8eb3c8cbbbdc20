use std::fmt;

use crate::style::Style;
use crate::surface::SurfaceContext;

/// Full-surface quad vertex shader shared by every style.
const VERTEX_SHADER_GLSL: &str = include_str!("../shaders/vertex.glsl");

/// Uniform declarations and noise helpers injected ahead of each pattern body.
///
/// The uniform names must match the locations looked up by the host context:
/// `u_resolution`, `u_time`, `u_isDark`, `u_baseColor`, `u_orientation` and
/// `u_opacity`.
const PRELUDE: &str = include_str!("../shaders/prelude.glsl");

/// `main` that maps orientation, calls `pattern`, and applies fade opacity.
const EPILOGUE: &str = include_str!("../shaders/epilogue.glsl");

/// Pipeline stage a compile failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("rendering context unavailable: {0}")]
    Unavailable(String),
    #[error("{stage} shader failed to compile: {log}")]
    Stage { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
}

/// Produces a complete GLSL ES 1.00 fragment shader from a pattern body.
pub fn assemble_fragment(pattern: &str) -> String {
    format!("{PRELUDE}\n{pattern}\n{EPILOGUE}")
}

/// Read-only table of assembled shader sources, one per style.
///
/// Sources are assembled once up front. Every compile produces a fresh program
/// object; nothing here caches GPU handles, so no two surfaces ever share one.
#[derive(Debug, Clone)]
pub struct ShaderRegistry {
    fragments: Vec<String>,
}

impl ShaderRegistry {
    pub fn new() -> Self {
        let fragments = Style::ALL
            .iter()
            .map(|style| assemble_fragment(style.pattern_source()))
            .collect();
        Self { fragments }
    }

    pub fn vertex(&self) -> &str {
        VERTEX_SHADER_GLSL
    }

    pub fn fragment(&self, style: Style) -> &str {
        &self.fragments[style.index()]
    }

    /// Compiles and links `style` on `context`, logging the diagnostic on failure.
    pub fn compile<C: SurfaceContext>(
        &self,
        context: &mut C,
        style: Style,
    ) -> Result<C::Program, CompileError> {
        context
            .compile_program(self.vertex(), self.fragment(style))
            .map_err(|err| {
                tracing::error!(style = %style, error = %err, "failed to build shader program");
                err
            })
    }
}

impl Default for ShaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
