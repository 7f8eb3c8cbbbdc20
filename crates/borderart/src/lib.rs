//! Engine core for the shader-driven border art.
//!
//! The crate owns every piece of state that decides *what* gets drawn and
//! *when*, while staying ignorant of the browser. Host specifics live behind
//! two traits: [`Platform`] (DOM discovery, visibility observation, frame
//! scheduling, persistence, UI affordances) and [`SurfaceContext`] (one GPU
//! context bound to one canvas). The flow per animation frame is:
//!
//! ```text
//!   host rAF ──▶ Engine::tick(now)
//!                   │ page hidden / nothing visible / throttled ──▶ skip
//!                   ├─▶ StyleTransition::advance ──▶ program swap at opacity 0
//!                   ├─▶ ColorTransition::advance ──▶ displayed color, link colors
//!                   ├─▶ per visible Surface: lazy resize, write uniforms, draw
//!                   ├─▶ one-time reveal after the first drawn frame
//!                   └─▶ Platform::request_frame (always)
//! ```
//!
//! Fragment shaders are assembled from a shared prelude, one `pattern` body per
//! [`Style`], and a shared epilogue that applies orientation, theme background
//! and fade opacity. See [`ShaderRegistry`].

pub mod color;
pub mod compile;
pub mod engine;
pub mod pacing;
pub mod platform;
pub mod recording;
pub mod selection;
pub mod settings;
pub mod style;
pub mod surface;
pub mod theme;
pub mod timeline;
pub mod transition;
pub mod types;
pub mod visibility;

pub use artconfig::{ArtConfig, ConfigError, PaletteEntry};
pub use web_time::Instant;

pub use color::{link_colors, LinkColors};
pub use compile::{CompileError, ShaderRegistry, ShaderStage};
pub use engine::{Engine, FrameOutcome};
pub use platform::{Attachment, ColorSelection, Platform};
pub use selection::{pick_start, StartSelection};
pub use settings::{EngineSettings, SettingsError};
pub use style::{Style, UnknownStyle};
pub use surface::{FrameUniforms, Surface, SurfaceContext};
pub use theme::{ChromePalette, Theme, UnknownTheme};
pub use timeline::CrossfadeCurve;
pub use transition::{ColorTransition, StylePhase, StyleRequest, StyleStep, StyleTransition};
pub use types::{LogicalSize, Orientation, PhysicalSize, Region, Rgb, SurfaceId};
pub use visibility::VisibilitySet;
