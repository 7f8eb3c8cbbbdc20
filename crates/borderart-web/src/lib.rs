//! Browser front end for the border-art engine.
//!
//! JavaScript calls the exported `init` once the document is interactive and
//! keeps the returned `BorderArt` handle for style, color and theme switches.
//! Everything browser-specific is compiled only for `wasm32`; the styling
//! helpers are plain Rust so they can be unit-tested on the host.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

pub mod styling;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{init, BorderArt};
