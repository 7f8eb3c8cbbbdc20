use std::path::PathBuf;

use borderart::Style;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "artctl",
    author,
    version,
    about = "Inspect, validate and simulate the border-art engine"
)]
pub struct Cli {
    /// Configuration TOML; the bundled defaults are used when omitted.
    #[arg(long, global = true, value_name = "PATH", env = "BORDERART_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for `random` start-up picks.
    #[arg(long, global = true, value_name = "SEED", default_value_t = 0)]
    pub seed: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List style keys and their labels.
    Styles,
    /// Print the assembled shader source for a style.
    Shader(ShaderArgs),
    /// List the palette of the active configuration.
    Palette,
    /// Print the link accent colors derived from a base color.
    Links(LinksArgs),
    /// Parse and validate a configuration file.
    Check(CheckArgs),
    /// Run the engine headlessly and report every frame.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
pub struct ShaderArgs {
    #[arg(value_name = "STYLE", value_parser = parse_style)]
    pub style: Style,

    /// Print the shared vertex shader instead of the fragment shader.
    #[arg(long)]
    pub vertex: bool,
}

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Palette name or `r,g,b`.
    #[arg(value_name = "COLOR", value_parser = parse_color)]
    pub color: ColorArg,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of ticks to run.
    #[arg(long, value_name = "N", default_value_t = 20)]
    pub frames: u32,

    /// Simulated time between ticks, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    pub step_ms: u64,

    /// Left-edge borders on the simulated page, besides top and bottom bars.
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub edges: usize,

    /// Switch style before the given tick (e.g. `marble@10`). Repeatable.
    #[arg(long, value_name = "STYLE@FRAME", value_parser = parse_style_at)]
    pub switch_style: Vec<StyleAt>,

    /// Change color before the given tick (e.g. `Teal@4` or `10,20,30@4`). Repeatable.
    #[arg(long, value_name = "COLOR@FRAME", value_parser = parse_color_at)]
    pub change_color: Vec<ColorAt>,

    /// Emit one JSON object per tick instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Color given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorArg {
    Named(String),
    Rgb([u8; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleAt {
    pub style: Style,
    pub frame: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorAt {
    pub color: ColorArg,
    pub frame: u32,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_style(value: &str) -> Result<Style, String> {
    value.parse::<Style>().map_err(|err| {
        let known: Vec<&str> = Style::ALL.iter().map(|style| style.key()).collect();
        format!("{err}; expected one of {}", known.join(", "))
    })
}

/// Parses `r,g,b` with each channel in 0-255.
pub fn parse_rgb(value: &str) -> Result<[u8; 3], String> {
    let channels: Vec<&str> = value.split(',').map(str::trim).collect();
    let [r, g, b] = channels.as_slice() else {
        return Err(format!("invalid color '{value}'; expected r,g,b"));
    };
    let channel = |raw: &str| {
        raw.parse::<u8>()
            .map_err(|_| format!("invalid color channel '{raw}'; expected 0-255"))
    };
    Ok([channel(*r)?, channel(*g)?, channel(*b)?])
}

pub fn parse_color(value: &str) -> Result<ColorArg, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("color must not be empty".to_string());
    }
    if trimmed.contains(',') {
        parse_rgb(trimmed).map(ColorArg::Rgb)
    } else {
        Ok(ColorArg::Named(trimmed.to_string()))
    }
}

fn split_frame(value: &str) -> Result<(&str, u32), String> {
    let (head, frame) = value
        .trim()
        .rsplit_once('@')
        .ok_or_else(|| format!("missing '@FRAME' in '{value}'"))?;
    let frame = frame
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid frame number '{}'", frame.trim()))?;
    Ok((head, frame))
}

pub fn parse_style_at(value: &str) -> Result<StyleAt, String> {
    let (style, frame) = split_frame(value)?;
    Ok(StyleAt {
        style: parse_style(style)?,
        frame,
    })
}

pub fn parse_color_at(value: &str) -> Result<ColorAt, String> {
    let (color, frame) = split_frame(value)?;
    Ok(ColorAt {
        color: parse_color(color)?,
        frame,
    })
}
