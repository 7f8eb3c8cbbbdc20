use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use borderart::{link_colors, ArtConfig, EngineSettings, ShaderRegistry, Style};
use tracing_subscriber::EnvFilter;

use crate::cli::{CheckArgs, Cli, Command, LinksArgs, ShaderArgs};
use crate::simulate::{resolve_color, simulate, write_records};

pub fn run(cli: Cli) -> Result<()> {
    initialise_tracing();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)?;
    out.flush()?;
    Ok(())
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries command output, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Command::Styles => list_styles(out),
        Command::Shader(args) => print_shader(args, out),
        Command::Palette => {
            let config = load_config(cli.config.as_deref())?;
            list_palette(&config, out)
        }
        Command::Links(args) => {
            let config = load_config(cli.config.as_deref())?;
            print_links(&config, args, out)
        }
        Command::Check(args) => check(args, out),
        Command::Simulate(args) => {
            let config = load_config(cli.config.as_deref())?;
            let settings = EngineSettings::from_config(&config)?;
            let records = simulate(settings, cli.seed, args)?;
            write_records(out, &records, args.json)
        }
    }
}

/// Reads `path`, or the bundled configuration when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ArtConfig> {
    let Some(path) = path else {
        return ArtConfig::bundled().context("bundled configuration is invalid");
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = ArtConfig::from_toml_str(&source)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    tracing::debug!(path = %path.display(), colors = config.palette.len(), "loaded config");
    Ok(config)
}

fn list_styles(out: &mut dyn Write) -> Result<()> {
    for style in Style::ALL {
        writeln!(out, "{:<14} {}", style.key(), style.label())?;
    }
    Ok(())
}

fn print_shader(args: &ShaderArgs, out: &mut dyn Write) -> Result<()> {
    let registry = ShaderRegistry::new();
    let source = if args.vertex {
        registry.vertex()
    } else {
        registry.fragment(args.style)
    };
    out.write_all(source.as_bytes())?;
    if !source.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

fn list_palette(config: &ArtConfig, out: &mut dyn Write) -> Result<()> {
    for (index, entry) in config.palette.iter().enumerate() {
        let [r, g, b] = entry.color;
        writeln!(out, "{index:>3}  {:<14} {r},{g},{b}", entry.name)?;
    }
    Ok(())
}

fn print_links(config: &ArtConfig, args: &LinksArgs, out: &mut dyn Write) -> Result<()> {
    let settings = EngineSettings::from_config(config)?;
    let base = resolve_color(&settings, &args.color)?;
    for (name, value) in link_colors(base).css_variables() {
        writeln!(out, "{name}: {value};")?;
    }
    Ok(())
}

fn check(args: &CheckArgs, out: &mut dyn Write) -> Result<()> {
    let config = load_config(Some(&args.path))?;
    if let Err(err) = EngineSettings::from_config(&config) {
        bail!("{}: {err}", args.path.display());
    }

    let containers = &config.containers;
    writeln!(out, "{}: ok", args.path.display())?;
    writeln!(out, "version: {}", config.version)?;
    writeln!(out, "fade_duration: {:?}", config.fade_duration)?;
    writeln!(out, "frame_interval: {:?}", config.frame_interval)?;
    writeln!(out, "style_curve: {:?}", config.style_curve)?;
    writeln!(out, "color_curve: {:?}", config.color_curve)?;
    writeln!(out, "visibility_margin_px: {}", config.visibility_margin_px)?;
    writeln!(out, "initial_style: {}", String::from(config.initial_style.clone()))?;
    writeln!(out, "initial_color: {}", String::from(config.initial_color.clone()))?;
    writeln!(
        out,
        "containers: #{} #{} .{}",
        containers.top, containers.bottom, containers.border_class
    )?;
    writeln!(out, "palette: {} colors", config.palette.len())?;
    Ok(())
}
