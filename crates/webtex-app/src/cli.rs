use std::path::PathBuf;

use clap::{Parser, Subcommand};
use webtex_render::{Arch, GpuBackend, Platform};

/// Webtex: embedded browser surfaces rendered into host textures.
#[derive(Parser, Debug)]
#[command(name = "webtex", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the render capability a new surface would resolve to.
    Probe(ProbeArgs),
    /// Push a synthetic damage pattern through a surface and report what
    /// was presented.
    Replay(ReplayArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ProbeArgs {
    /// GPU backend of the host (vulkan, metal, dx12, gl, webgpu).
    #[arg(long)]
    pub backend: GpuBackend,

    /// Platform to probe for instead of the running one.
    #[arg(long)]
    pub os: Option<Platform>,

    /// Architecture to probe for instead of the running one.
    #[arg(long)]
    pub arch: Option<Arch>,

    /// Probe as if accelerated rendering were disabled in config.
    #[arg(long)]
    pub no_accel: bool,

    /// Treat device extension injection as available.
    #[arg(long)]
    pub assume_injection: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReplayArgs {
    #[arg(long, default_value_t = 320)]
    pub width: u32,

    #[arg(long, default_value_t = 240)]
    pub height: u32,

    /// Number of frames after the initial full paint.
    #[arg(long, default_value_t = 8)]
    pub frames: u32,

    /// Write the last presented frame to this PNG file.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Upload into a headless wgpu device instead of host memory.
    #[arg(long)]
    pub gpu: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
