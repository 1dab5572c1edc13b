//! Windowed viewer for the movie renderer.
//!
//! Drives the built-in demo composition through the engine traits and
//! draws it with the batch renderer.
//!
//! Keys: `S` solid, `W` wireframe, `Space` play/pause, `R` restart,
//! `L` looping, `P` pulse sub-composition, `Escape` quit.

mod app;
mod demo;

use anyhow::Result;
use clap::Parser;
use winit::dpi::LogicalSize;

use movie_render::device::GpuInit;
use movie_render::logging::{init_logging, LoggingConfig};
use movie_render::render::{BatchConfig, FlushPolicy};
use movie_render::window::{Runtime, RuntimeConfig};

use crate::app::{ViewerApp, ViewerOptions};

/// Movie viewer arguments.
#[derive(Parser, Debug)]
#[command(
    name = "movie-viewer",
    about = "Plays a composition through the batching mesh renderer"
)]
struct Args {
    /// Image shown as a plain layer and as the masked layer.
    #[arg(long)]
    image: Option<String>,

    /// Atlas page; its top-left quarter is drawn and it feeds the track matte.
    #[arg(long)]
    atlas: Option<String>,

    /// Loop playback.
    #[arg(long = "loop")]
    looped: bool,

    /// Start with the wireframe pass enabled.
    #[arg(long)]
    wireframe: bool,

    /// Start with the solid pass disabled.
    #[arg(long)]
    no_solid: bool,

    /// Flush the batch after every mesh.
    #[arg(long)]
    every_mesh_flush: bool,

    /// Initial window width in logical pixels.
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, default_value = "720")]
    height: u32,

    /// Log filter, e.g. `info,movie_render=debug`. Falls back to `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let batch = BatchConfig {
        flush_policy: if args.every_mesh_flush {
            FlushPolicy::EveryMesh
        } else {
            FlushPolicy::Deferred
        },
        ..BatchConfig::default()
    };

    let options = ViewerOptions {
        image: args.image,
        atlas: args.atlas,
        looped: args.looped,
        solid: !args.no_solid,
        wireframe: args.wireframe,
        batch,
    };

    let config = RuntimeConfig {
        title: "movie viewer".to_string(),
        initial_size: LogicalSize::new(f64::from(args.width), f64::from(args.height)),
    };

    log::info!("starting viewer: {options:?}");
    Runtime::run(config, GpuInit::default(), ViewerApp::new(options))
}
