mod app;
mod ascii_renderer;
mod config;
mod driver;

use crate::ascii_renderer::AsciiRenderer;
use crate::config::ViewerConfig;
use crate::driver::{DriverOptions, TerminalGuard, drive, spawn_input_reader};
use clap::{ArgAction, Parser};
use common::animator::Animator;
use common::logger::{self, LogLevel, LoggerConfig};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Spinning ASCII torus in the terminal
///
/// Keys: space or `s` to start/stop, Enter to start, Backspace to stop,
/// `r` to reset the rotation, `q` or Esc to quit.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in characters
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Grid height in characters
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Target frames per second
    #[arg(short, long)]
    fps: Option<u32>,

    /// Quit after rendering this many frames
    #[arg(short = 'n', long)]
    frames: Option<u64>,

    /// Log file path
    #[arg(short, long, default_value = "donut.log")]
    log_file: String,

    /// Enable verbose output
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let viewer = ViewerConfig::load_or_default(args.config.as_deref())?.with_overrides(
        args.width,
        args.height,
        args.fps,
    );
    let render = viewer.render_config()?;

    logger::init(&LoggerConfig {
        log_file: args.log_file.clone(),
        min_level: if args.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        },
    })?;

    info!(
        "starting donut viewer: {}x{} grid, {} fps, k1 = {:.3}",
        render.grid_width(),
        render.grid_height(),
        viewer.fps,
        render.k1()
    );

    let options = DriverOptions {
        interval: viewer.frame_interval(),
        fps: viewer.fps,
        max_frames: args.frames,
    };

    let guard = TerminalGuard::enter()?;
    let mut animator = Animator::new(AsciiRenderer::stdout(), render);

    let (action_tx, mut action_rx) = mpsc::channel(16);
    let running = Arc::new(AtomicBool::new(true));
    let input_task = spawn_input_reader(action_tx, running.clone());

    let result = drive(&mut animator, &mut action_rx, &options).await;

    // clean up
    running.store(false, Ordering::Relaxed);
    drop(guard);
    let _ = input_task.await;

    if let Err(e) = &result {
        error!("viewer stopped with error: {}", e);
    }
    result?;

    println!("Exiting after {} frames.", animator.frames_rendered());

    Ok(())
}
