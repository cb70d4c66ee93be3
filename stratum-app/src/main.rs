//! Stratum demo driver
//!
//! Builds an input → upsampling chain against a retained scene, pushes a
//! synthetic output value through every layer, replays a short click/hover
//! session on the last layer and tears everything down again.

mod app;
mod session;

use clap::Parser;
use std::path::PathBuf;

/// Stratum - interactive layer visualization demo
#[derive(Parser, Debug)]
#[command(name = "stratum")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON session file (model config, input shape, layers)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upsampling factor when no session file is given
    #[arg(short, long, default_value_t = 2)]
    size: usize,

    /// Input width when no session file is given
    #[arg(long, default_value_t = 4)]
    width: usize,

    /// Input channel count when no session file is given
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Start layers open
    #[arg(long)]
    open: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let builder = app::AppBuilder::new()
        .with_log_level(&args.log_level)
        .with_fallback_chain(args.width, args.depth, args.size, args.open);
    let builder = match args.config {
        Some(path) => builder.with_session_file(path),
        None => builder,
    };

    if let Err(e) = builder.run() {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
