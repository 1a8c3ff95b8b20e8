//! Terminal front-end: play chess against a remote language model.
//!
//! Moves are typed in plain words and interpreted by the remote service,
//! which also plays Black and gives advice on request.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chess_core::render::{PieceStyle, TextStyle};
use chess_core::GameRecord;
use clap::Parser;
use player::clients::MoveSessionClient;
use player::config::{self, Config};
use player::repl::{RenderOptions, Repl};
use player::session::Session;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "play", version, about = "Play chess against a remote language model")]
struct Args {
    /// Start from a saved game instead of the initial position
    #[arg(long, value_name = "PGN")]
    load: Option<PathBuf>,

    /// Write the board as an SVG image to this file after every move
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,

    /// Edge length of the SVG image in pixels
    #[arg(long, default_value_t = 500)]
    svg_size: u32,

    /// Draw pieces with chess glyphs instead of letters
    #[arg(long)]
    unicode: bool,

    /// Chess service base URL (overrides CHESS_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the board
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();

    let config = match &args.api_url {
        Some(url) => Config::from_lookup(|key| {
            if key == config::API_URL_VAR {
                return Some(url.clone());
            }
            env::var(key).ok()
        })?,
        None => Config::from_env()?,
    };
    tracing::info!(api_url = %config.api_url, "Using chess service");

    let record = match &args.load {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            GameRecord::from_pgn(&text)
                .with_context(|| format!("Failed to load game from {}", path.display()))?
        }
        None => GameRecord::new(),
    };

    let client = MoveSessionClient::new(&config).context("Failed to build HTTP client")?;

    let render = RenderOptions {
        text: TextStyle {
            pieces: if args.unicode {
                PieceStyle::Unicode
            } else {
                PieceStyle::Ascii
            },
        },
        svg_path: args.svg,
        svg_size: args.svg_size,
    };

    let mut repl = Repl::new(
        client,
        Session::from_record(record),
        config,
        render,
        std::io::stdout(),
    );

    // Ctrl-C abandons the pending request instead of killing the process
    let interrupt = repl.interrupt_handle();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            interrupt.notify_waiters();
        }
    });

    repl.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
