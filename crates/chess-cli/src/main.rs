//! Chess - play a game from the terminal.
//!
//! Reads commands from stdin, one per line, and answers each with the board
//! (or a JSON snapshot with `--json`). A timer task runs the clock of the
//! side to move and ends the game when it reaches zero.

mod command;
mod config;
mod output;
mod session;
mod timekeeper;

use clap::Parser;
use command::Command;
use config::CliConfig;
use session::Session;
use std::path::PathBuf;
use timekeeper::Timekeeper;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Chess - play a game from the terminal.
#[derive(Parser)]
#[command(name = "chess")]
#[command(about = "Plays chess from textual commands on stdin")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "chess.toml")]
    config: PathBuf,

    /// Start layout, overriding the configuration file
    #[arg(long)]
    layout: Option<String>,

    /// Board size for the start layout
    #[arg(long)]
    size: Option<u8>,

    /// Seconds per side
    #[arg(long)]
    max_time: Option<u64>,

    /// Answer every command with a JSON snapshot
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut config = CliConfig::load(&args.config)?;
    if let Some(layout) = args.layout {
        config.game.start_layout = layout;
    }
    if let Some(size) = args.size {
        config.game.board_size = size;
    }
    if let Some(secs) = args.max_time {
        config.game.max_time_secs = secs;
    }
    tracing::info!("Config: {:?}", args.config);
    tracing::info!(
        "Board {}x{}, {}s per side",
        config.game.board_size,
        config.game.board_size,
        config.game.max_time_secs
    );

    let mut game = config.build_game()?;
    game.start_new_game(config.max_time());
    let mut timekeeper = Timekeeper::spawn(game.clocks().clone(), config.tick());
    let mut session = Session::new(game, config, args.json);

    let greeting = session.execute(Command::Show);
    println!("{}", greeting.text);
    timekeeper.set_active(session.active_side());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let reply = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line, session.board_height()) {
                    Ok(command) => session.execute(command),
                    Err(e) if args.json => {
                        let snapshot = output::Snapshot::capture(session.game(), false, Some(e.to_string()));
                        session::Reply { text: snapshot.to_json()?, quit: false }
                    }
                    Err(e) => session::Reply { text: format!("error: {}", e), quit: false },
                }
            }
            Some(color) = timekeeper.flagged() => session.timeout(color),
        };

        if !reply.text.is_empty() {
            println!("{}", reply.text);
        }
        if reply.quit {
            break;
        }
        timekeeper.set_active(session.active_side());
    }

    timekeeper.shutdown();
    tracing::info!("Bye");
    Ok(())
}
