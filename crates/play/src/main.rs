//! Terminal front end: play against a UCI engine by typing moves.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chess_core::{Color, GameState, MoveIntent};
use clap::Parser;
use engine_session::EngineSession;
use play::{CommandFeedback, GameEvent, PlayConfig, PlayController, PlayOptions, PlayerInput};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "play", version, about = "Play chess against a UCI engine")]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engine executable, overrides the config file
    #[arg(long)]
    engine: Option<String>,

    /// Engine search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Colour you play
    #[arg(long, value_parser = parse_color)]
    color: Option<Color>,

    /// Start from this position instead of the standard one
    #[arg(long)]
    fen: Option<String>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

fn parse_color(s: &str) -> Result<Color, String> {
    match s.to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        other => Err(format!("expected white or black, got `{other}`")),
    }
}

const HELP: &str = "\
commands:
  <move>    play a move in UCI notation, e.g. e2e4 or e7e8q
  moves     list legal moves
  history   list moves played so far
  fen       print the current position
  new       start a new game
  quit      leave";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let game = match &cli.fen {
        Some(fen) => GameState::from_fen(fen).with_context(|| format!("invalid --fen `{fen}`"))?,
        None => GameState::new(),
    };

    let (event_tx, event_rx) = mpsc::channel(64);
    let (input_tx, input_rx) = mpsc::channel(16);
    let printer = tokio::spawn(print_events(event_rx, cli.json));

    let mut controller = PlayController::new(game, PlayOptions::from(&config), event_tx);
    controller.start(EngineSession::spawn(&config.engine)).await;
    let controller = tokio::spawn(controller.run(input_rx));

    if !cli.json {
        println!("{HELP}");
    }
    read_commands(&input_tx, cli.json).await?;
    let _ = input_tx.send(PlayerInput::Quit).await;

    controller.await??;
    printer.await?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<PlayConfig> {
    let mut config = match &cli.config {
        Some(path) => PlayConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlayConfig::default(),
    };
    if let Some(engine) = &cli.engine {
        config.engine.path = engine.clone();
    }
    if let Some(depth) = cli.depth {
        config.search_depth = depth;
    }
    if let Some(color) = cli.color {
        config.human_color = color;
    }
    config.validate()?;
    Ok(config)
}

async fn read_commands(inputs: &mpsc::Sender<PlayerInput>, json: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        match command {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "new" => send(inputs, PlayerInput::NewGame).await?,
            "fen" | "moves" | "history" => {
                let game = inspect(inputs).await?;
                print_game_info(command, &game);
            }
            token => match token.parse::<MoveIntent>() {
                Ok(intent) => {
                    let (reply, rx) = oneshot::channel();
                    send(inputs, PlayerInput::Move { intent, reply }).await?;
                    if let Err(rejection) = rx.await? {
                        print_line(
                            &CommandFeedback::MoveRejected {
                                token: token.to_string(),
                                reason: rejection.to_string(),
                            },
                            json,
                        );
                    }
                }
                Err(err) => print_line(
                    &CommandFeedback::Unrecognized {
                        input: token.to_string(),
                        reason: err.to_string(),
                    },
                    json,
                ),
            },
        }
    }
    Ok(())
}

async fn send(inputs: &mpsc::Sender<PlayerInput>, input: PlayerInput) -> Result<()> {
    if inputs.send(input).await.is_err() {
        bail!("game controller stopped");
    }
    Ok(())
}

async fn inspect(inputs: &mpsc::Sender<PlayerInput>) -> Result<GameState> {
    let (reply, rx) = oneshot::channel();
    send(inputs, PlayerInput::Inspect { reply }).await?;
    Ok(rx.await?)
}

fn print_game_info(command: &str, game: &GameState) {
    match command {
        "fen" => println!("{}", game.fen()),
        "moves" => {
            let moves: Vec<String> = game.legal_moves().iter().map(|m| m.to_string()).collect();
            println!("{}", moves.join(" "));
        }
        _ => {
            for record in game.history() {
                let number = record.fen_before.rsplit(' ').next().unwrap_or("?");
                let dots = if record.color == Color::White { "." } else { "..." };
                println!("{number}{dots} {}", record.san);
            }
        }
    }
}

async fn print_events(mut events: mpsc::Receiver<GameEvent>, json: bool) {
    while let Some(event) = events.recv().await {
        print_line(&event, json);
    }
}

fn print_line<T: Serialize + std::fmt::Display>(item: &T, json: bool) {
    if !json {
        println!("{item}");
        return;
    }
    match serde_json::to_string(item) {
        Ok(line) => println!("{line}"),
        Err(err) => tracing::error!(error = %err, "failed to encode output"),
    }
}
