use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;

use vshogi_core::{Board, Color, Square, Variant, VariantConfig, evaluator};
use vshogi_usi::record::default_output_path;
use vshogi_usi::{
    EngineConfig, FallbackPolicy, FileConfig, Game, GameConfig, GameRecorder, HumanPlayer,
    MetaLog, OraclePlayer, Player, PlayerKind, RandomPlayer, UsiEngine, run_game,
};

const DEFAULT_FILTER_ENV: &str = "VSHOGI_LOG";
const DEFAULT_MAX_PLIES: u32 = 256;

#[derive(Parser, Debug)]
#[command(author, version, about = "Variant shogi rules engine (mini / standard / chu)")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the initial position string
    Startpos {
        /// Rule set: mini, standard or chu
        #[arg(long, default_value = "standard")]
        variant: Variant,
    },

    /// Print the legal moves of the side to move
    Moves {
        /// Rule set: mini, standard or chu
        #[arg(long, default_value = "standard")]
        variant: Variant,

        /// Start from this SFEN instead of the initial position
        #[arg(long)]
        sfen: Option<String>,

        /// USI moves applied before listing
        moves: Vec<String>,
    },

    /// Play a game
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Rule set: mini, standard or chu
    #[arg(long)]
    variant: Option<Variant>,

    /// Player for White (moves first)
    #[arg(long, value_enum)]
    white: Option<PlayerKind>,

    /// Player for Black
    #[arg(long, value_enum)]
    black: Option<PlayerKind>,

    /// Path to a USI engine binary
    #[arg(long)]
    engine: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engine think time per move in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// Maximum plies before declaring a draw
    #[arg(long)]
    max_plies: Option<u32>,

    /// What to do when a player fails to return a legal move
    #[arg(long, value_enum)]
    fallback: Option<FallbackPolicy>,

    /// Seed for random players and random fallback moves
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this SFEN instead of the initial position
    #[arg(long)]
    sfen: Option<String>,

    /// Output JSONL path (default: runs/vshogi/<timestamp>-<variant>.jsonl)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().filter_or(DEFAULT_FILTER_ENV, level))
        .format_timestamp(None)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();

    match cli.command {
        Command::Startpos { variant } => {
            let board = Board::initial(variant.config())
                .with_context(|| format!("failed to set up {variant}"))?;
            println!("{}", board.to_sfen());
        }
        Command::Moves { variant, sfen, moves } => list_moves(variant.config(), sfen, &moves)?,
        Command::Play(args) => play(args)?,
    }
    Ok(())
}

fn start_game(config: &VariantConfig, sfen: Option<&str>) -> Result<Game> {
    match sfen {
        Some(sfen) => {
            Game::from_sfen(sfen, config).with_context(|| format!("invalid sfen '{sfen}'"))
        }
        None => Game::new(config).context("failed to set up the initial position"),
    }
}

fn list_moves(config: &VariantConfig, sfen: Option<String>, moves: &[String]) -> Result<()> {
    let mut game = start_game(config, sfen.as_deref())?;
    for mv in moves {
        game.apply_usi(mv).with_context(|| format!("cannot play '{mv}'"))?;
    }
    let side = game.side_to_move();
    let legal = game.legal_moves()?;
    let status = if evaluator::is_checkmate(game.board(), side)? {
        "checkmate"
    } else if game.in_check()? {
        "check"
    } else {
        "ok"
    };

    println!("sfen: {}", game.position_string());
    println!("side: {side}");
    println!("status: {status}");
    println!("legal: {}", legal.len());
    let list: Vec<String> = legal.iter().map(|m| m.to_usi(config.size)).collect();
    println!("{}", list.join(" "));
    Ok(())
}

fn play(args: PlayArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let variant = match (args.variant, file.variant.as_deref()) {
        (Some(v), _) => v,
        (None, Some(name)) => name.parse().with_context(|| format!("config variant '{name}'"))?,
        (None, None) => Variant::Standard,
    };
    let config = variant.config();

    let mut engine_cfg = file.engine.clone();
    if let Some(path) = &args.engine {
        let mut cfg = engine_cfg.take().unwrap_or_else(|| EngineConfig::new(path.clone()));
        cfg.path = path.clone();
        engine_cfg = Some(cfg);
    }
    if let (Some(cfg), Some(ms)) = (engine_cfg.as_mut(), args.movetime) {
        cfg.movetime_ms = ms;
    }

    let white_kind = args.white.or(file.white).unwrap_or(PlayerKind::Human);
    let default_black = if engine_cfg.is_some() { PlayerKind::Engine } else { PlayerKind::Random };
    let black_kind = args.black.or(file.black).unwrap_or(default_black);
    let seed = args.seed.or(file.seed).unwrap_or(0);
    let game_cfg = GameConfig {
        max_plies: args.max_plies.or(file.max_plies).unwrap_or(DEFAULT_MAX_PLIES),
        fallback: args.fallback.or(file.fallback).unwrap_or(FallbackPolicy::Forfeit),
        seed,
    };

    let mut game = start_game(config, args.sfen.as_deref())?;
    let mut white = build_player(white_kind, Color::White, engine_cfg.as_ref(), config, seed)?;
    let mut black = build_player(black_kind, Color::Black, engine_cfg.as_ref(), config, seed)?;

    let timestamp = Local::now();
    let out = args
        .out
        .or(file.out)
        .unwrap_or_else(|| default_output_path(variant.name(), &timestamp));
    let mut recorder = GameRecorder::create(&out)
        .with_context(|| format!("failed to open {}", out.display()))?;
    let start_sfen = game.position_string();
    let mut meta = MetaLog::new(variant.name(), white.name(), black.name(), &start_sfen);
    meta.timestamp = timestamp.to_rfc3339();
    meta.max_plies = game_cfg.max_plies;
    meta.fallback = game_cfg.fallback.label().to_string();
    meta.seed = seed;
    recorder.write_meta(&meta)?;
    log::info!("{} vs {} ({}), log: {}", white.name(), black.name(), variant, out.display());

    println!("{}", render(&start_sfen, config));
    let mut on_move = |event: &vshogi_usi::MoveEvent| {
        if let Err(err) = recorder.write_move(event) {
            log::warn!("failed to write move log: {err}");
        }
        println!("{}. {} {}", event.ply, event.side, event.move_usi);
        println!("{}", render(&event.sfen_after, config));
    };
    let result = run_game(white.as_mut(), black.as_mut(), &mut game, &game_cfg, &mut on_move)?;
    recorder.write_result(&result, &game.position_string())?;

    println!("result: {} ({}) after {} plies", result.outcome.label(), result.reason, result.plies);
    io::stdout().flush()?;
    Ok(())
}

fn build_player(
    kind: PlayerKind,
    side: Color,
    engine_cfg: Option<&EngineConfig>,
    config: &VariantConfig,
    seed: u64,
) -> Result<Box<dyn Player>> {
    let label = format!("{}-{side}", kind.label());
    Ok(match kind {
        // 両者が人間でも行を取り合わないようにバッファを 1 バイトにする
        PlayerKind::Human => {
            let input = BufReader::with_capacity(1, io::stdin());
            Box::new(HumanPlayer::new(input, io::stdout(), label))
        }
        PlayerKind::Random => {
            Box::new(RandomPlayer::new(seed.wrapping_add(side.index() as u64), label))
        }
        PlayerKind::Engine => {
            let Some(cfg) = engine_cfg else {
                bail!("{side} is an engine player but no --engine or [engine] config was given");
            };
            let engine = UsiEngine::spawn(cfg, config.oracle_name, label.clone())
                .with_context(|| format!("failed to start engine {}", cfg.path.display()))?;
            Box::new(OraclePlayer::new(engine, label, cfg.move_timeout()))
        }
    })
}

/// SFEN の盤面を 1 段 1 行で表示する
fn render(sfen: &str, config: &VariantConfig) -> String {
    let Ok(board) = Board::from_sfen(sfen, config) else {
        return sfen.to_string();
    };
    let mut out = String::new();
    for row in 0..config.size {
        let cells: Vec<String> = (0..config.size)
            .map(|col| match board.piece_at(Square::new(row, col)) {
                Some(p) => {
                    let markers = "+".repeat(p.promotion.tier() as usize);
                    format!("{:>3}", format!("{markers}{}", p.kind.colored_letter(p.color)))
                }
                None => format!("{:>3}", "."),
            })
            .collect();
        out.push_str(&cells.concat());
        out.push('\n');
    }
    out.push_str(&format!("hand: {}", board.hand_field()));
    out
}
