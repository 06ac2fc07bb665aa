use std::sync::mpsc;
use std::time::Duration;

use vshogi_core::VariantConfig;
use vshogi_usi::{
    EngineConfig, FallbackPolicy, Game, GameConfig, GameOutcome, MoveEvent, OraclePlayer,
    RandomPlayer, UsiEngine, run_game,
};

/// 送り込んだ行をそのまま返すエンジン
fn scripted_engine(lines: &[&str]) -> UsiEngine {
    let (tx, rx) = mpsc::channel();
    for line in lines {
        tx.send(line.to_string()).unwrap();
    }
    drop(tx);
    let mut engine = UsiEngine::from_channel(rx, std::io::sink(), "scripted".to_string());
    let mut cfg = EngineConfig::new("scripted");
    cfg.movetime_ms = 10;
    cfg.handshake_timeout_ms = 200;
    engine.initialize(&cfg, VariantConfig::MINI.oracle_name).unwrap();
    engine
}

#[test]
fn engine_moves_then_resigns() {
    let engine = scripted_engine(&[
        "usiok",
        "readyok",
        "readyok",
        "info depth 3 score cp 12 nodes 100 pv 5d5c",
        "bestmove 5d5c",
        "readyok",
        "bestmove resign",
    ]);
    let mut white = OraclePlayer::new(engine, "engine", Duration::from_millis(200));
    let mut black = RandomPlayer::new(5, "random");
    let mut game = Game::new(&VariantConfig::MINI).unwrap();

    let mut events: Vec<MoveEvent> = Vec::new();
    let result = run_game(
        &mut white,
        &mut black,
        &mut game,
        &GameConfig::default(),
        &mut |e: &MoveEvent| events.push(e.clone()),
    )
    .unwrap();

    assert_eq!(result.outcome, GameOutcome::BlackWin);
    assert_eq!(result.reason, "resign");
    assert_eq!(result.plies, 2);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].move_usi, "5d5c");
    assert_eq!(events[0].sfen_after, "rbsgk/4p/P4/5/KGSBR w - 2");
    assert_eq!(events[0].eval.as_ref().and_then(|e| e.score_cp), Some(12));
    assert_eq!(events[2].move_usi, "resign");
}

#[test]
fn closed_engine_falls_back_to_random_moves() {
    let engine = scripted_engine(&["usiok", "readyok"]);
    let mut white = OraclePlayer::new(engine, "engine", Duration::from_millis(50));
    let mut black = RandomPlayer::new(9, "random");
    let mut game = Game::new(&VariantConfig::MINI).unwrap();
    let config = GameConfig { max_plies: 4, fallback: FallbackPolicy::RandomMove, seed: 2 };

    let mut fallback_sides = Vec::new();
    let result = run_game(&mut white, &mut black, &mut game, &config, &mut |e: &MoveEvent| {
        if e.fallback {
            fallback_sides.push(e.side);
        }
    })
    .unwrap();

    assert!(result.plies >= 1);
    assert!(!fallback_sides.is_empty());
    assert!(fallback_sides.iter().all(|s| *s == vshogi_core::Color::White));
}

#[test]
fn illegal_engine_move_forfeits() {
    let engine = scripted_engine(&["usiok", "readyok", "readyok", "bestmove 5d5b"]);
    let mut white = OraclePlayer::new(engine, "engine", Duration::from_millis(200));
    let mut black = RandomPlayer::new(1, "random");
    let mut game = Game::new(&VariantConfig::MINI).unwrap();
    let before = game.position_string();

    let result =
        run_game(&mut white, &mut black, &mut game, &GameConfig::default(), &mut |_| {}).unwrap();
    assert_eq!(result.outcome, GameOutcome::BlackWin);
    assert_eq!(result.reason, "illegal_move");
    assert_eq!(game.position_string(), before);
}
