//! 対局進行
//!
//! [`Game`] は盤面・手番・勝敗を持ち、指し手を検証してから適用する。
//! 不正な手やエラーのときは局面を一切変えず、同じ手番のまま返す。
//! [`run_game`] は 2 人のプレイヤーに交互に手を求めて 1 局を進める。

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use vshogi_core::evaluator;
use vshogi_core::{Board, BoardEvent, Color, Move, VariantConfig};

use crate::error::{GameError, ProtocolError};
use crate::oracle::EvalLog;
use crate::player::{Player, PlayerReply};

/// 対局結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    InProgress,
    WhiteWin,
    BlackWin,
    Draw,
    /// エラーで中断（局面はそのまま）
    Halted,
}

impl GameOutcome {
    pub fn label(self) -> &'static str {
        match self {
            GameOutcome::InProgress => "in_progress",
            GameOutcome::WhiteWin => "white_win",
            GameOutcome::BlackWin => "black_win",
            GameOutcome::Draw => "draw",
            GameOutcome::Halted => "halted",
        }
    }

    pub fn win_for(color: Color) -> GameOutcome {
        match color {
            Color::White => GameOutcome::WhiteWin,
            Color::Black => GameOutcome::BlackWin,
        }
    }
}

/// プレイヤーが手を返せなかったときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// 負けにする
    Forfeit,
    /// 対局を止める（手番は保留）
    Halt,
    /// 代わりにランダムな合法手を指す
    #[serde(rename = "random")]
    #[value(name = "random")]
    RandomMove,
}

impl FallbackPolicy {
    pub fn label(self) -> &'static str {
        match self {
            FallbackPolicy::Forfeit => "forfeit",
            FallbackPolicy::Halt => "halt",
            FallbackPolicy::RandomMove => "random",
        }
    }
}

/// 1 局分の状態
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    outcome: GameOutcome,
    reason: String,
    history: Vec<Move>,
}

impl Game {
    /// ルールの初期配置から始める
    pub fn new(config: &VariantConfig) -> Result<Self, GameError> {
        Ok(Self::from_board(Board::initial(config)?))
    }

    pub fn from_sfen(sfen: &str, config: &VariantConfig) -> Result<Self, GameError> {
        Ok(Self::from_board(Board::from_sfen(sfen, config)?))
    }

    pub fn from_board(board: Board) -> Self {
        Self { board, outcome: GameOutcome::InProgress, reason: String::new(), history: Vec::new() }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &VariantConfig {
        self.board.config()
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn move_number(&self) -> u32 {
        self.board.move_number()
    }

    /// オラクルに渡す局面文字列
    pub fn position_string(&self) -> String {
        self.board.to_sfen()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_over(&self) -> bool {
        !matches!(self.outcome, GameOutcome::InProgress | GameOutcome::Halted)
    }

    pub fn legal_moves(&self) -> Result<Vec<Move>, GameError> {
        Ok(evaluator::legal_moves(&self.board, self.side_to_move())?)
    }

    pub fn in_check(&self) -> Result<bool, GameError> {
        Ok(evaluator::is_check(&self.board, self.side_to_move())?)
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.board.drain_events()
    }

    /// 勝敗を確定する
    pub fn finish(&mut self, outcome: GameOutcome, reason: &str) {
        log::info!("game over: {} ({reason})", outcome.label());
        self.outcome = outcome;
        self.reason = reason.to_string();
    }

    /// 合法手なら適用し、手番を渡して相手の詰みを判定する
    pub fn apply(&mut self, mv: Move) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::Finished(self.outcome.label().to_string()));
        }
        let side = self.side_to_move();
        let size = self.board.size();
        if !self.legal_moves()?.contains(&mv) {
            return Err(GameError::IllegalMove(mv.to_usi(size)));
        }

        let mut next = self.board.clone();
        next.apply_move(&mv, side)?;
        if let Some(id) = next.piece_at(mv.to()).map(|p| p.id) {
            if next.settle_forced_promotion(id)? {
                log::debug!("forced promotion on {}", mv.to_usi(size));
            }
        }
        next.advance_turn();

        // 判定まで済んでから確定する
        let opponent = side.opponent();
        let ending = if evaluator::is_checkmate(&next, opponent)? {
            Some("checkmate")
        } else if evaluator::legal_moves(&next, opponent)?.is_empty() {
            Some("no_legal_moves")
        } else {
            None
        };
        self.board = next;
        self.history.push(mv);
        if let Some(reason) = ending {
            self.finish(GameOutcome::win_for(side), reason);
        }
        Ok(())
    }

    /// USI 文字列の手を適用し、解釈した手を返す
    pub fn apply_usi(&mut self, text: &str) -> Result<Move, GameError> {
        let mv = Move::from_usi(text, self.board.size())?;
        self.apply(mv)?;
        Ok(mv)
    }
}

/// 対局設定
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub max_plies: u32,
    pub fallback: FallbackPolicy,
    /// 代替手の乱数シード
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { max_plies: 256, fallback: FallbackPolicy::Forfeit, seed: 0 }
    }
}

/// 1 手ごとに呼ばれるイベント
#[derive(Debug, Clone)]
pub struct MoveEvent {
    pub ply: u32,
    pub side: Color,
    pub sfen_before: String,
    /// 手を指した後の局面（終局宣言・反則負けでは直前と同じ）
    pub sfen_after: String,
    pub move_usi: String,
    /// プレイヤーが返した生の文字列（採用した手と異なるときのみ）
    pub raw_move_usi: Option<String>,
    pub elapsed_ms: u64,
    pub eval: Option<EvalLog>,
    pub player: String,
    /// 代替手で指したか
    pub fallback: bool,
}

/// 1 局の結果
#[derive(Debug, Clone)]
pub struct GameResult {
    pub outcome: GameOutcome,
    pub reason: String,
    pub plies: u32,
}

pub fn duration_to_millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

/// 1 局を実行する。
///
/// - `white`, `black`: 先手・後手のプレイヤー
/// - `game`: 開始局面（途中局面でもよい）
/// - `on_move`: 1 手ごとに呼ばれるコールバック
pub fn run_game(
    white: &mut dyn Player,
    black: &mut dyn Player,
    game: &mut Game,
    config: &GameConfig,
    on_move: &mut dyn FnMut(&MoveEvent),
) -> Result<GameResult, GameError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let size = game.board().size();
    let mut plies = 0u32;

    while !game.is_over() && plies < config.max_plies {
        let side = game.side_to_move();
        let player: &mut dyn Player = match side {
            Color::White => &mut *white,
            Color::Black => &mut *black,
        };
        let sfen_before = game.position_string();
        let start = Instant::now();
        let reply = player.choose_move(game);
        let mut event = MoveEvent {
            ply: plies + 1,
            side,
            sfen_after: sfen_before.clone(),
            sfen_before,
            move_usi: String::new(),
            raw_move_usi: None,
            elapsed_ms: duration_to_millis(start.elapsed()),
            eval: player.last_eval(),
            player: player.name().to_string(),
            fallback: false,
        };

        let reason = match reply {
            Ok(PlayerReply::Move(text)) => match game.apply_usi(&text) {
                Ok(mv) => {
                    plies += 1;
                    event.move_usi = mv.to_usi(size);
                    event.sfen_after = game.position_string();
                    if event.move_usi != text {
                        event.raw_move_usi = Some(text);
                    }
                    on_move(&event);
                    continue;
                }
                Err(err) => {
                    log::warn!("{}: rejected '{text}': {err}", event.player);
                    event.raw_move_usi = Some(text);
                    "illegal_move"
                }
            },
            Ok(PlayerReply::Resign) => {
                event.move_usi = "resign".to_string();
                on_move(&event);
                game.finish(GameOutcome::win_for(side.opponent()), "resign");
                break;
            }
            Ok(PlayerReply::Win) => {
                event.move_usi = "win".to_string();
                on_move(&event);
                game.finish(GameOutcome::win_for(side), "win");
                break;
            }
            Ok(PlayerReply::NoMove) => "no_bestmove",
            Err(GameError::Protocol(ProtocolError::Timeout { .. })) => "timeout",
            Err(GameError::InputClosed) => "input_closed",
            Err(err) => {
                log::warn!("{}: {err}", event.player);
                "player_error"
            }
        };

        match config.fallback {
            FallbackPolicy::Forfeit => {
                event.move_usi = reason.to_string();
                on_move(&event);
                game.finish(GameOutcome::win_for(side.opponent()), reason);
            }
            FallbackPolicy::Halt => {
                log::warn!("halting at ply {}: {reason}", event.ply);
                return Ok(GameResult {
                    outcome: GameOutcome::Halted,
                    reason: reason.to_string(),
                    plies,
                });
            }
            FallbackPolicy::RandomMove => {
                let legal = game.legal_moves()?;
                let Some(&mv) = legal.choose(&mut rng) else {
                    game.finish(GameOutcome::win_for(side.opponent()), reason);
                    break;
                };
                log::warn!("{}: {reason}, playing random {}", event.player, mv.to_usi(size));
                game.apply(mv)?;
                plies += 1;
                event.move_usi = mv.to_usi(size);
                event.sfen_after = game.position_string();
                event.fallback = true;
                on_move(&event);
            }
        }
    }

    if !game.is_over() {
        game.finish(GameOutcome::Draw, "max_plies");
    }
    Ok(GameResult { outcome: game.outcome(), reason: game.reason().to_string(), plies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vshogi_core::{BoardError, PieceKind, Square};

    /// 決められた返答を順に返すプレイヤー
    struct Scripted {
        replies: Vec<Result<PlayerReply, GameError>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<PlayerReply, GameError>>) -> Self {
            let mut replies = replies;
            replies.reverse();
            Self { replies }
        }

        fn moves(moves: &[&str]) -> Self {
            Self::new(moves.iter().map(|m| Ok(PlayerReply::Move(m.to_string()))).collect())
        }
    }

    impl Player for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn choose_move(&mut self, _game: &Game) -> Result<PlayerReply, GameError> {
            self.replies.pop().unwrap_or(Ok(PlayerReply::NoMove))
        }
    }

    fn mini() -> Game {
        Game::new(&VariantConfig::MINI).unwrap()
    }

    #[test]
    fn apply_advances_turn_and_counter() {
        let mut game = mini();
        game.apply_usi("5d5c").unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.move_number(), 2);
        assert_eq!(game.position_string(), "rbsgk/4p/P4/5/KGSBR w - 2");
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn illegal_move_holds_the_turn() {
        let mut game = mini();
        let before = game.position_string();
        let err = game.apply_usi("5d5b").unwrap_err();
        assert!(matches!(err, GameError::IllegalMove(ref m) if m == "5d5b"));
        let err = game.apply_usi("zz").unwrap_err();
        assert!(matches!(err, GameError::Parse(_)));
        // 相手の駒は動かせない
        let err = game.apply_usi("1b1c").unwrap_err();
        assert!(matches!(err, GameError::IllegalMove(_)));
        assert_eq!(game.position_string(), before);
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn failed_evaluation_commits_nothing() {
        // 手番でない側の玉が取れる局面
        let mut game = Game::from_sfen("4k/4R/5/5/K4 b - 1", &VariantConfig::MINI).unwrap();
        let before = game.position_string();
        let err = game.apply_usi("1b1a").unwrap_err();
        assert!(matches!(err, GameError::Board(BoardError::KingMissing(Color::Black))));
        assert_eq!(game.position_string(), before);
        assert_eq!(game.side_to_move(), Color::White);
        assert!(game.history().is_empty());
        assert_eq!(game.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn checkmate_ends_the_game() {
        let mut game = Game::from_sfen("4k/5/4K/5/5 b G 1", &VariantConfig::MINI).unwrap();
        game.apply_usi("G*1b").unwrap();
        assert_eq!(game.outcome(), GameOutcome::WhiteWin);
        assert_eq!(game.reason(), "checkmate");
        assert!(matches!(game.apply_usi("1a2a"), Err(GameError::Finished(_))));
    }

    #[test]
    fn forced_promotion_settles_after_move() {
        let mut game = Game::from_sfen("2k2/P4/5/5/4K b - 1", &VariantConfig::MINI).unwrap();
        assert!(game.apply_usi("5b5a").is_err());
        game.apply_usi("5b5a+").unwrap();
        let pawn = game.board().piece_at(Square::new(0, 0)).unwrap();
        assert_eq!(pawn.kind, PieceKind::Pawn);
        assert!(pawn.promotion.is_promoted());
    }

    #[test]
    fn events_are_observable() {
        let mut game = mini();
        game.drain_events();
        game.apply_usi("1e1b").unwrap();
        let events = game.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, BoardEvent::Captured { kind: PieceKind::Pawn, .. }))
        );
        assert!(events.iter().any(|e| matches!(e, BoardEvent::Moved { .. })));
    }

    #[test]
    fn run_game_until_checkmate() {
        let mut game = Game::from_sfen("4k/5/4K/5/5 b G 1", &VariantConfig::MINI).unwrap();
        let mut white = Scripted::moves(&["G*1b"]);
        let mut black = Scripted::moves(&[]);
        let mut events = Vec::new();
        let result = run_game(
            &mut white,
            &mut black,
            &mut game,
            &GameConfig::default(),
            &mut |e: &MoveEvent| events.push(e.move_usi.clone()),
        )
        .unwrap();
        assert_eq!(result.outcome, GameOutcome::WhiteWin);
        assert_eq!(result.reason, "checkmate");
        assert_eq!(result.plies, 1);
        assert_eq!(events, vec!["G*1b".to_string()]);
    }

    #[test]
    fn forfeit_on_illegal_reply() {
        let mut game = mini();
        let mut white = Scripted::moves(&["5d5b"]);
        let mut black = Scripted::moves(&[]);
        let result =
            run_game(&mut white, &mut black, &mut game, &GameConfig::default(), &mut |_| {})
                .unwrap();
        assert_eq!(result.outcome, GameOutcome::BlackWin);
        assert_eq!(result.reason, "illegal_move");
        assert_eq!(result.plies, 0);
    }

    #[test]
    fn halt_keeps_position_and_turn() {
        let mut game = mini();
        let before = game.position_string();
        let mut white = Scripted::new(vec![Err(GameError::Protocol(ProtocolError::Timeout {
            expected: "bestmove".to_string(),
            waited: Duration::from_millis(10),
        }))]);
        let mut black = Scripted::moves(&[]);
        let config = GameConfig { fallback: FallbackPolicy::Halt, ..GameConfig::default() };
        let result = run_game(&mut white, &mut black, &mut game, &config, &mut |_| {}).unwrap();
        assert_eq!(result.outcome, GameOutcome::Halted);
        assert_eq!(result.reason, "timeout");
        assert_eq!(game.position_string(), before);
        assert_eq!(game.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn random_fallback_keeps_playing() {
        let mut game = mini();
        let mut white = Scripted::moves(&[]);
        let mut black = Scripted::moves(&[]);
        let config = GameConfig { max_plies: 6, fallback: FallbackPolicy::RandomMove, seed: 3 };
        let mut fallbacks = 0;
        let result = run_game(&mut white, &mut black, &mut game, &config, &mut |e: &MoveEvent| {
            if e.fallback {
                fallbacks += 1;
            }
        })
        .unwrap();
        assert!(result.plies >= 1);
        assert_eq!(fallbacks, result.plies);
        if result.outcome == GameOutcome::Draw {
            assert_eq!(result.reason, "max_plies");
            assert_eq!(result.plies, 6);
        }
    }

    #[test]
    fn resignation_and_max_plies() {
        let mut game = mini();
        let mut white = Scripted::new(vec![Ok(PlayerReply::Resign)]);
        let mut black = Scripted::moves(&[]);
        let result =
            run_game(&mut white, &mut black, &mut game, &GameConfig::default(), &mut |_| {})
                .unwrap();
        assert_eq!(result.outcome, GameOutcome::BlackWin);
        assert_eq!(result.reason, "resign");

        let mut game = mini();
        let mut white = Scripted::moves(&["5d5c"]);
        let mut black = Scripted::moves(&["1b1c"]);
        let config = GameConfig { max_plies: 2, ..GameConfig::default() };
        let result = run_game(&mut white, &mut black, &mut game, &config, &mut |_| {}).unwrap();
        assert_eq!(result.outcome, GameOutcome::Draw);
        assert_eq!(result.plies, 2);
    }
}
