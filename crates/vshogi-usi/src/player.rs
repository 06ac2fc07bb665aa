//! 対局者
//!
//! エンジン（[`Oracle`]）・人間（標準入力）・ランダムの 3 種類。

use std::io::{BufRead, Write};
use std::time::Duration;

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use vshogi_core::Move;

use crate::error::GameError;
use crate::game::Game;
use crate::oracle::{EvalLog, Oracle, Terminal, terminal_reply};

/// 対局者の種類（CLI / 設定ファイル用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Engine,
    Random,
}

impl PlayerKind {
    pub fn label(self) -> &'static str {
        match self {
            PlayerKind::Human => "human",
            PlayerKind::Engine => "engine",
            PlayerKind::Random => "random",
        }
    }
}

/// 対局者の返答
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerReply {
    /// USI 形式の指し手（未検証）
    Move(String),
    Resign,
    Win,
    NoMove,
}

impl From<Terminal> for PlayerReply {
    fn from(t: Terminal) -> Self {
        match t {
            Terminal::Resign => PlayerReply::Resign,
            Terminal::Win => PlayerReply::Win,
            Terminal::NoMove => PlayerReply::NoMove,
        }
    }
}

pub trait Player {
    fn name(&self) -> &str;

    /// 現局面の手番として 1 手返す
    fn choose_move(&mut self, game: &Game) -> Result<PlayerReply, GameError>;

    fn last_eval(&self) -> Option<EvalLog> {
        None
    }
}

/// 外部エンジンに手を聞く対局者
pub struct OraclePlayer<O: Oracle> {
    oracle: O,
    name: String,
    timeout: Duration,
}

impl<O: Oracle> OraclePlayer<O> {
    pub fn new(oracle: O, name: impl Into<String>, timeout: Duration) -> Self {
        Self { oracle, name: name.into(), timeout }
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }
}

impl<O: Oracle> Player for OraclePlayer<O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, game: &Game) -> Result<PlayerReply, GameError> {
        let reply = self.oracle.request_move(&game.position_string(), self.timeout)?;
        Ok(match terminal_reply(&reply) {
            Some(t) => t.into(),
            None => PlayerReply::Move(reply),
        })
    }

    fn last_eval(&self) -> Option<EvalLog> {
        self.oracle.last_eval()
    }
}

/// 合法手から一様に選ぶ対局者
pub struct RandomPlayer {
    rng: Xoshiro256PlusPlus,
    name: String,
}

impl RandomPlayer {
    pub fn new(seed: u64, name: impl Into<String>) -> Self {
        Self { rng: Xoshiro256PlusPlus::seed_from_u64(seed), name: name.into() }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, game: &Game) -> Result<PlayerReply, GameError> {
        let legal = game.legal_moves()?;
        Ok(match legal.choose(&mut self.rng) {
            Some(mv) => PlayerReply::Move(mv.to_usi(game.board().size())),
            None => PlayerReply::NoMove,
        })
    }
}

/// 端末から手を読む対局者。合法手が入力されるまで聞き直す。
pub struct HumanPlayer<R: BufRead, W: Write> {
    input: R,
    output: W,
    name: String,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(input: R, output: W, name: impl Into<String>) -> Self {
        Self { input, output, name: name.into() }
    }
}

impl<R: BufRead, W: Write> Player for HumanPlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, game: &Game) -> Result<PlayerReply, GameError> {
        let size = game.board().size();
        let legal = game.legal_moves()?;
        writeln!(self.output, "{}", game.position_string())?;
        loop {
            write!(
                self.output,
                "{} to move ({} legal; 'moves', 'resign')> ",
                game.side_to_move(),
                legal.len()
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(GameError::InputClosed);
            }
            match line.trim() {
                "" => continue,
                "resign" => return Ok(PlayerReply::Resign),
                "moves" => {
                    let list: Vec<String> = legal.iter().map(|m| m.to_usi(size)).collect();
                    writeln!(self.output, "{}", list.join(" "))?;
                }
                text => match Move::from_usi(text, size) {
                    Ok(mv) if legal.contains(&mv) => return Ok(PlayerReply::Move(mv.to_usi(size))),
                    Ok(_) => writeln!(self.output, "illegal move: {text}")?,
                    Err(err) => writeln!(self.output, "{err}")?,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use std::collections::VecDeque;
    use std::io::Cursor;
    use vshogi_core::VariantConfig;

    struct FakeOracle {
        replies: VecDeque<String>,
        positions: Vec<String>,
    }

    impl Oracle for FakeOracle {
        fn request_move(
            &mut self,
            position: &str,
            _timeout: Duration,
        ) -> Result<String, ProtocolError> {
            self.positions.push(position.to_string());
            self.replies
                .pop_front()
                .ok_or_else(|| ProtocolError::Closed { expected: "bestmove".to_string() })
        }
    }

    fn mini() -> Game {
        Game::new(&VariantConfig::MINI).unwrap()
    }

    #[test]
    fn oracle_player_maps_terminal_replies() {
        let oracle = FakeOracle {
            replies: ["5d5c", "resign", "win", "(none)"].iter().map(|s| s.to_string()).collect(),
            positions: Vec::new(),
        };
        let mut player = OraclePlayer::new(oracle, "fake", Duration::from_millis(100));
        let game = mini();
        assert_eq!(player.choose_move(&game).unwrap(), PlayerReply::Move("5d5c".to_string()));
        assert_eq!(player.choose_move(&game).unwrap(), PlayerReply::Resign);
        assert_eq!(player.choose_move(&game).unwrap(), PlayerReply::Win);
        assert_eq!(player.choose_move(&game).unwrap(), PlayerReply::NoMove);
        assert!(matches!(player.choose_move(&game), Err(GameError::Protocol(_))));
        assert_eq!(player.oracle_mut().positions[0], "rbsgk/4p/5/P4/KGSBR b - 1");
    }

    #[test]
    fn random_player_is_reproducible_and_legal() {
        let game = mini();
        let legal: Vec<String> = game.legal_moves().unwrap().iter().map(|m| m.to_usi(5)).collect();
        let mut a = RandomPlayer::new(7, "a");
        let mut b = RandomPlayer::new(7, "b");
        for _ in 0..5 {
            let ra = a.choose_move(&game).unwrap();
            assert_eq!(ra, b.choose_move(&game).unwrap());
            let PlayerReply::Move(text) = ra else { panic!("expected a move") };
            assert!(legal.contains(&text));
        }
    }

    #[test]
    fn human_player_reprompts_until_legal() {
        let input = Cursor::new("\nxyz\n5d5b\nmoves\n5d5c\n");
        let mut out = Vec::new();
        let reply = {
            let mut player = HumanPlayer::new(input, &mut out, "you");
            player.choose_move(&mini()).unwrap()
        };
        assert_eq!(reply, PlayerReply::Move("5d5c".to_string()));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("illegal move: 5d5b"));
        assert!(text.contains("5d5c"));
    }

    #[test]
    fn human_player_resign_and_eof() {
        let mut player = HumanPlayer::new(Cursor::new("resign\n"), Vec::new(), "you");
        assert_eq!(player.choose_move(&mini()).unwrap(), PlayerReply::Resign);
        let mut player = HumanPlayer::new(Cursor::new(""), Vec::new(), "you");
        assert!(matches!(player.choose_move(&mini()), Err(GameError::InputClosed)));
    }
}
