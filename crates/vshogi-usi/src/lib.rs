//! vshogi-core の盤面を使って対局を進める層
//!
//! - [`engine`]: USI エンジンプロセスとの入出力
//! - [`oracle`]: 指し手を返す外部エンジンの trait と応答の解釈
//! - [`game`]: 手番管理・指し手の検証・対局ループ
//! - [`player`]: エンジン・人間・ランダムの対局者
//! - [`record`]: JSONL 棋譜ログ
//! - [`config`]: TOML 設定ファイル

pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod oracle;
pub mod player;
pub mod record;

pub use config::{EngineConfig, FileConfig};
pub use engine::UsiEngine;
pub use error::{ConfigError, GameError, ProtocolError};
pub use game::{FallbackPolicy, Game, GameConfig, GameOutcome, GameResult, MoveEvent, run_game};
pub use oracle::{EvalLog, Oracle, Terminal};
pub use player::{HumanPlayer, OraclePlayer, Player, PlayerKind, PlayerReply, RandomPlayer};
pub use record::{GameRecorder, MetaLog};
