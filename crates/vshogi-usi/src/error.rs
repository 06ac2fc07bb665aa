//! エラー型

use std::time::Duration;

use vshogi_core::{BoardError, MoveParseError, SfenError};

/// オラクル（外部 USI エンジン）とのやり取りの失敗
#[derive(thiserror::Error, Debug)]
pub enum ProtocolError {
    #[error("failed to spawn engine {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {waited:?} waiting for '{expected}'")]
    Timeout { expected: String, waited: Duration },

    #[error("engine stream closed while waiting for '{expected}'")]
    Closed { expected: String },

    #[error("malformed bestmove line '{0}'")]
    MalformedBestMove(String),
}

/// 対局進行のエラー。いずれの場合も局面は変わらず手番はそのまま。
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("illegal move '{0}'")]
    IllegalMove(String),

    #[error("game is already over ({0})")]
    Finished(String),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("undecodable move: {0}")]
    Parse(#[from] MoveParseError),

    #[error("bad position: {0}")]
    Sfen(#[from] SfenError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("player input closed")]
    InputClosed,

    #[error("console i/o error: {0}")]
    Console(#[from] std::io::Error),
}

/// 設定ファイルの読み込みエラー
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
