//! エラー型

use crate::board::PieceId;
use crate::types::{Color, PieceKind, Square};

/// エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 盤面と駒リストの不整合。操作は中断され状態は変わらない。
    StateInconsistency,
    /// 呼び出し側の誤り
    IllegalOperation,
    /// 表記の解析失敗
    Encoding,
}

/// 盤面操作のエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("no piece at {0}")]
    NotFound(Square),

    #[error("unknown piece id {0}")]
    UnknownPiece(PieceId),

    #[error("king not found for {0}")]
    KingMissing(Color),

    #[error("square {square} is outside the {size}x{size} board")]
    OutOfBounds { square: Square, size: u8 },

    #[error("{color} has no {kind} in hand")]
    NotInHand { color: Color, kind: PieceKind },

    #[error("illegal operation: {0}")]
    IllegalOperation(String),
}

impl BoardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::NotFound(_) | BoardError::UnknownPiece(_) | BoardError::KingMissing(_) => {
                ErrorKind::StateInconsistency
            }
            BoardError::OutOfBounds { .. }
            | BoardError::NotInHand { .. }
            | BoardError::IllegalOperation(_) => ErrorKind::IllegalOperation,
        }
    }
}

/// SFEN 文字列の解析エラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SfenError {
    #[error("expected at least 2 fields in '{0}'")]
    MissingField(String),

    #[error("board has {found} ranks, expected {expected}")]
    RankCount { expected: usize, found: usize },

    #[error("rank {rank} has width {found}, expected {expected}")]
    RankWidth { rank: usize, expected: usize, found: usize },

    #[error("no variant uses a {0}x{0} board")]
    UnsupportedSize(usize),

    #[error("unknown piece letter '{0}'")]
    UnknownLetter(char),

    #[error("piece '{letter}' cannot take {markers} promotion marker(s)")]
    BadPromotion { letter: char, markers: u8 },

    #[error("promotion marker without a piece in rank {0}")]
    DanglingMarker(usize),

    #[error("invalid side to move '{0}'")]
    SideToMove(String),

    #[error("invalid hand '{0}'")]
    Hand(String),

    #[error("invalid move number '{0}'")]
    MoveNumber(String),

    #[error("inconsistent position: {0}")]
    Board(#[from] BoardError),
}

impl SfenError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Encoding
    }
}

/// USI 指し手文字列の解析エラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("empty move string")]
    Empty,

    #[error("unknown piece letter '{0}' in drop")]
    UnknownPiece(char),

    #[error("invalid file in '{0}'")]
    File(String),

    #[error("invalid rank in '{0}'")]
    Rank(String),

    #[error("unexpected trailing characters in '{0}'")]
    Trailing(String),
}

impl MoveParseError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Encoding
    }
}

/// ルール名の解析エラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    #[error("unknown variant '{0}' (expected mini, standard or chu)")]
    Unknown(String),
}

pub type BoardResult<T> = Result<T, BoardError>;
