//! 五五将棋・本将棋・中将棋に対応した将棋のルールエンジン
//!
//! - [`types`]: 手番・升・駒種・ルール設定などの基本型
//! - [`movegen`]: 駒の動きと移動先の生成
//! - [`board`]: 盤面・駒リスト・持ち駒と、その操作
//! - [`evaluator`]: 王手・詰みの判定と合法手
//! - [`notation`]: SFEN 局面文字列と USI 指し手文字列

pub mod board;
pub mod error;
pub mod evaluator;
pub mod movegen;
pub mod notation;
pub mod types;

pub use board::{Board, BoardEvent, CapturedPiece, PieceId, PieceRecord, Placement};
pub use error::{BoardError, ErrorKind, MoveParseError, SfenError, VariantError};
pub use types::{Color, Move, PieceKind, Promotion, Square, Variant, VariantConfig};
