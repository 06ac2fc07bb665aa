//! 指し手（Move）

use super::{PieceKind, Square};

/// 盤上の移動か持ち駒を打つ手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Board { from: Square, to: Square, promote: bool },
    Drop { kind: PieceKind, to: Square },
}

impl Move {
    pub const fn board(from: Square, to: Square, promote: bool) -> Move {
        Move::Board { from, to, promote }
    }

    pub const fn drop(kind: PieceKind, to: Square) -> Move {
        Move::Drop { kind, to }
    }

    /// 移動先
    #[inline]
    pub const fn to(&self) -> Square {
        match *self {
            Move::Board { to, .. } | Move::Drop { to, .. } => to,
        }
    }

    /// 移動元（打つ手なら None）
    #[inline]
    pub const fn from(&self) -> Option<Square> {
        match *self {
            Move::Board { from, .. } => Some(from),
            Move::Drop { .. } => None,
        }
    }

    #[inline]
    pub const fn is_drop(&self) -> bool {
        matches!(self, Move::Drop { .. })
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        matches!(self, Move::Board { promote: true, .. })
    }
}
