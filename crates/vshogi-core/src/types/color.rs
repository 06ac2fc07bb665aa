//! 手番（Color）

use serde::{Deserialize, Serialize};

/// 手番
///
/// `White` は盤の下側（大きい行番号）に並び、行 0 に向かって進む先手。
/// 盤面の符号は +1、SFEN では大文字で表す。
/// `Black` は後手で符号 -1、小文字。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 全ての手番（先手から）
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// 相手番を返す
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 盤面セルの符号
    #[inline]
    pub const fn sign(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// セル値の符号から手番を得る（0 は None）
    #[inline]
    pub const fn from_sign(value: i8) -> Option<Color> {
        if value > 0 {
            Some(Color::White)
        } else if value < 0 {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// 前方向の行差分
    #[inline]
    pub const fn forward(self) -> i8 {
        -self.sign()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opponent()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(!Color::White, Color::Black);
    }

    #[test]
    fn test_color_sign() {
        assert_eq!(Color::White.sign(), 1);
        assert_eq!(Color::Black.sign(), -1);
        assert_eq!(Color::from_sign(7), Some(Color::White));
        assert_eq!(Color::from_sign(-3), Some(Color::Black));
        assert_eq!(Color::from_sign(0), None);
        assert_eq!(Color::White.forward(), -1);
    }
}
