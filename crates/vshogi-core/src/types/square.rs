//! 升目（Square）

use serde::{Deserialize, Serialize};

/// 盤上の座標。行 0 が盤の上端、列 0 が左端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    /// 一辺 `size` の盤に収まるか
    #[inline]
    pub const fn in_bounds(self, size: u8) -> bool {
        self.row < size && self.col < size
    }

    /// 差分 (dr, dc) を適用する。盤外なら None。
    #[inline]
    pub fn offset(self, dr: i8, dc: i8, size: u8) -> Option<Square> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;
        if row < 0 || col < 0 || row >= size as i16 || col >= size as i16 {
            return None;
        }
        Some(Square::new(row as u8, col as u8))
    }

    /// 盤配列のインデックス
    #[inline]
    pub const fn index(self, size: u8) -> usize {
        self.row as usize * size as usize + self.col as usize
    }

    #[inline]
    pub const fn from_index(index: usize, size: u8) -> Square {
        Square::new((index / size as usize) as u8, (index % size as usize) as u8)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_inside_the_board() {
        let sq = Square::new(0, 4);
        assert_eq!(sq.offset(1, -1, 5), Some(Square::new(1, 3)));
        assert_eq!(sq.offset(-1, 0, 5), None);
        assert_eq!(sq.offset(0, 1, 5), None);
        assert_eq!(sq.offset(0, 1, 9), Some(Square::new(0, 5)));
    }

    #[test]
    fn index_roundtrip() {
        for size in [5u8, 9, 12] {
            for idx in 0..(size as usize * size as usize) {
                assert_eq!(Square::from_index(idx, size).index(size), idx);
            }
        }
    }
}
