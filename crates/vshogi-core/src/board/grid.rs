//! 盤面の升目配列
//!
//! 各セルは `駒種コード × 手番の符号`、空きは 0。

use crate::types::{Color, PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: u8,
    cells: Vec<i8>,
}

impl Grid {
    pub fn new(size: u8) -> Grid {
        Grid { size, cells: vec![0; size as usize * size as usize] }
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// セルの値。盤外は 0。
    #[inline]
    pub fn get(&self, sq: Square) -> i8 {
        if !sq.in_bounds(self.size) {
            return 0;
        }
        self.cells[sq.index(self.size)]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, value: i8) {
        let idx = sq.index(self.size);
        self.cells[idx] = value;
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq) == 0
    }

    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        Color::from_sign(self.get(sq))
    }

    pub fn kind_at(&self, sq: Square) -> Option<PieceKind> {
        PieceKind::from_code(self.get(sq).unsigned_abs())
    }

    /// 行ごとのセル値
    pub fn rows(&self) -> impl Iterator<Item = &[i8]> {
        self.cells.chunks(self.size as usize)
    }

    pub fn squares(&self) -> impl Iterator<Item = Square> + use<> {
        let size = self.size;
        (0..size as usize * size as usize).map(move |i| Square::from_index(i, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_encode_kind_and_color() {
        let mut g = Grid::new(5);
        g.set(Square::new(4, 0), 7);
        g.set(Square::new(0, 4), -7);
        assert_eq!(g.color_at(Square::new(4, 0)), Some(Color::White));
        assert_eq!(g.color_at(Square::new(0, 4)), Some(Color::Black));
        assert_eq!(g.kind_at(Square::new(0, 4)), Some(PieceKind::King));
        assert!(g.is_empty(Square::new(2, 2)));
        assert_eq!(g.get(Square::new(7, 7)), 0);
        assert_eq!(g.rows().count(), 5);
    }
}
