//! 持ち駒を打つ

use super::{Board, BoardEvent, PieceId};
use crate::error::{BoardError, BoardResult};
use crate::types::{Color, Move, PieceKind, Promotion, Square};

impl Board {
    /// 列 `col` に `color` の歩を打てるか（不成の歩が既にある列は不可）
    pub fn check_col(&self, col: u8, color: Color) -> bool {
        !self.pieces_of(color).any(|p| {
            p.kind == PieceKind::Pawn && p.promotion == Promotion::Unpromoted && p.square.col == col
        })
    }

    /// `color` が `kind` を打てる升
    ///
    /// 空き升のうち、歩・香は最奥段、桂は奥の二段を除き、二歩になる列も除く。
    pub fn drop_targets(&self, kind: PieceKind, color: Color) -> Vec<Square> {
        if !self.config.drops || kind == PieceKind::King {
            return Vec::new();
        }
        let size = self.config.size;
        let open_cols: Vec<bool> = (0..size)
            .map(|col| kind != PieceKind::Pawn || self.check_col(col, color))
            .collect();
        self.grid
            .squares()
            .filter(|&sq| self.grid.is_empty(sq))
            .filter(|sq| open_cols[sq.col as usize])
            .filter(|sq| !self.config.is_dead_end(kind, sq.row, color))
            .collect()
    }

    /// 持ち駒を打つ手（自玉の安全は見ない）
    pub fn drop_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for kind in self.hand_kinds(color) {
            moves.extend(self.drop_targets(kind, color).into_iter().map(|to| Move::drop(kind, to)));
        }
        moves
    }

    /// 持ち駒を盤に打つ。持ち駒から 1 枚消え、新しい id の駒が盤に現れる。
    pub fn drop_piece(
        &mut self,
        kind: PieceKind,
        color: Color,
        to: Square,
    ) -> BoardResult<PieceId> {
        self.check_bounds(to)?;
        let slot = self.hands[color.index()]
            .iter()
            .position(|c| c.kind == kind)
            .ok_or(BoardError::NotInHand { color, kind })?;
        if !self.drop_targets(kind, color).contains(&to) {
            return Err(BoardError::IllegalOperation(format!(
                "{color} cannot drop {kind:?} on {to}"
            )));
        }
        self.hands[color.index()].remove(slot);
        let id = self.place_piece(to, kind, color, Promotion::Unpromoted)?;
        self.emit(BoardEvent::Dropped { id, kind, color, square: to });
        Ok(id)
    }
}
