//! 盤面（Board）
//!
//! 升目配列・駒リスト・持ち駒をまとめて保持する。
//! 駒リストは id 付きの密な配列で、升目配列と常に一致する。
//! `sandbox()` で作った複製は詰み判定などの試行用で、イベントもログも残さない。

mod drops;
mod grid;

use std::collections::BTreeMap;

pub use grid::Grid;

use crate::error::{BoardError, BoardResult, SfenError};
use crate::movegen::{self, Destinations};
use crate::types::{Color, Move, PieceKind, Promotion, Square, VariantConfig};

/// 駒の識別子。対局中一意で、複製しても変わらない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 盤上の駒
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceRecord {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub promotion: Promotion,
}

impl PieceRecord {
    /// 盤面セルに書き込む値
    #[inline]
    pub fn cell_value(&self) -> i8 {
        self.kind.code() as i8 * self.color.sign()
    }
}

/// 持ち駒。常に不成。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedPiece {
    pub kind: PieceKind,
    pub owner: Color,
}

/// 表示層に伝える盤面の変化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    Placed { id: PieceId, kind: PieceKind, color: Color, square: Square },
    Moved { id: PieceId, from: Square, to: Square },
    Captured { id: PieceId, kind: PieceKind, by: Color },
    Dropped { id: PieceId, kind: PieceKind, color: Color, square: Square },
    Promoted { id: PieceId, promotion: Promotion },
}

/// 書き込み操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed,
    Captured(PieceKind),
    /// 味方の駒がいたので何もしなかった
    Blocked,
}

#[derive(Debug, Clone)]
pub struct Board {
    config: VariantConfig,
    grid: Grid,
    pieces: Vec<PieceRecord>,
    hands: [Vec<CapturedPiece>; Color::NUM],
    next_id: u32,
    side_to_move: Color,
    move_number: u32,
    events: Option<Vec<BoardEvent>>,
}

impl Board {
    /// 駒のない盤面
    pub fn empty(config: &VariantConfig) -> Board {
        Board {
            config: *config,
            grid: Grid::new(config.size),
            pieces: Vec::new(),
            hands: [Vec::new(), Vec::new()],
            next_id: 0,
            side_to_move: Color::White,
            move_number: 1,
            events: Some(Vec::new()),
        }
    }

    /// ルールの初期配置
    pub fn initial(config: &VariantConfig) -> Result<Board, SfenError> {
        let sfen = format!("{} b - 1", config.layout);
        Board::from_sfen(&sfen, config)
    }

    /// 試行用の複製。駒 id は保たれ、イベントは記録しない。
    pub fn sandbox(&self) -> Board {
        Board {
            config: self.config,
            grid: self.grid.clone(),
            pieces: self.pieces.clone(),
            hands: self.hands.clone(),
            next_id: self.next_id,
            side_to_move: self.side_to_move,
            move_number: self.move_number,
            events: None,
        }
    }

    #[inline]
    pub fn is_sandbox(&self) -> bool {
        self.events.is_none()
    }

    #[inline]
    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.config.size
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn set_move_number(&mut self, n: u32) {
        self.move_number = n;
    }

    /// 手番を渡し、手数を進める
    pub fn advance_turn(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
        self.move_number += 1;
    }

    // ------------------------------------------------------------------
    // 参照
    // ------------------------------------------------------------------

    pub fn pieces(&self) -> &[PieceRecord] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&PieceRecord> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// 升の駒。空きや盤外は None。
    pub fn piece_at(&self, sq: Square) -> Option<&PieceRecord> {
        if self.grid.is_empty(sq) {
            return None;
        }
        self.pieces.iter().find(|p| p.square == sq)
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &PieceRecord> {
        self.pieces.iter().filter(move |p| p.color == color)
    }

    pub fn find_king(&self, color: Color) -> BoardResult<Square> {
        self.pieces_of(color)
            .find(|p| p.kind == PieceKind::King)
            .map(|p| p.square)
            .ok_or(BoardError::KingMissing(color))
    }

    pub fn hand(&self, color: Color) -> &[CapturedPiece] {
        &self.hands[color.index()]
    }

    pub fn hand_count(&self, color: Color, kind: PieceKind) -> usize {
        self.hand(color).iter().filter(|c| c.kind == kind).count()
    }

    /// 持ち駒の種類（表記順、重複なし）
    pub fn hand_kinds(&self, color: Color) -> Vec<PieceKind> {
        PieceKind::HAND_ORDER
            .into_iter()
            .filter(|&k| self.hand_count(color, k) > 0)
            .collect()
    }

    /// 盤上と持ち駒を合わせた駒種ごとの枚数
    pub fn piece_counts(&self) -> BTreeMap<PieceKind, usize> {
        let mut counts = BTreeMap::new();
        for p in &self.pieces {
            *counts.entry(p.kind).or_insert(0) += 1;
        }
        for hand in &self.hands {
            for c in hand {
                *counts.entry(c.kind).or_insert(0) += 1;
            }
        }
        counts
    }

    /// 駒 1 枚の移動先
    pub fn destinations(&self, id: PieceId) -> Destinations {
        match self.piece(id) {
            Some(p) => self.record_destinations(p),
            None => Destinations::new(),
        }
    }

    fn record_destinations(&self, p: &PieceRecord) -> Destinations {
        movegen::piece_destinations(
            &self.grid,
            &self.config,
            p.square,
            p.color,
            p.kind,
            p.promotion,
        )
    }

    /// `by` の駒が `target` に利いているか
    pub fn attacks(&self, by: Color, target: Square) -> bool {
        self.pieces_of(by).any(|p| self.record_destinations(p).contains(&target))
    }

    /// 盤上の駒の指し手（自玉の安全は見ない）。成り・不成の両方を含む。
    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for p in self.pieces_of(color) {
            for to in self.record_destinations(p) {
                if movegen::can_promote_on(&self.config, p.kind, p.promotion, color, p.square, to) {
                    if !self.config.must_promote(p.kind, p.promotion, to.row, color) {
                        moves.push(Move::board(p.square, to, false));
                    }
                    moves.push(Move::board(p.square, to, true));
                } else {
                    moves.push(Move::board(p.square, to, false));
                }
            }
        }
        moves
    }

    // ------------------------------------------------------------------
    // 変更
    // ------------------------------------------------------------------

    fn check_bounds(&self, sq: Square) -> BoardResult<()> {
        if sq.in_bounds(self.config.size) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds { square: sq, size: self.config.size })
        }
    }

    fn index_of(&self, id: PieceId) -> BoardResult<usize> {
        self.pieces.iter().position(|p| p.id == id).ok_or(BoardError::UnknownPiece(id))
    }

    fn emit(&mut self, event: BoardEvent) {
        if let Some(events) = self.events.as_mut() {
            events.push(event);
        }
    }

    /// 記録されたイベントを取り出す
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.events.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// 空き升に新しい駒を置く
    pub fn place_piece(
        &mut self,
        sq: Square,
        kind: PieceKind,
        color: Color,
        promotion: Promotion,
    ) -> BoardResult<PieceId> {
        self.check_bounds(sq)?;
        if !self.grid.is_empty(sq) {
            return Err(BoardError::IllegalOperation(format!("{sq} is occupied")));
        }
        let id = PieceId(self.next_id);
        self.next_id += 1;
        let record = PieceRecord { id, kind, color, square: sq, promotion };
        self.grid.set(sq, record.cell_value());
        self.pieces.push(record);
        Ok(id)
    }

    /// 升に `color` の `kind` を書き込む。
    ///
    /// 敵の駒がいれば先に取り、味方の駒がいれば何もしない。
    pub fn modify_board(
        &mut self,
        sq: Square,
        kind: PieceKind,
        color: Color,
    ) -> BoardResult<Placement> {
        self.check_bounds(sq)?;
        let placement = match self.grid.color_at(sq) {
            Some(owner) if owner == color => {
                log::warn!("modify_board: {sq} already holds a {color} piece");
                return Ok(Placement::Blocked);
            }
            Some(_) => Placement::Captured(self.capture(sq, color)?),
            None => Placement::Placed,
        };
        let id = self.place_piece(sq, kind, color, Promotion::Unpromoted)?;
        self.emit(BoardEvent::Placed { id, kind, color, square: sq });
        Ok(placement)
    }

    /// 升の駒を取り、不成に戻して `by` の持ち駒に加える
    pub fn capture(&mut self, sq: Square, by: Color) -> BoardResult<PieceKind> {
        self.check_bounds(sq)?;
        let idx = self
            .pieces
            .iter()
            .position(|p| p.square == sq)
            .ok_or(BoardError::NotFound(sq))?;
        let record = self.pieces.remove(idx);
        self.grid.set(sq, 0);
        self.hands[by.index()].push(CapturedPiece { kind: record.kind, owner: by });
        if !self.is_sandbox() {
            log::debug!("{by} captured {:?} {} at {sq}", record.kind, record.id);
        }
        self.emit(BoardEvent::Captured { id: record.id, kind: record.kind, by });
        Ok(record.kind)
    }

    /// 駒を動かす。検証をすべて済ませてから盤面を書き換える。
    pub fn move_piece(&mut self, id: PieceId, to: Square, promote: bool) -> BoardResult<Placement> {
        let idx = self.index_of(id)?;
        self.check_bounds(to)?;
        let mover = self.pieces[idx];
        if mover.square == to {
            return Err(BoardError::IllegalOperation(format!("{id} is already on {to}")));
        }
        let target = self.grid.color_at(to);
        if target == Some(mover.color) {
            log::warn!("move_piece: {id} cannot move onto its own piece at {to}");
            return Ok(Placement::Blocked);
        }
        if promote
            && !movegen::can_promote_on(
                &self.config,
                mover.kind,
                mover.promotion,
                mover.color,
                mover.square,
                to,
            )
        {
            return Err(BoardError::IllegalOperation(format!(
                "{:?} {id} cannot promote moving {} -> {to}",
                mover.kind, mover.square
            )));
        }
        if target.is_some() && !self.pieces.iter().any(|p| p.square == to) {
            return Err(BoardError::NotFound(to));
        }

        let placement = match target {
            Some(_) => Placement::Captured(self.capture(to, mover.color)?),
            None => Placement::Placed,
        };
        let idx = self.index_of(id)?;
        self.grid.set(mover.square, 0);
        let record = &mut self.pieces[idx];
        record.square = to;
        let value = record.cell_value();
        self.grid.set(to, value);
        self.emit(BoardEvent::Moved { id, from: mover.square, to });
        if promote {
            self.promote(id)?;
        }
        Ok(placement)
    }

    /// 一段成る
    pub fn promote(&mut self, id: PieceId) -> BoardResult<Promotion> {
        let idx = self.index_of(id)?;
        let record = self.pieces[idx];
        let next = record
            .promotion
            .next()
            .filter(|_| movegen::can_advance(record.kind, record.promotion, self.config.variant))
            .ok_or_else(|| {
                BoardError::IllegalOperation(format!(
                    "{:?} {id} has no promotion beyond {:?}",
                    record.kind, record.promotion
                ))
            })?;
        self.pieces[idx].promotion = next;
        if !self.is_sandbox() {
            log::debug!("{:?} {id} promoted to {next:?}", record.kind);
        }
        self.emit(BoardEvent::Promoted { id, promotion: next });
        Ok(next)
    }

    /// 強制成りが必要か（状態は変えない）
    pub fn needs_forced_promotion(&self, id: PieceId) -> bool {
        self.piece(id).is_some_and(|p| {
            self.config.must_promote(p.kind, p.promotion, p.square.row, p.color)
        })
    }

    /// 強制成りが必要なら成る。成ったら true。
    pub fn settle_forced_promotion(&mut self, id: PieceId) -> BoardResult<bool> {
        if !self.needs_forced_promotion(id) {
            return Ok(false);
        }
        self.promote(id)?;
        Ok(true)
    }

    /// 指し手を適用する。`color` は指す側（打つ駒の持ち主）。
    pub fn apply_move(&mut self, mv: &Move, color: Color) -> BoardResult<Placement> {
        match *mv {
            Move::Board { from, to, promote } => {
                let piece = self.piece_at(from).ok_or(BoardError::NotFound(from))?;
                if piece.color != color {
                    return Err(BoardError::IllegalOperation(format!(
                        "piece at {from} belongs to {}",
                        piece.color
                    )));
                }
                let id = piece.id;
                self.move_piece(id, to, promote)
            }
            Move::Drop { kind, to } => {
                self.drop_piece(kind, color, to)?;
                Ok(Placement::Placed)
            }
        }
    }

    /// 持ち駒に加える（局面の復元用）
    pub(crate) fn add_to_hand(&mut self, kind: PieceKind, owner: Color) {
        self.hands[owner.index()].push(CapturedPiece { kind, owner });
    }

    /// 升目配列と駒リストが一致し、各手番に玉が 1 枚ずつあるか確かめる
    pub fn validate(&self) -> BoardResult<()> {
        let mut occupied = 0usize;
        for sq in self.grid.squares() {
            let value = self.grid.get(sq);
            if value == 0 {
                continue;
            }
            occupied += 1;
            let record = self
                .pieces
                .iter()
                .find(|p| p.square == sq)
                .ok_or(BoardError::NotFound(sq))?;
            if record.cell_value() != value {
                return Err(BoardError::IllegalOperation(format!(
                    "{sq} holds {value} but {} is {:?}",
                    record.id, record.kind
                )));
            }
        }
        if occupied != self.pieces.len() {
            return Err(BoardError::IllegalOperation(format!(
                "{} pieces registered for {occupied} occupied squares",
                self.pieces.len()
            )));
        }
        for color in Color::ALL {
            let kings = self.pieces_of(color).filter(|p| p.kind == PieceKind::King).count();
            match kings {
                0 => return Err(BoardError::KingMissing(color)),
                1 => {}
                n => {
                    return Err(BoardError::IllegalOperation(format!("{color} has {n} kings")));
                }
            }
        }
        Ok(())
    }
}
