//! 駒種（PieceKind）と成り段階（Promotion）

use serde::{Deserialize, Serialize};

/// 駒種。値は盤面セルに書き込む駒種コード（絶対値）。
///
/// 10 以降は中将棋の駒。6 は欠番。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 1,
    Silver = 2,
    Gold = 3,
    Bishop = 4,
    Rook = 5,
    King = 7,
    Knight = 8,
    Lance = 9,
    Kirin = 10,
    Phoenix = 11,
    Tiger = 12,
    Chariot = 13,
    GoBetween = 14,
    Copper = 15,
    Leopard = 16,
    Elephant = 17,
    SideMover = 18,
    VerticalMover = 19,
    Lion = 20,
    Queen = 21,
    DragonKing = 22,
    DragonHorse = 23,
}

impl PieceKind {
    /// 全駒種（コード順）
    pub const ALL: [PieceKind; 22] = [
        PieceKind::Pawn,
        PieceKind::Silver,
        PieceKind::Gold,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::King,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Kirin,
        PieceKind::Phoenix,
        PieceKind::Tiger,
        PieceKind::Chariot,
        PieceKind::GoBetween,
        PieceKind::Copper,
        PieceKind::Leopard,
        PieceKind::Elephant,
        PieceKind::SideMover,
        PieceKind::VerticalMover,
        PieceKind::Lion,
        PieceKind::Queen,
        PieceKind::DragonKing,
        PieceKind::DragonHorse,
    ];

    /// 持ち駒の表記順。飛角金銀桂香歩の後に中将棋駒をコード順で並べる。
    pub const HAND_ORDER: [PieceKind; 21] = [
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
        PieceKind::Kirin,
        PieceKind::Phoenix,
        PieceKind::Tiger,
        PieceKind::Chariot,
        PieceKind::GoBetween,
        PieceKind::Copper,
        PieceKind::Leopard,
        PieceKind::Elephant,
        PieceKind::SideMover,
        PieceKind::VerticalMover,
        PieceKind::Lion,
        PieceKind::Queen,
        PieceKind::DragonKing,
        PieceKind::DragonHorse,
    ];

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<PieceKind> {
        Some(match code {
            1 => PieceKind::Pawn,
            2 => PieceKind::Silver,
            3 => PieceKind::Gold,
            4 => PieceKind::Bishop,
            5 => PieceKind::Rook,
            7 => PieceKind::King,
            8 => PieceKind::Knight,
            9 => PieceKind::Lance,
            10 => PieceKind::Kirin,
            11 => PieceKind::Phoenix,
            12 => PieceKind::Tiger,
            13 => PieceKind::Chariot,
            14 => PieceKind::GoBetween,
            15 => PieceKind::Copper,
            16 => PieceKind::Leopard,
            17 => PieceKind::Elephant,
            18 => PieceKind::SideMover,
            19 => PieceKind::VerticalMover,
            20 => PieceKind::Lion,
            21 => PieceKind::Queen,
            22 => PieceKind::DragonKing,
            23 => PieceKind::DragonHorse,
            _ => return None,
        })
    }

    /// SFEN 表記の文字（大文字）
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Silver => 'S',
            PieceKind::Gold => 'G',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::King => 'K',
            PieceKind::Knight => 'N',
            PieceKind::Lance => 'L',
            PieceKind::Kirin => 'O',
            PieceKind::Phoenix => 'X',
            PieceKind::Tiger => 'T',
            PieceKind::Chariot => 'A',
            PieceKind::GoBetween => 'I',
            PieceKind::Copper => 'C',
            PieceKind::Leopard => 'F',
            PieceKind::Elephant => 'E',
            PieceKind::SideMover => 'M',
            PieceKind::VerticalMover => 'V',
            PieceKind::Lion => 'Y',
            PieceKind::Queen => 'Q',
            PieceKind::DragonKing => 'D',
            PieceKind::DragonHorse => 'H',
        }
    }

    /// 大文字の表記文字から駒種を得る
    pub fn from_letter(c: char) -> Option<PieceKind> {
        PieceKind::ALL.into_iter().find(|k| k.letter() == c)
    }

    /// 手番付きの表記文字（先手は大文字、後手は小文字）
    pub fn colored_letter(self, color: super::Color) -> char {
        match color {
            super::Color::White => self.letter(),
            super::Color::Black => self.letter().to_ascii_lowercase(),
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 成り段階。中将棋では歩が三段階まで成る。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Promotion {
    #[default]
    Unpromoted = 0,
    Promoted = 1,
    DoublePromoted = 2,
    TriplePromoted = 3,
}

impl Promotion {
    #[inline]
    pub const fn tier(self) -> u8 {
        self as u8
    }

    pub const fn from_tier(tier: u8) -> Option<Promotion> {
        match tier {
            0 => Some(Promotion::Unpromoted),
            1 => Some(Promotion::Promoted),
            2 => Some(Promotion::DoublePromoted),
            3 => Some(Promotion::TriplePromoted),
            _ => None,
        }
    }

    /// 一段階上の成り（最上段なら None）
    pub const fn next(self) -> Option<Promotion> {
        Promotion::from_tier(self.tier() + 1)
    }

    #[inline]
    pub const fn is_promoted(self) -> bool {
        !matches!(self, Promotion::Unpromoted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn codes_and_letters_are_consistent() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_code(kind.code()), Some(kind));
            assert_eq!(PieceKind::from_letter(kind.letter()), Some(kind));
        }
        assert_eq!(PieceKind::from_code(6), None);
        assert_eq!(PieceKind::from_code(24), None);
        assert_eq!(PieceKind::from_letter('Z'), None);
    }

    #[test]
    fn hand_order_covers_every_kind_but_king() {
        for kind in PieceKind::ALL {
            let in_order = PieceKind::HAND_ORDER.contains(&kind);
            assert_eq!(in_order, kind != PieceKind::King, "{kind:?}");
        }
    }

    #[test]
    fn colored_letter_uses_case_for_color() {
        assert_eq!(PieceKind::Rook.colored_letter(Color::White), 'R');
        assert_eq!(PieceKind::Rook.colored_letter(Color::Black), 'r');
    }

    #[test]
    fn promotion_ladder_is_ordered() {
        assert_eq!(Promotion::Unpromoted.next(), Some(Promotion::Promoted));
        assert_eq!(Promotion::DoublePromoted.next(), Some(Promotion::TriplePromoted));
        assert_eq!(Promotion::TriplePromoted.next(), None);
        assert!(Promotion::Promoted > Promotion::Unpromoted);
    }
}
