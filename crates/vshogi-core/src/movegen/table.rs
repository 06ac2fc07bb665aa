//! 駒種 × 成り段階 × ルール → 動き の対応表

use super::shapes::*;
use crate::types::{PieceKind, Promotion, Variant};

/// 駒の動きを引く。その成り段階が存在しなければ None。
pub fn movement(kind: PieceKind, promotion: Promotion, variant: Variant) -> Option<Movement> {
    match variant {
        Variant::Mini | Variant::Standard => classic(kind, promotion.tier()),
        Variant::Chu => chu(kind, promotion.tier()),
    }
}

/// 駒が次の成り段階を持つか
pub fn can_advance(kind: PieceKind, promotion: Promotion, variant: Variant) -> bool {
    promotion
        .next()
        .is_some_and(|next| movement(kind, next, variant).is_some())
}

fn classic(kind: PieceKind, tier: u8) -> Option<Movement> {
    use PieceKind::*;
    Some(match (kind, tier) {
        (Pawn, 0) => PAWN,
        (Silver, 0) => SILVER,
        (Knight, 0) => KNIGHT,
        (Lance, 0) => LANCE,
        (Pawn | Silver | Knight | Lance, 1) => GOLD,
        (Gold, 0) => GOLD,
        (King, 0) => KING,
        (Bishop, 0) => BISHOP,
        (Bishop, 1) => HORSE,
        (Rook, 0) => ROOK,
        (Rook, 1) => DRAGON,
        // 中将棋専用の駒は中将棋と同じ動き
        (_, _) if kind.code() >= Kirin.code() => return chu(kind, tier),
        _ => return None,
    })
}

fn chu(kind: PieceKind, tier: u8) -> Option<Movement> {
    use PieceKind::*;
    Some(match (kind, tier) {
        (Pawn, 0) => PAWN,
        (Pawn, 1) => GOLD,
        (Pawn, 2) => ROOK,
        (Pawn, 3) => PROMOTED_DRAGON,
        (Silver, 0) => SILVER,
        (Silver, 1) => VERTICAL_MOVER,
        (Silver, 2) => FLYING_OX,
        (GoBetween, 0) => GO_BETWEEN,
        (GoBetween, 1) => DRUNK_ELEPHANT,
        (GoBetween, 2) => KING,
        (Gold, 0) => GOLD,
        (Gold, 1) => ROOK,
        (Copper, 0) => COPPER,
        (Copper, 1) => SIDE_MOVER,
        (Leopard, 0) => LEOPARD,
        (Leopard, 1) => BISHOP,
        (Tiger, 0) => BLIND_TIGER,
        (Tiger, 1) => FLYING_STAG,
        (Elephant, 0) => DRUNK_ELEPHANT,
        (Elephant, 1) => KING,
        (Kirin, 0) => KIRIN,
        (Kirin, 1) => LION,
        (Phoenix, 0) => PHOENIX,
        (Phoenix, 1) => QUEEN,
        (Lance, 0) => LANCE,
        (Lance, 1) => WHITE_HORSE,
        (Chariot, 0) => REVERSE_CHARIOT,
        (Chariot, 1) => WHALE,
        (SideMover, 0) => SIDE_MOVER,
        (SideMover, 1) => FREE_BOAR,
        (VerticalMover, 0) => VERTICAL_MOVER,
        (VerticalMover, 1) => FLYING_OX,
        (Bishop, 0) => BISHOP,
        (Bishop, 1) => HORSE,
        (Rook, 0) => ROOK,
        (Rook, 1) => DRAGON,
        (DragonHorse, 0) => HORSE,
        (DragonHorse, 1) => HORNED_FALCON,
        (DragonKing, 0) => DRAGON,
        (DragonKing, 1) => SOARING_EAGLE,
        (Lion, 0) => LION,
        (Queen, 0) => QUEEN,
        (King, 0) => KING,
        (Knight, 0) => KNIGHT,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_base_movement() {
        for variant in Variant::ALL {
            for kind in PieceKind::ALL {
                assert!(
                    movement(kind, Promotion::Unpromoted, variant).is_some(),
                    "{kind:?} in {variant}"
                );
            }
        }
    }

    #[test]
    fn promotion_ladders_per_variant() {
        let std = Variant::Standard;
        assert!(can_advance(PieceKind::Pawn, Promotion::Unpromoted, std));
        assert!(!can_advance(PieceKind::Pawn, Promotion::Promoted, std));
        assert!(!can_advance(PieceKind::Gold, Promotion::Unpromoted, std));
        assert!(!can_advance(PieceKind::King, Promotion::Unpromoted, std));

        let chu = Variant::Chu;
        assert!(can_advance(PieceKind::Pawn, Promotion::DoublePromoted, chu));
        assert!(!can_advance(PieceKind::Pawn, Promotion::TriplePromoted, chu));
        assert!(can_advance(PieceKind::Silver, Promotion::Promoted, chu));
        assert!(!can_advance(PieceKind::Silver, Promotion::DoublePromoted, chu));
        assert!(can_advance(PieceKind::Gold, Promotion::Unpromoted, chu));
        assert!(!can_advance(PieceKind::Lion, Promotion::Unpromoted, chu));
        assert!(!can_advance(PieceKind::Queen, Promotion::Unpromoted, chu));
    }
}
