//! 指し手生成
//!
//! 駒の動きは [`Shape`] の組み合わせで表し、[`table::movement`] が
//! 駒種・成り段階・ルールから動きを引く。ここでの関数は盤面を読むだけで状態を変えない。

mod shapes;
mod table;

pub use shapes::{Movement, Shape};
pub use table::{can_advance, movement};

use smallvec::SmallVec;

use crate::board::Grid;
use crate::types::{Color, PieceKind, Promotion, Square, VariantConfig};

/// 1 駒分の移動先リスト
pub type Destinations = SmallVec<[Square; 32]>;

/// 動き `movement` を持つ `color` の駒が `from` から行ける升を列挙する。
///
/// 盤外と味方の駒がいる升は含まない。敵の駒がいる升は取る手として含み、走りはそこで止まる。
pub fn destinations(grid: &Grid, from: Square, color: Color, movement: Movement) -> Destinations {
    let mut out = Destinations::new();
    let size = grid.size();
    let sign = color.sign();
    for shape in movement {
        match *shape {
            Shape::Step(offsets) => {
                for &(dr, dc) in offsets {
                    let Some(to) = from.offset(dr * sign, dc * sign, size) else {
                        continue;
                    };
                    if grid.color_at(to) != Some(color) {
                        push_unique(&mut out, to);
                    }
                }
            }
            Shape::Ray(dirs) => slide(grid, from, color, dirs, u8::MAX, &mut out),
            Shape::Limited(dirs, max) => slide(grid, from, color, dirs, max, &mut out),
        }
    }
    out
}

fn slide(
    grid: &Grid,
    from: Square,
    color: Color,
    dirs: &[(i8, i8)],
    max: u8,
    out: &mut Destinations,
) {
    let size = grid.size();
    let sign = color.sign();
    for &(dr, dc) in dirs {
        let mut cur = from;
        let mut steps = 0u8;
        while steps < max {
            let Some(next) = cur.offset(dr * sign, dc * sign, size) else {
                break;
            };
            match grid.color_at(next) {
                Some(owner) if owner == color => break,
                Some(_) => {
                    push_unique(out, next);
                    break;
                }
                None => push_unique(out, next),
            }
            cur = next;
            steps += 1;
        }
    }
}

#[inline]
fn push_unique(out: &mut Destinations, sq: Square) {
    if !out.contains(&sq) {
        out.push(sq);
    }
}

/// 駒 1 枚の移動先。強制成り待ちの駒は動けないので空を返す。
pub fn piece_destinations(
    grid: &Grid,
    config: &VariantConfig,
    from: Square,
    color: Color,
    kind: PieceKind,
    promotion: Promotion,
) -> Destinations {
    if config.must_promote(kind, promotion, from.row, color) {
        return Destinations::new();
    }
    match movement(kind, promotion, config.variant) {
        Some(mv) => destinations(grid, from, color, mv),
        None => {
            log::warn!("no movement for {kind:?} at promotion {promotion:?}");
            Destinations::new()
        }
    }
}

/// `from` → `to` の移動で一段成れるか
pub fn can_promote_on(
    config: &VariantConfig,
    kind: PieceKind,
    promotion: Promotion,
    color: Color,
    from: Square,
    to: Square,
) -> bool {
    can_advance(kind, promotion, config.variant)
        && (config.in_promotion_zone(from, color) || config.in_promotion_zone(to, color))
}
