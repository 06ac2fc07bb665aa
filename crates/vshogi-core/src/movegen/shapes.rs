//! 駒の動きの部品
//!
//! 差分はすべて先手（`Color::White`）視点で、前方が行 -1。後手は 180 度回転して使う。

/// 動きの基本要素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// 各差分へ 1 回だけ移動（飛び越しあり）
    Step(&'static [(i8, i8)]),
    /// 駒に当たるまで進む
    Ray(&'static [(i8, i8)]),
    /// 最大距離付きの走り
    Limited(&'static [(i8, i8)], u8),
}

/// 駒 1 種の動き
pub type Movement = &'static [Shape];

const F: (i8, i8) = (-1, 0);
const B: (i8, i8) = (1, 0);
const L: (i8, i8) = (0, -1);
const R: (i8, i8) = (0, 1);
const FL: (i8, i8) = (-1, -1);
const FR: (i8, i8) = (-1, 1);
const BL: (i8, i8) = (1, -1);
const BR: (i8, i8) = (1, 1);

pub const KING_STEPS: &[(i8, i8)] = &[FL, F, FR, L, R, BL, B, BR];
pub const GOLD_STEPS: &[(i8, i8)] = &[FL, F, FR, L, R, B];
pub const SILVER_STEPS: &[(i8, i8)] = &[FL, F, FR, BL, BR];
pub const PAWN_STEPS: &[(i8, i8)] = &[F];
pub const KNIGHT_JUMPS: &[(i8, i8)] = &[(-2, -1), (-2, 1)];
pub const ORTHOGONAL: &[(i8, i8)] = &[F, L, R, B];
pub const DIAGONAL: &[(i8, i8)] = &[FL, FR, BL, BR];
pub const VERTICAL: &[(i8, i8)] = &[F, B];
pub const SIDEWAYS: &[(i8, i8)] = &[L, R];
pub const FORWARD: &[(i8, i8)] = &[F];
pub const BACKWARD: &[(i8, i8)] = &[B];
pub const FORWARD_DIAGONAL: &[(i8, i8)] = &[FL, FR];
pub const BACKWARD_DIAGONAL: &[(i8, i8)] = &[BL, BR];
pub const SIDE_AND_BACK: &[(i8, i8)] = &[L, R, B];
pub const ALL_DIRECTIONS: &[(i8, i8)] = KING_STEPS;
pub const COPPER_STEPS: &[(i8, i8)] = &[FL, F, FR, B];
pub const DRUNK_ELEPHANT_STEPS: &[(i8, i8)] = &[FL, F, FR, L, R, BL, BR];
pub const LEOPARD_STEPS: &[(i8, i8)] = &[FL, F, FR, BL, B, BR];
pub const BLIND_TIGER_STEPS: &[(i8, i8)] = &[FL, FR, L, R, BL, B, BR];
pub const KIRIN_STEPS: &[(i8, i8)] = &[FL, FR, BL, BR, (-2, 0), (0, -2), (0, 2), (2, 0)];
pub const PHOENIX_STEPS: &[(i8, i8)] = &[F, L, R, B, (-2, -2), (-2, 2), (2, -2), (2, 2)];
pub const LION_STEPS: &[(i8, i8)] = &[
    (-2, -2),
    (-2, -1),
    (-2, 0),
    (-2, 1),
    (-2, 2),
    (-1, -2),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (-1, 2),
    (0, -2),
    (0, -1),
    (0, 1),
    (0, 2),
    (1, -2),
    (1, -1),
    (1, 0),
    (1, 1),
    (1, 2),
    (2, -2),
    (2, -1),
    (2, 0),
    (2, 1),
    (2, 2),
];

pub const KING: Movement = &[Shape::Step(KING_STEPS)];
pub const GOLD: Movement = &[Shape::Step(GOLD_STEPS)];
pub const SILVER: Movement = &[Shape::Step(SILVER_STEPS)];
pub const PAWN: Movement = &[Shape::Step(PAWN_STEPS)];
pub const KNIGHT: Movement = &[Shape::Step(KNIGHT_JUMPS)];
pub const LANCE: Movement = &[Shape::Ray(FORWARD)];
pub const ROOK: Movement = &[Shape::Ray(ORTHOGONAL)];
pub const BISHOP: Movement = &[Shape::Ray(DIAGONAL)];
/// 竜王
pub const DRAGON: Movement = &[Shape::Ray(ORTHOGONAL), Shape::Step(DIAGONAL)];
/// 竜馬
pub const HORSE: Movement = &[Shape::Ray(DIAGONAL), Shape::Step(ORTHOGONAL)];
pub const QUEEN: Movement = &[Shape::Ray(ALL_DIRECTIONS)];
pub const LION: Movement = &[Shape::Step(LION_STEPS)];
pub const KIRIN: Movement = &[Shape::Step(KIRIN_STEPS)];
pub const PHOENIX: Movement = &[Shape::Step(PHOENIX_STEPS)];
pub const COPPER: Movement = &[Shape::Step(COPPER_STEPS)];
pub const GO_BETWEEN: Movement = &[Shape::Step(VERTICAL)];
pub const DRUNK_ELEPHANT: Movement = &[Shape::Step(DRUNK_ELEPHANT_STEPS)];
pub const LEOPARD: Movement = &[Shape::Step(LEOPARD_STEPS)];
pub const BLIND_TIGER: Movement = &[Shape::Step(BLIND_TIGER_STEPS)];
pub const REVERSE_CHARIOT: Movement = &[Shape::Ray(VERTICAL)];
pub const SIDE_MOVER: Movement = &[Shape::Ray(SIDEWAYS), Shape::Step(VERTICAL)];
pub const VERTICAL_MOVER: Movement = &[Shape::Ray(VERTICAL), Shape::Step(SIDEWAYS)];
pub const FLYING_OX: Movement = &[Shape::Ray(VERTICAL), Shape::Ray(DIAGONAL)];
pub const FREE_BOAR: Movement = &[Shape::Ray(SIDEWAYS), Shape::Ray(DIAGONAL)];
pub const FLYING_STAG: Movement = &[Shape::Ray(VERTICAL), Shape::Step(KING_STEPS)];
pub const WHALE: Movement = &[Shape::Ray(VERTICAL), Shape::Ray(BACKWARD_DIAGONAL)];
pub const WHITE_HORSE: Movement = &[Shape::Ray(VERTICAL), Shape::Ray(FORWARD_DIAGONAL)];
pub const HORNED_FALCON: Movement = &[
    Shape::Ray(DIAGONAL),
    Shape::Ray(SIDE_AND_BACK),
    Shape::Limited(FORWARD, 2),
];
pub const SOARING_EAGLE: Movement = &[
    Shape::Ray(ORTHOGONAL),
    Shape::Ray(BACKWARD_DIAGONAL),
    Shape::Limited(FORWARD_DIAGONAL, 2),
];
/// 歩の三段目（竜王 + 玉の動き）
pub const PROMOTED_DRAGON: Movement = &[Shape::Ray(ORTHOGONAL), Shape::Step(KING_STEPS)];
