//! 基本型

mod color;
mod moves;
mod piece;
mod square;
mod variant;

pub use color::Color;
pub use moves::Move;
pub use piece::{PieceKind, Promotion};
pub use square::Square;
pub use variant::{Variant, VariantConfig};
