//! 局面・指し手の文字列表現

pub mod sfen;
pub mod usi;

pub use sfen::side_char;
pub use usi::{file_number, rank_char, square_to_usi};
