//! USI 形式の指し手文字列
//!
//! 筋は `盤の大きさ - 列` の数字（12 路盤では 2 桁になりうる）、段は行 0 を `a` とする英字。
//! 盤上の移動は `<筋><段><筋><段>[+]`、打つ手は `<駒>*<筋><段>`。

use crate::error::MoveParseError;
use crate::types::{Move, PieceKind, Square};

/// 段の文字
#[inline]
pub fn rank_char(row: u8) -> char {
    (b'a' + row) as char
}

/// 筋の番号
#[inline]
pub fn file_number(col: u8, size: u8) -> u8 {
    size - col
}

/// 升の USI 表記（例: 5 路盤の (3, 0) は `5d`）
pub fn square_to_usi(sq: Square, size: u8) -> String {
    format!("{}{}", file_number(sq.col, size), rank_char(sq.row))
}

impl Move {
    /// USI 文字列を指し手にする
    pub fn from_usi(text: &str, size: u8) -> Result<Move, MoveParseError> {
        let text = text.trim();
        let bytes = text.as_bytes();
        let Some(&first) = bytes.first() else {
            return Err(MoveParseError::Empty);
        };
        let mut pos = 0usize;
        let mv = if first.is_ascii_alphabetic() {
            let letter = first as char;
            let kind = PieceKind::from_letter(letter).ok_or(MoveParseError::UnknownPiece(letter))?;
            if bytes.get(1) != Some(&b'*') {
                return Err(MoveParseError::UnknownPiece(letter));
            }
            pos = 2;
            let to = parse_square(text, &mut pos, size)?;
            Move::drop(kind, to)
        } else {
            let from = parse_square(text, &mut pos, size)?;
            let to = parse_square(text, &mut pos, size)?;
            let promote = bytes.get(pos) == Some(&b'+');
            if promote {
                pos += 1;
            }
            Move::board(from, to, promote)
        };
        if pos != bytes.len() {
            return Err(MoveParseError::Trailing(text.to_string()));
        }
        Ok(mv)
    }

    /// 指し手を USI 文字列にする
    pub fn to_usi(&self, size: u8) -> String {
        match *self {
            Move::Board { from, to, promote } => format!(
                "{}{}{}",
                square_to_usi(from, size),
                square_to_usi(to, size),
                if promote { "+" } else { "" }
            ),
            Move::Drop { kind, to } => format!("{}*{}", kind.letter(), square_to_usi(to, size)),
        }
    }
}

fn parse_square(text: &str, pos: &mut usize, size: u8) -> Result<Square, MoveParseError> {
    let bytes = text.as_bytes();
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() && *pos - start < 2 {
        *pos += 1;
    }
    let file: u8 = text[start..*pos]
        .parse()
        .ok()
        .filter(|f| (1..=size).contains(f))
        .ok_or_else(|| MoveParseError::File(text.to_string()))?;
    let rank = bytes
        .get(*pos)
        .filter(|b| b.is_ascii_lowercase())
        .map(|b| b - b'a')
        .filter(|&row| row < size)
        .ok_or_else(|| MoveParseError::Rank(text.to_string()))?;
    *pos += 1;
    Ok(Square::new(rank, size - file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_board_moves() {
        assert_eq!(
            Move::from_usi("5d5c", 5).unwrap(),
            Move::board(Square::new(3, 0), Square::new(2, 0), false)
        );
        assert_eq!(
            Move::from_usi("7g7f", 9).unwrap(),
            Move::board(Square::new(6, 2), Square::new(5, 2), false)
        );
        assert_eq!(
            Move::from_usi("2b8h+", 9).unwrap(),
            Move::board(Square::new(1, 7), Square::new(7, 1), true)
        );
    }

    #[test]
    fn decodes_two_digit_files() {
        assert_eq!(
            Move::from_usi("12i12h", 12).unwrap(),
            Move::board(Square::new(8, 0), Square::new(7, 0), false)
        );
        assert_eq!(
            Move::from_usi("1l10k+", 12).unwrap(),
            Move::board(Square::new(11, 11), Square::new(10, 2), true)
        );
    }

    #[test]
    fn decodes_drops() {
        assert_eq!(
            Move::from_usi("P*3c", 5).unwrap(),
            Move::drop(PieceKind::Pawn, Square::new(2, 2))
        );
        assert_eq!(
            Move::from_usi("G*1a", 9).unwrap(),
            Move::drop(PieceKind::Gold, Square::new(0, 8))
        );
    }

    #[test]
    fn encodes_back_to_the_same_text() {
        for (text, size) in [("5d5c", 5), ("2b8h+", 9), ("S*5e", 9), ("11c11d", 12)] {
            assert_eq!(Move::from_usi(text, size).unwrap().to_usi(size), text);
        }
    }

    #[test]
    fn rejects_bad_move_strings() {
        assert_eq!(Move::from_usi("", 5), Err(MoveParseError::Empty));
        assert_eq!(Move::from_usi("Z*3c", 5), Err(MoveParseError::UnknownPiece('Z')));
        assert!(matches!(Move::from_usi("6a5a", 5), Err(MoveParseError::File(_))));
        assert!(matches!(Move::from_usi("0a5a", 5), Err(MoveParseError::File(_))));
        assert!(matches!(Move::from_usi("5f5a", 5), Err(MoveParseError::Rank(_))));
        assert!(matches!(Move::from_usi("5a5", 5), Err(MoveParseError::Rank(_))));
        assert!(matches!(Move::from_usi("5a5b+x", 5), Err(MoveParseError::Trailing(_))));
        assert!(matches!(Move::from_usi("P*3c+", 5), Err(MoveParseError::Trailing(_))));
        assert!(Move::from_usi("resign", 9).is_err());
    }
}
