//! SFEN 形式の局面文字列
//!
//! `<盤面> <手番> <持ち駒> <手数>`。盤面は行 0 から `/` 区切りで、空き升は連続数、
//! 駒は成り段階の数だけ `+` を前置した文字（先手大文字・後手小文字）。
//! 手番は先手なら `b`、後手なら `w`。

use crate::board::{Board, PieceRecord};
use crate::error::SfenError;
use crate::movegen;
use crate::types::{Color, PieceKind, Promotion, Square, VariantConfig};

/// 手番の文字
pub fn side_char(color: Color) -> char {
    match color {
        Color::White => 'b',
        Color::Black => 'w',
    }
}

impl Board {
    /// 局面を SFEN 文字列にする
    pub fn to_sfen(&self) -> String {
        format!(
            "{} {} {} {}",
            self.board_field(),
            side_char(self.side_to_move()),
            self.hand_field(),
            self.move_number()
        )
    }

    /// 盤面部分のみ
    pub fn board_field(&self) -> String {
        let size = self.size();
        let mut cells: Vec<Option<&PieceRecord>> = vec![None; size as usize * size as usize];
        for p in self.pieces() {
            cells[p.square.index(size)] = Some(p);
        }
        let mut out = String::new();
        for (row, chunk) in cells.chunks(size as usize).enumerate() {
            if row > 0 {
                out.push('/');
            }
            let mut empty = 0usize;
            for cell in chunk {
                match cell {
                    None => empty += 1,
                    Some(p) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        for _ in 0..p.promotion.tier() {
                            out.push('+');
                        }
                        out.push(p.kind.colored_letter(p.color));
                    }
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }
        out
    }

    /// 持ち駒部分。先手の駒を先に、駒種は飛角金銀桂香歩の順。
    pub fn hand_field(&self) -> String {
        let mut out = String::new();
        for color in Color::ALL {
            for kind in PieceKind::HAND_ORDER {
                let n = self.hand_count(color, kind);
                if n == 0 {
                    continue;
                }
                if n > 1 {
                    out.push_str(&n.to_string());
                }
                out.push(kind.colored_letter(color));
            }
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }

    /// SFEN 文字列から局面を作る。駒 id は新たに振られる。
    pub fn from_sfen(sfen: &str, config: &VariantConfig) -> Result<Board, SfenError> {
        let fields: Vec<&str> = sfen.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(SfenError::MissingField(sfen.to_string()));
        }
        let mut board = Board::empty(config);
        parse_board_field(&mut board, fields[0])?;
        board.set_side_to_move(match fields[1] {
            "b" => Color::White,
            "w" => Color::Black,
            other => return Err(SfenError::SideToMove(other.to_string())),
        });
        parse_hand(&mut board, fields.get(2).copied().unwrap_or("-"))?;
        let move_number = match fields.get(3) {
            Some(text) => text
                .parse::<u32>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| SfenError::MoveNumber(text.to_string()))?,
            None => 1,
        };
        board.set_move_number(move_number);
        board.validate()?;
        board.drain_events();
        Ok(board)
    }

    /// 盤の大きさからルールを推定して読み込む
    pub fn from_sfen_any(sfen: &str) -> Result<Board, SfenError> {
        let ranks = sfen
            .split_whitespace()
            .next()
            .map(|b| b.split('/').count())
            .ok_or_else(|| SfenError::MissingField(sfen.to_string()))?;
        let config = VariantConfig::for_size(ranks).ok_or(SfenError::UnsupportedSize(ranks))?;
        Board::from_sfen(sfen, config)
    }
}

fn parse_board_field(board: &mut Board, field: &str) -> Result<(), SfenError> {
    let config = *board.config();
    let size = config.size as usize;
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != size {
        return Err(SfenError::RankCount { expected: size, found: ranks.len() });
    }
    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0usize;
        let mut run = 0usize;
        let mut markers = 0u8;
        for c in rank.chars() {
            if let Some(d) = c.to_digit(10) {
                if markers > 0 {
                    return Err(SfenError::DanglingMarker(row));
                }
                run = run.saturating_mul(10).saturating_add(d as usize);
                if col.saturating_add(run) > size {
                    return Err(SfenError::RankWidth {
                        rank: row,
                        expected: size,
                        found: col.saturating_add(run),
                    });
                }
                continue;
            }
            col += run;
            run = 0;
            if c == '+' {
                markers = markers.saturating_add(1);
                continue;
            }
            let kind = PieceKind::from_letter(c.to_ascii_uppercase())
                .filter(|&k| config.supports(k))
                .ok_or(SfenError::UnknownLetter(c))?;
            let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
            let promotion = Promotion::from_tier(markers)
                .filter(|&p| movegen::movement(kind, p, config.variant).is_some())
                .ok_or(SfenError::BadPromotion { letter: c, markers })?;
            // 動けない段に不成の駒は置けない
            if config.must_promote(kind, promotion, row as u8, color) {
                return Err(SfenError::BadPromotion { letter: c, markers });
            }
            if col >= size {
                return Err(SfenError::RankWidth { rank: row, expected: size, found: col + 1 });
            }
            board.place_piece(Square::new(row as u8, col as u8), kind, color, promotion)?;
            col += 1;
            markers = 0;
        }
        if markers > 0 {
            return Err(SfenError::DanglingMarker(row));
        }
        col += run;
        if col != size {
            return Err(SfenError::RankWidth { rank: row, expected: size, found: col });
        }
    }
    Ok(())
}

fn parse_hand(board: &mut Board, field: &str) -> Result<(), SfenError> {
    if field == "-" {
        return Ok(());
    }
    let config = *board.config();
    let mut count: Option<usize> = None;
    for c in field.chars() {
        if let Some(d) = c.to_digit(10) {
            count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
            continue;
        }
        let kind = PieceKind::from_letter(c.to_ascii_uppercase())
            .filter(|&k| k != PieceKind::King && config.supports(k))
            .ok_or_else(|| SfenError::Hand(field.to_string()))?;
        let owner = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        let n = count.take().unwrap_or(1);
        let held = board.hand_count(owner, kind).saturating_add(n);
        if n == 0 || held > layout_count(&config, kind) {
            return Err(SfenError::Hand(field.to_string()));
        }
        for _ in 0..n {
            board.add_to_hand(kind, owner);
        }
    }
    if count.is_some() {
        return Err(SfenError::Hand(field.to_string()));
    }
    Ok(())
}

/// 初期配置にある `kind` の枚数（両手番の合計）。持ち駒の上限に使う。
fn layout_count(config: &VariantConfig, kind: PieceKind) -> usize {
    config.layout.chars().filter(|c| c.to_ascii_uppercase() == kind.letter()).count()
}
