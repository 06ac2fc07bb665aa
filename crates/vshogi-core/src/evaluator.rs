//! 王手・詰みの判定
//!
//! 自分の応手をすべて複製盤面で試す一手読み。逃れる手が見つかった時点で打ち切る。
//! 成りは玉の安全に影響しないので試行では不成で動かす。

use crate::board::Board;
use crate::error::BoardResult;
use crate::types::{Color, Move};

/// `color` の玉に相手の駒が利いているか
pub fn is_check(board: &Board, color: Color) -> BoardResult<bool> {
    let king = board.find_king(color)?;
    Ok(board.attacks(color.opponent(), king))
}

/// `color` が詰んでいるか。王手されていなければ false。
pub fn is_checkmate(board: &Board, color: Color) -> BoardResult<bool> {
    if !is_check(board, color)? {
        return Ok(false);
    }
    Ok(find_escape(board, color)?.is_none())
}

/// 王手を逃れる手を 1 つ探す。盤上の駒の移動を先に、持ち駒を後に試す。
pub fn find_escape(board: &Board, color: Color) -> BoardResult<Option<Move>> {
    for piece in board.pieces_of(color) {
        for to in board.destinations(piece.id) {
            let mut trial = board.sandbox();
            trial.move_piece(piece.id, to, false)?;
            if !is_check(&trial, color)? {
                return Ok(Some(Move::board(piece.square, to, false)));
            }
        }
    }
    for kind in board.hand_kinds(color) {
        for to in board.drop_targets(kind, color) {
            let mut trial = board.sandbox();
            trial.drop_piece(kind, color, to)?;
            if !is_check(&trial, color)? {
                return Ok(Some(Move::drop(kind, to)));
            }
        }
    }
    Ok(None)
}

/// 指した後に自玉へ利きが残らないか
pub fn leaves_king_safe(board: &Board, color: Color, mv: &Move) -> BoardResult<bool> {
    let mut trial = board.sandbox();
    let plain = match *mv {
        Move::Board { from, to, .. } => Move::board(from, to, false),
        drop @ Move::Drop { .. } => drop,
    };
    trial.apply_move(&plain, color)?;
    Ok(!is_check(&trial, color)?)
}

/// `color` の合法手（盤上の移動と打つ手）
pub fn legal_moves(board: &Board, color: Color) -> BoardResult<Vec<Move>> {
    let mut moves = board.all_legal_moves(color);
    moves.extend(board.drop_moves(color));
    let mut legal = Vec::with_capacity(moves.len());
    for mv in moves {
        if leaves_king_safe(board, color, &mv)? {
            legal.push(mv);
        }
    }
    Ok(legal)
}
