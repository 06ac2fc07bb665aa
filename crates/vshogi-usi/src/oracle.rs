//! 指し手を返してくれる外部エンジンの窓口
//!
//! 対局進行はこの trait だけを見て、プロセス管理は [`crate::engine`] に閉じ込める。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// 局面文字列を渡して最善手の USI 文字列を受け取る
pub trait Oracle {
    /// `position` は SFEN。`timeout` を過ぎたら `ProtocolError::Timeout`。
    fn request_move(&mut self, position: &str, timeout: Duration) -> Result<String, ProtocolError>;

    /// 直前の思考で得た評価情報
    fn last_eval(&self) -> Option<EvalLog> {
        None
    }
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn request_move(&mut self, position: &str, timeout: Duration) -> Result<String, ProtocolError> {
        (**self).request_move(position, timeout)
    }

    fn last_eval(&self) -> Option<EvalLog> {
        (**self).last_eval()
    }
}

/// 指し手以外の終局宣言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Resign,
    Win,
    NoMove,
}

/// `resign` / `win` / `none` を判定する
pub fn terminal_reply(reply: &str) -> Option<Terminal> {
    match reply {
        "resign" => Some(Terminal::Resign),
        "win" => Some(Terminal::Win),
        "none" | "(none)" | "" => Some(Terminal::NoMove),
        _ => None,
    }
}

/// `bestmove <move> [ponder <move>]` から指し手を取り出す
pub fn parse_bestmove(line: &str) -> Result<String, ProtocolError> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some("bestmove"), Some(mv)) => Ok(mv.to_string()),
        _ => Err(ProtocolError::MalformedBestMove(line.to_string())),
    }
}

/// info 行から拾った評価情報（ログ出力用）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_cp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_mate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub pv: Vec<String>,
}

impl EvalLog {
    /// info 行を読んで上書きする。multipv が 1 以外の行は無視。
    pub fn update_from_line(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first() != Some(&"info") {
            return;
        }
        if let Some(pos) = tokens.iter().position(|&t| t == "multipv") {
            if tokens.get(pos + 1).and_then(|v| v.parse::<u32>().ok()) != Some(1) {
                return;
            }
        }
        let mut rest = tokens[1..].iter();
        while let Some(&key) = rest.next() {
            match key {
                "depth" => self.depth = rest.next().and_then(|v| v.parse().ok()),
                "nodes" => self.nodes = rest.next().and_then(|v| v.parse().ok()),
                "score" => match (rest.next().copied(), rest.next()) {
                    (Some("cp"), Some(v)) => {
                        self.score_cp = v.parse().ok();
                        self.score_mate = None;
                    }
                    (Some("mate"), Some(v)) => {
                        self.score_mate = v.parse().ok();
                        self.score_cp = None;
                    }
                    _ => {}
                },
                "pv" => {
                    self.pv = rest.by_ref().map(|s| s.to_string()).collect();
                }
                _ => {}
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == EvalLog::default()
    }
}
