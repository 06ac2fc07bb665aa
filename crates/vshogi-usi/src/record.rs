//! 棋譜ログ（JSONL）
//!
//! 1 行 1 レコード。`meta` → `move` × N → `result` の順に書く。

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use vshogi_core::notation::side_char;

use crate::game::{GameResult, MoveEvent};
use crate::oracle::EvalLog;

/// 対局の設定情報
#[derive(Serialize, Debug, Clone)]
pub struct MetaLog {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timestamp: String,
    pub variant: String,
    pub white: String,
    pub black: String,
    pub start_sfen: String,
    pub max_plies: u32,
    pub fallback: String,
    pub seed: u64,
}

#[derive(Serialize)]
struct MoveLog<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    ply: u32,
    side_to_move: char,
    sfen_before: &'a str,
    move_usi: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_move_usi: Option<&'a str>,
    player: &'a str,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    eval: Option<&'a EvalLog>,
}

#[derive(Serialize)]
struct ResultLog<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    outcome: &'a str,
    reason: &'a str,
    plies: u32,
    final_sfen: &'a str,
}

/// 出力先が省略されたときの既定パス
pub fn default_output_path(variant: &str, timestamp: &DateTime<Local>) -> PathBuf {
    let name = format!("{}-{variant}.jsonl", timestamp.format("%Y%m%d-%H%M%S"));
    PathBuf::from("runs/vshogi").join(name)
}

pub struct GameRecorder<W: Write> {
    writer: W,
}

impl GameRecorder<BufWriter<File>> {
    /// 親ディレクトリも作ってファイルを開く
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> GameRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_meta(&mut self, meta: &MetaLog) -> io::Result<()> {
        self.write_line(meta)
    }

    pub fn write_move(&mut self, event: &MoveEvent) -> io::Result<()> {
        self.write_line(&MoveLog {
            kind: "move",
            ply: event.ply,
            side_to_move: side_char(event.side),
            sfen_before: &event.sfen_before,
            move_usi: &event.move_usi,
            raw_move_usi: event.raw_move_usi.as_deref(),
            player: &event.player,
            elapsed_ms: event.elapsed_ms,
            fallback: event.fallback,
            eval: event.eval.as_ref().filter(|e| !e.is_empty()),
        })
    }

    pub fn write_result(&mut self, result: &GameResult, final_sfen: &str) -> io::Result<()> {
        self.write_line(&ResultLog {
            kind: "result",
            outcome: result.outcome.label(),
            reason: &result.reason,
            plies: result.plies,
            final_sfen,
        })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl MetaLog {
    pub fn new(variant: &str, white: &str, black: &str, start_sfen: &str) -> Self {
        Self {
            kind: "meta",
            timestamp: Local::now().to_rfc3339(),
            variant: variant.to_string(),
            white: white.to_string(),
            black: black.to_string(),
            start_sfen: start_sfen.to_string(),
            max_plies: 0,
            fallback: String::new(),
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameOutcome;
    use serde_json::Value;
    use vshogi_core::Color;

    #[test]
    fn writes_one_json_object_per_line() {
        let mut rec = GameRecorder::new(Vec::new());
        let mut meta = MetaLog::new("mini", "random", "engine", "rbsgk/4p/5/P4/KGSBR b - 1");
        meta.max_plies = 10;
        meta.fallback = "halt".to_string();
        rec.write_meta(&meta).unwrap();
        rec.write_move(&MoveEvent {
            ply: 1,
            side: Color::White,
            sfen_before: "rbsgk/4p/5/P4/KGSBR b - 1".to_string(),
            sfen_after: "rbsgk/4p/P4/5/KGSBR w - 2".to_string(),
            move_usi: "5d5c".to_string(),
            raw_move_usi: None,
            elapsed_ms: 3,
            eval: Some(EvalLog::default()),
            player: "random".to_string(),
            fallback: false,
        })
        .unwrap();
        rec.write_result(
            &GameResult { outcome: GameOutcome::Draw, reason: "max_plies".to_string(), plies: 1 },
            "rbsgk/4p/P4/5/KGSBR w - 2",
        )
        .unwrap();

        let text = String::from_utf8(rec.into_inner()).unwrap();
        let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "meta");
        assert_eq!(lines[0]["variant"], "mini");
        assert_eq!(lines[1]["type"], "move");
        assert_eq!(lines[1]["side_to_move"], "b");
        assert_eq!(lines[1]["move_usi"], "5d5c");
        assert!(lines[1].get("eval").is_none());
        assert!(lines[1].get("fallback").is_none());
        assert!(lines[1].get("raw_move_usi").is_none());
        assert_eq!(lines[2]["outcome"], "draw");
        assert_eq!(lines[2]["reason"], "max_plies");
    }

    #[test]
    fn default_path_uses_timestamp_and_variant() {
        let ts = Local::now();
        let path = default_output_path("chu", &ts);
        assert!(path.starts_with("runs/vshogi"));
        assert!(path.to_string_lossy().ends_with("-chu.jsonl"));
    }
}
