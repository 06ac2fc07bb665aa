//! USI エンジンプロセスとの入出力
//!
//! 標準出力は読み取りスレッドが 1 行ずつチャネルへ流し、待ちはすべて
//! `recv_timeout` で上限を付ける。書き込みは 1 行ごとに改行を付けて即 flush する。

use std::collections::HashSet;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::config::EngineConfig;
use crate::error::ProtocolError;
use crate::oracle::{EvalLog, Oracle, parse_bestmove};

/// `stop` を送ってから bestmove を待つ猶予
pub const ENGINE_STOP_GRACE: Duration = Duration::from_millis(500);
pub const ENGINE_QUIT_TIMEOUT: Duration = Duration::from_millis(300);
pub const ENGINE_QUIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 1 本のエンジンとの入出力をカプセル化する
pub struct UsiEngine {
    child: Option<Child>,
    writer: Box<dyn Write + Send>,
    rx: Receiver<String>,
    opt_names: HashSet<String>,
    pub label: String,
    movetime_ms: u64,
    ready_timeout: Duration,
    last_eval: Option<EvalLog>,
}

impl UsiEngine {
    /// エンジンを起動してハンドシェイクまで済ませる
    pub fn spawn(
        cfg: &EngineConfig,
        variant_name: &str,
        label: String,
    ) -> Result<Self, ProtocolError> {
        let mut child = Command::new(&cfg.path)
            .args(&cfg.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ProtocolError::Spawn {
                path: cfg.path.display().to_string(),
                source,
            })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("engine has no stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("engine has no stdout"))?;
        let mut engine = Self::from_channel(spawn_reader(stdout), BufWriter::new(stdin), label);
        engine.child = Some(child);
        engine.initialize(cfg, variant_name)?;
        Ok(engine)
    }

    /// 任意の入出力の上に作る（プロセスを持たない）
    pub fn from_streams<R, W>(reader: R, writer: W, label: String) -> Self
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self::from_channel(spawn_reader(reader), writer, label)
    }

    /// 受信済みの行を流すチャネルの上に作る
    pub fn from_channel<W>(rx: Receiver<String>, writer: W, label: String) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            child: None,
            writer: Box::new(writer),
            rx,
            opt_names: HashSet::new(),
            label,
            movetime_ms: EngineConfig::DEFAULT_MOVETIME_MS,
            ready_timeout: Duration::from_millis(EngineConfig::DEFAULT_HANDSHAKE_TIMEOUT_MS),
            last_eval: None,
        }
    }

    /// `usi` → `usiok`、ルール設定、追加オプション、`isready` → `readyok`、`usinewgame`
    pub fn initialize(
        &mut self,
        cfg: &EngineConfig,
        variant_name: &str,
    ) -> Result<(), ProtocolError> {
        self.movetime_ms = cfg.movetime_ms;
        self.ready_timeout = cfg.handshake_timeout();
        self.write_line("usi")?;
        let mut names = Vec::new();
        wait_for(&self.rx, &self.label, "usiok", self.ready_timeout, |line| {
            if let Some(name) = line.strip_prefix("option ").and_then(parse_option_name) {
                names.push(name);
            }
        })?;
        self.opt_names.extend(names);
        log::info!(
            "{}: handshake done ({} options advertised)",
            self.label,
            self.opt_names.len()
        );

        let variant = cfg.variant_option.as_deref().unwrap_or(variant_name);
        self.write_line(&format!("setoption name UCI_Variant value {variant}"))?;
        for (name, value) in cfg.option_values() {
            self.set_option_if_available(&name, &value)?;
        }
        self.sync_ready()?;
        self.write_line("usinewgame")?;
        Ok(())
    }

    pub fn new_game(&mut self) -> Result<(), ProtocolError> {
        self.write_line("usinewgame")?;
        self.sync_ready()
    }

    pub fn sync_ready(&mut self) -> Result<(), ProtocolError> {
        self.write_line("isready")?;
        wait_for(&self.rx, &self.label, "readyok", self.ready_timeout, |_| {})?;
        Ok(())
    }

    pub fn set_option_if_available(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<(), ProtocolError> {
        if self.opt_names.is_empty() || self.opt_names.contains(name) {
            self.write_line(&format!("setoption name {name} value {value}"))?;
        } else {
            log::warn!("{}: option '{name}' not advertised, skipped", self.label);
        }
        Ok(())
    }

    pub fn options(&self) -> &HashSet<String> {
        &self.opt_names
    }

    pub fn write_line(&mut self, msg: &str) -> Result<(), ProtocolError> {
        log::debug!("{} <- {msg}", self.label);
        self.writer.write_all(msg.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl Oracle for UsiEngine {
    fn request_move(&mut self, position: &str, timeout: Duration) -> Result<String, ProtocolError> {
        self.sync_ready()?;
        self.write_line(&format!("position sfen {position}"))?;
        self.write_line(&format!("go movetime {}", self.movetime_ms))?;

        let mut eval = EvalLog::default();
        let result = wait_for(&self.rx, &self.label, "bestmove", timeout, |line| {
            eval.update_from_line(line)
        });
        self.last_eval = (!eval.is_empty()).then_some(eval);
        match result {
            Ok(line) => parse_bestmove(&line),
            Err(err @ ProtocolError::Timeout { .. }) => {
                log::warn!("{}: no bestmove within {timeout:?}, sending stop", self.label);
                self.write_line("stop")?;
                // 遅れて届く bestmove を読み捨てて次の要求とずれないようにする
                let drained =
                    wait_for(&self.rx, &self.label, "bestmove", ENGINE_STOP_GRACE, |_| {});
                if let Err(e) = drained {
                    log::warn!("{}: {e}", self.label);
                }
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn last_eval(&self) -> Option<EvalLog> {
        self.last_eval.clone()
    }
}

impl Drop for UsiEngine {
    fn drop(&mut self) {
        let _ = self.write_line("quit");
        let Some(child) = self.child.as_mut() else {
            return;
        };
        let deadline = Instant::now() + ENGINE_QUIT_TIMEOUT;
        while Instant::now() < deadline {
            if let Ok(Some(_)) = child.try_wait() {
                return;
            }
            std::thread::sleep(ENGINE_QUIT_POLL_INTERVAL);
        }
        log::warn!("{}: engine did not quit, killing", self.label);
        let _ = child.kill();
        let _ = child.wait();
    }
}

fn spawn_reader<R: Read + Send + 'static>(reader: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// `expected` で始まる行が来るまで読む。それ以外の行は `on_other` に渡して捨てる。
fn wait_for(
    rx: &Receiver<String>,
    label: &str,
    expected: &str,
    timeout: Duration,
    mut on_other: impl FnMut(&str),
) -> Result<String, ProtocolError> {
    let start = Instant::now();
    let deadline = start + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(line) => {
                let line = line.trim_end().to_string();
                if line.starts_with(expected) {
                    log::debug!("{label} -> {line}");
                    return Ok(line);
                }
                log::debug!("{label} -> {line} (ignored)");
                on_other(&line);
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(ProtocolError::Timeout {
                    expected: expected.to_string(),
                    waited: start.elapsed(),
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(ProtocolError::Closed { expected: expected.to_string() });
            }
        }
    }
}

/// `option name <名前> type ...` から名前を取り出す
pub fn parse_option_name(line: &str) -> Option<String> {
    let parts: Vec<&str> = line
        .split_whitespace()
        .skip_while(|&t| t != "name")
        .skip(1)
        .take_while(|&t| t != "type")
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}
