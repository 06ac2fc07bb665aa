//! 設定ファイル（TOML）
//!
//! ```toml
//! variant = "mini"
//! max_plies = 200
//! fallback = "random"
//! white = "engine"
//! black = "random"
//!
//! [engine]
//! path = "/usr/local/bin/fairy-stockfish"
//! movetime_ms = 500
//!
//! [engine.options]
//! Threads = 2
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::FallbackPolicy;
use crate::player::PlayerKind;

/// エンジンプロセス起動時の設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// `UCI_Variant` に渡す名前（未指定ならルールの既定名）
    #[serde(default)]
    pub variant_option: Option<String>,
    #[serde(default = "default_movetime_ms")]
    pub movetime_ms: u64,
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
    /// 1 手の応答待ちの上限（未指定なら movetime + 2 秒）
    #[serde(default)]
    pub move_timeout_ms: Option<u64>,
    /// 追加の USI オプション
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

fn default_movetime_ms() -> u64 {
    EngineConfig::DEFAULT_MOVETIME_MS
}

fn default_handshake_timeout_ms() -> u64 {
    EngineConfig::DEFAULT_HANDSHAKE_TIMEOUT_MS
}

impl EngineConfig {
    pub const DEFAULT_MOVETIME_MS: u64 = 1000;
    pub const DEFAULT_HANDSHAKE_TIMEOUT_MS: u64 = 5000;
    const MOVE_TIMEOUT_MARGIN_MS: u64 = 2000;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            variant_option: None,
            movetime_ms: Self::DEFAULT_MOVETIME_MS,
            handshake_timeout_ms: Self::DEFAULT_HANDSHAKE_TIMEOUT_MS,
            move_timeout_ms: None,
            options: BTreeMap::new(),
        }
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    pub fn move_timeout(&self) -> Duration {
        Duration::from_millis(
            self.move_timeout_ms
                .unwrap_or(self.movetime_ms.saturating_add(Self::MOVE_TIMEOUT_MARGIN_MS)),
        )
    }

    /// `setoption` に渡す (名前, 値) の組。文字列はそのまま、それ以外は TOML 表記。
    pub fn option_values(&self) -> Vec<(String, String)> {
        self.options
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (name.clone(), text)
            })
            .collect()
    }
}

/// 設定ファイル全体。CLI 引数で上書きされる。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub variant: Option<String>,
    pub max_plies: Option<u32>,
    pub seed: Option<u64>,
    pub fallback: Option<FallbackPolicy>,
    pub white: Option<PlayerKind>,
    pub black: Option<PlayerKind>,
    pub out: Option<PathBuf>,
    pub engine: Option<EngineConfig>,
}

impl FileConfig {
    pub fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text)
            .map_err(|source| ConfigError::Parse { path: origin.to_string(), source })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let cfg = Self::parse(&text, &path.display().to_string())?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let text = r#"
variant = "mini"
max_plies = 120
seed = 7
fallback = "random"
white = "engine"
black = "random"

[engine]
path = "/opt/fairy-stockfish"
args = ["--quiet"]
movetime_ms = 300

[engine.options]
Threads = 2
EvalFile = "nn.bin"
Ponder = false
"#;
        let cfg = FileConfig::parse(text, "inline").unwrap();
        assert_eq!(cfg.variant.as_deref(), Some("mini"));
        assert_eq!(cfg.max_plies, Some(120));
        assert_eq!(cfg.fallback, Some(FallbackPolicy::RandomMove));
        assert_eq!(cfg.white, Some(PlayerKind::Engine));
        let engine = cfg.engine.unwrap();
        assert_eq!(engine.args, vec!["--quiet".to_string()]);
        assert_eq!(engine.handshake_timeout(), Duration::from_millis(5000));
        assert_eq!(engine.move_timeout(), Duration::from_millis(2300));
        assert_eq!(
            engine.option_values(),
            vec![
                ("EvalFile".to_string(), "nn.bin".to_string()),
                ("Ponder".to_string(), "false".to_string()),
                ("Threads".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = FileConfig::parse("", "inline").unwrap();
        assert!(cfg.engine.is_none());
        assert!(cfg.variant.is_none());
    }

    #[test]
    fn reports_parse_errors_with_origin() {
        let err = FileConfig::parse("max_plies = \"many\"", "play.toml").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse play.toml"));
    }
}
