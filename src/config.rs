//! 設定管理
//!
//! JSON設定ファイルの読み込みとパス展開。全ての項目にデフォルト値を持つ。

use crate::buffer::DEFAULT_CAPACITY;
use crate::error::{ConfigError, Result, VfdError};
use crate::logging;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "vfdedit";
const CONFIG_FILE_NAME: &str = "config.json";

/// エディタ設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// 文書を保存するディレクトリ
    pub document_dir: String,
    /// テキストバッファの容量（バイト）
    pub capacity: usize,
    /// ログレベル（off / error / warn / info / debug / trace）
    pub log_level: String,
    /// ログファイル（未指定時はログを出力しない）
    pub log_file: Option<String>,
    /// パネルバスの1バイトあたりの転送遅延（マイクロ秒）
    pub bus_delay_us: u64,
    /// ステータスメッセージの表示時間（ミリ秒）
    pub message_hold_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            document_dir: "~/VFDEditorFiles".to_string(),
            capacity: DEFAULT_CAPACITY,
            log_level: "info".to_string(),
            log_file: Some("~/.vfdedit/vfdedit.log".to_string()),
            bus_delay_us: 50,
            message_hold_ms: 2000,
        }
    }
}

impl EditorConfig {
    /// 設定ファイルを読み込む
    ///
    /// `path` 未指定時は既定の場所を探し、存在しなければデフォルト設定を返す
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (default_config_path(), false),
        };

        let config = match path {
            Some(path) if path.is_file() => Self::from_file(&path)?,
            Some(path) if required => {
                return Err(VfdError::Config(ConfigError::InvalidFile {
                    path: path.display().to_string(),
                    message: "file does not exist".to_string(),
                }))
            }
            _ => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let invalid = |message: String| {
            VfdError::Config(ConfigError::InvalidFile {
                path: path.display().to_string(),
                message,
            })
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
    }

    /// 設定値の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(invalid_value("capacity", self.capacity.to_string()));
        }
        if logging::parse_level(&self.log_level).is_none() {
            return Err(invalid_value("log_level", self.log_level.clone()));
        }
        Ok(())
    }

    /// 文書ディレクトリ（`~` と環境変数を展開済み）
    pub fn document_dir(&self) -> Result<PathBuf> {
        expand("document_dir", &self.document_dir)
    }

    /// ログファイルのパス（`~` と環境変数を展開済み）
    pub fn log_file(&self) -> Result<Option<PathBuf>> {
        self.log_file
            .as_deref()
            .map(|path| expand("log_file", path))
            .transpose()
    }

    /// ログレベル
    pub fn log_level(&self) -> LevelFilter {
        logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn bus_delay(&self) -> Duration {
        Duration::from_micros(self.bus_delay_us)
    }

    pub fn message_hold(&self) -> Duration {
        Duration::from_millis(self.message_hold_ms)
    }
}

/// 既定の設定ファイルパス（`<config_dir>/vfdedit/config.json`）
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn expand(key: &str, raw: &str) -> Result<PathBuf> {
    shellexpand::full(raw)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| invalid_value(key, format!("{} ({})", raw, e)))
}

fn invalid_value(key: &str, value: String) -> VfdError {
    VfdError::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}
