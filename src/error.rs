//! エラーハンドリングシステム
//!
//! vfdedit 全体で使用される統一されたエラー型と、パネル表示用メッセージへの変換を定義
//! 方針：バッファ・ファイル操作のエラーはセッション内で表示して継続、デバイスのエラーのみ呼び出し元へ伝播

use crate::ui::{ROW_WIDTH, ROWS};
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VfdError {
    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// バッファ操作エラー
    #[error("Buffer operation failed: {0}")]
    Buffer(#[from] BufferError),

    /// 表示デバイスエラー
    #[error("Display operation failed: {0}")]
    Ui(#[from] UiError),

    /// 入力デバイスエラー
    #[error("Input processing failed: {0}")]
    Input(#[from] InputError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// テキストバッファ固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer is full ({capacity} bytes)")]
    OutOfCapacity { capacity: usize },

    #[error("Offset {offset} is outside the used text (0..={used})")]
    InvalidOffset { offset: usize, used: usize },

    #[error("Byte {byte:#04x} cannot be stored")]
    InvalidByte { byte: u8 },

    #[error("Non-ASCII byte {byte:#04x} at offset {offset}")]
    NonAscii { offset: usize, byte: u8 },
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {name}")]
    NotFound { name: String },

    #[error("No files available")]
    EmptySelection,

    #[error("No file name given")]
    MissingName,

    #[error("Invalid file name: {name}")]
    InvalidName { name: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

/// 表示デバイス固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("Invalid cursor position: {position}")]
    InvalidCursorPosition { position: usize },

    #[error("Byte {byte:#04x} cannot be displayed")]
    NonPrintable { byte: u8 },

    #[error("Terminal operation failed: {context}")]
    Terminal { context: String },
}

/// 入力デバイス固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Key device failed: {message}")]
    Device { message: String },

    #[error("Key source exhausted")]
    Exhausted,
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// メッセージの重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// パネルに表示するステータスメッセージ（1行目・2行目）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub top: String,
    pub bottom: String,
    pub level: MessageLevel,
}

impl StatusMessage {
    /// 情報メッセージを作成
    pub fn info(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self::new(top, bottom, MessageLevel::Info)
    }

    fn new(top: impl Into<String>, bottom: impl Into<String>, level: MessageLevel) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
            level,
        }
    }

    /// エラーをパネル表示用のメッセージに変換
    pub fn from_error(error: &VfdError) -> Self {
        match error {
            VfdError::Buffer(BufferError::OutOfCapacity { capacity }) => Self::new(
                "Buffer full",
                format!("{} bytes used", capacity),
                MessageLevel::Warning,
            ),
            VfdError::Buffer(BufferError::NonAscii { offset, .. }) => Self::new(
                "Error saving file:",
                format!("non-ASCII byte at {}", offset),
                MessageLevel::Error,
            ),
            VfdError::File(FileError::NotFound { .. }) => {
                Self::new("File not found.", "", MessageLevel::Error)
            }
            VfdError::File(FileError::EmptySelection) => {
                Self::new("No files available.", "", MessageLevel::Warning)
            }
            VfdError::File(FileError::InvalidName { name }) => {
                Self::new("Invalid file name:", name.clone(), MessageLevel::Error)
            }
            VfdError::File(FileError::Encoding { message }) => {
                Self::new("Encoding error:", message.clone(), MessageLevel::Error)
            }
            VfdError::File(FileError::Io { message }) => {
                Self::new("IO error:", message.clone(), MessageLevel::Error)
            }
            _ => Self::new("Error:", error.to_string(), MessageLevel::Error),
        }
    }

    /// 保存・読み込みの失敗を見出し付きで表示する
    ///
    /// ファイルが存在しない場合のみ見出しを使わず `File not found.` を表示する
    pub fn failure(heading: &str, error: &VfdError) -> Self {
        let reason = match error {
            VfdError::File(FileError::NotFound { .. }) => return Self::from_error(error),
            VfdError::File(FileError::Io { message })
            | VfdError::File(FileError::Encoding { message }) => message.clone(),
            VfdError::Buffer(BufferError::NonAscii { offset, .. }) => {
                format!("non-ASCII byte at {}", offset)
            }
            VfdError::File(inner) => inner.to_string(),
            VfdError::Buffer(inner) => inner.to_string(),
            other => other.to_string(),
        };
        Self::new(heading, reason, MessageLevel::Error)
    }

    /// パネルに収まるASCII文字列として行を返す
    pub fn rows(&self) -> (String, String) {
        (panel_line(&self.top, ROW_WIDTH * ROWS), panel_line(&self.bottom, ROW_WIDTH))
    }
}

fn panel_line(text: &str, limit: usize) -> String {
    text.chars()
        .map(|ch| if ch.is_ascii_graphic() || ch == ' ' { ch } else { '?' })
        .take(limit)
        .collect()
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, VfdError>;

/// 各モジュール固有のResult型
pub mod file {
    pub type Result<T> = std::result::Result<T, super::FileError>;
}

pub mod buffer {
    pub type Result<T> = std::result::Result<T, super::BufferError>;
}

// std::io::Error からの変換
impl From<std::io::Error> for FileError {
    fn from(error: std::io::Error) -> Self {
        FileError::Io { message: error.to_string() }
    }
}

impl From<std::io::Error> for VfdError {
    fn from(error: std::io::Error) -> Self {
        VfdError::File(error.into())
    }
}
