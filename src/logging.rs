//! ロギングシステム
//!
//! `log` クレートのバックエンドとしてファイルへログを追記する。
//! 端末はパネル表示のエミュレーションが占有するため、UI実行中は標準エラーへ出力しない。

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// ロガー登録の失敗
#[derive(Error, Debug)]
pub enum LogInitError {
    #[error("cannot create log directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Install(#[from] SetLoggerError),
}

/// ロガー
#[derive(Debug)]
pub struct Logger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<Mutex<PathBuf>>,
}

impl Logger {
    /// デフォルト構築（出力先なし）
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: false,
            output_file: None,
        }
    }

    /// 開発者向けロガー（stderrへ全レベルを出力）
    pub fn for_development() -> Self {
        Self::new(LevelFilter::Debug).with_stderr()
    }

    /// ログレベルを取得
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(Mutex::new(path.into()));
        self
    }

    /// 標準エラー出力を有効化（端末UIを使わない場合のみ）
    pub fn with_stderr(mut self) -> Self {
        self.output_stderr = true;
        self
    }

    fn should_log(&self, level: log::Level) -> bool {
        level <= self.level
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            // ロックが汚染されていてもパスは読み出せる
            let path = match path.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&*path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }

    fn format_record(record: &Record<'_>) -> String {
        format!("{}: {} in {}", record.level(), record.args(), record.target())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.should_log(metadata.level())
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_line(&Self::format_record(record));
        }
    }

    fn flush(&self) {}
}

/// ログレベル文字列を解釈する（不正な値は `None`）
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse::<LevelFilter>().ok()
}

/// グローバルロガーとして登録
///
/// ログファイルのディレクトリが作れない場合は登録せずにエラーを返す
pub fn init(level: LevelFilter, path: Option<&Path>) -> Result<(), LogInitError> {
    if let Some(parent) = path.and_then(Path::parent) {
        std::fs::create_dir_all(parent).map_err(|source| LogInitError::Directory {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let mut logger = Logger::new(level);
    if let Some(path) = path {
        logger = logger.with_file_output(path);
    }

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}
