//! ファイル操作モジュール
//!
//! - 文書はASCIIテキストのみ（バッファの使用領域をそのまま保存）
//! - 保存先は設定された1ディレクトリ直下、サブディレクトリなし
//! - 名前の入力促しはセッション側で行う

pub mod io;
pub mod journal;

pub use io::{validate_name, DirectoryStore, FileStore, SaveReport};
pub use journal::{journal_file_name, journal_file_name_now};
