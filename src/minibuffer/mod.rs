//! ミニバッファ
//!
//! 編集画面の代わりにパネル全体を使う入力：ファイル名プロンプトと文書一覧

pub mod file_list;
pub mod prompt;

pub use file_list::FileList;
pub use prompt::{PromptInput, PromptResult};
