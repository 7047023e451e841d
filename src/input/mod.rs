//! 入力処理モジュール
//!
//! キートークン、キーバインディング、キー入力源

pub mod keybinding;
pub mod source;

pub use keybinding::{resolve, EditorCommand, Key, Modifiers};
pub use source::{KeySource, ScriptedKeySource};
