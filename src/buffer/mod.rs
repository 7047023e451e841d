//! バッファ管理モジュール
//!
//! 固定容量のテキストデータと編集カーソルを提供

pub mod cursor;
pub mod text_buffer;

// 公開API
pub use cursor::CursorController;
pub use text_buffer::{LoadReport, TextBuffer, DEFAULT_CAPACITY, EMPTY_CELL};
