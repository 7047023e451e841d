//! vfdedit - 2行40桁の蛍光表示管（VFD）パネル向けテキストエディタ
//!
//! 固定容量バッファ、行単位のビューポート、差分描画による最小限のバス転送

// コアモジュール
pub mod config;
pub mod error;
pub mod frontend;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;

// ロジック層
pub mod input;
pub mod minibuffer;
pub mod session;

// 表示層
pub mod ui;

// 公開API
pub use error::{Result, VfdError};
pub use session::{EditSession, SessionOptions};
