//! UI層
//!
//! 2行40桁パネルへの表示：ビューポート、差分描画、表示デバイスの契約

pub mod display;
pub mod renderer;
pub mod viewport;

/// 1行の桁数
pub const ROW_WIDTH: usize = 40;
/// 行数
pub const ROWS: usize = 2;
/// パネル全体のセル数
pub const WINDOW_SIZE: usize = ROW_WIDTH * ROWS;

pub use display::{DisplayOp, DisplaySink, PanelDisplay};
pub use renderer::{build_frame, DiffRenderer, Frame, RenderStats};
pub use viewport::ViewportScroller;
