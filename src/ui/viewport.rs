//! ビューポート管理
//!
//! パネルに写すバッファ上の窓（行境界に揃えた80バイト）を管理する。
//! 窓の開始位置は常に `ROW_WIDTH` の倍数で、カーソルは常に窓の内側にある。

use super::{ROWS, ROW_WIDTH, WINDOW_SIZE};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportScroller {
    /// 窓の開始オフセット
    window_start: usize,
}

impl ViewportScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window_start(&self) -> usize {
        self.window_start
    }

    /// 論理上の窓の終端（実際の表示範囲は `visible_span`）
    pub fn window_end(&self) -> usize {
        self.window_start + WINDOW_SIZE
    }

    /// 先頭へ戻す
    pub fn reset(&mut self) {
        self.window_start = 0;
    }

    /// カーソルが窓に収まるよう行単位でずらす
    ///
    /// 戻り値はスクロールが発生したかどうか
    pub fn reconcile(&mut self, cursor_offset: usize) -> bool {
        let before = self.window_start;

        if cursor_offset < self.window_start {
            // カーソルの行が先頭行になるまで上へ
            self.window_start = row_start(cursor_offset);
        } else if cursor_offset - self.window_start >= WINDOW_SIZE {
            // カーソルの行が最終行になるまで下へ
            self.window_start = row_start(cursor_offset) - (ROWS - 1) * ROW_WIDTH;
        }

        self.window_start != before
    }

    /// 縦方向の移動・削除で文書末尾が上がった後の後始末
    ///
    /// 文書末尾の後ろに空行が残らないよう、最終行が窓の最下行に来る位置まで戻す
    pub fn clamp_to_content(&mut self, used_len: usize) -> bool {
        let max_start = max_window_start(used_len);
        if self.window_start > max_start {
            self.window_start = max_start;
            true
        } else {
            false
        }
    }

    /// 表示範囲 `[window_start, min(window_end, used_len))`
    pub fn visible_span(&self, used_len: usize) -> Range<usize> {
        let end = self.window_end().min(used_len).max(self.window_start);
        self.window_start..end
    }

    /// パネル上のカーソル位置
    pub fn cursor_screen_pos(&self, cursor_offset: usize) -> usize {
        cursor_offset.saturating_sub(self.window_start).min(WINDOW_SIZE - 1)
    }
}

fn row_start(offset: usize) -> usize {
    offset - offset % ROW_WIDTH
}

// 末尾オフセット（カーソルが置ける最後の位置）の行を最下行とする窓位置
fn max_window_start(used_len: usize) -> usize {
    (row_start(used_len) + ROW_WIDTH).saturating_sub(WINDOW_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_inside_window_keeps_start() {
        let mut viewport = ViewportScroller::new();
        assert!(!viewport.reconcile(79));
        assert_eq!(viewport.window_start(), 0);
    }

    #[test]
    fn test_scrolls_down_by_rows() {
        let mut viewport = ViewportScroller::new();
        assert!(viewport.reconcile(80));
        assert_eq!(viewport.window_start(), 40);

        viewport.reconcile(81);
        assert_eq!(viewport.window_start(), 40);
        assert_eq!(viewport.visible_span(81), 40..81);
        assert_eq!(viewport.cursor_screen_pos(81), 41);
    }

    #[test]
    fn test_jump_far_down_aligns_to_rows() {
        let mut viewport = ViewportScroller::new();
        viewport.reconcile(16384);
        assert_eq!(viewport.window_start(), 16320);
        assert_eq!(viewport.window_start() % ROW_WIDTH, 0);
        assert_eq!(viewport.cursor_screen_pos(16384), 64);
    }

    #[test]
    fn test_scrolls_up_to_cursor_row() {
        let mut viewport = ViewportScroller::new();
        viewport.reconcile(200);
        assert_eq!(viewport.window_start(), 160);

        viewport.reconcile(125);
        assert_eq!(viewport.window_start(), 120);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut viewport = ViewportScroller::new();
        viewport.reconcile(173);
        let start = viewport.window_start();
        assert!(!viewport.reconcile(173));
        assert_eq!(viewport.window_start(), start);
    }

    #[test]
    fn test_clamp_removes_blank_trailing_row() {
        let mut viewport = ViewportScroller::new();
        viewport.reconcile(200);
        // 最終行(160..200)が窓の先頭行になっている状態から
        viewport.reconcile(165);
        assert_eq!(viewport.window_start(), 160);

        assert!(viewport.clamp_to_content(170));
        assert_eq!(viewport.window_start(), 120);
        assert_eq!(viewport.visible_span(170), 120..170);
    }

    #[test]
    fn test_clamp_keeps_short_documents_at_origin() {
        let mut viewport = ViewportScroller::new();
        assert!(!viewport.clamp_to_content(45));
        assert_eq!(viewport.window_start(), 0);
    }

    #[test]
    fn test_visible_span_of_empty_document() {
        let viewport = ViewportScroller::new();
        assert_eq!(viewport.visible_span(0), 0..0);
    }
}
