//! 差分レンダリング
//!
//! パネルのバスは1バイトごとに固定の転送時間がかかるため、毎回80セルを
//! 書き直さず、前回送ったフレームと異なるセルだけを送る。
//! フレームの構築（純粋関数）とデバイスへの書き込み（`DiffRenderer::render`）は分離している。

use super::display::{is_displayable, DisplaySink};
use super::{ROW_WIDTH, WINDOW_SIZE};
use crate::buffer::{TextBuffer, EMPTY_CELL};
use crate::error::UiError;
use std::fmt;
use std::ops::Range;

/// 改行の表示記号（パネルには折り返しの概念がない）
pub const NEWLINE_MARKER: u8 = b'`';

/// パネル1画面分（空白詰めの80文字）
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    cells: [u8; WINDOW_SIZE],
}

impl Frame {
    /// 全て空白のフレーム
    pub fn blank() -> Self {
        Self { cells: [b' '; WINDOW_SIZE] }
    }

    /// 先頭から文字列を流し込む（80文字を超える分は捨てる）
    pub fn from_text(text: &str) -> Self {
        let mut frame = Self::blank();
        frame.put(0, text, WINDOW_SIZE);
        frame
    }

    /// 1行目・2行目を指定して作成
    ///
    /// 2行目が空なら1行目は2行目まで流れ込んでよい
    pub fn from_rows(top: &str, bottom: &str) -> Self {
        if bottom.is_empty() {
            return Self::from_text(top);
        }
        let mut frame = Self::blank();
        frame.put(0, top, ROW_WIDTH);
        frame.put(ROW_WIDTH, bottom, ROW_WIDTH);
        frame
    }

    fn put(&mut self, start: usize, text: &str, limit: usize) {
        for (cell, byte) in self.cells[start..].iter_mut().zip(text.bytes()).take(limit) {
            *cell = display_byte(byte);
        }
    }

    /// セルのバイト列
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// 文字列として取得
    pub fn as_str(&self) -> &str {
        // セルは常に表示可能なASCII
        std::str::from_utf8(&self.cells).unwrap_or_default()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::blank()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({:?})", self.as_str())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 表示範囲のバッファ内容からフレームを作る
///
/// `0x00` は空白、`'\n'` はバッククォートで表示する
pub fn build_frame(buffer: &TextBuffer, visible_span: Range<usize>) -> Frame {
    let mut frame = Frame::blank();
    let span = visible_span.start..visible_span.end.min(buffer.capacity());
    for (cell, offset) in frame.cells.iter_mut().zip(span) {
        *cell = match buffer.cell(offset) {
            Some(EMPTY_CELL) | None => b' ',
            Some(b'\n') => NEWLINE_MARKER,
            Some(byte) => display_byte(byte),
        };
    }
    frame
}

fn display_byte(byte: u8) -> u8 {
    if is_displayable(byte) {
        byte
    } else {
        b'?'
    }
}

/// 描画統計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// 書き直したセル数
    pub cells_changed: usize,
    /// 累計描画回数
    pub total_renders: u64,
    /// 累計書き直しセル数
    pub total_cells_changed: u64,
}

/// 差分レンダラー
#[derive(Debug, Clone)]
pub struct DiffRenderer {
    /// 最後にパネルへ送ったフレーム
    last_frame: Frame,
    stats: RenderStats,
}

impl DiffRenderer {
    /// パネルが空白である前提で作成
    pub fn new() -> Self {
        Self {
            last_frame: Frame::blank(),
            stats: RenderStats::default(),
        }
    }

    pub fn last_frame(&self) -> &Frame {
        &self.last_frame
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// パネルを消去したことを記録する（次回は空白との差分を送る）
    pub fn mark_cleared(&mut self) {
        self.last_frame = Frame::blank();
    }

    /// 変化したセルだけを書き込み、最後にカーソルを編集位置へ置く
    pub fn render<D: DisplaySink + ?Sized>(
        &mut self,
        display: &mut D,
        frame: &Frame,
        cursor_screen_pos: usize,
    ) -> Result<RenderStats, UiError> {
        let mut cells_changed = 0;
        for index in 0..WINDOW_SIZE {
            if frame.cells[index] == self.last_frame.cells[index] {
                continue;
            }
            display.set_cursor(index)?;
            display.write(&frame.as_str()[index..=index])?;
            // 書き込めたセルは確定させる（途中で失敗しても次回正しく差分を取る）
            self.last_frame.cells[index] = frame.cells[index];
            cells_changed += 1;
        }
        display.set_cursor(cursor_screen_pos.min(WINDOW_SIZE - 1))?;

        self.stats.cells_changed = cells_changed;
        self.stats.total_renders += 1;
        self.stats.total_cells_changed += cells_changed as u64;
        if cells_changed > 0 {
            log::debug!("rendered {} changed cells", cells_changed);
        }
        Ok(self.stats)
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}
