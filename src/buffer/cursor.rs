//! カーソル位置管理
//!
//! 文字入力・削除・矢印キーをバッファ上のオフセットへ変換する。
//! どの操作の後もオフセットは `[0, used_len]` に収まる。

use super::TextBuffer;
use crate::error::buffer::Result;
use crate::ui::ROW_WIDTH;

/// 編集カーソル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorController {
    /// 文書内のオフセット（表示位置ではない）
    offset: usize,
    /// 挿入モード（falseなら上書き）
    insert_mode: bool,
}

impl CursorController {
    /// 原点・上書きモードで作成
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn insert_mode(&self) -> bool {
        self.insert_mode
    }

    /// 挿入・上書きモードを切り替え、新しいモードを返す
    pub fn toggle_insert_mode(&mut self) -> bool {
        self.insert_mode = !self.insert_mode;
        self.insert_mode
    }

    /// 指定位置へ移動（範囲外はクランプ）
    pub fn move_to(&mut self, offset: usize, buffer: &TextBuffer) {
        self.offset = offset;
        self.clamp(buffer);
    }

    /// 原点へ戻す（モードは保持）
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// 1文字入力
    ///
    /// 満杯なら `OutOfCapacity` を返し、文字は捨てられる
    pub fn type_char(&mut self, buffer: &mut TextBuffer, byte: u8) -> Result<()> {
        self.clamp(buffer);
        let result = if self.insert_mode {
            buffer.insert_at(self.offset, byte)
        } else {
            buffer.overwrite_at(self.offset, byte)
        };

        if result.is_ok() {
            self.offset += 1;
        }
        self.clamp(buffer);
        result
    }

    /// カーソル直前の1文字を削除
    ///
    /// 削除が行われたかを返す（先頭では何もしない）
    pub fn backspace(&mut self, buffer: &mut TextBuffer) -> Result<bool> {
        self.clamp(buffer);
        if self.offset == 0 {
            return Ok(false);
        }

        buffer.delete_before(self.offset)?;
        self.offset -= 1;
        self.clamp(buffer);
        Ok(true)
    }

    pub fn move_left(&mut self, buffer: &TextBuffer) {
        self.offset = self.offset.saturating_sub(1);
        self.clamp(buffer);
    }

    pub fn move_right(&mut self, buffer: &TextBuffer) {
        self.offset = self.offset.saturating_add(1);
        self.clamp(buffer);
    }

    /// 1行（40文字）上へ
    pub fn move_line_up(&mut self, buffer: &TextBuffer) {
        self.offset = self.offset.saturating_sub(ROW_WIDTH);
        self.clamp(buffer);
    }

    /// 1行（40文字）下へ
    pub fn move_line_down(&mut self, buffer: &TextBuffer) {
        self.offset = self.offset.saturating_add(ROW_WIDTH);
        self.clamp(buffer);
    }

    fn clamp(&mut self, buffer: &TextBuffer) {
        self.offset = self.offset.min(buffer.used_len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BufferError;

    fn buffer_with(text: &str, capacity: usize) -> TextBuffer {
        let mut buffer = TextBuffer::with_capacity(capacity);
        buffer.load_from(text.as_bytes());
        buffer
    }

    #[test]
    fn test_type_in_overwrite_mode() {
        let mut buffer = TextBuffer::with_capacity(64);
        let mut cursor = CursorController::new();
        for &byte in b"HELLO" {
            cursor.type_char(&mut buffer, byte).unwrap();
        }
        assert_eq!(buffer.as_bytes(), b"HELLO");
        assert_eq!(cursor.offset(), 5);

        cursor.move_to(1, &buffer);
        cursor.type_char(&mut buffer, b'A').unwrap();
        assert_eq!(buffer.as_bytes(), b"HALLO");
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_type_in_insert_mode() {
        let mut buffer = buffer_with("AC", 64);
        let mut cursor = CursorController::new();
        assert!(cursor.toggle_insert_mode());
        cursor.move_to(1, &buffer);

        cursor.type_char(&mut buffer, b'B').unwrap();
        assert_eq!(buffer.as_bytes(), b"ABC");
        assert_eq!(buffer.used_len(), 3);
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_type_at_last_cell_then_full() {
        let mut buffer = buffer_with("ABC", 4);
        let mut cursor = CursorController::new();
        cursor.move_to(3, &buffer);

        cursor.type_char(&mut buffer, b'D').unwrap();
        assert_eq!(buffer.used_len(), 4);
        assert_eq!(cursor.offset(), 4);

        assert_eq!(
            cursor.type_char(&mut buffer, b'E'),
            Err(BufferError::OutOfCapacity { capacity: 4 })
        );
        assert_eq!(cursor.offset(), 4);
        assert_eq!(buffer.as_bytes(), b"ABCD");
    }

    #[test]
    fn test_backspace_at_origin_is_noop() {
        let mut buffer = buffer_with("AB", 8);
        let mut cursor = CursorController::new();
        let before = buffer.clone();

        assert!(!cursor.backspace(&mut buffer).unwrap());
        assert_eq!(buffer, before);
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn test_backspace_removes_previous() {
        let mut buffer = buffer_with("ABC", 8);
        let mut cursor = CursorController::new();
        cursor.move_to(2, &buffer);

        assert!(cursor.backspace(&mut buffer).unwrap());
        assert_eq!(buffer.as_bytes(), b"AC");
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_horizontal_moves_clamp() {
        let buffer = buffer_with("AB", 8);
        let mut cursor = CursorController::new();
        cursor.move_left(&buffer);
        assert_eq!(cursor.offset(), 0);

        cursor.move_right(&buffer);
        cursor.move_right(&buffer);
        cursor.move_right(&buffer);
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_vertical_moves_clamp() {
        let buffer = buffer_with(&"A".repeat(45), 128);
        let mut cursor = CursorController::new();
        cursor.move_to(45, &buffer);

        cursor.move_line_up(&buffer);
        assert_eq!(cursor.offset(), 5);
        cursor.move_line_up(&buffer);
        assert_eq!(cursor.offset(), 0);

        cursor.move_to(30, &buffer);
        cursor.move_line_down(&buffer);
        assert_eq!(cursor.offset(), 45);
    }

    #[test]
    fn test_move_to_clamps() {
        let buffer = buffer_with("ABC", 8);
        let mut cursor = CursorController::new();
        cursor.move_to(100, &buffer);
        assert_eq!(cursor.offset(), 3);
    }
}
