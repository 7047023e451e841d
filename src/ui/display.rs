//! 表示デバイス
//!
//! パネルは位置指定のみの単純なプロトコル（消去・書き込み・カーソル設定）を受け付ける。
//! `PanelDisplay` はその状態をメモリ上で再現する。

use super::WINDOW_SIZE;
use crate::error::UiError;

/// 表示デバイスの契約
///
/// 各呼び出しはバス転送が終わるまで戻らない
pub trait DisplaySink {
    /// 全セルを空白にし、カーソルを0へ
    fn clear(&mut self) -> Result<(), UiError>;

    /// カーソル位置から文字を書き込む（書き込むたびにカーソルは1つ進む）
    fn write(&mut self, text: &str) -> Result<(), UiError>;

    /// カーソルを絶対位置（0..80）へ移動
    fn set_cursor(&mut self, position: usize) -> Result<(), UiError>;
}

impl<D: DisplaySink + ?Sized> DisplaySink for &mut D {
    fn clear(&mut self) -> Result<(), UiError> {
        (**self).clear()
    }

    fn write(&mut self, text: &str) -> Result<(), UiError> {
        (**self).write(text)
    }

    fn set_cursor(&mut self, position: usize) -> Result<(), UiError> {
        (**self).set_cursor(position)
    }
}

/// 記録された表示操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Clear,
    Write(String),
    SetCursor(usize),
}

/// メモリ上のパネル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelDisplay {
    cells: [u8; WINDOW_SIZE],
    cursor: usize,
    /// バスへ送ったバイト数（コマンド含む）
    bytes_sent: u64,
    /// 操作履歴（記録有効時のみ）
    ops: Option<Vec<DisplayOp>>,
}

impl PanelDisplay {
    pub fn new() -> Self {
        Self {
            cells: [b' '; WINDOW_SIZE],
            cursor: 0,
            bytes_sent: 0,
            ops: None,
        }
    }

    /// 操作履歴を記録するパネル
    pub fn recording() -> Self {
        Self {
            ops: Some(Vec::new()),
            ..Self::new()
        }
    }

    /// 現在の表示内容（80文字）
    pub fn contents(&self) -> String {
        self.cells.iter().map(|&byte| byte as char).collect()
    }

    /// 指定行の表示内容（40文字）
    pub fn row(&self, row: usize) -> String {
        let contents = self.contents();
        let start = (row * super::ROW_WIDTH).min(WINDOW_SIZE);
        let end = (start + super::ROW_WIDTH).min(WINDOW_SIZE);
        contents[start..end].to_string()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// 記録された操作
    pub fn ops(&self) -> &[DisplayOp] {
        self.ops.as_deref().unwrap_or(&[])
    }

    /// 記録をクリア
    pub fn take_ops(&mut self) -> Vec<DisplayOp> {
        self.ops.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn record(&mut self, op: DisplayOp) {
        if let Some(ops) = self.ops.as_mut() {
            ops.push(op);
        }
    }
}

impl Default for PanelDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for PanelDisplay {
    fn clear(&mut self) -> Result<(), UiError> {
        self.cells = [b' '; WINDOW_SIZE];
        self.cursor = 0;
        self.bytes_sent += 1;
        self.record(DisplayOp::Clear);
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), UiError> {
        if let Some(&byte) = text.as_bytes().iter().find(|byte| !is_displayable(**byte)) {
            return Err(UiError::NonPrintable { byte });
        }

        for &byte in text.as_bytes() {
            self.cells[self.cursor] = byte;
            self.cursor = (self.cursor + 1) % WINDOW_SIZE;
        }
        self.bytes_sent += text.len() as u64;
        self.record(DisplayOp::Write(text.to_string()));
        Ok(())
    }

    fn set_cursor(&mut self, position: usize) -> Result<(), UiError> {
        if position >= WINDOW_SIZE {
            return Err(UiError::InvalidCursorPosition { position });
        }
        self.cursor = position;
        self.bytes_sent += 1;
        self.record(DisplayOp::SetCursor(position));
        Ok(())
    }
}

/// パネルが表示できる文字（ASCII印字可能文字）
pub fn is_displayable(byte: u8) -> bool {
    byte == b' ' || byte.is_ascii_graphic()
}
