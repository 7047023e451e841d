//! 文書一覧からの選択
//!
//! 上下キーで選択し、端では反対側へ回り込む

use crate::error::FileError;
use crate::ui::Frame;

/// 選択中の文書一覧
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileList {
    names: Vec<String>,
    index: usize,
}

impl FileList {
    /// 一覧を作成（空なら `EmptySelection`）
    pub fn new(names: Vec<String>) -> Result<Self, FileError> {
        if names.is_empty() {
            return Err(FileError::EmptySelection);
        }
        Ok(Self { names, index: 0 })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 選択中の名前
    pub fn selected(&self) -> &str {
        &self.names[self.index]
    }

    pub fn select_next(&mut self) {
        self.index = (self.index + 1) % self.names.len();
    }

    pub fn select_previous(&mut self) {
        self.index = (self.index + self.names.len() - 1) % self.names.len();
    }

    /// 表示フレームとカーソル位置
    pub fn frame(&self) -> (Frame, usize) {
        let text = format!("> {}", self.selected());
        (Frame::from_text(&text), 0)
    }
}
