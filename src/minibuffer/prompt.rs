//! プロンプト管理
//!
//! ファイル名入力用の1行入力。テキストバッファとは独立した上限付きの蓄積領域を持つ

use crate::input::Key;
use crate::ui::{Frame, WINDOW_SIZE};

/// プロンプトの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// 入力が完了した（前後の空白は除去済み、空にはならない）
    Completed(String),
    /// 入力がキャンセルされた（Escape、または空のまま確定）
    Cancelled,
    /// 入力継続中
    InProgress,
}

/// 1行入力プロンプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInput {
    /// プロンプトメッセージ
    label: String,
    /// 現在の入力内容
    input: String,
    /// 入力の上限（ラベルと合わせてパネルに収まる長さ）
    max_len: usize,
}

impl PromptInput {
    /// 新しいプロンプトを作成
    pub fn new(label: impl Into<String>) -> Self {
        let label: String = label.into();
        // カーソルを入力末尾に置けるよう最後の1セルは空けておく
        let max_len = (WINDOW_SIZE - 1).saturating_sub(label.len());
        Self {
            label,
            input: String::new(),
            max_len,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// 文字を追加（上限に達していれば `false`）
    pub fn add_char(&mut self, ch: char) -> bool {
        if self.input.len() >= self.max_len || !(ch == ' ' || ch.is_ascii_graphic()) {
            return false;
        }
        self.input.push(ch);
        true
    }

    /// 最後の文字を削除
    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    /// キー1つを処理
    pub fn handle_key(&mut self, key: Key) -> PromptResult {
        match key {
            Key::Enter => self.complete_input(),
            Key::Escape => PromptResult::Cancelled,
            Key::Backspace => {
                self.backspace();
                PromptResult::InProgress
            }
            Key::Char(byte) => {
                self.add_char(byte as char);
                PromptResult::InProgress
            }
            _ => PromptResult::InProgress,
        }
    }

    /// 入力を完了
    pub fn complete_input(&self) -> PromptResult {
        let value = self.input.trim();
        if value.is_empty() {
            PromptResult::Cancelled
        } else {
            PromptResult::Completed(value.to_string())
        }
    }

    /// 表示フレームとカーソル位置
    pub fn frame(&self) -> (Frame, usize) {
        let text = format!("{}{}", self.label, self.input);
        (Frame::from_text(&text), text.len().min(WINDOW_SIZE - 1))
    }
}
