//! キー入力源
//!
//! 1回の呼び出しで1キーを返すブロッキングな入力デバイスの契約

use super::keybinding::{Key, Modifiers};
use crate::error::InputError;
use std::collections::VecDeque;

/// キーデバイスの契約
pub trait KeySource {
    /// 次のキーが押されるまでブロックする
    fn next_key(&mut self) -> Result<Key, InputError>;

    /// 呼び出し時点の修飾キーの状態
    fn modifiers(&self) -> Modifiers;
}

impl<K: KeySource + ?Sized> KeySource for &mut K {
    fn next_key(&mut self) -> Result<Key, InputError> {
        (**self).next_key()
    }

    fn modifiers(&self) -> Modifiers {
        (**self).modifiers()
    }
}

/// 事前に用意したキー列を返す入力源
///
/// キー列を使い切ると `Exhausted` を返す
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeySource {
    pending: VecDeque<(Key, Modifiers)>,
    current: Modifiers,
}

impl ScriptedKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 修飾キー付きでキーを追加
    pub fn push(&mut self, key: Key, modifiers: Modifiers) -> &mut Self {
        self.pending.push_back((key, modifiers));
        self
    }

    /// 修飾キーなしでキーを追加
    pub fn push_key(&mut self, key: Key) -> &mut Self {
        self.push(key, Modifiers::NONE)
    }

    /// 文字列を1文字ずつ追加（`'\n'` は Enter）
    pub fn push_text(&mut self, text: &str) -> &mut Self {
        for ch in text.chars() {
            let key = if ch == '\n' { Some(Key::Enter) } else { Key::from_char(ch) };
            if let Some(key) = key {
                self.push_key(key);
            }
        }
        self
    }

    /// Control 付きの文字を追加
    pub fn push_control(&mut self, ch: char) -> &mut Self {
        let modifiers = if ch.is_ascii_uppercase() {
            Modifiers::CONTROL_SHIFT
        } else {
            Modifiers::CONTROL
        };
        match Key::from_char(ch) {
            Some(key) => self.push(key, modifiers),
            None => self,
        }
    }

    /// 未消費のキー数
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl KeySource for ScriptedKeySource {
    fn next_key(&mut self) -> Result<Key, InputError> {
        let (key, modifiers) = self.pending.pop_front().ok_or(InputError::Exhausted)?;
        self.current = modifiers;
        Ok(key)
    }

    fn modifiers(&self) -> Modifiers {
        self.current
    }
}
