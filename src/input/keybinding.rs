//! キーバインディング
//!
//! キー入力トークンと、編集状態でのコマンド解決

use std::fmt;

/// キーデバイスが返すトークン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// 印字可能なASCII文字（0x20..=0x7E、シフト適用済み）
    Char(u8),
    Enter,
    Backspace,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Escape,
    /// 何も起きなかった（修飾キー単独など）
    None,
}

impl Key {
    /// 文字からキーを作成（印字可能なASCII以外は `None`）
    pub fn from_char(ch: char) -> Option<Self> {
        if ch == ' ' || ch.is_ascii_graphic() {
            Some(Key::Char(ch as u8))
        } else {
            None
        }
    }

    /// 印字可能な文字キーならその文字
    pub fn as_char(&self) -> Option<char> {
        match self {
            Key::Char(byte) => Some(*byte as char),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(b' ') => write!(f, "SPC"),
            Key::Char(byte) => write!(f, "{}", *byte as char),
            Key::Enter => write!(f, "RET"),
            Key::Backspace => write!(f, "BS"),
            Key::Insert => write!(f, "INS"),
            Key::Up => write!(f, "UP"),
            Key::Down => write!(f, "DOWN"),
            Key::Left => write!(f, "LEFT"),
            Key::Right => write!(f, "RIGHT"),
            Key::Escape => write!(f, "ESC"),
            Key::None => write!(f, "NONE"),
        }
    }
}

/// 修飾キーの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, control: false };
    pub const CONTROL: Self = Self { shift: false, control: true };
    pub const CONTROL_SHIFT: Self = Self { shift: true, control: true };
}

/// 編集状態でのコマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// 文字を入力（改行を含む）
    Type(u8),
    Backspace,
    MoveLeft,
    MoveRight,
    MoveLineUp,
    MoveLineDown,
    ToggleInsertMode,
    Save,
    Open,
    Browse,
    WordCount,
    NewJournalEntry,
    Quit,
    /// 割り当てなし
    Ignore,
}

/// キーと修飾キーからコマンドを決定
pub fn resolve(key: Key, modifiers: Modifiers) -> EditorCommand {
    if modifiers.control {
        return match key {
            Key::Char(b'q') => EditorCommand::Quit,
            Key::Char(b's') => EditorCommand::Save,
            Key::Char(b'o') => EditorCommand::Open,
            Key::Char(b'O') => EditorCommand::Browse,
            Key::Char(b'w') => EditorCommand::WordCount,
            Key::Char(b'j') => EditorCommand::NewJournalEntry,
            _ => EditorCommand::Ignore,
        };
    }

    match key {
        Key::Char(byte) => EditorCommand::Type(byte),
        Key::Enter => EditorCommand::Type(b'\n'),
        Key::Backspace => EditorCommand::Backspace,
        Key::Insert => EditorCommand::ToggleInsertMode,
        Key::Up => EditorCommand::MoveLineUp,
        Key::Down => EditorCommand::MoveLineDown,
        Key::Left => EditorCommand::MoveLeft,
        Key::Right => EditorCommand::MoveRight,
        Key::Escape | Key::None => EditorCommand::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_keys_type_themselves() {
        assert_eq!(resolve(Key::Char(b'a'), Modifiers::NONE), EditorCommand::Type(b'a'));
        assert_eq!(resolve(Key::Char(b' '), Modifiers::NONE), EditorCommand::Type(b' '));
        assert_eq!(resolve(Key::Enter, Modifiers::NONE), EditorCommand::Type(b'\n'));
    }

    #[test]
    fn test_control_bindings() {
        assert_eq!(resolve(Key::Char(b'q'), Modifiers::CONTROL), EditorCommand::Quit);
        assert_eq!(resolve(Key::Char(b's'), Modifiers::CONTROL), EditorCommand::Save);
        assert_eq!(resolve(Key::Char(b'o'), Modifiers::CONTROL), EditorCommand::Open);
        assert_eq!(resolve(Key::Char(b'O'), Modifiers::CONTROL_SHIFT), EditorCommand::Browse);
        assert_eq!(resolve(Key::Char(b'w'), Modifiers::CONTROL), EditorCommand::WordCount);
        assert_eq!(resolve(Key::Char(b'j'), Modifiers::CONTROL), EditorCommand::NewJournalEntry);
        assert_eq!(resolve(Key::Char(b'x'), Modifiers::CONTROL), EditorCommand::Ignore);
        assert_eq!(resolve(Key::Left, Modifiers::CONTROL), EditorCommand::Ignore);
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(resolve(Key::Up, Modifiers::NONE), EditorCommand::MoveLineUp);
        assert_eq!(resolve(Key::Down, Modifiers::NONE), EditorCommand::MoveLineDown);
        assert_eq!(resolve(Key::Left, Modifiers::NONE), EditorCommand::MoveLeft);
        assert_eq!(resolve(Key::Right, Modifiers::NONE), EditorCommand::MoveRight);
        assert_eq!(resolve(Key::Insert, Modifiers::NONE), EditorCommand::ToggleInsertMode);
        assert_eq!(resolve(Key::Escape, Modifiers::NONE), EditorCommand::Ignore);
    }

    #[test]
    fn test_from_char_rejects_control_characters() {
        assert_eq!(Key::from_char('A'), Some(Key::Char(b'A')));
        assert_eq!(Key::from_char('\0'), None);
        assert_eq!(Key::from_char('\u{e9}'), None);
        assert_eq!(Key::Char(b'z').as_char(), Some('z'));
    }
}
