//! 固定容量テキストバッファ
//!
//! 1文字1バイトのASCIIストア。値 `0x00` のセルは「未使用」を表す番兵で、
//! 本文にNULを含めることはできない。使用中のセルは常に `[0, used_len)` の
//! 連続した先頭領域を占め（prefix-dense）、`[used_len, capacity)` は全て0である。

use crate::error::{buffer::Result, BufferError};

/// リファレンス機のバッファ容量（16KB）
pub const DEFAULT_CAPACITY: usize = 16384;

/// 未使用セルを表す番兵
pub const EMPTY_CELL: u8 = 0x00;

/// 読み込み結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// バッファに格納されたバイト数
    pub loaded: usize,
    /// 容量超過または途中のNULで切り詰められたか
    pub truncated: bool,
}

/// 固定容量テキストバッファ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    /// セル（容量分、未使用は0）
    cells: Box<[u8]>,
    /// 使用中の長さ（増分管理）
    used_len: usize,
}

impl TextBuffer {
    /// デフォルト容量で空のバッファを作成
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 指定容量で空のバッファを作成
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![EMPTY_CELL; capacity].into_boxed_slice(),
            used_len: 0,
        }
    }

    /// 容量を取得
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// 使用中の長さを取得
    pub fn used_len(&self) -> usize {
        self.used_len
    }

    pub fn is_empty(&self) -> bool {
        self.used_len == 0
    }

    pub fn is_full(&self) -> bool {
        self.used_len == self.capacity()
    }

    /// 使用中の領域
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells[..self.used_len]
    }

    /// 指定位置のセル（範囲外は `None`）
    pub fn cell(&self, offset: usize) -> Option<u8> {
        self.cells.get(offset).copied()
    }

    /// `offset` に挿入し、後続を1つ右へずらす
    ///
    /// 満杯の場合は `OutOfCapacity`
    pub fn insert_at(&mut self, offset: usize, byte: u8) -> Result<()> {
        Self::check_byte(byte)?;
        if self.is_full() {
            return Err(BufferError::OutOfCapacity { capacity: self.capacity() });
        }
        self.check_offset(offset)?;

        self.cells.copy_within(offset..self.used_len, offset + 1);
        self.cells[offset] = byte;
        self.used_len += 1;
        Ok(())
    }

    /// `offset` のセルを上書きする
    ///
    /// 末尾への書き込みは文書を1バイト伸ばす。`offset == capacity` は `OutOfCapacity`
    pub fn overwrite_at(&mut self, offset: usize, byte: u8) -> Result<()> {
        Self::check_byte(byte)?;
        if offset >= self.capacity() {
            return Err(BufferError::OutOfCapacity { capacity: self.capacity() });
        }
        self.check_offset(offset)?;

        self.cells[offset] = byte;
        if offset == self.used_len {
            self.used_len += 1;
        }
        Ok(())
    }

    /// `offset` の直前の1バイトを削除し、後続を左へ詰める
    ///
    /// `offset == 0` は何もしない。削除したバイトを返す
    pub fn delete_before(&mut self, offset: usize) -> Result<Option<u8>> {
        if offset == 0 {
            return Ok(None);
        }
        self.check_offset(offset)?;

        let removed = self.cells[offset - 1];
        self.cells.copy_within(offset..self.used_len, offset - 1);
        self.cells[self.used_len - 1] = EMPTY_CELL;
        self.used_len -= 1;
        Ok(Some(removed))
    }

    /// 非0セルを数え直す
    ///
    /// prefix-dense 不変条件の下では常に `used_len()` と一致する
    pub fn recompute_used_length(&self) -> usize {
        self.cells.iter().filter(|&&byte| byte != EMPTY_CELL).count()
    }

    /// 内容を置き換える
    ///
    /// 容量を超える分と最初のNUL以降は切り詰め、残りは0で埋める
    pub fn load_from(&mut self, bytes: &[u8]) -> LoadReport {
        let text_len = bytes
            .iter()
            .position(|&byte| byte == EMPTY_CELL)
            .unwrap_or(bytes.len());
        let loaded = text_len.min(self.capacity());

        self.cells[..loaded].copy_from_slice(&bytes[..loaded]);
        self.cells[loaded..].fill(EMPTY_CELL);
        self.used_len = loaded;

        LoadReport {
            loaded,
            truncated: loaded < bytes.len(),
        }
    }

    /// 使用中の領域をASCII文字列として取り出す
    ///
    /// 非ASCIIバイトがあれば `NonAscii` を返す（置換はしない）
    pub fn extract_used(&self) -> Result<String> {
        let used = self.as_bytes();
        if let Some(offset) = used.iter().position(|byte| !byte.is_ascii()) {
            return Err(BufferError::NonAscii { offset, byte: used[offset] });
        }
        Ok(used.iter().map(|&byte| byte as char).collect())
    }

    /// 全セルを0に戻す
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
        self.used_len = 0;
    }

    /// 空白区切りの単語数
    pub fn word_count(&self) -> usize {
        self.as_bytes()
            .split(|byte| byte.is_ascii_whitespace())
            .filter(|word| !word.is_empty())
            .count()
    }

    fn check_byte(byte: u8) -> Result<()> {
        if byte == EMPTY_CELL {
            Err(BufferError::InvalidByte { byte })
        } else {
            Ok(())
        }
    }

    // 使用領域より後ろへの書き込みは穴を作るので拒否する
    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset > self.used_len {
            Err(BufferError::InvalidOffset { offset, used: self.used_len })
        } else {
            Ok(())
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
