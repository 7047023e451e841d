//! ファイルI/O操作
//!
//! 文書はASCIIテキストとして、バッファの使用領域そのまま（末尾の詰め物なし）で保存する

use crate::error::{file::Result, FileError};
use std::fs;
use std::path::{Path, PathBuf};

/// 保存結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// 保存したファイル名
    pub name: String,
    /// 書き込んだバイト数
    pub bytes_written: usize,
}

/// 文書ストアの契約
///
/// 名前が未指定の場合の入力促しはセッション側の責務で、ストアは `MissingName` を返す
pub trait FileStore {
    /// 文書を保存
    fn save(&mut self, name: Option<&str>, bytes: &[u8]) -> Result<SaveReport>;

    /// 文書を読み込む
    fn load(&mut self, name: Option<&str>) -> Result<Vec<u8>>;

    /// 保存済み文書の名前一覧
    fn list_names(&mut self) -> Result<Vec<String>>;
}

impl<S: FileStore + ?Sized> FileStore for &mut S {
    fn save(&mut self, name: Option<&str>, bytes: &[u8]) -> Result<SaveReport> {
        (**self).save(name, bytes)
    }

    fn load(&mut self, name: Option<&str>) -> Result<Vec<u8>> {
        (**self).load(name)
    }

    fn list_names(&mut self) -> Result<Vec<String>> {
        (**self).list_names()
    }
}

/// ディレクトリ直下に文書を置くストア
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    base_dir: PathBuf,
}

impl DirectoryStore {
    /// ストアを開く（ディレクトリがなければ作成）
    pub fn open<P: Into<PathBuf>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.into();
        if !base_dir.is_dir() {
            fs::create_dir_all(&base_dir)?;
        }
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, name: Option<&str>) -> Result<(String, PathBuf)> {
        let name = validate_name(name.ok_or(FileError::MissingName)?)?;
        let path = self.base_dir.join(&name);
        Ok((name, path))
    }
}

impl FileStore for DirectoryStore {
    fn save(&mut self, name: Option<&str>, bytes: &[u8]) -> Result<SaveReport> {
        let (name, path) = self.resolve(name)?;
        ensure_ascii(bytes)?;

        // 一時ファイルに書き込んでからアトミックに移動
        let temp_path = self.base_dir.join(format!(".{}.tmp", name));
        fs::write(&temp_path, bytes)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        log::info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(SaveReport {
            name,
            bytes_written: bytes.len(),
        })
    }

    fn load(&mut self, name: Option<&str>) -> Result<Vec<u8>> {
        let (name, path) = self.resolve(name)?;
        if !path.is_file() {
            return Err(FileError::NotFound { name });
        }

        let bytes = fs::read(&path)?;
        ensure_ascii(&bytes)?;
        log::info!("loaded {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes)
    }

    fn list_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // 保存途中の一時ファイルと非ASCII名は一覧に出さない
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with('.') && validate_name(name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// ファイル名を検証して前後の空白を除いたものを返す
pub fn validate_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    let invalid = || FileError::InvalidName { name: name.to_string() };

    if name.is_empty() {
        return Err(FileError::MissingName);
    }
    if name == "." || name == ".." {
        return Err(invalid());
    }
    if !name.bytes().all(|byte| byte == b' ' || byte.is_ascii_graphic()) {
        return Err(invalid());
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid());
    }
    Ok(name.to_string())
}

fn ensure_ascii(bytes: &[u8]) -> Result<()> {
    match bytes.iter().position(|byte| !byte.is_ascii()) {
        Some(offset) => Err(FileError::Encoding {
            message: format!("non-ASCII byte {:#04x} at {}", bytes[offset], offset),
        }),
        None => Ok(()),
    }
}
