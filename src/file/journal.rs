//! 日記エントリの命名

use chrono::{DateTime, Local, TimeZone};

/// 日記ファイル名の書式（例: `20240131T235959.txt`）
pub const JOURNAL_NAME_FORMAT: &str = "%Y%m%dT%H%M%S.txt";

/// 指定時刻の日記ファイル名
pub fn journal_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(JOURNAL_NAME_FORMAT).to_string()
}

/// 現在時刻（ローカル）の日記ファイル名
pub fn journal_file_name_now() -> String {
    journal_file_name(&Local::now())
}
