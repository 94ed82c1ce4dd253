//! ジャーナル
//!
//! チェック結果とライフサイクルイベントの恒久的な監査ログ。
//! 1行 `[YYYY-MM-DD HH:MM:SS] LEVEL: message` 形式でファイルと標準出力へ追記し、
//! サイズ超過時は `.old` サフィックスへ退避してから書き続ける。
//!
//! ログの書き込み失敗でヘルスチェック自体を中断してはならないため、
//! オープン後の書き込みエラーは握りつぶし、カウンタにのみ記録する。

use chrono::Local;
use stackwatch_common::config::JournalConfig;
use stackwatch_common::error::JournalError;
use stackwatch_common::types::CheckStatus;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// ジャーナル行のレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalLevel {
    /// 情報
    Info,
    /// 警告
    Warn,
    /// エラー
    Error,
}

impl JournalLevel {
    /// レベルを行ヘッダ用の文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalLevel::Info => "INFO",
            JournalLevel::Warn => "WARN",
            JournalLevel::Error => "ERROR",
        }
    }

    /// チェック結果ステータスに対応するレベル
    pub fn from_status(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Ok => JournalLevel::Info,
            CheckStatus::Warn => JournalLevel::Warn,
            CheckStatus::Fail => JournalLevel::Error,
        }
    }
}

/// 追記専用・ローテーション付きジャーナル
///
/// 書き込みは内部ミューテックスで直列化される（並列プローブからの
/// 行の混線防止）。
pub struct Journal {
    path: PathBuf,
    old_path: PathBuf,
    max_bytes: u64,
    file: Mutex<File>,
    dropped_writes: AtomicU64,
}

impl Journal {
    /// ジャーナルを開く
    ///
    /// ディレクトリがなければ作成する。パスが書き込み不能な場合は
    /// `JournalError` を返す（起動時の致命的エラー）。
    pub fn open(dir: &Path, file_name: &str, max_bytes: u64) -> Result<Self, JournalError> {
        std::fs::create_dir_all(dir).map_err(|source| JournalError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;

        let path = dir.join(file_name);
        let old_path = PathBuf::from(format!("{}.old", path.display()));
        let file = Self::open_append(&path)?;

        Ok(Self {
            path,
            old_path,
            max_bytes,
            file: Mutex::new(file),
            dropped_writes: AtomicU64::new(0),
        })
    }

    /// 設定からジャーナルを開く
    pub fn from_config(config: &JournalConfig) -> Result<Self, JournalError> {
        Self::open(Path::new(&config.dir), &config.file, config.max_bytes)
    }

    fn open_append(path: &Path) -> Result<File, JournalError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| JournalError::Open {
                path: path.display().to_string(),
                source,
            })
    }

    /// 1行を記録する
    ///
    /// ファイルと標準出力の両方へ書く。書き込み前にサイズを確認し、
    /// 閾値超過なら先にローテーションする。書き込み失敗はパスを
    /// 中断せず、`dropped_writes` に計上される。
    pub fn record(&self, level: JournalLevel, message: &str) {
        let line = format!(
            "[{}] {}: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.as_str(),
            message
        );
        println!("{line}");

        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(_) => {
                self.dropped_writes.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        if let Err(e) = self.rotate_locked(&mut guard) {
            // ローテーション失敗時は既存ファイルへ書き続ける
            tracing::debug!("Journal rotation failed: {}", e);
        }

        if writeln!(&mut *guard, "{line}").is_err() {
            self.dropped_writes.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// サイズ超過時にローテーションを実行する
    ///
    /// 現在のファイルが閾値を超えている場合、`.old`（既存の`.old`は上書き）へ
    /// リネームしてから新しいファイルを開き直す。ローテーションしたかを返す。
    pub fn rotate_if_oversized(&self) -> std::io::Result<bool> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| std::io::Error::other("journal lock poisoned"))?;
        self.rotate_locked(&mut guard)
    }

    fn rotate_locked(&self, file: &mut File) -> std::io::Result<bool> {
        let len = file.metadata()?.len();
        if len <= self.max_bytes {
            return Ok(false);
        }

        if self.old_path.exists() {
            std::fs::remove_file(&self.old_path)?;
        }
        std::fs::rename(&self.path, &self.old_path)?;

        *file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                std::io::Error::new(e.kind(), format!("reopen after rotation failed: {e}"))
            })?;

        Ok(true)
    }

    /// 握りつぶされた書き込み失敗の件数
    pub fn dropped_writes(&self) -> u64 {
        self.dropped_writes.load(Ordering::Relaxed)
    }

    /// 現在のログファイルパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ローテーション先（`.old`）のパス
    pub fn old_path(&self) -> &Path {
        &self.old_path
    }
}
