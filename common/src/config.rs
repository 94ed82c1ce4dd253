//! 設定管理
//!
//! WatchConfig（ジャーナル・アラート・パス・チェック定義）の構造体と検証
//!
//! 設定読み込みの失敗は致命的エラーとしてプローブ実行前にプロセスを終了させる。

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// デフォルトの設定ファイルパス
pub const DEFAULT_CONFIG_PATH: &str = "stackwatch.toml";

/// stackwatch設定
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WatchConfig {
    /// ジャーナル設定
    #[serde(default)]
    pub journal: JournalConfig,

    /// アラート送信先設定（未設定の場合は通知を行わない）
    #[serde(default)]
    pub alert: Option<AlertConfig>,

    /// パス実行設定
    #[serde(default)]
    pub pass: PassConfig,

    /// HTTP死活チェック定義
    #[serde(default)]
    pub http: Vec<HttpCheckConfig>,

    /// コマンドレディネスチェック定義
    #[serde(default)]
    pub command: Vec<CommandCheckConfig>,

    /// リソースしきい値チェック定義
    #[serde(default)]
    pub resource: Vec<ResourceCheckConfig>,
}

/// ジャーナル（追記専用ログファイル）設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// ログディレクトリ (デフォルト: "./stackwatch-logs")
    #[serde(default = "default_journal_dir")]
    pub dir: String,

    /// ログファイル名 (デフォルト: "health.log")
    #[serde(default = "default_journal_file")]
    pub file: String,

    /// ローテーション閾値（バイト）(デフォルト: 1 MiB)
    #[serde(default = "default_journal_max_bytes")]
    pub max_bytes: u64,
}

fn default_journal_dir() -> String {
    "./stackwatch-logs".to_string()
}

fn default_journal_file() -> String {
    "health.log".to_string()
}

fn default_journal_max_bytes() -> u64 {
    1024 * 1024
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            dir: default_journal_dir(),
            file: default_journal_file(),
            max_bytes: default_journal_max_bytes(),
        }
    }
}

/// アラート送信先（メッセージングAPI）設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// 送信先URL
    pub url: String,

    /// Bearerトークン（オプション）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// 宛先識別子（チャットID等）
    pub recipient: String,

    /// 送信タイムアウト（秒）(デフォルト: 10)
    #[serde(default = "default_alert_timeout")]
    pub timeout_secs: u64,
}

fn default_alert_timeout() -> u64 {
    10
}

/// パス実行設定
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PassConfig {
    /// プローブごとのタイムアウト（秒）(デフォルト: 5)
    #[serde(default = "default_check_timeout")]
    pub check_timeout_secs: u64,

    /// パス全体のウォールクロック上限（秒）(デフォルト: 60)
    #[serde(default = "default_wall_clock")]
    pub wall_clock_secs: u64,

    /// プローブを並列実行するか (デフォルト: true)
    #[serde(default = "default_concurrent")]
    pub concurrent: bool,
}

fn default_check_timeout() -> u64 {
    5
}

fn default_wall_clock() -> u64 {
    60
}

fn default_concurrent() -> bool {
    true
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            check_timeout_secs: default_check_timeout(),
            wall_clock_secs: default_wall_clock(),
            concurrent: default_concurrent(),
        }
    }
}

/// HTTP死活チェック定義
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpCheckConfig {
    /// チェック名（全チェックを通して一意）
    pub name: String,

    /// GET対象URL
    pub url: String,

    /// 許容ステータスコード (デフォルト: [200])
    #[serde(default = "default_accept")]
    pub accept: Vec<u16>,

    /// プローブタイムアウト上書き（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_accept() -> Vec<u16> {
    vec![200]
}

/// コマンドレディネスチェック定義
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandCheckConfig {
    /// チェック名（全チェックを通して一意）
    pub name: String,

    /// 実行するプログラム
    pub program: String,

    /// プログラム引数
    #[serde(default)]
    pub args: Vec<String>,

    /// プローブタイムアウト上書き（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// リソースしきい値チェック定義
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCheckConfig {
    /// チェック名（全チェックを通して一意）
    pub name: String,

    /// 測定対象メトリクス
    pub metric: ResourceMetric,

    /// ディスク使用率の対象パス (デフォルト: "/")
    #[serde(default = "default_resource_path")]
    pub path: String,

    /// 警告しきい値（%）
    pub warn_percent: f32,

    /// 重大しきい値（%）
    pub crit_percent: f32,

    /// 測定不能時のポリシー (デフォルト: warn)
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

fn default_resource_path() -> String {
    "/".to_string()
}

/// リソースメトリクス種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMetric {
    /// ディスク使用率
    Disk,
    /// メモリ使用率
    Memory,
    /// CPU使用率
    Cpu,
}

impl ResourceMetric {
    /// メトリクス種別を文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceMetric::Disk => "disk",
            ResourceMetric::Memory => "memory",
            ResourceMetric::Cpu => "cpu",
        }
    }
}

/// 測定不能時のポリシー
///
/// 測定できないことは障害の証明ではないため、デフォルトはWARN。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// 測定不能をWARNとして記録
    #[default]
    Warn,
    /// 測定不能をFAILとして記録
    Fail,
}

impl WatchConfig {
    /// 設定ファイルと環境変数（`STACKWATCH`プレフィックス）から設定を読み込む
    ///
    /// 読み込み後に`validate()`を実行する。失敗は`ConfigError`として返り、
    /// 呼び出し側（CLI）はプローブ実行前にプロセスを終了させる。
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("STACKWATCH").separator("__"))
            .build()?;

        let cfg: WatchConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// 設定値を検証する
    ///
    /// しきい値の型付き検証はここで一度だけ行い、プローブ側では数値として扱う。
    pub fn validate(&self) -> ConfigResult<()> {
        if self.check_count() == 0 {
            return Err(ConfigError::NoChecks);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for name in self.check_names() {
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateName(name.to_string()));
            }
        }

        for check in &self.http {
            if check.url.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Empty URL for check '{}'",
                    check.name
                )));
            }
            if check.accept.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Empty accept list for check '{}'",
                    check.name
                )));
            }
        }

        for check in &self.command {
            if check.program.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Empty program for check '{}'",
                    check.name
                )));
            }
        }

        for check in &self.resource {
            for value in [check.warn_percent, check.crit_percent] {
                if !(0.0..=100.0).contains(&value) {
                    return Err(ConfigError::InvalidPercent {
                        name: check.name.clone(),
                        value,
                    });
                }
            }
            if check.warn_percent >= check.crit_percent {
                return Err(ConfigError::InvertedThresholds {
                    name: check.name.clone(),
                    warn: check.warn_percent,
                    crit: check.crit_percent,
                });
            }
        }

        if let Some(alert) = &self.alert {
            if alert.url.trim().is_empty() {
                return Err(ConfigError::Validation("Empty alert URL".to_string()));
            }
            if alert.recipient.trim().is_empty() {
                return Err(ConfigError::Validation("Empty alert recipient".to_string()));
            }
        }

        Ok(())
    }

    /// 登録されるチェックの総数
    pub fn check_count(&self) -> usize {
        self.http.len() + self.command.len() + self.resource.len()
    }

    /// 宣言順（http → command → resource）のチェック名
    pub fn check_names(&self) -> impl Iterator<Item = &str> {
        self.http
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.command.iter().map(|c| c.name.as_str()))
            .chain(self.resource.iter().map(|c| c.name.as_str()))
    }
}
