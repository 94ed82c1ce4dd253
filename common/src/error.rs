//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! 設定読み込み失敗のみがプロセスを即終了させる。それ以外の失敗は
//! すべてチェック結果（`CheckOutcome`）またはログ行としてデータ化される。

use thiserror::Error;

/// Configuration error type
///
/// 設定の読み込み・検証エラー。チェック実行前に発生し、常に致命的。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file read/parse error
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Warning threshold is not below the critical threshold
    #[error("Invalid thresholds for check '{name}': warn {warn} must be below crit {crit}")]
    InvertedThresholds {
        /// Name of the offending check
        name: String,
        /// Configured warning threshold
        warn: f32,
        /// Configured critical threshold
        crit: f32,
    },

    /// Percentage outside 0..=100
    #[error("Invalid percentage {value} for check '{name}' (must be 0-100)")]
    InvalidPercent {
        /// Name of the offending check
        name: String,
        /// Offending value
        value: f32,
    },

    /// Check name used more than once
    #[error("Duplicate check name: {0}")]
    DuplicateName(String),

    /// Configuration declares no checks at all
    #[error("No checks configured")]
    NoChecks,

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Registry error type
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Check name collides with an already registered check
    #[error("Duplicate check name: {0}")]
    DuplicateName(String),
}

/// Probe execution error type
///
/// プローブが「測定できなかった」ことを表す。健全/不健全の判定そのものは
/// `CheckOutcome` で表現され、このエラーはAggregatorのポリシーにより
/// WARNまたはFAILの結果へ変換される。
#[derive(Debug, Error)]
pub enum ProbeError {
    /// HTTP request error
    #[error("HTTP probe error: {0}")]
    Http(String),

    /// Readiness command error
    #[error("Command probe error: {0}")]
    Command(String),

    /// System metrics read error
    #[error("Metrics read error: {0}")]
    Metrics(String),

    /// Probe exceeded its timeout
    #[error("timed out after {secs}s")]
    Timeout {
        /// Timeout that was exceeded, in seconds
        secs: u64,
    },
}

/// Journal error type
///
/// 起動時のディレクトリ作成・ファイルオープン失敗は致命的。
/// オープン後の書き込み失敗は握りつぶされ、カウンタに記録される。
#[derive(Debug, Error)]
pub enum JournalError {
    /// Log directory could not be created
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Log file could not be opened for appending
    #[error("Failed to open log file {path}: {source}")]
    Open {
        /// File that could not be opened
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Notification error type
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Alert sink request failed
    #[error("Alert delivery failed: {0}")]
    Delivery(String),

    /// Alert sink responded with a non-success status
    #[error("Alert sink returned HTTP {0}")]
    Status(u16),

    /// Alert HTTP client could not be constructed
    #[error("Failed to build alert client: {0}")]
    Client(String),
}

/// stackwatch error type
///
/// バイナリ側で各レイヤーのエラーを束ねる型。
#[derive(Debug, Error)]
pub enum WatchError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Registry error
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Journal error
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Notification error
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Result type alias (configuration)
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias (probes)
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Result type alias (stackwatch)
pub type WatchResult<T> = Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_inverted_thresholds_display() {
        let error = ConfigError::InvertedThresholds {
            name: "disk".to_string(),
            warn: 90.0,
            crit: 80.0,
        };
        assert_eq!(
            error.to_string(),
            "Invalid thresholds for check 'disk': warn 90 must be below crit 80"
        );
    }

    #[test]
    fn test_config_error_duplicate_name_display() {
        let error = ConfigError::DuplicateName("n8n".to_string());
        assert_eq!(error.to_string(), "Duplicate check name: n8n");
    }

    #[test]
    fn test_probe_error_timeout_display() {
        let error = ProbeError::Timeout { secs: 5 };
        assert_eq!(error.to_string(), "timed out after 5s");
    }

    #[test]
    fn test_notify_error_status_display() {
        let error = NotifyError::Status(503);
        assert_eq!(error.to_string(), "Alert sink returned HTTP 503");
    }

    #[test]
    fn test_watch_error_from_config_is_transparent() {
        let error: WatchError = ConfigError::NoChecks.into();
        assert_eq!(error.to_string(), "No checks configured");
    }

    #[test]
    fn test_registry_error_display() {
        let error = RegistryError::DuplicateName("caddy".to_string());
        assert_eq!(error.to_string(), "Duplicate check name: caddy");
    }
}
