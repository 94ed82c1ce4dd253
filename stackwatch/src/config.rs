//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs.
//!
//! チェック定義そのものはTOMLファイル（`stackwatch_common::config::WatchConfig`）で
//! 管理し、ここではプロセスレベルの環境変数のみを扱う。

use std::path::PathBuf;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Arguments
/// * `new_name` - The new environment variable name (preferred)
/// * `old_name` - The deprecated environment variable name (fallback)
///
/// # Returns
/// * `Some(value)` - The environment variable value
/// * `None` - Neither variable is set
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
///
/// Similar to `get_env_with_fallback`, but returns a default value
/// if neither variable is set.
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns the default value if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// 設定ファイルパスを解決する
///
/// 環境変数 `STACKWATCH_CONFIG`（旧: `HEALTHCHECK_CONFIG`）から取得し、
/// 未設定の場合は `stackwatch.toml` を返す。
pub fn config_path() -> PathBuf {
    PathBuf::from(get_env_with_fallback_or(
        "STACKWATCH_CONFIG",
        "HEALTHCHECK_CONFIG",
        stackwatch_common::config::DEFAULT_CONFIG_PATH,
    ))
}

/// アラートヘッダに載せるホスト識別子を解決する
///
/// コンテナ内などホスト名が意味を持たない環境向けに
/// `STACKWATCH_HOSTNAME`（旧: `HEALTHCHECK_HOSTNAME`）で上書きできる。
pub fn host_identity() -> String {
    if let Some(name) = get_env_with_fallback("STACKWATCH_HOSTNAME", "HEALTHCHECK_HOSTNAME") {
        return name;
    }
    whoami::hostname()
}
