//! ロギング初期化ユーティリティ
//!
//! tracingによる診断ログ（stderr）を初期化する。チェック結果の恒久的な記録は
//! `journal`モジュールが担い、こちらは開発・運用時の診断用。

use tracing_subscriber::EnvFilter;

/// tracingサブスクライバを初期化する
///
/// ログレベルは環境変数 `STACKWATCH_LOG_LEVEL`、未設定なら `RUST_LOG`、
/// どちらもなければ `info` を使用する。二重初期化はエラーになる。
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env("STACKWATCH_LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
}
