//! validate サブコマンド
//!
//! 設定の読み込みと検証のみを行い、チェックは実行しません。

use crate::config;
use clap::Args;
use stackwatch_common::config::WatchConfig;
use stackwatch_common::error::WatchResult;
use std::path::PathBuf;

/// validate サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// 設定を読み込み・検証して概要を表示する
pub fn execute(args: &ValidateArgs) -> WatchResult<()> {
    let path = args.config.clone().unwrap_or_else(config::config_path);
    let watch_config = WatchConfig::load(&path)?;

    println!(
        "Configuration OK: {} ({} checks)",
        path.display(),
        watch_config.check_count()
    );
    if watch_config.alert.is_some() {
        println!("Alert sink: configured");
    } else {
        println!("Alert sink: not configured (notifications disabled)");
    }

    Ok(())
}
