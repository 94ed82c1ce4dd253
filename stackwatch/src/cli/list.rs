//! list サブコマンド
//!
//! 設定済みチェックの一覧を表示します。

use crate::config;
use clap::Args;
use stackwatch_common::config::WatchConfig;
use stackwatch_common::error::WatchResult;
use std::path::PathBuf;

/// list サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// チェック一覧（名前・種別・対象）を表示する
pub fn execute(args: &ListArgs) -> WatchResult<()> {
    let path = args.config.clone().unwrap_or_else(config::config_path);
    let watch_config = WatchConfig::load(&path)?;

    for check in &watch_config.http {
        println!("{:<24} liveness   {}", check.name, check.url);
    }
    for check in &watch_config.command {
        println!(
            "{:<24} readiness  {} {}",
            check.name,
            check.program,
            check.args.join(" ")
        );
    }
    for check in &watch_config.resource {
        println!(
            "{:<24} resource   {} (warn {:.0}%, crit {:.0}%)",
            check.name,
            check.metric.as_str(),
            check.warn_percent,
            check.crit_percent
        );
    }

    Ok(())
}
