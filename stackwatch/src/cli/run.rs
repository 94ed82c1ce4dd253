//! run サブコマンド
//!
//! 1パス分のヘルスチェックを実行します。

use crate::aggregator::Aggregator;
use crate::config;
use crate::journal::{Journal, JournalLevel};
use crate::notifier::{self, Notifier};
use crate::registry::CheckRegistry;
use clap::Args;
use stackwatch_common::config::WatchConfig;
use stackwatch_common::error::WatchResult;
use stackwatch_common::types::{CheckStatus, RunReport};
use std::path::PathBuf;
use tracing::{info, warn};

/// run サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip alert delivery even when checks warn or fail
    #[arg(long, default_value_t = false)]
    pub no_notify: bool,
}

/// 1パスを実行し、総合ステータスを返す
///
/// 設定・ジャーナルの初期化失敗のみがエラーとして返る（致命的、チェック
/// 実行前）。プローブ・通知の失敗はすべて結果またはログ行として処理される。
pub async fn execute(args: &RunArgs) -> WatchResult<CheckStatus> {
    let path = args.config.clone().unwrap_or_else(config::config_path);
    let watch_config = WatchConfig::load(&path)?;

    let journal = Journal::from_config(&watch_config.journal)?;

    let client = reqwest::Client::builder()
        .build()
        .expect("Failed to create HTTP client");
    let registry = CheckRegistry::from_config(&watch_config, &client)?;

    info!(
        config = %path.display(),
        checks = registry.len(),
        "Starting health pass"
    );
    journal.record(
        JournalLevel::Info,
        &format!("pass started ({} checks)", registry.len()),
    );

    let report = Aggregator::from_config(&watch_config.pass)
        .run_all(&registry)
        .await;

    for outcome in &report.outcomes {
        journal.record(
            JournalLevel::from_status(outcome.status),
            &format!(
                "{}: {} {}",
                outcome.name,
                outcome.status.as_str(),
                outcome.message
            ),
        );
    }

    let overall = report.overall();
    if overall == CheckStatus::Ok {
        journal.record(JournalLevel::Info, "all checks passed");
    } else {
        notify(args, &watch_config, &report, &journal).await;
    }

    if journal.dropped_writes() > 0 {
        warn!(
            dropped = journal.dropped_writes(),
            "Journal writes were dropped"
        );
    }

    info!(
        pass_id = %report.pass_id,
        overall = %overall,
        "Health pass complete"
    );

    Ok(overall)
}

/// WARN/FAILを含むパスの集約アラートを1通送信する
async fn notify(args: &RunArgs, watch_config: &WatchConfig, report: &RunReport, journal: &Journal) {
    let message = notifier::format_report(report, &config::host_identity());

    if args.no_notify {
        journal.record(JournalLevel::Warn, "alert delivery skipped (--no-notify)");
        return;
    }

    let Some(alert_config) = &watch_config.alert else {
        journal.record(
            JournalLevel::Warn,
            "alert sink not configured; skipping notification",
        );
        return;
    };

    // 配信失敗は非致命的: 終了コードには影響させない
    let delivery = match Notifier::from_config(alert_config) {
        Ok(notifier) => notifier.deliver(&message).await,
        Err(e) => Err(e),
    };

    match delivery {
        Ok(()) => {
            journal.record(JournalLevel::Info, "consolidated alert delivered");
        }
        Err(e) => {
            warn!("Alert delivery failed: {}", e);
            journal.record(JournalLevel::Warn, &format!("alert delivery failed: {e}"));
        }
    }
}
