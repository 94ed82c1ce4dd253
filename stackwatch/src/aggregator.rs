//! パス実行
//!
//! 登録済みチェックを1パス分すべて実行し、`RunReport`を構築する。
//! 途中結果に関わらず全チェックを必ず実行する（ショートサーキットなし）。
//! プローブのパニックや測定不能はFAIL/WARN結果へ変換され、`run_all`の外へは
//! 伝播しない（1つの異常なプローブがパス全体を中断してはならない）。

use crate::registry::{CheckDefinition, CheckRegistry};
use chrono::Utc;
use stackwatch_common::config::PassConfig;
use stackwatch_common::types::{CheckOutcome, RunReport};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// パス実行エンジン
pub struct Aggregator {
    /// プローブを並列実行するか
    concurrent: bool,
    /// パス全体のウォールクロック上限
    wall_clock: Duration,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// デフォルト設定（並列実行、上限60秒）のAggregatorを作成
    pub fn new() -> Self {
        Self {
            concurrent: true,
            wall_clock: Duration::from_secs(60),
        }
    }

    /// パス設定からAggregatorを作成
    pub fn from_config(config: &PassConfig) -> Self {
        Self {
            concurrent: config.concurrent,
            wall_clock: Duration::from_secs(config.wall_clock_secs),
        }
    }

    /// 並列実行の有効/無効を設定
    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// パス全体のウォールクロック上限を設定
    pub fn with_wall_clock(mut self, wall_clock: Duration) -> Self {
        self.wall_clock = wall_clock;
        self
    }

    /// 全チェックを実行してレポートを構築する
    ///
    /// 結果は完了順ではなく登録順に並ぶ（並列実行でもレポートレイアウトは
    /// 決定的）。ウォールクロック上限を超えた場合、未完了のプローブは
    /// 打ち切られ、タイムアウトによるFAILとして記録される。
    pub async fn run_all(&self, registry: &CheckRegistry) -> RunReport {
        let started_at = Utc::now();
        let deadline = tokio::time::Instant::now() + self.wall_clock;

        let outcomes = if self.concurrent {
            self.run_concurrent(registry, deadline).await
        } else {
            self.run_sequential(registry, deadline).await
        };

        for outcome in &outcomes {
            match outcome.status {
                stackwatch_common::types::CheckStatus::Ok => debug!(
                    check = %outcome.name,
                    latency_ms = ?outcome.latency_ms,
                    "Check passed"
                ),
                _ => warn!(
                    check = %outcome.name,
                    status = %outcome.status,
                    message = %outcome.message,
                    "Check did not pass"
                ),
            }
        }

        RunReport::new(outcomes, started_at, Utc::now())
    }

    /// 全チェックを並列タスクとして起動し、登録順に回収する
    async fn run_concurrent(
        &self,
        registry: &CheckRegistry,
        deadline: tokio::time::Instant,
    ) -> Vec<CheckOutcome> {
        let handles: Vec<JoinHandle<CheckOutcome>> = registry
            .all()
            .iter()
            .map(|def| tokio::spawn(execute_probe_task(def)))
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (handle, def) in handles.into_iter().zip(registry.all()) {
            outcomes.push(self.collect_outcome(handle, def, deadline).await);
        }
        outcomes
    }

    /// チェックを登録順に1つずつ実行する
    async fn run_sequential(
        &self,
        registry: &CheckRegistry,
        deadline: tokio::time::Instant,
    ) -> Vec<CheckOutcome> {
        let mut outcomes = Vec::with_capacity(registry.len());
        for def in registry.all() {
            // パニックを結果へ変換するため、逐次実行でもタスク境界を挟む
            let handle = tokio::spawn(execute_probe_task(def));
            outcomes.push(self.collect_outcome(handle, def, deadline).await);
        }
        outcomes
    }

    /// タスクの完了・パニック・パス期限超過を1件の結果へ畳み込む
    async fn collect_outcome(
        &self,
        mut handle: JoinHandle<CheckOutcome>,
        def: &CheckDefinition,
        deadline: tokio::time::Instant,
    ) -> CheckOutcome {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        let result = tokio::time::timeout(remaining, &mut handle).await;

        match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => CheckOutcome::fail(
                &def.name,
                def.kind,
                format!("probe crashed: {join_error}"),
            ),
            Err(_) => {
                handle.abort();
                CheckOutcome::fail(
                    &def.name,
                    def.kind,
                    format!(
                        "timed out after {}s (pass deadline)",
                        self.wall_clock.as_secs()
                    ),
                )
            }
        }
    }
}

/// 1プローブをタイムアウト付きで実行し、結果へ畳み込むタスク本体
fn execute_probe_task(
    def: &CheckDefinition,
) -> impl std::future::Future<Output = CheckOutcome> + Send + 'static {
    let probe = def.probe.clone();
    let name = def.name.clone();
    let kind = def.kind;
    let on_error = def.on_error;
    let timeout = def.timeout;

    async move {
        match tokio::time::timeout(timeout, probe.run()).await {
            Ok(Ok(mut outcome)) => {
                // レポート上の名前・種別は登録時の定義で統一する
                outcome.name = name;
                outcome.kind = kind;
                outcome
            }
            // 測定不能はチェック種別ごとのポリシーでWARN/FAILへ
            Ok(Err(probe_error)) => {
                CheckOutcome::new(name, kind, on_error, probe_error.to_string())
            }
            Err(_) => CheckOutcome::fail(
                name,
                kind,
                format!("timed out after {}s", timeout.as_secs()),
            ),
        }
    }
}
