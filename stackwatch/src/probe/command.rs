//! コマンドレディネスプローブ
//!
//! 外部レディネスコマンド（例: `pg_isready`）を起動し、終了ステータス0ならOK、
//! それ以外はFAIL。起動自体の失敗は`ProbeError::Command`（測定不能）。
//! 同一依存先への並行プローブを妨げる排他資源は持たない。

use crate::probe::Probe;
use async_trait::async_trait;
use stackwatch_common::config::CommandCheckConfig;
use stackwatch_common::error::{ProbeError, ProbeResult};
use stackwatch_common::types::{CheckKind, CheckOutcome};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// stderr抜粋の最大長
const STDERR_SNIPPET_MAX: usize = 160;

/// コマンドレディネスプローブ
pub struct CommandProbe {
    /// チェック名
    name: String,
    /// 実行するプログラム
    program: String,
    /// プログラム引数
    args: Vec<String>,
}

impl CommandProbe {
    /// 新しいコマンドプローブを作成
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
        }
    }

    /// 設定エントリからプローブを作成
    pub fn from_config(config: &CommandCheckConfig) -> Self {
        Self::new(&config.name, &config.program, config.args.clone())
    }

    fn failure_message(&self, status: std::process::ExitStatus, stderr: &[u8]) -> String {
        let snippet = String::from_utf8_lossy(stderr);
        let snippet = snippet.lines().next().unwrap_or("").trim();
        let snippet: String = snippet.chars().take(STDERR_SNIPPET_MAX).collect();

        if snippet.is_empty() {
            format!("{} exited with {}", self.program, status)
        } else {
            format!("{} exited with {}: {}", self.program, status, snippet)
        }
    }
}

#[async_trait]
impl Probe for CommandProbe {
    async fn run(&self) -> ProbeResult<CheckOutcome> {
        let start = Instant::now();

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ProbeError::Command(format!("failed to run {}: {}", self.program, e)))?;

        let latency_ms = start.elapsed().as_millis() as u32;

        if output.status.success() {
            Ok(CheckOutcome::ok(
                &self.name,
                CheckKind::Readiness,
                format!("{} ready (exit status 0)", self.program),
            )
            .with_latency(latency_ms))
        } else {
            Ok(CheckOutcome::fail(
                &self.name,
                CheckKind::Readiness,
                self.failure_message(output.status, &output.stderr),
            )
            .with_latency(latency_ms))
        }
    }
}
