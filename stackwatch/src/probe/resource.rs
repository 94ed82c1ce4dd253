//! リソースしきい値プローブ
//!
//! ディスク・メモリ・CPUの使用率（%）を読み取り、警告/重大しきい値と比較する。
//! しきい値未満はOK、`warn_percent`以上`crit_percent`未満はWARN、
//! `crit_percent`以上はFAIL。
//!
//! OSごとのメトリクス取得差異は`MetricsSource`トレイトの背後に隔離し、
//! 本番バックエンドは`SysinfoMetrics`のみ。測定できないことは障害の証明では
//! ないため、読み取り失敗は`ProbeError::Metrics`として返り、デフォルトでは
//! WARNへ変換される（チェックごとの`on_error`でFAILに昇格可能）。

use crate::probe::Probe;
use async_trait::async_trait;
use stackwatch_common::config::{ResourceCheckConfig, ResourceMetric};
use stackwatch_common::error::{ProbeError, ProbeResult};
use stackwatch_common::types::{CheckKind, CheckOutcome};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use sysinfo::{Disks, System};

/// CPU使用率の2回目リフレッシュまでの待機時間（ミリ秒）
const CPU_REFRESH_DELAY_MS: u64 = 200;

/// システムメトリクス取得の抽象
///
/// OSファミリごとの計測差異をこの境界の内側に閉じ込める。
pub trait MetricsSource: Send {
    /// 指定パスを含むファイルシステムのディスク使用率（0.0-100.0）
    fn disk_usage_percent(&mut self, path: &Path) -> ProbeResult<f32>;

    /// メモリ使用率（0.0-100.0）
    fn memory_usage_percent(&mut self) -> ProbeResult<f32>;

    /// CPU使用率（0.0-100.0、全コア平均）
    fn cpu_usage_percent(&mut self) -> ProbeResult<f32>;
}

/// sysinfoベースのメトリクスソース
pub struct SysinfoMetrics {
    system: System,
}

impl SysinfoMetrics {
    /// 新しいメトリクスソースを作成
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();

        Self { system }
    }
}

impl Default for SysinfoMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for SysinfoMetrics {
    fn disk_usage_percent(&mut self, path: &Path) -> ProbeResult<f32> {
        let disks = Disks::new_with_refreshed_list();

        // 対象パスを含むマウントポイントのうち最長一致を選ぶ
        let disk = disks
            .list()
            .iter()
            .filter(|d| path.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .ok_or_else(|| {
                ProbeError::Metrics(format!("no filesystem found for path {}", path.display()))
            })?;

        let total = disk.total_space();
        if total == 0 {
            return Err(ProbeError::Metrics(format!(
                "filesystem for {} reports zero capacity",
                path.display()
            )));
        }

        let used = total - disk.available_space();
        Ok((used as f64 / total as f64 * 100.0) as f32)
    }

    fn memory_usage_percent(&mut self) -> ProbeResult<f32> {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        if total == 0 {
            return Err(ProbeError::Metrics("Total memory is zero".to_string()));
        }

        let used = self.system.used_memory();
        Ok((used as f64 / total as f64 * 100.0) as f32)
    }

    fn cpu_usage_percent(&mut self) -> ProbeResult<f32> {
        self.system.refresh_cpu();

        // 少し待ってから再度リフレッシュすることで正確な値を取得
        std::thread::sleep(std::time::Duration::from_millis(CPU_REFRESH_DELAY_MS));
        self.system.refresh_cpu();

        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return Err(ProbeError::Metrics("No CPUs reported".to_string()));
        }

        Ok(cpus.iter().map(|cpu| cpu.cpu_usage()).sum::<f32>() / cpus.len() as f32)
    }
}

/// リソースしきい値プローブ
pub struct ResourceProbe {
    /// チェック名
    name: String,
    /// 測定対象メトリクス
    metric: ResourceMetric,
    /// ディスク使用率の対象パス
    path: PathBuf,
    /// 警告しきい値（%）
    warn_percent: f32,
    /// 重大しきい値（%）
    crit_percent: f32,
    /// メトリクスソース（書き込みアクセスのため直列化）
    source: Mutex<Box<dyn MetricsSource>>,
}

impl ResourceProbe {
    /// 新しいリソースプローブを作成
    ///
    /// しきい値は設定読み込み時に検証済み（`warn_percent < crit_percent`）。
    pub fn new(
        name: impl Into<String>,
        metric: ResourceMetric,
        warn_percent: f32,
        crit_percent: f32,
        source: Box<dyn MetricsSource>,
    ) -> Self {
        Self {
            name: name.into(),
            metric,
            path: PathBuf::from("/"),
            warn_percent,
            crit_percent,
            source: Mutex::new(source),
        }
    }

    /// ディスク使用率の対象パスを設定
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// 設定エントリからプローブを作成（本番バックエンド使用）
    pub fn from_config(config: &ResourceCheckConfig) -> Self {
        Self::new(
            &config.name,
            config.metric,
            config.warn_percent,
            config.crit_percent,
            Box::new(SysinfoMetrics::new()),
        )
        .with_path(&config.path)
    }

    /// 測定値をしきい値と比較して結果を作る
    fn evaluate(&self, value: f32) -> CheckOutcome {
        let metric = self.metric.as_str();

        if value >= self.crit_percent {
            CheckOutcome::fail(
                &self.name,
                CheckKind::Resource,
                format!(
                    "{metric} usage {value:.0}% (threshold {:.0}%)",
                    self.crit_percent
                ),
            )
        } else if value >= self.warn_percent {
            CheckOutcome::warn(
                &self.name,
                CheckKind::Resource,
                format!(
                    "{metric} usage {value:.0}% (threshold {:.0}%)",
                    self.warn_percent
                ),
            )
        } else {
            CheckOutcome::ok(
                &self.name,
                CheckKind::Resource,
                format!(
                    "{metric} usage {value:.0}% (warn {:.0}%, crit {:.0}%)",
                    self.warn_percent, self.crit_percent
                ),
            )
        }
    }
}

#[async_trait]
impl Probe for ResourceProbe {
    async fn run(&self) -> ProbeResult<CheckOutcome> {
        let value = {
            let mut source = self
                .source
                .lock()
                .map_err(|_| ProbeError::Metrics("metrics source lock poisoned".to_string()))?;
            match self.metric {
                ResourceMetric::Disk => source.disk_usage_percent(&self.path)?,
                ResourceMetric::Memory => source.memory_usage_percent()?,
                ResourceMetric::Cpu => source.cpu_usage_percent()?,
            }
        };

        Ok(self.evaluate(value))
    }
}
