//! チェックレジストリ
//!
//! このパスで実行するチェックの固定された順序付きリスト。登録順がそのまま
//! レポートの並び順であり、慣習として死活チェックをリソースチェックより
//! 先に並べる。プロセス起動ごとに一度構築され、終了時に破棄される。

use crate::probe::{CommandProbe, HttpProbe, Probe, ResourceProbe};
use reqwest::Client;
use stackwatch_common::config::{ErrorPolicy, WatchConfig};
use stackwatch_common::error::RegistryError;
use stackwatch_common::types::{CheckKind, CheckStatus};
use std::sync::Arc;
use std::time::Duration;

/// 静的なチェック登録エントリ
pub struct CheckDefinition {
    /// チェック名（レジストリ内で一意）
    pub name: String,
    /// チェック種別
    pub kind: CheckKind,
    /// プローブ本体
    pub probe: Arc<dyn Probe>,
    /// プローブごとのタイムアウト
    pub timeout: Duration,
    /// 測定不能（`ProbeError`）時に割り当てるステータス
    pub on_error: CheckStatus,
}

impl CheckDefinition {
    /// 新しいチェック定義を作成
    ///
    /// 死活・レディネスは測定不能をFAIL扱いにする（到達できないことが
    /// そのまま不健全の証拠になるため）。リソースは呼び出し側が
    /// ポリシーを指定する。
    pub fn new(
        name: impl Into<String>,
        kind: CheckKind,
        probe: Arc<dyn Probe>,
        timeout: Duration,
    ) -> Self {
        let on_error = match kind {
            CheckKind::Liveness | CheckKind::Readiness => CheckStatus::Fail,
            CheckKind::Resource => CheckStatus::Warn,
        };
        Self {
            name: name.into(),
            kind,
            probe,
            timeout,
            on_error,
        }
    }

    /// 測定不能時のステータスを上書き
    pub fn with_on_error(mut self, on_error: CheckStatus) -> Self {
        self.on_error = on_error;
        self
    }
}

/// チェックレジストリ
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<CheckDefinition>,
}

impl CheckRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// チェックを登録する
    ///
    /// 既存エントリと名前が衝突する場合は`RegistryError::DuplicateName`。
    pub fn register(&mut self, definition: CheckDefinition) -> Result<(), RegistryError> {
        if self.checks.iter().any(|c| c.name == definition.name) {
            return Err(RegistryError::DuplicateName(definition.name));
        }
        self.checks.push(definition);
        Ok(())
    }

    /// 登録順のチェック定義列
    pub fn all(&self) -> &[CheckDefinition] {
        &self.checks
    }

    /// 登録されているチェック数
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// レジストリが空か
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// 設定からレジストリを構築する
    ///
    /// 宣言順（http → command → resource）で登録する。設定検証で名前の
    /// 一意性は確認済みだが、レジストリ側でも同じ不変条件を守る。
    pub fn from_config(config: &WatchConfig, client: &Client) -> Result<Self, RegistryError> {
        let default_timeout = Duration::from_secs(config.pass.check_timeout_secs);
        let mut registry = Self::new();

        for check in &config.http {
            let timeout = check
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(default_timeout);
            let probe = Arc::new(HttpProbe::from_config(client, check, default_timeout));
            registry.register(CheckDefinition::new(
                &check.name,
                CheckKind::Liveness,
                probe,
                timeout,
            ))?;
        }

        for check in &config.command {
            let timeout = check
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(default_timeout);
            let probe = Arc::new(CommandProbe::from_config(check));
            registry.register(CheckDefinition::new(
                &check.name,
                CheckKind::Readiness,
                probe,
                timeout,
            ))?;
        }

        for check in &config.resource {
            let on_error = match check.on_error {
                ErrorPolicy::Warn => CheckStatus::Warn,
                ErrorPolicy::Fail => CheckStatus::Fail,
            };
            let probe = Arc::new(ResourceProbe::from_config(check));
            registry.register(
                CheckDefinition::new(&check.name, CheckKind::Resource, probe, default_timeout)
                    .with_on_error(on_error),
            )?;
        }

        Ok(registry)
    }
}
