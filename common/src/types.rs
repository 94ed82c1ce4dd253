//! チェック結果・レポート型定義
//!
//! 1回のパスで生成される結果（`CheckOutcome`）と集約レポート（`RunReport`）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// チェック結果ステータス
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// 正常
    #[default]
    Ok,
    /// 警告（パスは成功扱い、通知のみ）
    Warn,
    /// 失敗
    Fail,
}

impl CheckStatus {
    /// ステータスを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
        }
    }
}

impl std::str::FromStr for CheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(CheckStatus::Ok),
            "warn" => Ok(CheckStatus::Warn),
            "fail" => Ok(CheckStatus::Fail),
            other => Err(format!("unknown check status: {other}")),
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// チェック種別
///
/// レポート表示と測定不能時のポリシー決定に使用する。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// 死活監視（HTTPエンドポイント）
    Liveness,
    /// レディネス（外部コマンド）
    Readiness,
    /// リソースしきい値（ディスク・メモリ・CPU）
    Resource,
}

impl CheckKind {
    /// 種別を文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Liveness => "liveness",
            CheckKind::Readiness => "readiness",
            CheckKind::Resource => "resource",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1プローブの実行結果
///
/// 不変条件: `status != Ok` のとき `message` は空でない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckOutcome {
    /// チェック名（1回のパス内で一意）
    pub name: String,
    /// チェック種別
    pub kind: CheckKind,
    /// ステータス
    pub status: CheckStatus,
    /// 人間可読の詳細（例: "disk usage 92% (threshold 90%)"）
    pub message: String,
    /// 所要時間（ミリ秒、測定できた場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u32>,
    /// 評価時刻
    pub checked_at: DateTime<Utc>,
}

impl CheckOutcome {
    /// 正常結果を作成
    pub fn ok(name: impl Into<String>, kind: CheckKind, message: impl Into<String>) -> Self {
        Self::new(name, kind, CheckStatus::Ok, message)
    }

    /// 警告結果を作成
    pub fn warn(name: impl Into<String>, kind: CheckKind, message: impl Into<String>) -> Self {
        Self::new(name, kind, CheckStatus::Warn, message)
    }

    /// 失敗結果を作成
    pub fn fail(name: impl Into<String>, kind: CheckKind, message: impl Into<String>) -> Self {
        Self::new(name, kind, CheckStatus::Fail, message)
    }

    /// 任意ステータスの結果を作成
    pub fn new(
        name: impl Into<String>,
        kind: CheckKind,
        status: CheckStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            status,
            message: message.into(),
            latency_ms: None,
            checked_at: Utc::now(),
        }
    }

    /// 所要時間を設定
    pub fn with_latency(mut self, latency_ms: u32) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }
}

/// 1回のパスの集約レポート
///
/// パスごとに新規構築され、構築後は不変。ログ・通知の副作用が済んだら破棄される
/// （パス間で永続化される状態はジャーナルファイルのみ）。
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// パスID
    pub pass_id: Uuid,
    /// 登録順のチェック結果
    pub outcomes: Vec<CheckOutcome>,
    /// パス開始時刻
    pub started_at: DateTime<Utc>,
    /// パス完了時刻
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// レポートを構築
    pub fn new(
        outcomes: Vec<CheckOutcome>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pass_id: Uuid::new_v4(),
            outcomes,
            started_at,
            finished_at,
        }
    }

    /// FAILの結果のみ（登録順）
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CheckStatus::Fail)
    }

    /// WARNの結果のみ（登録順）
    pub fn warnings(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CheckStatus::Warn)
    }

    /// 総合ステータス
    ///
    /// FAILが1件でもあればFAIL、なければWARNが1件でもあればWARN、すべてOKならOK。
    pub fn overall(&self) -> CheckStatus {
        if self.failures().next().is_some() {
            CheckStatus::Fail
        } else if self.warnings().next().is_some() {
            CheckStatus::Warn
        } else {
            CheckStatus::Ok
        }
    }
}
