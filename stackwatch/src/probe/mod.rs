//! プローブ実装
//!
//! 各プローブは1回の有界な外部呼び出し（HTTPリクエスト・サブプロセス起動・
//! ローカルシステム読み取り）を行い、1件の`CheckOutcome`を返す。
//! プローブ内部でのリトライは行わない（リトライはAggregatorのポリシー）。
//!
//! `Err(ProbeError)`は「測定できなかった」ことを意味し、健全/不健全の判定
//! （`CheckOutcome`）とは区別される。エラーのWARN/FAILへの変換はAggregatorが
//! チェック種別ごとのポリシーに従って行う。

pub mod command;
pub mod http;
pub mod resource;

pub use command::CommandProbe;
pub use http::HttpProbe;
pub use resource::{MetricsSource, ResourceProbe, SysinfoMetrics};

use async_trait::async_trait;
use stackwatch_common::error::ProbeResult;
use stackwatch_common::types::CheckOutcome;

/// プローブ
///
/// 同期的に（1回の呼び出しで）結果を返す。呼び出し側のタイムアウト内に
/// 完了しない場合はFAIL扱いとなる。
#[async_trait]
pub trait Probe: Send + Sync {
    /// プローブを1回実行する
    async fn run(&self) -> ProbeResult<CheckOutcome>;
}
