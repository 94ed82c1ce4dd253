//! 集約アラート通知
//!
//! `overall != OK` のレポートを1件の集約メッセージに整形し、設定された
//! メッセージングAPIへ送信する。チェックごとの個別アラートは出さない
//! （アラートストーム防止のため1パスにつき最大1通）。
//!
//! 配信失敗は非致命的で、ログに残すのみ（リトライ・エスカレーションなし）。
//! パスの終了コードこそがシステム健全性の恒久的なシグナルであり、
//! 通知チャネルはベストエフォート。

use reqwest::Client;
use stackwatch_common::config::AlertConfig;
use stackwatch_common::error::NotifyError;
use stackwatch_common::types::RunReport;
use std::time::Duration;

/// レポートを1件の集約メッセージに整形する
///
/// ヘッダにFAIL/WARN件数とホスト識別子、続けてFAILのチェックを1行ずつ、
/// その後にWARNのチェックを1行ずつ並べる。
pub fn format_report(report: &RunReport, host: &str) -> String {
    let fail_count = report.failures().count();
    let warn_count = report.warnings().count();

    let mut message = format!("[stackwatch] {host}: FAIL ({fail_count}) WARN ({warn_count})");

    for outcome in report.failures() {
        message.push_str(&format!("\n  FAIL {}: {}", outcome.name, outcome.message));
    }
    for outcome in report.warnings() {
        message.push_str(&format!("\n  WARN {}: {}", outcome.name, outcome.message));
    }

    message
}

/// アラート送信クライアント
pub struct Notifier {
    client: Client,
    url: String,
    token: Option<String>,
    recipient: String,
}

impl Notifier {
    /// アラート設定からNotifierを作成
    pub fn from_config(config: &AlertConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
            recipient: config.recipient.clone(),
        })
    }

    /// 整形済みメッセージを送信する（1パスにつき最大1回）
    pub async fn deliver(&self, message: &str) -> Result<(), NotifyError> {
        let mut request = self.client.post(&self.url).json(&serde_json::json!({
            "to": self.recipient,
            "text": message,
        }));

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifyError::Status(response.status().as_u16()))
        }
    }
}
