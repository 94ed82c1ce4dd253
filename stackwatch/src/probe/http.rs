//! HTTP死活プローブ
//!
//! 設定されたURLへGETを発行し、許容ステータスコード集合（デフォルト: 200のみ）
//! に含まれればOK、それ以外はFAIL。タイムアウト・接続拒否・DNS失敗は
//! `ProbeError::Http`（測定不能）として返り、死活チェックではFAILへ変換される。

use crate::probe::Probe;
use async_trait::async_trait;
use reqwest::Client;
use stackwatch_common::config::HttpCheckConfig;
use stackwatch_common::error::{ProbeError, ProbeResult};
use stackwatch_common::types::{CheckKind, CheckOutcome};
use std::time::{Duration, Instant};

/// HTTP死活プローブ
pub struct HttpProbe {
    /// チェック名
    name: String,
    /// GET対象URL
    url: String,
    /// 許容ステータスコード
    accept: Vec<u16>,
    /// リクエストタイムアウト
    timeout: Duration,
    /// 共有HTTPクライアント
    client: Client,
}

impl HttpProbe {
    /// 新しいHTTPプローブを作成（許容コードは200のみ）
    pub fn new(
        client: Client,
        name: impl Into<String>,
        url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            accept: vec![200],
            timeout,
            client,
        }
    }

    /// 許容ステータスコード集合を上書き
    pub fn with_accept(mut self, accept: Vec<u16>) -> Self {
        self.accept = accept;
        self
    }

    /// 設定エントリからプローブを作成
    pub fn from_config(client: &Client, config: &HttpCheckConfig, default_timeout: Duration) -> Self {
        let timeout = config
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(default_timeout);
        Self::new(client.clone(), &config.name, &config.url, timeout)
            .with_accept(config.accept.clone())
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn run(&self) -> ProbeResult<CheckOutcome> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProbeError::Http(format!("GET {} failed: {}", self.url, e)))?;

        let latency_ms = start.elapsed().as_millis() as u32;
        let code = response.status().as_u16();

        if self.accept.contains(&code) {
            Ok(
                CheckOutcome::ok(&self.name, CheckKind::Liveness, format!("HTTP {code}"))
                    .with_latency(latency_ms),
            )
        } else {
            Ok(CheckOutcome::fail(
                &self.name,
                CheckKind::Liveness,
                format!(
                    "GET {} returned HTTP {} (accepted: {:?})",
                    self.url, code, self.accept
                ),
            )
            .with_latency(latency_ms))
        }
    }
}
