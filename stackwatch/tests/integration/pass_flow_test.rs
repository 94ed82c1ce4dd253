//! Integration Test: ヘルスパス全体フロー
//!
//! 設定ファイル読み込み → レジストリ構築 → パス実行 → ジャーナル記録 → 通知
//! までを実サーバ（wiremock）相手に通しで確認する。

use stackwatch::cli::run::{execute, RunArgs};
use stackwatch_common::types::CheckStatus;
use std::io::Write;
use std::path::{Path, PathBuf};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// テスト用の設定ファイルを書き出す
fn write_config(dir: &Path, body: &str) -> PathBuf {
    let config_path = dir.join("stackwatch.toml");
    let mut file = std::fs::File::create(&config_path).expect("failed to create config file");
    file.write_all(body.as_bytes())
        .expect("failed to write config file");
    config_path
}

fn journal_content(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("logs").join("health.log"))
        .expect("journal file should exist")
}

fn run_args(config_path: PathBuf) -> RunArgs {
    RunArgs {
        config: Some(config_path),
        no_notify: false,
    }
}

#[tokio::test]
async fn test_healthy_pass_logs_success_and_returns_ok() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock)
        .await;

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config_path = write_config(
        dir.path(),
        &format!(
            r#"
[journal]
dir = "{}"

[[http]]
name = "n8n"
url = "{}/healthz"
"#,
            dir.path().join("logs").display(),
            mock.uri()
        ),
    );

    let overall = execute(&run_args(config_path))
        .await
        .expect("pass should run");

    assert_eq!(overall, CheckStatus::Ok);

    let journal = journal_content(dir.path());
    assert!(journal.contains("pass started (1 checks)"));
    assert!(journal.contains("n8n: ok HTTP 200"));
    assert!(journal.contains("all checks passed"));
}

#[tokio::test]
async fn test_failing_check_delivers_alert_and_returns_fail() {
    let service = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&service)
        .await;

    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sendText"))
        .and(body_string_contains("FAIL (1)"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sink)
        .await;

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config_path = write_config(
        dir.path(),
        &format!(
            r#"
[journal]
dir = "{}"

[alert]
url = "{}/api/sendText"
recipient = "ops"

[[http]]
name = "n8n"
url = "{}/healthz"
"#,
            dir.path().join("logs").display(),
            sink.uri(),
            service.uri()
        ),
    );

    let overall = execute(&run_args(config_path))
        .await
        .expect("pass should run");

    assert_eq!(overall, CheckStatus::Fail);

    let journal = journal_content(dir.path());
    assert!(journal.contains("n8n: fail"));
    assert!(journal.contains("consolidated alert delivered"));
}

#[tokio::test]
async fn test_alert_delivery_failure_is_not_fatal() {
    let service = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&service)
        .await;

    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&sink)
        .await;

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config_path = write_config(
        dir.path(),
        &format!(
            r#"
[journal]
dir = "{}"

[alert]
url = "{}/api/sendText"
recipient = "ops"

[[http]]
name = "waha"
url = "{}/healthz"
"#,
            dir.path().join("logs").display(),
            sink.uri(),
            service.uri()
        ),
    );

    // 通知失敗はパスの結果を変えない
    let overall = execute(&run_args(config_path))
        .await
        .expect("pass should run despite sink failure");

    assert_eq!(overall, CheckStatus::Fail);

    let journal = journal_content(dir.path());
    assert!(journal.contains("alert delivery failed"));
}

#[tokio::test]
async fn test_missing_config_file_is_fatal() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let args = run_args(dir.path().join("no-such-config.toml"));

    assert!(execute(&args).await.is_err());
}

#[tokio::test]
async fn test_no_notify_flag_skips_delivery() {
    let service = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&service)
        .await;

    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&sink)
        .await;

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config_path = write_config(
        dir.path(),
        &format!(
            r#"
[journal]
dir = "{}"

[alert]
url = "{}/api/sendText"
recipient = "ops"

[[http]]
name = "n8n"
url = "{}/healthz"
"#,
            dir.path().join("logs").display(),
            sink.uri(),
            service.uri()
        ),
    );

    let overall = execute(&RunArgs {
        config: Some(config_path),
        no_notify: true,
    })
    .await
    .expect("pass should run");

    assert_eq!(overall, CheckStatus::Fail);
}
