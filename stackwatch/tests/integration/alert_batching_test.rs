//! Integration Test: 通知バッチング
//!
//! 非OKのチェックが何件あっても、1パスにつき配信は最大1回。
//! すべてOKのパスでは配信が発生しない。

use stackwatch::cli::run::{execute, RunArgs};
use stackwatch_common::types::CheckStatus;
use std::io::Write;
use std::path::{Path, PathBuf};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let config_path = dir.join("stackwatch.toml");
    let mut file = std::fs::File::create(&config_path).expect("failed to create config file");
    file.write_all(body.as_bytes())
        .expect("failed to write config file");
    config_path
}

fn run_args(config_path: PathBuf) -> RunArgs {
    RunArgs {
        config: Some(config_path),
        no_notify: false,
    }
}

#[tokio::test]
async fn test_three_fails_two_warns_produce_exactly_one_alert() {
    let service = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&service)
        .await;

    let sink = MockServer::start().await;
    // 1回だけ、件数ヘッダと全5件のチェック名を含む集約メッセージが届く
    Mock::given(method("POST"))
        .and(path("/api/sendText"))
        .and(body_string_contains("FAIL (3)"))
        .and(body_string_contains("WARN (2)"))
        .and(body_string_contains("n8n"))
        .and(body_string_contains("waha"))
        .and(body_string_contains("caddy"))
        .and(body_string_contains("mem-watch"))
        .and(body_string_contains("cpu-watch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sink)
        .await;

    let dir = tempfile::tempdir().expect("failed to create temp dir");
    // warn_percent=0はあらゆる測定値をWARN以上にする（重大には届かない）
    let config_path = write_config(
        dir.path(),
        &format!(
            r#"
[journal]
dir = "{logs}"

[alert]
url = "{sink}/api/sendText"
recipient = "ops"

[[http]]
name = "n8n"
url = "{service}/healthz"

[[http]]
name = "waha"
url = "{service}/healthz"

[[http]]
name = "caddy"
url = "{service}/healthz"

[[resource]]
name = "mem-watch"
metric = "memory"
warn_percent = 0.0
crit_percent = 100.0

[[resource]]
name = "cpu-watch"
metric = "cpu"
warn_percent = 0.0
crit_percent = 100.0
"#,
            logs = dir.path().join("logs").display(),
            sink = sink.uri(),
            service = service.uri()
        ),
    );

    let overall = execute(&run_args(config_path))
        .await
        .expect("pass should run");

    assert_eq!(overall, CheckStatus::Fail);
}

#[tokio::test]
async fn test_all_ok_pass_sends_no_alert() {
    let service = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200))
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
dir = "{logs}"

[alert]
url = "{sink}/api/sendText"
recipient = "ops"

[[http]]
name = "n8n"
url = "{service}/healthz"

[[http]]
name = "waha"
url = "{service}/healthz"
"#,
            logs = dir.path().join("logs").display(),
            sink = sink.uri(),
            service = service.uri()
        ),
    );

    let overall = execute(&run_args(config_path))
        .await
        .expect("pass should run");

    assert_eq!(overall, CheckStatus::Ok);
}

#[tokio::test]
async fn test_warn_only_pass_notifies_but_reports_success() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("FAIL (0)"))
        .and(body_string_contains("WARN (1)"))
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
dir = "{logs}"

[alert]
url = "{sink}/api/sendText"
recipient = "ops"

[[resource]]
name = "mem-watch"
metric = "memory"
warn_percent = 0.0
crit_percent = 100.0
"#,
            logs = dir.path().join("logs").display(),
            sink = sink.uri()
        ),
    );

    let overall = execute(&run_args(config_path))
        .await
        .expect("pass should run");

    // WARNのみのパスは成功扱い（終了コード0の経路）だが通知は行う
    assert_eq!(overall, CheckStatus::Warn);
}
