//! stackwatch
//!
//! 固定されたチェック群（HTTP死活・コマンドレディネス・リソースしきい値）を
//! 1パス実行し、結果をジャーナルへ記録、WARN/FAILがあれば1件の集約アラートを
//! メッセージングAPIへ送信する短命プロセス。外部スケジューラ（cron等）から
//! 定期起動される前提で、パス間の状態はジャーナルファイル以外に持たない。

#![warn(missing_docs)]

/// パス実行（全チェックの起動・収集・レポート構築）
pub mod aggregator;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ジャーナル（追記専用・ローテーション付きログファイル）
pub mod journal;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 集約アラート通知
pub mod notifier;

/// プローブ実装（HTTP・コマンド・リソース）
pub mod probe;

/// チェックレジストリ
pub mod registry;
