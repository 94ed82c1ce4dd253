//! stackwatch Entry Point

use clap::Parser;
use stackwatch::cli::{run::RunArgs, Cli, Commands};
use stackwatch::logging;
use stackwatch_common::types::CheckStatus;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init().expect("failed to initialize logging");

    match cli.command {
        Some(Commands::Validate(args)) => {
            if let Err(e) = stackwatch::cli::validate::execute(&args) {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        }
        Some(Commands::List(args)) => {
            if let Err(e) = stackwatch::cli::list::execute(&args) {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        }
        Some(Commands::Run(args)) => {
            run_pass(&args).await;
        }
        None => {
            // サブコマンドなしはrunと同じ（cron等からの定期起動を想定）
            run_pass(&RunArgs::default()).await;
        }
    }
}

/// 1パスを実行し、総合ステータスを終了コードへ変換する
///
/// 外部スケジューラが依存する契約: FAILを含むパスのみ非ゼロ（1）で終了し、
/// WARNのみのパスは0で終了する。設定・起動エラーは2。
async fn run_pass(args: &RunArgs) {
    match stackwatch::cli::run::execute(args).await {
        Ok(CheckStatus::Fail) => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
