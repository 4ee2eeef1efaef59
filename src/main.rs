//! エントリポイント：設定読込→ログ初期化→ドラフト送信。

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

use product_form::{config::Config, model::SubmissionState};

mod app;
mod draft;

/// ファイルロギングを初期化し、非同期ガードを生存させる。
fn init_logging(log_file: &str) -> Result<WorkerGuard> {
    // 標準出力は結果表示に使うため、ログはファイルへ書き込む。
    let file_appender = tracing_appender::rolling::never(".", log_file);
    // 非同期書き込み用のラッパーとガードを用意する。
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // フォーマッタと出力先を設定して初期化する。
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;
    // ログの保存先を通知しておく。
    tracing::info!("logging to {}", log_file);
    Ok(guard)
}

#[tokio::main]
/// エントリポイント：`product_form <draft.toml>`。
async fn main() -> Result<()> {
    // 引数からドラフトファイルのパスを受け取る。
    let Some(draft_path) = std::env::args().nth(1).map(PathBuf::from) else {
        bail!("usage: product_form <draft.toml>");
    };

    // 設定ファイルを読み込む（初回はデフォルトを生成）。
    let cfg = Config::load_or_default(Path::new("config.toml"))?;
    // ロガーを初期化し、ガードを保持して書き込みを継続させる。
    let _log_guard = init_logging(&cfg.logging.file)?;
    tracing::info!("app starting");

    // ドラフトを読み込み、画像パスの基準ディレクトリを決める。
    let draft = draft::Draft::load(&draft_path)?;
    let draft_dir = draft_path.parent().unwrap_or(Path::new("."));

    // フォームへ反映して送信する。
    let res = app::run(&cfg, draft, draft_dir)
        .await
        .with_context(|| format!("failed to submit {}", draft_path.display()));
    // エラーがあればログに残す。
    if let Err(ref e) = res {
        tracing::error!("app error: {e:#}");
    }
    tracing::info!("app exiting");

    // 送信結果を表示し、失敗なら終了コードに反映する。
    match res? {
        SubmissionState::Success => {
            println!("Product created successfully");
            Ok(())
        }
        SubmissionState::Error(message) => bail!("{message}"),
        other => bail!("submission did not settle: {other:?}"),
    }
}
