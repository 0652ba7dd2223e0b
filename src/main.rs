use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rank_uploader::app::RankUploader;
use rank_uploader::cli;
use rank_uploader::config::{Args, Command};
use rank_uploader::upload::{HttpTransport, Transport};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rank_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let runtime = Runtime::new().context("Failed to start async runtime")?;

    match args.command {
        Some(Command::Submit {
            game_id,
            stage,
            report,
            files,
        }) => {
            runtime.block_on(cli::run_submit(
                &args.server,
                &game_id,
                &stage,
                &files,
                report.as_deref(),
            ))?;
            Ok(())
        }
        None => run_window(&args.server, runtime),
    }
}

fn run_window(server: &str, runtime: Runtime) -> Result<()> {
    info!("Validation service: {}", server);
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(server).context("Failed to create HTTP client")?);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rank Screenshot Validator",
        options,
        Box::new(move |cc| Box::new(RankUploader::new(cc, transport, runtime))),
    )
    .map_err(|e| anyhow!("Window closed with error: {}", e))
}
