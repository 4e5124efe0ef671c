use std::time::{Duration, Instant};

use clap::Args;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use scoutr_common::config::ScanConfig;
use scoutr_common::event::DiscoveryEvent;
use scoutr_core::{DiscoveryController, ResultAggregator};

use crate::terminal::print;

#[derive(Args)]
pub struct ScanArgs {
    /// Session duration in milliseconds.
    #[arg(long, value_name = "MS")]
    pub session_timeout: Option<u64>,

    /// Concurrent probes per wave.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Port to probe instead of 22.
    #[arg(long)]
    pub port: Option<u16>,
}

impl ScanArgs {
    fn to_config(&self) -> ScanConfig {
        let mut config = ScanConfig::default();
        if let Some(ms) = self.session_timeout {
            config.session_timeout = Duration::from_millis(ms);
        }
        if let Some(cap) = self.concurrency {
            config.probe_concurrency = cap;
        }
        if let Some(port) = self.port {
            config.ssh_port = port;
        }
        config
    }
}

pub async fn scan(args: ScanArgs) -> anyhow::Result<()> {
    let config = args.to_config();
    tracing::debug!(
        port = config.ssh_port,
        concurrency = config.probe_concurrency,
        timeout_ms = config.session_timeout.as_millis() as u64,
        "starting scan session"
    );

    let mut controller = DiscoveryController::new(config);
    let mut events = controller.start_scan().await;
    let mut results = ResultAggregator::new();

    let started = Instant::now();
    let spinner = start_spinner();

    while let Some(event) = events.recv().await {
        results.apply(&event);
        match &event {
            DiscoveryEvent::HostFound(host) => {
                spinner.println(print::found_line(host));
                spinner.set_message(format!("{} endpoint(s) so far", results.len()));
            }
            DiscoveryEvent::PermissionDenied => {
                spinner.println(format!(
                    "{} local network browsing denied; active probing continues",
                    "[-]".red().bold()
                ));
            }
            DiscoveryEvent::Failed { message } => {
                spinner.println(format!("{} {}", "[*]".yellow().bold(), message));
            }
            DiscoveryEvent::ScanningFinished => break,
            _ => {}
        }
    }

    spinner.finish_and_clear();
    controller.stop_scan().await;

    print::summary(&results, started.elapsed());
    Ok(())
}

fn start_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("scanning the local segment...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
