mod calendar;
mod state;

use crate::state::app_state::AppState;
use crate::state::messages::{NetworkRequest, NetworkResponse};
use crate::state::network::NetworkWorker;
use crate::state::refresher::PeriodicRefresher;
use log::{error, info};
use std::time::Duration;
use tokio::sync::mpsc;

const DEFAULT_REFRESH_SECS: u64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(8);
    let (network_resp_tx, mut network_resp_rx) = mpsc::channel::<NetworkResponse>(8);

    // Network thread — one in-flight refresh at a time by construction.
    let network_worker = NetworkWorker::new(network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic weekly refresh thread.
    let refresher = PeriodicRefresher::new(network_req_tx.clone(), refresh_period());
    let refresher_task = tokio::spawn(refresher.run());

    // First refresh right away so the calendar has data before the first tick.
    let _ = network_req_tx.send(NetworkRequest::RefreshWeek).await;

    let mut app_state = AppState::default();

    loop {
        tokio::select! {
            Some(response) = network_resp_rx.recv() => {
                handle_network_response(response, &mut app_state);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    refresher_task.abort();
    network_task.abort();

    Ok(())
}

fn handle_network_response(response: NetworkResponse, app_state: &mut AppState) {
    match response {
        NetworkResponse::WeekLoaded { week } => {
            app_state.on_week_loaded(week);
            let upcoming = app_state.upcoming_events();
            info!("weekly schedule refreshed: {} upcoming events", upcoming.len());
            if let Some(next) = upcoming.first() {
                info!("next up: {} at {}", next.summary, next.start.format("%Y-%m-%d %H:%M"));
            }
        }
        NetworkResponse::Error { message } => {
            // Stale cached data keeps being served; the next poll is the retry.
            error!("weekly refresh failed: {message}");
            app_state.on_refresh_failed();
        }
    }
}

fn refresh_period() -> Duration {
    let secs = std::env::var("SPORZACAL_REFRESH_SECS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .unwrap_or(DEFAULT_REFRESH_SECS);
    Duration::from_secs(secs)
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("sporzacal {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "sporzacal - Sporza sports schedule as a calendar feed

Usage:
  sporzacal
  sporzacal --help
  sporzacal --version

Environment:
  SPORZACAL_REFRESH_SECS   Seconds between weekly refreshes (default 30)
  RUST_LOG                 Log filter (default info)"
}
