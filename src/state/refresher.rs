use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Periodic weekly refresh — every 30 seconds unless overridden.
/// Only sends RefreshWeek; the first fetch is triggered at startup.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, period: Duration) -> Self {
        Self { network_requests, period }
    }

    pub async fn run(self) {
        let mut refresh_interval = interval(self.period);
        // Skip the immediate first tick so the startup fetch isn't double-triggered.
        refresh_interval.tick().await;

        loop {
            refresh_interval.tick().await;
            let _ = self
                .network_requests
                .send(NetworkRequest::RefreshWeek)
                .await;
        }
    }
}
