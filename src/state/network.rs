use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::Local;
use log::{debug, error, info};
use sporza_api::client::{ApiError, SporzaApi};
use tokio::sync::mpsc;

/// Owns the API client and serves refresh requests one at a time, so there
/// is never more than one in-flight weekly fetch. Every failure collapses
/// into a single Error response — the "refresh failed" signal; the host's
/// next poll is the retry.
pub struct NetworkWorker {
    client: SporzaApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client: SporzaApi::new(), requests, responses }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let result = match request {
                NetworkRequest::RefreshWeek => self.handle_refresh_week().await,
            };

            debug!("network request complete");
            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_refresh_week(&self) -> Result<NetworkResponse, ApiError> {
        let today = Local::now().date_naive();
        info!("fetching games for the week starting {today}");
        let week = self.client.fetch_games_coming_week(today).await?;
        Ok(NetworkResponse::WeekLoaded { week })
    }
}
