use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use reqwest::Client;

use crate::wire::{MatchDetailResponse, ScheduleResponse};
use crate::{GameRecord, MalformedMetadata, WeekSchedule};

pub type ApiResult<T> = Result<T, ApiError>;

const SPORZA_API_BASE: &str = "https://api.sporza.be";
const SCHEDULE_PATH: &str = "web/content/schedule";

/// Schedule labels the integration cares about. Everything else in a day
/// payload is ignored.
pub const INTERESTED_LABELS: [&str; 5] =
    ["basketbal", "formule1", "tennis", "voetbal", "wielrennen"];

/// Detail endpoint prefix per schedule label. Doubles as the gate for sports
/// we know how to fetch at all: a label missing here is an unsupported sport.
const GAME_ENDPOINTS: [(&str, &str); 5] = [
    ("basketbal", "web/basketball/matches/"),
    ("formule1", "web/formula1/races/"),
    ("tennis", "web/tennis/matches/"),
    ("voetbal", "web/soccer/matches/"),
    ("wielrennen", "web/cycling/races/"),
];

/// Sporza API client backed by the public (anonymous) endpoints.
#[derive(Debug, Clone)]
pub struct SporzaApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SporzaApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("sporzacal/0.1 (sports calendar feed)")
                .build()
                .unwrap_or_default(),
            base_url: SPORZA_API_BASE.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    MalformedSchedule(String),
    Metadata(MalformedMetadata),
    UnsupportedSport(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::MalformedSchedule(msg) => write!(f, "Malformed schedule payload: {msg}"),
            ApiError::Metadata(e) => write!(f, "{e}"),
            ApiError::UnsupportedSport(label) => write!(f, "Unsupported sport: {label}"),
        }
    }
}

impl From<MalformedMetadata> for ApiError {
    fn from(e: MalformedMetadata) -> Self {
        ApiError::Metadata(e)
    }
}

impl SporzaApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client pointed at a different API root. Used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    /// Games for each of the seven days starting at `start`, in date order.
    ///
    /// Sequential and fail-fast: a single failing schedule or match request
    /// fails the whole week, so the caller never sees a partially refreshed
    /// snapshot and keeps its previous one instead.
    pub async fn fetch_games_coming_week(&self, start: NaiveDate) -> ApiResult<WeekSchedule> {
        let mut week = WeekSchedule::new();
        for offset in 0..7 {
            let day = start + chrono::Duration::days(offset);
            week.insert(day, self.fetch_games_by_day(day).await?);
        }
        Ok(week)
    }

    /// Resolve one day's schedule and build a record for every referenced
    /// match, grouped per sport in label order.
    pub async fn fetch_games_by_day(&self, day: NaiveDate) -> ApiResult<Vec<GameRecord>> {
        let schedule = self.fetch_schedule_by_day(day).await?;
        let mut games = Vec::new();
        for (label, references) in &schedule {
            for reference in references {
                games.push(self.fetch_game(label, reference).await?);
            }
        }
        debug!("resolved {} games for {day}", games.len());
        Ok(games)
    }

    /// Fetch a day schedule and reduce it to a label → match reference map.
    pub async fn fetch_schedule_by_day(
        &self,
        day: NaiveDate,
    ) -> ApiResult<BTreeMap<String, Vec<String>>> {
        let url = format!(
            "{}/{SCHEDULE_PATH}?date={}",
            self.base_url,
            day.format("%Y-%m-%d")
        );
        let raw: ScheduleResponse = self.get(&url).await?;
        parse_schedule(raw)
    }

    /// Fetch one match's detail payload and build its game record. One round
    /// trip, no retries; retrying is the host's periodic poll.
    pub async fn fetch_game(&self, label: &str, reference: &str) -> ApiResult<GameRecord> {
        let url = self.detail_url(label, reference)?;
        let raw: MatchDetailResponse = self.get(&url).await?;
        let metadata = raw
            .component_props
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
        Ok(GameRecord::from_metadata(label, metadata)?)
    }

    /// Resolve a schedule reference into an absolute detail URL. Absolute
    /// references pass through; relative paths resolve against the API root;
    /// bare match ids are joined to the sport's endpoint prefix.
    fn detail_url(&self, label: &str, reference: &str) -> ApiResult<String> {
        let endpoint = GAME_ENDPOINTS
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, path)| *path)
            .ok_or_else(|| ApiError::UnsupportedSport(label.to_owned()))?;

        if reference.starts_with("http://") || reference.starts_with("https://") {
            Ok(reference.to_owned())
        } else if reference.contains('/') {
            Ok(format!("{}/{}", self.base_url, reference.trim_start_matches('/')))
        } else {
            Ok(format!("{}/{endpoint}{reference}", self.base_url))
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Schedule resolution: day payload → label → match references
// ---------------------------------------------------------------------------

/// Reduce a raw day schedule to an ordered reference list per interested
/// sport label (lower-cased). Sub-entries without a reference URL are
/// skipped; a payload without the expected nesting fails the day outright.
fn parse_schedule(raw: ScheduleResponse) -> ApiResult<BTreeMap<String, Vec<String>>> {
    let data = raw
        .component_props
        .and_then(|props| props.data)
        .ok_or_else(|| ApiError::MalformedSchedule("missing componentProps.data".into()))?;

    let mut references_by_sport = BTreeMap::new();
    for item in data {
        let label = item.label.unwrap_or_default().to_lowercase();
        if !INTERESTED_LABELS.contains(&label.as_str()) {
            continue;
        }
        let references: Vec<String> = item
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sub| sub.component_props.and_then(|props| props.url))
            .filter(|url| !url.is_empty())
            .collect();
        references_by_sport.insert(label, references);
    }

    Ok(references_by_sport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 8).unwrap()
    }

    fn schedule_body(items: serde_json::Value) -> String {
        json!({"componentProps": {"data": items}}).to_string()
    }

    // -----------------------------------------------------------------------
    // Resolver
    // -----------------------------------------------------------------------

    #[test]
    fn resolver_keeps_only_interested_labels() {
        let raw: ScheduleResponse = serde_json::from_str(&schedule_body(json!([
            {"label": "Voetbal", "items": [
                {"componentProps": {"url": "web/soccer/matches/1"}},
                {"componentProps": {"url": "web/soccer/matches/2"}}
            ]},
            {"label": "snooker", "items": [
                {"componentProps": {"url": "web/snooker/matches/3"}}
            ]}
        ])))
        .unwrap();

        let schedule = parse_schedule(raw).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(
            schedule["voetbal"],
            vec!["web/soccer/matches/1", "web/soccer/matches/2"]
        );
        for key in schedule.keys() {
            assert!(INTERESTED_LABELS.contains(&key.as_str()));
        }
    }

    #[test]
    fn resolver_skips_entries_without_reference() {
        let raw: ScheduleResponse = serde_json::from_str(&schedule_body(json!([
            {"label": "wielrennen", "items": [
                {"componentProps": {"url": "web/cycling/races/7"}},
                {"componentProps": {}},
                {"componentProps": {"url": ""}},
                {}
            ]}
        ])))
        .unwrap();

        let schedule = parse_schedule(raw).unwrap();
        assert_eq!(schedule["wielrennen"], vec!["web/cycling/races/7"]);
        assert!(schedule["wielrennen"].iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn resolver_rejects_missing_top_level_nesting() {
        for body in ["{}", r#"{"componentProps": {}}"#] {
            let raw: ScheduleResponse = serde_json::from_str(body).unwrap();
            let err = parse_schedule(raw).unwrap_err();
            assert!(matches!(err, ApiError::MalformedSchedule(_)), "{err}");
        }
    }

    // -----------------------------------------------------------------------
    // Fetcher
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fetch_game_builds_the_cycling_variant() {
        let mut server = mockito::Server::new_async().await;
        let _detail = server
            .mock("GET", "/web/cycling/races/101")
            .with_header("content-type", "application/json")
            .with_body(
                json!({"componentProps": {
                    "matchId": "101",
                    "competitionName": "Ronde van Vlaanderen",
                    "startLabel": "14:00 Brussels",
                    "endLabel": "16:30 Antwerp"
                }})
                .to_string(),
            )
            .create_async()
            .await;

        let api = SporzaApi::with_base_url(server.url());
        let record = api
            .fetch_game("wielrennen", "web/cycling/races/101")
            .await
            .unwrap();

        assert!(record.name().contains("Brussels → Antwerp"));
        assert_eq!(record.start_time(), NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(record.end_time(), NaiveTime::from_hms_opt(16, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn fetch_game_joins_bare_match_ids_to_the_sport_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let detail = server
            .mock("GET", "/web/soccer/matches/5678")
            .with_header("content-type", "application/json")
            .with_body(
                json!({"componentProps": {
                    "matchId": "5678",
                    "home": {"name": "Club Brugge"},
                    "away": {"name": "Anderlecht"},
                    "meta": "UEFA Champions League - speeldag 1 - 08/07/25 - 18:00"
                }})
                .to_string(),
            )
            .create_async()
            .await;

        let api = SporzaApi::with_base_url(server.url());
        let record = api.fetch_game("voetbal", "5678").await.unwrap();

        detail.assert_async().await;
        assert_eq!(record.start_time(), NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(record.end_time(), NaiveTime::from_hms_opt(18, 10, 0).unwrap());
    }

    #[tokio::test]
    async fn fetch_game_without_component_props_yields_empty_metadata() {
        let mut server = mockito::Server::new_async().await;
        let _detail = server
            .mock("GET", "/web/basketball/matches/4521")
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let api = SporzaApi::with_base_url(server.url());
        let record = api.fetch_game("basketbal", "4521").await.unwrap();
        assert_eq!(record.match_id(), crate::UNKNOWN_MATCH_ID);
    }

    #[tokio::test]
    async fn unsupported_sport_fails_before_any_request() {
        let api = SporzaApi::with_base_url("http://127.0.0.1:9");
        let err = api.fetch_game("snooker", "123").await.unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedSport(label) if label == "snooker"));
    }

    // -----------------------------------------------------------------------
    // Weekly aggregation
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn week_covers_seven_days_in_order() {
        let mut server = mockito::Server::new_async().await;
        let schedule = server
            .mock("GET", "/web/content/schedule")
            .match_query(mockito::Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(schedule_body(json!([])))
            .expect(7)
            .create_async()
            .await;

        let api = SporzaApi::with_base_url(server.url());
        let week = api.fetch_games_coming_week(day()).await.unwrap();

        schedule.assert_async().await;
        assert_eq!(week.len(), 7);
        let dates: Vec<NaiveDate> = week.keys().copied().collect();
        assert_eq!(dates.first(), Some(&day()));
        assert_eq!(dates.last(), Some(&(day() + chrono::Duration::days(6))));
    }

    #[tokio::test]
    async fn one_failing_match_fails_the_whole_week() {
        let mut server = mockito::Server::new_async().await;
        let _schedule = server
            .mock("GET", "/web/content/schedule")
            .match_query(mockito::Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(schedule_body(json!([
                {"label": "voetbal", "items": [
                    {"componentProps": {"url": "web/soccer/matches/5678"}}
                ]}
            ])))
            .create_async()
            .await;
        let _detail = server
            .mock("GET", "/web/soccer/matches/5678")
            .with_status(500)
            .create_async()
            .await;

        let api = SporzaApi::with_base_url(server.url());
        let err = api.fetch_games_coming_week(day()).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)), "{err}");
    }

    #[tokio::test]
    async fn malformed_match_metadata_fails_the_whole_week() {
        let mut server = mockito::Server::new_async().await;
        let _schedule = server
            .mock("GET", "/web/content/schedule")
            .match_query(mockito::Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(schedule_body(json!([
                {"label": "tennis", "items": [
                    {"componentProps": {"url": "web/tennis/matches/9"}}
                ]}
            ])))
            .create_async()
            .await;
        let _detail = server
            .mock("GET", "/web/tennis/matches/9")
            .with_header("content-type", "application/json")
            .with_body(json!({"componentProps": {"matchId": "9", "home": []}}).to_string())
            .create_async()
            .await;

        let api = SporzaApi::with_base_url(server.url());
        let err = api.fetch_games_coming_week(day()).await.unwrap_err();
        assert!(matches!(err, ApiError::Metadata(_)), "{err}");
    }
}
