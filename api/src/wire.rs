/// Sporza API raw wire types — serde shapes for deserializing schedule and
/// match detail responses. These map to the clean domain types via the
/// builders in lib.rs and the resolver in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Day schedule  (/web/content/schedule?date=YYYY-MM-DD)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    #[serde(rename = "componentProps")]
    pub component_props: Option<ScheduleProps>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleProps {
    pub data: Option<Vec<ScheduleItem>>,
}

/// One sport category in the day listing.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleItem {
    pub label: Option<String>,
    pub items: Option<Vec<ScheduleSubItem>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleSubItem {
    #[serde(rename = "componentProps")]
    pub component_props: Option<MatchReference>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchReference {
    /// Per-match API reference. Entries without one are skipped.
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Match detail  (per-match reference URL)
// ---------------------------------------------------------------------------

/// Detail payloads vary by sport, so the metadata stays a raw JSON object
/// here and gets shaped per sport below.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchDetailResponse {
    #[serde(rename = "componentProps")]
    pub component_props: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Per-sport metadata shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CyclingMeta {
    #[serde(rename = "competitionName")]
    pub competition_name: Option<String>,
    pub stage: Option<String>,
    #[serde(rename = "type")]
    pub game_type: Option<String>,
    /// "HH:MM <location>" — time prefix optional in practice.
    #[serde(rename = "startLabel")]
    pub start_label: Option<String>,
    #[serde(rename = "endLabel")]
    pub end_label: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SoccerMeta {
    pub home: Option<TeamRef>,
    pub away: Option<TeamRef>,
    /// Display fields joined by " - ", kickoff clock last,
    /// e.g. "UEFA Champions League - speeldag 1 - 08/07/25 - 18:00".
    pub meta: Option<String>,
    #[serde(rename = "competitionName")]
    pub competition_name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamRef {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FormulaOneMeta {
    #[serde(rename = "competitionName")]
    pub competition_name: Option<String>,
    pub location: Option<String>,
    pub rounds: Option<u32>,
    #[serde(rename = "startLabel")]
    pub start_label: Option<String>,
    #[serde(rename = "endLabel")]
    pub end_label: Option<String>,
    pub url: Option<String>,
}

/// Tennis carries team rosters as lists; singles matches have one entry.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TennisMeta {
    pub home: Option<Vec<PlayerRef>>,
    pub away: Option<Vec<PlayerRef>>,
    #[serde(rename = "competitionName")]
    pub competition_name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlayerRef {
    pub name: Option<String>,
}
