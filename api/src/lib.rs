pub mod client;
pub mod wire;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};
use log::warn;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the Sporza wire format
// ---------------------------------------------------------------------------

/// One refresh cycle's result: the coming week's games keyed by date.
pub type WeekSchedule = BTreeMap<NaiveDate, Vec<GameRecord>>;

/// Sports the integration tracks, keyed by the Dutch labels the schedule
/// endpoint uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sport {
    Basketball,
    Cycling,
    FormulaOne,
    Soccer,
    Tennis,
}

impl Sport {
    pub const ALL: [Sport; 5] = [
        Sport::Basketball,
        Sport::Cycling,
        Sport::FormulaOne,
        Sport::Soccer,
        Sport::Tennis,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "basketbal" => Some(Sport::Basketball),
            "wielrennen" => Some(Sport::Cycling),
            "formule1" => Some(Sport::FormulaOne),
            "voetbal" => Some(Sport::Soccer),
            "tennis" => Some(Sport::Tennis),
            _ => None,
        }
    }

    /// The schedule label as the API spells it.
    pub fn label(&self) -> &'static str {
        match self {
            Sport::Basketball => "basketbal",
            Sport::Cycling => "wielrennen",
            Sport::FormulaOne => "formule1",
            Sport::Soccer => "voetbal",
            Sport::Tennis => "tennis",
        }
    }
}

/// Marker recorded when a match payload carries no usable `matchId`.
pub const UNKNOWN_MATCH_ID: &str = "unknown";

/// Placeholder for missing label strings, as the upstream site renders it.
const UNKNOWN_LABEL: &str = "Onbekend";

/// Default event window used when no start time can be derived.
pub fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default()
}

pub fn default_end() -> NaiveTime {
    NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Parse-or-default combinators
// ---------------------------------------------------------------------------

/// Time component of a `"HH:MM <location>"` label. None when the first token
/// is not a clock; the caller decides whether to fall back.
pub fn parse_time_label(label: &str) -> Option<NaiveTime> {
    let clock = label.split_whitespace().next()?;
    NaiveTime::parse_from_str(clock, "%H:%M").ok()
}

/// Location part of a `"HH:MM <location>"` label: everything after the first
/// space, or the whole label when there is no prefix to strip.
pub fn label_location(label: &str) -> &str {
    match label.split_once(' ') {
        Some((_, rest)) => rest,
        None => label,
    }
}

/// Kickoff clock from a soccer `meta` string: fields joined by `" - "`, at
/// least four of them, the last one a `"HH:MM"` clock.
pub fn parse_meta_kickoff(meta: &str) -> Option<NaiveTime> {
    let fields: Vec<&str> = meta.split(" - ").collect();
    if fields.len() < 4 {
        return None;
    }
    NaiveTime::parse_from_str(fields.last()?.trim(), "%H:%M").ok()
}

/// `matchId` out of a raw metadata object. The field shows up both as a JSON
/// string and as a bare number depending on the sport.
pub fn match_id_from_metadata(metadata: &Value) -> Option<String> {
    match metadata.get("matchId")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Record construction errors
// ---------------------------------------------------------------------------

/// A sport-specialized record could not be built because the metadata lacks
/// required nested fields. Fatal for the match, and therefore for the whole
/// refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedMetadata {
    pub sport: Sport,
    pub match_id: String,
    pub reason: String,
}

impl MalformedMetadata {
    fn new(sport: Sport, match_id: &str, reason: impl Into<String>) -> Self {
        Self { sport, match_id: match_id.to_owned(), reason: reason.into() }
    }
}

impl fmt::Display for MalformedMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed {} metadata for match {}: {}",
            self.sport.label(),
            self.match_id,
            self.reason
        )
    }
}

impl std::error::Error for MalformedMetadata {}

// ---------------------------------------------------------------------------
// Game records — one variant per sport
// ---------------------------------------------------------------------------

/// A typed, immutable representation of one sporting event for calendar
/// display. Labels without a dedicated variant map to `Generic` explicitly.
#[derive(Debug, Clone)]
pub enum GameRecord {
    Generic(GenericGame),
    Cycling(CyclingGame),
    Soccer(SoccerGame),
    FormulaOne(FormulaOneGame),
    Tennis(TennisGame),
}

impl GameRecord {
    /// Build the record variant for a schedule label from a raw metadata
    /// object. Selection is a fixed label → variant table; basketball (no
    /// dedicated variant yet) and unrecognized labels become generic records.
    pub fn from_metadata(label: &str, metadata: Value) -> Result<Self, MalformedMetadata> {
        let match_id = match_id_from_metadata(&metadata).unwrap_or_else(|| {
            warn!("{label} match payload carries no matchId, recording as \"{UNKNOWN_MATCH_ID}\"");
            UNKNOWN_MATCH_ID.to_owned()
        });

        let record = match Sport::from_label(label) {
            Some(Sport::Cycling) => {
                GameRecord::Cycling(CyclingGame::from_metadata(match_id, &metadata))
            }
            Some(Sport::Soccer) => {
                GameRecord::Soccer(SoccerGame::from_metadata(match_id, &metadata)?)
            }
            Some(Sport::FormulaOne) => {
                GameRecord::FormulaOne(FormulaOneGame::from_metadata(match_id, &metadata))
            }
            Some(Sport::Tennis) => {
                GameRecord::Tennis(TennisGame::from_metadata(match_id, &metadata)?)
            }
            Some(Sport::Basketball) | None => {
                GameRecord::Generic(GenericGame::new(match_id, label.to_owned(), metadata))
            }
        };
        Ok(record)
    }

    pub fn match_id(&self) -> &str {
        match self {
            GameRecord::Generic(g) => &g.match_id,
            GameRecord::Cycling(g) => &g.match_id,
            GameRecord::Soccer(g) => &g.match_id,
            GameRecord::FormulaOne(g) => &g.match_id,
            GameRecord::Tennis(g) => &g.match_id,
        }
    }

    pub fn sport_label(&self) -> &str {
        match self {
            GameRecord::Generic(g) => &g.sport,
            GameRecord::Cycling(_) => Sport::Cycling.label(),
            GameRecord::Soccer(_) => Sport::Soccer.label(),
            GameRecord::FormulaOne(_) => Sport::FormulaOne.label(),
            GameRecord::Tennis(_) => Sport::Tennis.label(),
        }
    }

    /// Concise summary for calendar display. Pure function of the metadata
    /// the record was built from.
    pub fn name(&self) -> String {
        match self {
            GameRecord::Generic(g) => g.name(),
            GameRecord::Cycling(g) => g.name(),
            GameRecord::Soccer(g) => g.name(),
            GameRecord::FormulaOne(g) => g.name(),
            GameRecord::Tennis(g) => g.name(),
        }
    }

    /// Multi-line detail text, emoji included.
    pub fn description(&self) -> String {
        match self {
            GameRecord::Generic(g) => g.description(),
            GameRecord::Cycling(g) => g.description(),
            GameRecord::Soccer(g) => g.description(),
            GameRecord::FormulaOne(g) => g.description(),
            GameRecord::Tennis(g) => g.description(),
        }
    }

    /// Start of the event window, in the schedule's civil timezone.
    pub fn start_time(&self) -> NaiveTime {
        match self {
            GameRecord::Generic(_) | GameRecord::Tennis(_) => default_start(),
            GameRecord::Cycling(g) => {
                parse_time_label(&g.start_label).unwrap_or_else(default_start)
            }
            GameRecord::Soccer(g) => g.kickoff.unwrap_or_else(default_start),
            GameRecord::FormulaOne(g) => {
                parse_time_label(&g.start_label).unwrap_or_else(default_start)
            }
        }
    }

    /// End of the event window. Soccer runs ten minutes past kickoff, the
    /// label sports take their own end label, everything else gets the
    /// default window.
    pub fn end_time(&self) -> NaiveTime {
        match self {
            GameRecord::Generic(_) | GameRecord::Tennis(_) => default_end(),
            GameRecord::Cycling(g) => parse_time_label(&g.end_label).unwrap_or_else(default_end),
            GameRecord::Soccer(g) => g
                .kickoff
                .map(|t| t + Duration::minutes(10))
                .unwrap_or_else(default_end),
            GameRecord::FormulaOne(g) => {
                parse_time_label(&g.end_label).unwrap_or_else(default_end)
            }
        }
    }
}

/// Fallback record for sports without a specialized variant. Keeps the raw
/// metadata around untouched.
#[derive(Debug, Clone)]
pub struct GenericGame {
    pub match_id: String,
    pub sport: String,
    pub metadata: Value,
}

impl GenericGame {
    pub fn new(match_id: String, sport: String, metadata: Value) -> Self {
        Self { match_id, sport, metadata }
    }

    fn name(&self) -> String {
        format!("{} Match (ID: {})", capitalize(&self.sport), self.match_id)
    }

    fn description(&self) -> String {
        format!("{} match (ID: {})", capitalize(&self.sport), self.match_id)
    }
}

#[derive(Debug, Clone)]
pub struct CyclingGame {
    pub match_id: String,
    pub competition_name: String,
    pub stage_name: String,
    pub game_type: String,
    pub url: String,
    pub start_label: String,
    pub end_label: String,
}

impl CyclingGame {
    /// Cycling metadata has no required fields; anything missing degrades to
    /// placeholders and the default time window.
    pub fn from_metadata(match_id: String, metadata: &Value) -> Self {
        let meta: wire::CyclingMeta =
            serde_json::from_value(metadata.clone()).unwrap_or_default();
        Self {
            match_id,
            competition_name: meta.competition_name.unwrap_or_default(),
            stage_name: meta.stage.unwrap_or_default(),
            game_type: meta.game_type.unwrap_or_default(),
            url: meta.url.unwrap_or_default(),
            start_label: meta.start_label.unwrap_or_else(|| UNKNOWN_LABEL.to_owned()),
            end_label: meta.end_label.unwrap_or_else(|| UNKNOWN_LABEL.to_owned()),
        }
    }

    fn name(&self) -> String {
        format!(
            "🚴‍♂️ {}: {} → {}",
            self.competition_name,
            label_location(&self.start_label),
            label_location(&self.end_label)
        )
    }

    fn description(&self) -> String {
        format!(
            "🚴‍♂️ {} • {}\n🏁 Etappe: {}\n📍 {} → {}\n🔗 Meer info: {}",
            self.competition_name,
            self.game_type,
            self.stage_name,
            label_location(&self.start_label),
            label_location(&self.end_label),
            info_link(&self.url)
        )
    }
}

#[derive(Debug, Clone)]
pub struct SoccerGame {
    pub match_id: String,
    pub home_team: String,
    pub away_team: String,
    pub competition_name: String,
    pub url: String,
    /// Parsed kickoff, None when the meta string held no usable clock. The
    /// default window applies in that case.
    pub kickoff: Option<NaiveTime>,
}

impl SoccerGame {
    pub fn from_metadata(match_id: String, metadata: &Value) -> Result<Self, MalformedMetadata> {
        let meta: wire::SoccerMeta = serde_json::from_value(metadata.clone())
            .map_err(|e| MalformedMetadata::new(Sport::Soccer, &match_id, e.to_string()))?;

        let home_team = meta
            .home
            .and_then(|t| t.name)
            .ok_or_else(|| MalformedMetadata::new(Sport::Soccer, &match_id, "missing home.name"))?;
        let away_team = meta
            .away
            .and_then(|t| t.name)
            .ok_or_else(|| MalformedMetadata::new(Sport::Soccer, &match_id, "missing away.name"))?;

        let kickoff = meta.meta.as_deref().and_then(parse_meta_kickoff);
        if kickoff.is_none() {
            warn!(
                "no kickoff clock in soccer meta {:?} for match {match_id}, using default window",
                meta.meta.as_deref().unwrap_or("")
            );
        }

        Ok(Self {
            match_id,
            home_team,
            away_team,
            competition_name: meta.competition_name.unwrap_or_default(),
            url: meta.url.unwrap_or_default(),
            kickoff,
        })
    }

    fn name(&self) -> String {
        format!(
            "⚽️ {}: {} vs {}",
            self.competition_name, self.home_team, self.away_team
        )
    }

    fn description(&self) -> String {
        format!(
            "⚽️ {}\n🏟️ {} vs {}\n🔗 Meer info: {}",
            self.competition_name,
            self.home_team,
            self.away_team,
            info_link(&self.url)
        )
    }
}

#[derive(Debug, Clone)]
pub struct FormulaOneGame {
    pub match_id: String,
    pub competition_name: String,
    pub location: String,
    pub rounds: Option<u32>,
    pub url: String,
    pub start_label: String,
    pub end_label: String,
}

impl FormulaOneGame {
    pub fn from_metadata(match_id: String, metadata: &Value) -> Self {
        let meta: wire::FormulaOneMeta =
            serde_json::from_value(metadata.clone()).unwrap_or_default();
        Self {
            match_id,
            competition_name: meta.competition_name.unwrap_or_default(),
            location: meta.location.unwrap_or_default(),
            rounds: meta.rounds,
            url: meta.url.unwrap_or_default(),
            start_label: meta.start_label.unwrap_or_else(|| UNKNOWN_LABEL.to_owned()),
            end_label: meta.end_label.unwrap_or_else(|| UNKNOWN_LABEL.to_owned()),
        }
    }

    fn name(&self) -> String {
        format!("🏎️ {} @ {}", self.competition_name, self.location)
    }

    fn description(&self) -> String {
        let rounds = match self.rounds {
            Some(n) => format!("{n} ronden"),
            None => "Onbekend aantal ronden".to_owned(),
        };
        format!(
            "🏁 {}\n📍 Locatie: {}\n🔄 Ronden: {}\n🔗 Meer info: {}",
            self.competition_name,
            self.location,
            rounds,
            info_link(&self.url)
        )
    }
}

#[derive(Debug, Clone)]
pub struct TennisGame {
    pub match_id: String,
    pub home_player: String,
    pub away_player: String,
    pub competition_name: String,
    pub url: String,
}

impl TennisGame {
    /// Tennis rosters are lists; the first entry of each side must carry a
    /// name. No time derivation — tennis always uses the default window.
    pub fn from_metadata(match_id: String, metadata: &Value) -> Result<Self, MalformedMetadata> {
        let meta: wire::TennisMeta = serde_json::from_value(metadata.clone())
            .map_err(|e| MalformedMetadata::new(Sport::Tennis, &match_id, e.to_string()))?;

        let home_player = first_player_name(meta.home).ok_or_else(|| {
            MalformedMetadata::new(Sport::Tennis, &match_id, "missing home[0].name")
        })?;
        let away_player = first_player_name(meta.away).ok_or_else(|| {
            MalformedMetadata::new(Sport::Tennis, &match_id, "missing away[0].name")
        })?;

        Ok(Self {
            match_id,
            home_player,
            away_player,
            competition_name: meta.competition_name.unwrap_or_default(),
            url: meta.url.unwrap_or_default(),
        })
    }

    fn name(&self) -> String {
        format!(
            "🎾 {}: {} vs {}",
            self.competition_name, self.home_player, self.away_player
        )
    }

    fn description(&self) -> String {
        format!(
            "🎾 {}\n🆚 {} vs {}\n🔗 Meer info: {}",
            self.competition_name,
            self.home_player,
            self.away_player,
            info_link(&self.url)
        )
    }
}

fn first_player_name(side: Option<Vec<wire::PlayerRef>>) -> Option<String> {
    side?.into_iter().next()?.name.filter(|n| !n.is_empty())
}

fn info_link(url: &str) -> &str {
    if url.is_empty() { "Geen URL" } else { url }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}
