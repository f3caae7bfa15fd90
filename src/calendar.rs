//! Projection of cached game records into calendar events, localized to the
//! schedule's civil timezone.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::Brussels;
use chrono_tz::Tz;
use log::debug;
use sporza_api::{GameRecord, WeekSchedule};
use std::collections::HashSet;

pub const ATTRIBUTION: &str = "Data provided by https://sporza.be/";

/// Civil timezone all schedule times are quoted in.
pub const SCHEDULE_TZ: Tz = Brussels;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// `sporza_<sport>_<match_id>_<date>` — the deduplication key.
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

pub fn now_local() -> DateTime<Tz> {
    Utc::now().with_timezone(&SCHEDULE_TZ)
}

/// All events whose date falls within `[start, end]` (compared on the civil
/// day), deduplicated by uid and sorted by start time ascending.
pub fn events_in_range(
    week: &WeekSchedule,
    start: DateTime<Tz>,
    end: DateTime<Tz>,
) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut seen_uids = HashSet::new();

    for (day, games) in week {
        if *day < start.date_naive() || *day > end.date_naive() {
            continue;
        }
        for game in games {
            let Some(event) = project_game(game, *day) else {
                continue;
            };
            if !seen_uids.insert(event.uid.clone()) {
                debug!("skipping duplicate event {}", event.uid);
                continue;
            }
            events.push(event);
        }
    }

    events.sort_by_key(|event| event.start);
    events
}

/// One game on one day as a calendar event. None only when the civil time
/// does not exist in the schedule timezone (spring-forward gap).
fn project_game(game: &GameRecord, day: NaiveDate) -> Option<CalendarEvent> {
    let start = localize(day, game.start_time())?;
    let end = localize(day, game.end_time())?;
    Some(CalendarEvent {
        uid: format!(
            "sporza_{}_{}_{}",
            game.sport_label(),
            game.match_id(),
            day.format("%Y-%m-%d")
        ),
        summary: game.name(),
        description: format!("{}\n\n{}", game.description(), ATTRIBUTION),
        start,
        end,
    })
}

fn localize(day: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    SCHEDULE_TZ.from_local_datetime(&day.and_time(time)).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cycling(match_id: &str, start_label: &str, end_label: &str) -> GameRecord {
        GameRecord::from_metadata(
            "wielrennen",
            json!({
                "matchId": match_id,
                "competitionName": "Ronde",
                "startLabel": start_label,
                "endLabel": end_label
            }),
        )
        .unwrap()
    }

    fn week_of(day: NaiveDate, games: Vec<GameRecord>) -> WeekSchedule {
        let mut week = WeekSchedule::new();
        week.insert(day, games);
        week
    }

    fn whole_week_range(day: NaiveDate) -> (DateTime<Tz>, DateTime<Tz>) {
        let start = SCHEDULE_TZ
            .from_local_datetime(&day.and_hms_opt(0, 0, 0).unwrap())
            .unwrap();
        (start, start + chrono::Duration::days(7))
    }

    #[test]
    fn identical_sport_match_and_date_collapse_to_one_event() {
        let day = date(2025, 7, 8);
        let week = week_of(
            day,
            vec![
                cycling("101", "14:00 Brussels", "16:30 Antwerp"),
                cycling("101", "14:00 Brussels", "16:30 Antwerp"),
            ],
        );

        let (start, end) = whole_week_range(day);
        let events = events_in_range(&week, start, end);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "sporza_wielrennen_101_2025-07-08");
    }

    #[test]
    fn events_come_out_sorted_by_start_time() {
        let day = date(2025, 7, 8);
        let week = week_of(
            day,
            vec![
                cycling("late", "16:00 Gent", "18:00 Brugge"),
                cycling("early", "09:00 Luik", "11:00 Namen"),
            ],
        );

        let (start, end) = whole_week_range(day);
        let events = events_in_range(&week, start, end);
        assert_eq!(events.len(), 2);
        assert!(events[0].uid.contains("early"));
        assert!(events[1].uid.contains("late"));
        assert!(events[0].start <= events[1].start);
    }

    #[test]
    fn out_of_range_days_are_dropped() {
        let mut week = WeekSchedule::new();
        week.insert(date(2025, 7, 8), vec![cycling("in", "14:00 A", "16:00 B")]);
        week.insert(date(2025, 7, 20), vec![cycling("out", "14:00 A", "16:00 B")]);

        let (start, end) = whole_week_range(date(2025, 7, 8));
        let events = events_in_range(&week, start, end);
        assert_eq!(events.len(), 1);
        assert!(events[0].uid.contains("in"));
    }

    #[test]
    fn events_carry_brussels_times_and_attribution() {
        let day = date(2025, 7, 8);
        let week = week_of(day, vec![cycling("101", "14:00 Brussels", "16:30 Antwerp")]);

        let (start, end) = whole_week_range(day);
        let events = events_in_range(&week, start, end);
        let event = &events[0];
        assert_eq!(event.start.time(), NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(event.end.time(), NaiveTime::from_hms_opt(16, 30, 0).unwrap());
        assert_eq!(event.start.timezone(), SCHEDULE_TZ);
        assert!(event.description.ends_with(ATTRIBUTION));
    }
}
