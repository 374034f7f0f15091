//! Agricultural season calendar.
//!
//! Maps a calendar date onto the three Indian sowing seasons. The mapping is
//! total: every month belongs to exactly one season.

use chrono::{Datelike, NaiveDate, Utc};

use crate::models::Season;

/// Season for a given date
pub fn season_for(date: NaiveDate) -> Season {
    match date.month() {
        6..=10 => Season::Kharif,
        11 | 12 | 1..=3 => Season::Rabi,
        // April and May
        _ => Season::Zaid,
    }
}

/// Season for today (UTC)
pub fn current_season() -> Season {
    season_for(Utc::now().date_naive())
}
