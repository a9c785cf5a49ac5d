//! Text and row formatting for the HUD, menus and leaderboard panel

use chrono::DateTime;

use crate::auth::Identity;
use crate::leaderboard::{QueryStatus, ScoreEntry};

pub const LEADERBOARD_LOADING: &str = "Loading...";
pub const LEADERBOARD_FAILED: &str = "Failed to load leaderboard";
pub const LEADERBOARD_EMPTY: &str = "No scores yet. Be the first!";

/// HUD speed readout, e.g. `1.3x`
pub fn format_speed_multiplier(multiplier: f32) -> String {
    format!("{:.1}x", multiplier)
}

/// "Connected: abcde-fghi..." line on the start menu
pub fn connected_label(identity: &Identity) -> String {
    format!("Connected: {}", identity.abbreviated())
}

/// Name shown for an entry: chosen name, else abbreviated principal
pub fn entry_label(entry: &ScoreEntry) -> String {
    match entry.player_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => entry.player.abbreviated(),
    }
}

/// CSS class for the rank badge; medals for the top three
pub fn rank_class(rank: usize) -> &'static str {
    match rank {
        1 => "rank rank-gold",
        2 => "rank rank-silver",
        3 => "rank rank-bronze",
        _ => "rank",
    }
}

/// Short date, month/day/year (UTC). Empty when out of range.
pub fn format_date(timestamp_ms: f64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms.floor() as i64)
        .map(|d| d.format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

/// One rendered leaderboard line
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub label: String,
    pub date: String,
    pub score: String,
    pub class: &'static str,
}

pub fn leaderboard_rows(entries: &[ScoreEntry]) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let rank = i + 1;
            LeaderboardRow {
                rank,
                label: entry_label(entry),
                date: format_date(entry.timestamp_ms()),
                score: entry.score.to_string(),
                class: rank_class(rank),
            }
        })
        .collect()
}

/// Placeholder text for a leaderboard without rows
pub fn leaderboard_message(status: &QueryStatus<'_>) -> Option<&'static str> {
    match status {
        QueryStatus::Pending => Some(LEADERBOARD_LOADING),
        QueryStatus::Failed(_) => Some(LEADERBOARD_FAILED),
        QueryStatus::Empty => Some(LEADERBOARD_EMPTY),
        QueryStatus::Loaded(_) => None,
    }
}
