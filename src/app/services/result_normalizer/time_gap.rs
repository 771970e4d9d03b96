//! Time gap resolution for classification rows
//!
//! Classification tables give the leader's absolute time and, for everybody
//! else, a textual gap to the leader. These helpers turn a gap into an
//! absolute elapsed time (millisecond exact) or classify the row as a DNF.

use crate::constants::DNF_TOKENS;
use chrono::TimeDelta;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `+<seconds>.<fraction>s`
static GAP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+(\d+)\.(\d+)s$").expect("gap pattern is a valid regex"));

/// `H:MM:SS.mmm` or `MM:SS.mmm`
static RACE_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d+):(\d{1,2})\.(\d+)$").expect("race time pattern is a valid regex")
});

/// Outcome of resolving one row's time cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapResolution {
    pub dnf: bool,
    /// Absolute elapsed time, empty when it cannot be expressed
    pub time: String,
}

impl GapResolution {
    fn finished(time: impl Into<String>) -> Self {
        Self {
            dnf: false,
            time: time.into(),
        }
    }

    fn untimed() -> Self {
        Self::finished(String::new())
    }

    fn did_not_finish() -> Self {
        Self {
            dnf: true,
            time: String::new(),
        }
    }
}

/// Resolve a gap-to-leader cell into an absolute time.
///
/// Rules, first match wins:
/// 1. no leader time yet: this is the reference row and `gap_text` already is its time
/// 2. `DNF` / `+0 lap`: did not finish
/// 3. anything mentioning laps (`+1 lap`, `+2 laps`): classified, but no time
/// 4. `+S.mmms`: leader time plus the gap
/// 5. anything else: treated as a DNF and logged
pub fn resolve_time_gap(gap_text: &str, leader_time: &str) -> GapResolution {
    let gap_text = gap_text.trim();

    if leader_time.is_empty() {
        return GapResolution::finished(gap_text);
    }

    if DNF_TOKENS.contains(&gap_text) {
        return GapResolution::did_not_finish();
    }

    if gap_text.contains("lap") {
        return GapResolution::untimed();
    }

    if let Some(gap) = parse_gap(gap_text) {
        return match add_gap_to_time(leader_time, gap) {
            Some(time) => GapResolution::finished(time),
            None => {
                warn!(
                    "Leader time '{}' is not a race time; gap '{}' left unresolved",
                    leader_time, gap_text
                );
                GapResolution::untimed()
            }
        };
    }

    warn!("Unrecognized time gap '{}', treating row as DNF", gap_text);
    GapResolution::did_not_finish()
}

/// Resolve a cell that holds an absolute time (qualifying segments)
pub fn resolve_absolute_time(time_text: &str) -> GapResolution {
    let time_text = time_text.trim();

    if DNF_TOKENS.contains(&time_text) {
        GapResolution::did_not_finish()
    } else {
        GapResolution::finished(time_text)
    }
}

/// Parse `+12.345s` into a duration
pub fn parse_gap(text: &str) -> Option<TimeDelta> {
    let captures = GAP_PATTERN.captures(text.trim())?;
    let seconds: i64 = captures[1].parse().ok()?;
    let millis = fraction_to_millis(&captures[2])?;

    TimeDelta::try_milliseconds(seconds.checked_mul(1000)?.checked_add(millis)?)
}

/// A parsed race time and whether it was written with an hour field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceTime {
    pub elapsed: TimeDelta,
    pub has_hours: bool,
}

/// Parse `H:MM:SS.mmm` or `MM:SS.mmm`
pub fn parse_race_time(text: &str) -> Option<RaceTime> {
    let captures = RACE_TIME_PATTERN.captures(text.trim())?;

    let hours: i64 = match captures.get(1) {
        Some(h) => h.as_str().parse().ok()?,
        None => 0,
    };
    let minutes: i64 = captures[2].parse().ok()?;
    let seconds: i64 = captures[3].parse().ok()?;
    let millis = fraction_to_millis(&captures[4])?;

    let total = hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(millis)?;

    Some(RaceTime {
        elapsed: TimeDelta::try_milliseconds(total)?,
        has_hours: captures.get(1).is_some(),
    })
}

/// Format an elapsed time, keeping the leading hour field only when asked to
pub fn format_race_time(elapsed: TimeDelta, with_hours: bool) -> String {
    let total = elapsed.num_milliseconds().max(0);
    let millis = total % 1000;
    let seconds = (total / 1000) % 60;

    if with_hours {
        let minutes = (total / 60_000) % 60;
        let hours = total / 3_600_000;
        format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    } else {
        let minutes = total / 60_000;
        format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
    }
}

/// Add a gap to a leader time, preserving the leader time's field layout
pub fn add_gap_to_time(leader_time: &str, gap: TimeDelta) -> Option<String> {
    let leader = parse_race_time(leader_time)?;
    let total = leader.elapsed.checked_add(&gap)?;

    debug!(
        "Resolved gap {}ms on leader {} -> {}ms",
        gap.num_milliseconds(),
        leader_time,
        total.num_milliseconds()
    );

    Some(format_race_time(total, leader.has_hours))
}

/// Decimal fraction digits to milliseconds: "5" -> 500, "456" -> 456, "4567" -> 456
fn fraction_to_millis(digits: &str) -> Option<i64> {
    let mut padded: String = digits.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().ok()
}
