//! Championship points per finishing position

use crate::app::models::SessionKind;
use crate::constants::{RACE_POINTS, SPRINT_POINTS};

/// Points awarded for `position` in a session of `kind`.
///
/// Only races and sprints score; positions outside the table (including 0
/// for an unknown position) score nothing.
pub fn points_for(kind: SessionKind, position: u32) -> u32 {
    match kind {
        SessionKind::Race => race_points(position),
        SessionKind::Sprint => sprint_points(position),
        _ => 0,
    }
}

pub fn race_points(position: u32) -> u32 {
    lookup(&RACE_POINTS, position)
}

pub fn sprint_points(position: u32) -> u32 {
    lookup(&SPRINT_POINTS, position)
}

fn lookup(table: &[u32], position: u32) -> u32 {
    position
        .checked_sub(1)
        .and_then(|index| table.get(index as usize))
        .copied()
        .unwrap_or(0)
}
