//! Tests for knockout segment extraction

use super::*;
use crate::app::models::{SessionContext, SessionKind};
use crate::app::services::result_normalizer::qualifying::{
    KnockoutSegment, QualifyingSessionIds, SegmentPass, assign_segments, extract_segment,
};

fn quali_context() -> SessionContext {
    SessionContext::new(SessionKind::Qualifying3, "2024", "q3-1")
}

fn ids() -> QualifyingSessionIds {
    QualifyingSessionIds {
        first: Some("q1-1".to_string()),
        middle: Some("q2-1".to_string()),
        final_segment: "q3-1".to_string(),
    }
}

#[test]
fn test_three_segments_from_one_table() {
    let grid = test_grid();
    let table = qualifying_table(20);

    let segments = assign_segments(&table, &ids(), &quali_context(), &grid);

    assert_eq!(segments.first.rows.len(), 20);
    assert_eq!(segments.middle.rows.len(), 15);
    assert_eq!(segments.final_segment.rows.len(), 20);
    assert_eq!(segments.total_rows(), 55);

    assert!(segments.first.rows.iter().all(|r| r.race_id == "q1-1"));
    assert!(segments.middle.rows.iter().all(|r| r.race_id == "q2-1"));
    assert!(segments.final_segment.rows.iter().all(|r| r.race_id == "q3-1"));

    // Each segment reads its own time column
    assert_eq!(segments.first.rows[0].time, table[1][4]);
    assert_eq!(segments.middle.rows[0].time, table[1][5]);
    assert_eq!(segments.final_segment.rows[0].time, table[1][6]);

    // Eliminated drivers keep their row with an empty time
    assert_eq!(segments.final_segment.rows[15].time, "");
    assert!(!segments.final_segment.rows[15].dnf);
    assert!(segments.final_segment.rows.iter().all(|r| r.points == 0));
}

#[test]
fn test_middle_segment_stops_five_rows_before_the_end() {
    let grid = test_grid();
    // Header plus 19 drivers: 20 table rows
    let table = qualifying_table(19);
    assert_eq!(table.len(), 20);

    let pass = SegmentPass::new(KnockoutSegment::Middle, "q2-1");
    let result = extract_segment(&table, &pass, &quali_context(), &grid);

    assert_eq!(result.stats.total_rows, 14);
    assert_eq!(result.rows.len(), 14);
    assert_eq!(result.rows.last().map(|r| r.position), Some(14));
}

#[test]
fn test_segment_discarded_when_first_row_untimed() {
    let grid = test_grid();
    let mut table = qualifying_table(20);
    for row in table.iter_mut().skip(1) {
        row[4] = String::new();
    }
    // Later rows having times must not matter
    table[2][4] = "1:29.000".to_string();

    let pass = SegmentPass::new(KnockoutSegment::First, "q1-1");
    let result = extract_segment(&table, &pass, &quali_context(), &grid);

    assert!(result.rows.is_empty());
    assert_eq!(result.stats.rows_normalized, 0);
}

#[test]
fn test_discarding_one_segment_leaves_the_others() {
    let grid = test_grid();
    let mut table = qualifying_table(20);
    for row in table.iter_mut().skip(1) {
        row[5] = String::new();
    }

    let segments = assign_segments(&table, &ids(), &quali_context(), &grid);

    assert_eq!(segments.first.rows.len(), 20);
    assert!(segments.middle.rows.is_empty());
    assert_eq!(segments.final_segment.rows.len(), 20);
}

#[test]
fn test_discard_rule_can_be_disabled() {
    let grid = test_grid();
    let mut table = qualifying_table(12);
    table[1][6] = String::new();

    let mut pass = SegmentPass::new(KnockoutSegment::Final, "q3-1");
    pass.discard_when_first_row_untimed = false;
    let result = extract_segment(&table, &pass, &quali_context(), &grid);

    assert_eq!(result.rows.len(), 12);
}

#[test]
fn test_missing_segment_id_skips_that_segment() {
    let grid = test_grid();
    let table = qualifying_table(20);
    let ids = QualifyingSessionIds {
        first: None,
        middle: Some("q2-1".to_string()),
        final_segment: "q3-1".to_string(),
    };

    let segments = assign_segments(&table, &ids, &quali_context(), &grid);

    assert!(segments.first.rows.is_empty());
    assert_eq!(segments.middle.rows.len(), 15);
    assert_eq!(segments.into_rows().len(), 35);
}

#[test]
fn test_small_table_has_no_middle_rows() {
    let grid = test_grid();
    let table = qualifying_table(4);

    let pass = SegmentPass::new(KnockoutSegment::Middle, "q2-1");
    let result = extract_segment(&table, &pass, &quali_context(), &grid);

    assert!(result.rows.is_empty());
    assert_eq!(result.stats.total_rows, 0);
}

#[test]
fn test_dnf_cell_in_segment() {
    let grid = test_grid();
    let mut table = qualifying_table(20);
    table[20][4] = "DNF".to_string();

    let pass = SegmentPass::new(KnockoutSegment::First, "q1-1");
    let result = extract_segment(&table, &pass, &quali_context(), &grid);

    assert!(result.rows[19].dnf);
    assert_eq!(result.rows[19].time, "");
    assert_eq!(result.rows[19].laps, 12);
}

#[test]
fn test_sprint_segment_kinds() {
    assert_eq!(KnockoutSegment::First.session_kind(true), SessionKind::SprintQualifying1);
    assert_eq!(KnockoutSegment::Final.session_kind(false), SessionKind::Qualifying3);
    assert_eq!(KnockoutSegment::Middle.trailing_rows_excluded(), 5);
    assert_eq!(KnockoutSegment::Final.trailing_rows_excluded(), 0);
}
