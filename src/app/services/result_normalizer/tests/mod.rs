//! Test fixtures for classification normalization
//!
//! Builders for race, practice and qualifying tables shaped like the
//! published classification pages, plus a small driver grid.

use std::collections::HashMap;

mod qualifying_tests;

/// Numbers 1..=20 mapped to `grid-<n>`, except 99 which has no entry
pub fn test_grid() -> HashMap<u32, String> {
    (1..=20).map(|n| (n, format!("grid-{}", n))).collect()
}

pub fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Race table: leader time, then the given gap tokens, one row each
pub fn race_table(leader_time: &str, gaps: &[&str]) -> Vec<Vec<String>> {
    let mut table = vec![cells(&["POS", "NO", "DRIVER", "CAR", "LAPS", "TIME/RETIRED", "PTS"])];
    table.push(cells(&["1", "1", "Driver 1", "Team A", "57", leader_time, "25"]));

    for (i, gap) in gaps.iter().enumerate() {
        let place = (i + 2).to_string();
        let name = format!("Driver {}", i + 2);
        table.push(cells(&[
            place.as_str(),
            place.as_str(),
            name.as_str(),
            "Team B",
            "57",
            gap,
            "0",
        ]));
    }
    table
}

/// Qualifying table of `drivers` rows. Drivers past the middle-segment cutoff
/// get empty Q2 and Q3 cells; drivers 11+ get an empty Q3 cell.
pub fn qualifying_table(drivers: usize) -> Vec<Vec<String>> {
    let mut table = vec![cells(&["POS", "NO", "DRIVER", "CAR", "Q1", "Q2", "Q3", "LAPS"])];

    for p in 1..=drivers {
        let q1 = format!("1:2{}.{:03}", p % 10, p);
        let q2 = if p <= 15 { format!("1:1{}.{:03}", p % 10, p) } else { String::new() };
        let q3 = if p <= 10 { format!("1:1{}.{:03}", p % 10, p + 100) } else { String::new() };
        table.push(vec![
            p.to_string(),
            p.to_string(),
            format!("Driver {}", p),
            "Team".to_string(),
            q1,
            q2,
            q3,
            "12".to_string(),
        ]);
    }
    table
}
