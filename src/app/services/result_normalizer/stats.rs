//! Normalization statistics and result structures
//!
//! Tracks how many table rows made it into result rows, so a malformed or
//! half-empty classification page shows up in the logs instead of silently
//! shrinking the season's data.

use crate::app::models::RaceResultRow;

/// Rows produced from one table (or one knockout segment of it)
#[derive(Debug, Clone, Default)]
pub struct NormalizeResult {
    pub rows: Vec<RaceResultRow>,
    pub stats: ParseStats,
}

impl NormalizeResult {
    pub fn new(rows: Vec<RaceResultRow>, stats: ParseStats) -> Self {
        Self { rows, stats }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Simple normalization statistics
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Data rows encountered (header excluded)
    pub total_rows: usize,

    /// Rows turned into result rows
    pub rows_normalized: usize,

    /// Rows dropped as malformed
    pub rows_skipped: usize,

    /// Recoverable problems worth a look (skipped rows, missing grid mappings)
    pub warnings: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self {
            total_rows: 0,
            rows_normalized: 0,
            rows_skipped: 0,
            warnings: Vec::new(),
        }
    }

    pub fn record_skip(&mut self, reason: String) {
        self.rows_skipped += 1;
        self.warnings.push(reason);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Fold another table's (or segment's) counts into these
    pub fn merge(&mut self, other: &ParseStats) {
        self.total_rows += other.total_rows;
        self.rows_normalized += other.rows_normalized;
        self.rows_skipped += other.rows_skipped;
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.rows_normalized as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Check if normalization was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}
