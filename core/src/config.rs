//! Configuration for the comparison engine.
//!
//! `CompareConfig` centralizes the user-facing comparison options and the
//! algorithm thresholds in one place to avoid hardcoded constants scattered
//! throughout the codebase.

use serde::{Deserialize, Serialize};

/// Which document the caller considers "old". The old side is painted with
/// removal markers, the other side with addition markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocSide {
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Fold ASCII letters to lower case before hashing lines and words.
    pub ignore_case: bool,
    /// Elide spaces and tabs from line hashes and drop whitespace words.
    pub ignore_whitespace: bool,
    /// Run the move-detection pass over unmatched blocks.
    pub detect_moves: bool,
    pub old_side: DocSide,
    /// Minimum per-line convergence percentage for two lines to be paired
    /// as a changed-line candidate.
    pub min_line_convergence: u32,
    /// A line pair is rejected outright when the longer side has more than
    /// `max_word_ratio` times the words of the shorter side.
    pub max_word_ratio: u32,
    /// Cancellation poll interval during line hashing, in lines.
    pub cancel_check_lines: u32,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            ignore_case: false,
            ignore_whitespace: false,
            detect_moves: true,
            old_side: DocSide::A,
            min_line_convergence: 50,
            max_word_ratio: 2,
            cancel_check_lines: 500,
        }
    }
}
