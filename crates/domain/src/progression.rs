//! Level state machine.
//!
//! Levels are a pure function of the stars earned in a class's reason. Callers
//! pass thresholds in ascending order; unsorted input is a contract violation,
//! not a runtime error.

/// Number of thresholds reached, scanning in order and stopping at the first
/// unmet one.
pub fn compute_level(thresholds: &[u32], stars_in_reason: u32) -> usize {
    thresholds
        .iter()
        .take_while(|&&threshold| stars_in_reason >= threshold)
        .count()
}

/// Stars still missing for the level after `level`, or `None` at max level.
pub fn stars_to_next_level(thresholds: &[u32], level: usize, stars_in_reason: u32) -> Option<u32> {
    thresholds
        .get(level)
        .map(|next| next.saturating_sub(stars_in_reason))
}
