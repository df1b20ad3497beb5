// File: crates/logview-core/src/allocate.rs
// Summary: Gap-aware split of a global point budget across contiguous segments.

/// Smallest target handed to a non-empty segment when downsampling is needed.
pub const MIN_SEGMENT_TARGET: usize = 2;

/// Split `total_budget` proportionally to segment length.
///
/// When every segment fits (`sum(lengths) <= total_budget`) each segment keeps
/// its own length. Otherwise segment `i` gets
/// `max(2, round(total_budget * len_i / sum))`, never more than its length.
/// Rounding means the sum is only bounded (about ±1 per segment), not equal
/// to the budget.
pub fn allocate_budget(segment_lengths: &[usize], total_budget: usize) -> Vec<usize> {
    let total: usize = segment_lengths.iter().sum();
    if total <= total_budget {
        return segment_lengths.to_vec();
    }
    segment_lengths
        .iter()
        .map(|&len| {
            if len == 0 {
                return 0;
            }
            let share = (total_budget as f64 * len as f64 / total as f64).round() as usize;
            share.max(MIN_SEGMENT_TARGET).min(len)
        })
        .collect()
}
