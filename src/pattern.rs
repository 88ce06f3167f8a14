//! The pattern-match-variance primitive shared by row-based 1D readers
//! (`C9` in the design overview). This crate implements it as a standalone
//! scoring routine; wiring it up to specific symbologies (ITF, Code 93, …)
//! is out of scope here.

/// Score how well a run of observed bar/space widths `counters` matches a
/// reference `pattern` of the same length, tolerant of per-module and
/// average scaling error.
///
/// Returns `f64::INFINITY` when the total width is too short to match the
/// pattern at all, or when any single bar/space deviates from its expected
/// width by more than `max_individual_variance` (relative to the average
/// unit width). Otherwise returns the average per-unit variance — lower is
/// a better match.
///
/// # Panics
/// Panics if `counters.len() != pattern.len()`.
pub fn pattern_match_variance(counters: &[u32], pattern: &[u32], max_individual_variance: f64) -> f64 {
    assert_eq!(counters.len(), pattern.len(), "counters and pattern must have equal length");

    let total: u32 = counters.iter().sum();
    let pattern_length: u32 = pattern.iter().sum();
    if total < pattern_length {
        return f64::INFINITY;
    }

    let unit_bar_width = total as f64 / pattern_length as f64;
    let max_individual_variance = max_individual_variance * unit_bar_width;

    let mut total_variance = 0.0;
    for (&counter, &pat) in counters.iter().zip(pattern.iter()) {
        let scaled_pattern = pat as f64 * unit_bar_width;
        let variance = (counter as f64 - scaled_pattern).abs();
        if variance > max_individual_variance {
            return f64::INFINITY;
        }
        total_variance += variance;
    }

    total_variance / total as f64
}

/// Picks the best-matching candidate pattern out of `candidates`, scored
/// against `counters` via [`pattern_match_variance`]. Ties are rejected
/// (returns `None`), matching the "ties → reject" rule callers like ITF and
/// Code 93 rely on to avoid guessing between two equally-plausible digits.
pub fn best_match<'a>(
    counters: &[u32],
    candidates: impl IntoIterator<Item = &'a [u32]>,
    max_individual_variance: f64,
    max_average_variance: f64,
) -> Option<usize> {
    let mut best_index = None;
    let mut best_variance = max_average_variance;
    let mut tied = false;

    for (index, pattern) in candidates.into_iter().enumerate() {
        let variance = pattern_match_variance(counters, pattern, max_individual_variance);
        if variance < best_variance {
            best_variance = variance;
            best_index = Some(index);
            tied = false;
        } else if best_index.is_some() && (variance - best_variance).abs() < f64::EPSILON {
            tied = true;
        }
    }

    if tied {
        None
    } else {
        best_index
    }
}
