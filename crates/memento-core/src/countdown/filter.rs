//! Disposable-time filter.
//!
//! Scales a countdown result down to the share of the day left after fixed
//! commitments (sleep, work, chores, commute). This is a uniform linear
//! scaling applied to both remaining and total duration, with the elapsed
//! ratio recomputed from the scaled pair. It is not a recomputation of
//! actual free-time windows.

use super::CountdownResult;
use crate::storage::Settings;

/// Apply the disposable-time scaling to `result`.
pub fn apply_disposable(result: CountdownResult, settings: &Settings) -> CountdownResult {
    let disposable = settings.disposable_hours();
    let ratio = disposable / 24.0;

    let total = result.total_ms * ratio;
    let remaining = result.remaining_ms * ratio;
    let elapsed = total - remaining;

    CountdownResult {
        remaining_ms: remaining,
        elapsed_ratio: if total > 0.0 {
            (elapsed / total).clamp(0.0, 1.0)
        } else {
            0.0
        },
        total_ms: total,
        context: format!(
            "{} (free time {}h/day)",
            result.context,
            format_hours(disposable)
        ),
    }
}

/// Render an hour count without a trailing ".0" for whole values.
fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{}", hours as i64)
    } else {
        format!("{hours}")
    }
}
