//! Reflection messages shown under the countdown.
//!
//! Pools are keyed by the remaining-ratio band and rotate every 30 seconds
//! of wall time so the text changes without any stored state.

use chrono::NaiveDateTime;

const HIGH: [&str; 3] = [
    "There is still time. But it is not infinite.",
    "What you can do today, do not push to tomorrow.",
    "If you are going to take the first step, take it now.",
];

const MID: [&str; 3] = [
    "Halfway through. This is where it counts.",
    "Half remains. Raise the density.",
    "There is still time to recover. Focus.",
];

const LOW: [&str; 3] = [
    "Little remains. Spend it on what truly matters.",
    "Time does not wait. Move now.",
    "What can you still do with the time that is left?",
];

const CRITICAL: [&str; 3] = [
    "Can you hear the seconds ticking?",
    "Almost there. Give it everything until the end.",
    "Time is a resource. Use it to the last drop.",
];

/// Pick a reflection message for the current elapsed ratio.
pub fn message_for_ratio(elapsed_ratio: f64, now: NaiveDateTime) -> &'static str {
    let remaining = 1.0 - elapsed_ratio;
    let pool: &[&str] = if remaining > 0.7 {
        &HIGH
    } else if remaining > 0.4 {
        &MID
    } else if remaining > 0.15 {
        &LOW
    } else {
        &CRITICAL
    };

    let slot = now.and_utc().timestamp_millis() / 30_000;
    pool[slot.rem_euclid(pool.len() as i64) as usize]
}
