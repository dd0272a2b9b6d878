//! Game-clock conversion for a four-quarter NFL regulation game.
//!
//! The scoring service wants `seconds_remaining` in the whole game, not in
//! the current quarter, so the clock reading is topped up with the length of
//! every quarter still to be played.

/// Length of one NFL quarter in seconds.
pub const QUARTER_SECS: u32 = 900;

/// Number of regulation quarters.
pub const REGULATION_QUARTERS: u8 = 4;

/// Full regulation length in seconds (4 x 15 min).
pub const REGULATION_SECS: u32 = QUARTER_SECS * REGULATION_QUARTERS as u32;

/// Parse a "MM:SS" game clock into seconds left in the current quarter.
///
/// Returns `None` unless the input is exactly two colon-separated
/// non-negative integers. Surrounding whitespace is ignored.
pub fn parse_clock(clock: &str) -> Option<u32> {
    let (min_str, sec_str) = clock.trim().split_once(':')?;
    if sec_str.contains(':') {
        return None;
    }
    let minutes: u32 = min_str.trim().parse().ok()?;
    let seconds: u32 = sec_str.trim().parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Seconds remaining in regulation for a quarter + "MM:SS" clock reading.
///
/// `(MM*60 + SS) + max(0, 4 - quarter) * 900`, clamped to `0..=3600`.
/// A malformed clock yields 0 rather than an error.
pub fn seconds_remaining(quarter: u8, clock: &str) -> u32 {
    let Some(in_quarter) = parse_clock(clock) else {
        return 0;
    };
    let quarters_left = REGULATION_QUARTERS.saturating_sub(quarter) as u32;
    in_quarter
        .saturating_add(quarters_left * QUARTER_SECS)
        .min(REGULATION_SECS)
}

/// Inverse of [`seconds_remaining`] for display: (quarter, "M:SS").
pub fn format_game_clock(seconds_remaining: u32) -> (u8, String) {
    let secs = seconds_remaining.min(REGULATION_SECS);
    let elapsed = REGULATION_SECS - secs;
    let quarter = ((elapsed / QUARTER_SECS) as u8 + 1).min(REGULATION_QUARTERS);
    let in_quarter = secs - (REGULATION_QUARTERS - quarter) as u32 * QUARTER_SECS;
    (quarter, format!("{}:{:02}", in_quarter / 60, in_quarter % 60))
}
