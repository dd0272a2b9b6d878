//! Game-state normalizer: loosely typed form input -> canonical request.
//!
//! Every numeric field may be blank while the user is editing. At submission
//! time a blank or unparseable value falls back to the configured default,
//! and out-of-range values are clamped rather than rejected. The only hard
//! failure is a yardline label that cannot be resolved against the teams in
//! the slug.

use super::clock;
use super::field::{self, YardlineError};
use super::teams::TeamCodes;
use crate::config::FormDefaults;
use crate::ev::types::{GameState, Side, WagerRequest};
use std::num::IntErrorKind;

/// The form exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForm {
    pub slug: String,
    pub side: Side,
    pub fee_cost: String,
    pub quarter: String,
    pub clock: String,
    pub home_score: String,
    pub away_score: String,
    pub home_has_ball: bool,
    pub yardline: String,
    pub down: String,
    pub ydstogo: String,
}

impl RawForm {
    pub fn from_defaults(d: &FormDefaults) -> Self {
        Self {
            slug: d.slug.clone(),
            side: d.side,
            fee_cost: d.fee_cost.to_string(),
            quarter: d.quarter.to_string(),
            clock: d.clock.clone(),
            home_score: d.home_score.to_string(),
            away_score: d.away_score.to_string(),
            home_has_ball: d.home_has_ball,
            yardline: d.yardline.clone(),
            down: d.down.to_string(),
            ydstogo: d.ydstogo.to_string(),
        }
    }

    /// Slug with the default substituted when blank.
    pub fn effective_slug<'a>(&'a self, defaults: &'a FormDefaults) -> &'a str {
        let slug = self.slug.trim();
        if slug.is_empty() {
            defaults.slug.trim()
        } else {
            slug
        }
    }
}

/// Parse an integer field, falling back to `default` when blank or invalid,
/// then clamp into `min..=max`. Digits too large for `i64` saturate.
pub fn int_or(raw: &str, default: i64, min: i64, max: i64) -> i64 {
    let value = match raw.trim().parse::<i64>() {
        Ok(v) => v,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => max,
            IntErrorKind::NegOverflow => min,
            _ => default,
        },
    };
    value.clamp(min, max)
}

/// Parse a decimal field the same way; non-finite input counts as invalid.
pub fn decimal_or(raw: &str, default: f64, min: f64) -> f64 {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(default);
    value.max(min)
}

/// Build the request body from the raw form.
pub fn normalize(raw: &RawForm, defaults: &FormDefaults) -> Result<WagerRequest, YardlineError> {
    let slug = raw.effective_slug(defaults).to_string();
    let teams = TeamCodes::from_slug_or_generic(&slug);

    let quarter = int_or(&raw.quarter, defaults.quarter as i64, 1, clock::REGULATION_QUARTERS as i64) as u8;
    let clock_str = if raw.clock.trim().is_empty() {
        defaults.clock.as_str()
    } else {
        raw.clock.as_str()
    };
    let seconds_remaining = clock::seconds_remaining(quarter, clock_str);

    let home_score = int_or(&raw.home_score, defaults.home_score as i64, 0, u32::MAX as i64) as u32;
    let away_score = int_or(&raw.away_score, defaults.away_score as i64, 0, u32::MAX as i64) as u32;
    let score_diff_home = (home_score as i64 - away_score as i64)
        .clamp(i32::MIN as i64, i32::MAX as i64) as i32;

    let down = int_or(&raw.down, defaults.down as i64, 1, 4) as u8;
    let ydstogo = int_or(&raw.ydstogo, defaults.ydstogo as i64, 1, field::FIELD_YARDS as i64) as u8;
    let fee_cost = decimal_or(&raw.fee_cost, defaults.fee_cost, 0.0);

    let yardline_100 = field::parse_yardline(&raw.yardline, &teams.home, &teams.away)?;

    Ok(WagerRequest {
        slug,
        side: raw.side,
        fee_cost,
        state: GameState {
            quarter,
            seconds_remaining,
            home_score,
            away_score,
            score_diff_home,
            home_has_ball: raw.home_has_ball,
            yardline_100,
            down,
            ydstogo,
        },
    })
}
