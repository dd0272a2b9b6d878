use thiserror::Error;

/// Length of the field between goal lines.
pub const FIELD_YARDS: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YardlineError {
    #[error("yardline must look like \"<TEAM> <yards>\", got {0:?}")]
    Format(String),
    #[error("yardline team {team} is neither {home} nor {away}")]
    UnknownTeam {
        team: String,
        home: String,
        away: String,
    },
}

/// Convert a "<TEAM> <yards>" label into `yardline_100`.
///
/// The label names the side of the field the ball is on. "HOU 36" with HOU
/// at home is 36; the same yards on the away side is `100 - yards`. The
/// result is clamped to `0..=100`. Team codes compare case-insensitively.
pub fn parse_yardline(label: &str, home: &str, away: &str) -> Result<u8, YardlineError> {
    let mut parts = label.split_whitespace();
    let (Some(team), Some(yards), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(YardlineError::Format(label.to_string()));
    };
    let yards: i32 = yards
        .parse()
        .map_err(|_| YardlineError::Format(label.to_string()))?;

    let value = if team.eq_ignore_ascii_case(home) {
        yards
    } else if team.eq_ignore_ascii_case(away) {
        FIELD_YARDS - yards
    } else {
        return Err(YardlineError::UnknownTeam {
            team: team.to_ascii_uppercase(),
            home: home.to_ascii_uppercase(),
            away: away.to_ascii_uppercase(),
        });
    };
    Ok(value.clamp(0, FIELD_YARDS) as u8)
}

/// Render `yardline_100` back as a label, e.g. `88` -> "BUF 12" with BUF away.
/// Midfield is reported on the home side.
pub fn format_yardline(yardline_100: u8, home: &str, away: &str) -> String {
    let y = (yardline_100 as i32).min(FIELD_YARDS);
    if y <= FIELD_YARDS / 2 {
        format!("{} {}", home, y)
    } else {
        format!("{} {}", away, FIELD_YARDS - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_side() {
        assert_eq!(parse_yardline("HOU 36", "HOU", "BUF"), Ok(36));
    }

    #[test]
    fn test_away_side() {
        assert_eq!(parse_yardline("BUF 12", "HOU", "BUF"), Ok(88));
    }

    #[test]
    fn test_unknown_team_rejected() {
        let err = parse_yardline("NYJ 10", "HOU", "BUF").unwrap_err();
        assert!(matches!(err, YardlineError::UnknownTeam { ref team, .. } if team == "NYJ"));
    }

    #[test]
    fn test_case_insensitive_team() {
        assert_eq!(parse_yardline("hou 20", "HOU", "BUF"), Ok(20));
        assert_eq!(parse_yardline("  buf   5 ", "HOU", "BUF"), Ok(95));
    }

    #[test]
    fn test_out_of_range_yards_clamped() {
        assert_eq!(parse_yardline("HOU 140", "HOU", "BUF"), Ok(100));
        assert_eq!(parse_yardline("BUF 140", "HOU", "BUF"), Ok(0));
        assert_eq!(parse_yardline("HOU -5", "HOU", "BUF"), Ok(0));
    }

    #[test]
    fn test_malformed_labels() {
        for label in ["", "HOU", "HOU ten", "HOU 10 yds", "50"] {
            assert!(
                matches!(parse_yardline(label, "HOU", "BUF"), Err(YardlineError::Format(_))),
                "label {label:?} should be a format error"
            );
        }
    }

    #[test]
    fn test_format_yardline() {
        assert_eq!(format_yardline(36, "HOU", "BUF"), "HOU 36");
        assert_eq!(format_yardline(88, "HOU", "BUF"), "BUF 12");
        assert_eq!(format_yardline(50, "HOU", "BUF"), "HOU 50");
    }
}
