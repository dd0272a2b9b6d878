/// Team codes recovered from a market slug such as `nfl-buf-hou-2025-11-20`.
///
/// The slug lists the away team first, then the home team. Codes are for
/// labelling the form only and are never sent to the scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCodes {
    pub away: String,
    pub home: String,
}

const LEAGUE_TOKEN: &str = "nfl";

impl TeamCodes {
    /// Placeholder labels used when the slug does not yield two codes.
    pub fn generic() -> Self {
        Self {
            away: "AWAY".to_string(),
            home: "HOME".to_string(),
        }
    }

    /// Derive codes from a slug, or fall back to [`TeamCodes::generic`].
    pub fn from_slug_or_generic(slug: &str) -> Self {
        parse_slug_teams(slug).unwrap_or_else(Self::generic)
    }
}

/// Split on hyphens and take the two tokens after `nfl` (or tokens 1 and 2
/// when there is no `nfl` token). Returns `None` if either is missing or
/// empty.
pub fn parse_slug_teams(slug: &str) -> Option<TeamCodes> {
    let parts: Vec<&str> = slug.trim().split('-').collect();
    let start = parts
        .iter()
        .position(|p| p.eq_ignore_ascii_case(LEAGUE_TOKEN))
        .map_or(1, |i| i + 1);

    let away = parts.get(start).filter(|p| !p.is_empty())?;
    let home = parts.get(start + 1).filter(|p| !p.is_empty())?;
    Some(TeamCodes {
        away: away.to_ascii_uppercase(),
        home: home.to_ascii_uppercase(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_slug() {
        let teams = parse_slug_teams("nfl-buf-hou-2025-11-20").unwrap();
        assert_eq!(teams.away, "BUF");
        assert_eq!(teams.home, "HOU");
    }

    #[test]
    fn test_nfl_token_not_first() {
        let teams = parse_slug_teams("live-nfl-kc-den-2025-12-01").unwrap();
        assert_eq!(teams, TeamCodes { away: "KC".into(), home: "DEN".into() });
    }

    #[test]
    fn test_without_league_token_uses_positions_1_and_2() {
        let teams = parse_slug_teams("game-sf-sea-2025").unwrap();
        assert_eq!(teams, TeamCodes { away: "SF".into(), home: "SEA".into() });
    }

    #[test]
    fn test_too_short() {
        assert_eq!(parse_slug_teams(""), None);
        assert_eq!(parse_slug_teams("nfl"), None);
        assert_eq!(parse_slug_teams("nfl-buf"), None);
        assert_eq!(parse_slug_teams("nfl--hou"), None);
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(TeamCodes::from_slug_or_generic("nfl"), TeamCodes::generic());
    }
}
