use serde::{Deserialize, Serialize};

/// Which side of the home team's moneyline the wager is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Long YES: the home team wins.
    HomeYes,
    /// Long NO: the home team does not win.
    HomeNo,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::HomeYes => "home_yes",
            Side::HomeNo => "home_no",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Side::HomeYes => Side::HomeNo,
            Side::HomeNo => Side::HomeYes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub quarter: u8,
    pub seconds_remaining: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub score_diff_home: i32,
    pub home_has_ball: bool,
    pub yardline_100: u8,
    pub down: u8,
    pub ydstogo: u8,
}

/// Body of `POST /ev/game`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagerRequest {
    pub slug: String,
    pub side: Side,
    pub fee_cost: f64,
    pub state: GameState,
}

/// Response of `POST /ev/game`. Prices are in price space (0-1).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EvResponse {
    pub p_model: f64,
    pub fair_price: f64,
    pub market_price: f64,
    pub fee_cost: f64,
    pub edge_raw: f64,
    pub edge_after_fees: f64,
    pub ev_per_contract: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> WagerRequest {
        WagerRequest {
            slug: "nfl-buf-hou-2025-11-20".to_string(),
            side: Side::HomeNo,
            fee_cost: 0.01,
            state: GameState {
                quarter: 2,
                seconds_remaining: 2235,
                home_score: 10,
                away_score: 7,
                score_diff_home: 3,
                home_has_ball: true,
                yardline_100: 36,
                down: 3,
                ydstogo: 4,
            },
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let v = serde_json::to_value(sample_request()).unwrap();
        assert_eq!(v["slug"], "nfl-buf-hou-2025-11-20");
        assert_eq!(v["side"], "home_no");
        assert_eq!(v["fee_cost"], 0.01);
        assert_eq!(v["state"]["seconds_remaining"], 2235);
        assert_eq!(v["state"]["score_diff_home"], 3);
        assert_eq!(v["state"]["home_has_ball"], true);
        assert_eq!(v["state"]["yardline_100"], 36);
        assert_eq!(v["state"]["ydstogo"], 4);
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "p_model": 0.62, "fair_price": 0.62, "market_price": 0.54,
            "fee_cost": 0.01, "edge_raw": 0.08, "edge_after_fees": 0.07,
            "ev_per_contract": 0.07
        }"#;
        let resp: EvResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.market_price, 0.54);
        assert_eq!(resp.ev_per_contract, 0.07);
    }

    #[test]
    fn test_side_parsing() {
        let side: Side = serde_json::from_str("\"home_yes\"").unwrap();
        assert_eq!(side, Side::HomeYes);
        assert!(serde_json::from_str::<Side>("\"draw\"").is_err());
        assert_eq!(Side::HomeYes.toggled(), Side::HomeNo);
    }
}
