use super::form::{FieldKey, FormState};
use crate::config::FormDefaults;
use crate::engine::{normalize, RawForm};
use crate::ev::types::{EvResponse, WagerRequest};
use crate::ev::EvError;
use std::collections::VecDeque;
use std::time::Instant;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

/// A successful evaluation together with the request that produced it.
#[derive(Debug, Clone)]
pub struct EvResult {
    pub request: WagerRequest,
    pub response: EvResponse,
    pub latency_ms: u64,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub form: FormState,
    pub defaults: FormDefaults,
    pub endpoint: String,
    /// Set while a request is in flight; submit is ignored until it clears.
    pub loading: bool,
    pub in_flight: Option<(WagerRequest, Instant)>,
    pub page_error: Option<String>,
    pub result: Option<EvResult>,
    pub logs: VecDeque<LogEntry>,
    pub log_focus: bool,
    pub log_scroll_offset: usize,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(defaults: FormDefaults, endpoint: String) -> Self {
        let form = FormState::new(&RawForm::from_defaults(&defaults), &defaults.slug);
        Self {
            form,
            defaults,
            endpoint,
            loading: false,
            in_flight: None,
            page_error: None,
            result: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            log_focus: false,
            log_scroll_offset: 0,
            start_time: Instant::now(),
        }
    }

    pub fn push_log(&mut self, level: &str, message: String) {
        let time = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        if self.logs.len() >= MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            time,
            level: level.to_string(),
            message,
        });
    }

    /// Validate the form and mark a request as in flight.
    ///
    /// Returns the request to send, or `None` when one is already in flight
    /// or the yardline label is invalid (the field error is set and nothing
    /// is sent). A request that goes out clears the previous result.
    pub fn begin_submit(&mut self) -> Option<WagerRequest> {
        if self.loading {
            tracing::debug!("submit ignored: request already in flight");
            return None;
        }
        self.form.clear_errors();
        self.page_error = None;

        let raw = self.form.to_raw();
        let request = match normalize(&raw, &self.defaults) {
            Ok(r) => r,
            Err(e) => {
                tracing::info!(error = %e, "submit blocked by yardline");
                self.form.set_error(FieldKey::Yardline, Some(e.to_string()));
                self.push_log("WARN", format!("not sent: {}", e));
                return None;
            }
        };

        tracing::info!(
            slug = %request.slug,
            side = request.side.as_str(),
            seconds_remaining = request.state.seconds_remaining,
            yardline_100 = request.state.yardline_100,
            "submitting"
        );
        self.push_log(
            "INFO",
            format!("POST {} ({}, {})", self.endpoint, request.slug, request.side.as_str()),
        );
        self.result = None;
        self.loading = true;
        self.in_flight = Some((request.clone(), Instant::now()));
        Some(request)
    }

    /// Record the outcome of the in-flight request and release the gate.
    pub fn finish_submit(&mut self, outcome: Result<EvResponse, EvError>) {
        self.loading = false;
        let Some((request, sent_at)) = self.in_flight.take() else {
            tracing::warn!("response arrived with no request in flight");
            return;
        };
        let latency_ms = sent_at.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                tracing::info!(
                    latency_ms,
                    p_model = response.p_model,
                    market_price = response.market_price,
                    ev = response.ev_per_contract,
                    "ev received"
                );
                self.push_log(
                    "INFO",
                    format!(
                        "EV {:+.4} per contract ({}ms)",
                        response.ev_per_contract, latency_ms
                    ),
                );
                self.page_error = None;
                self.result = Some(EvResult {
                    request,
                    response,
                    latency_ms,
                });
            }
            Err(e) => {
                tracing::error!(error = %e, latency_ms, "ev request failed");
                self.push_log("ERROR", e.to_string());
                self.page_error = Some(e.to_string());
            }
        }
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {:02}m", h, m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let defaults = FormDefaults {
            slug: "nfl-buf-hou-2025-11-20".to_string(),
            yardline: "HOU 36".to_string(),
            ..FormDefaults::default()
        };
        AppState::new(defaults, "http://localhost:8000/ev/game".to_string())
    }

    fn response() -> EvResponse {
        EvResponse {
            p_model: 0.62,
            fair_price: 0.62,
            market_price: 0.54,
            fee_cost: 0.01,
            edge_raw: 0.08,
            edge_after_fees: 0.07,
            ev_per_contract: 0.07,
        }
    }

    #[test]
    fn test_begin_submit_builds_request() {
        let mut s = state();
        let req = s.begin_submit().unwrap();
        assert_eq!(req.state.yardline_100, 36);
        assert!(s.loading);
    }

    #[test]
    fn test_second_submit_ignored_while_loading() {
        let mut s = state();
        assert!(s.begin_submit().is_some());
        assert!(s.begin_submit().is_none());
    }

    #[test]
    fn test_bad_yardline_sets_field_error() {
        let mut s = state();
        s.form.field_mut(FieldKey::Yardline).unwrap().value = "NYJ 10".into();
        assert!(s.begin_submit().is_none());
        assert!(!s.loading);
        assert!(s.form.field(FieldKey::Yardline).unwrap().error.is_some());
        assert!(s.page_error.is_none());
    }

    #[test]
    fn test_success_stores_result() {
        let mut s = state();
        s.begin_submit().unwrap();
        s.finish_submit(Ok(response()));
        assert!(!s.loading);
        let result = s.result.as_ref().unwrap();
        assert_eq!(result.response.market_price, 0.54);
        assert_eq!(result.request.slug, "nfl-buf-hou-2025-11-20");
        assert!(s.page_error.is_none());
    }

    #[test]
    fn test_failure_sets_page_error_verbatim() {
        let mut s = state();
        s.begin_submit().unwrap();
        s.finish_submit(Err(EvError::Status {
            status: 400,
            message: "{\"detail\":\"No full-game moneyline market found\"}".into(),
        }));
        assert!(!s.loading);
        assert_eq!(
            s.page_error.as_deref(),
            Some("{\"detail\":\"No full-game moneyline market found\"}")
        );
    }

    #[test]
    fn test_failure_after_success_leaves_no_stale_result() {
        let mut s = state();
        s.begin_submit().unwrap();
        s.finish_submit(Ok(response()));
        assert!(s.result.is_some());

        s.begin_submit().unwrap();
        assert!(s.result.is_none());
        assert!(s.page_error.is_none());
        s.finish_submit(Err(EvError::Decode("eof".into())));
        assert!(s.result.is_none());
        assert!(s.page_error.is_some());
    }

    #[test]
    fn test_blocked_submit_keeps_previous_result() {
        let mut s = state();
        s.begin_submit().unwrap();
        s.finish_submit(Ok(response()));
        s.form.field_mut(FieldKey::Yardline).unwrap().value = "NYJ 10".into();
        assert!(s.begin_submit().is_none());
        assert!(s.result.is_some());
    }

    #[test]
    fn test_log_ring_is_bounded() {
        let mut s = state();
        for i in 0..250 {
            s.push_log("INFO", format!("line {i}"));
        }
        assert_eq!(s.logs.len(), 200);
        assert_eq!(s.logs.back().unwrap().message, "line 249");
    }
}
