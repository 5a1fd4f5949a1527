// src/transport/http.rs

use reqwest::blocking::Client;
use tracing::info;

use crate::error::TransportError;
use crate::transport::dto::{HourRequest, HourResponse};
use crate::transport::RoundService;

const API_KEY_HEADER: &str = "API-KEY";
const SESSION_HEADER: &str = "SESSION-ID";

/// Blocking HTTP client for the evaluation service.
pub struct HttpRoundService {
    client: Client,
    base_url: String,
    api_key: String,
    session_id: Option<String>,
}

impl HttpRoundService {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            session_id: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn session_header(&self) -> Result<&str, TransportError> {
        self.session_id
            .as_deref()
            .ok_or(TransportError::SessionNotStarted)
    }
}

impl RoundService for HttpRoundService {
    fn start_session(&mut self) -> Result<String, TransportError> {
        let response = self
            .client
            .post(self.url("/api/v1/session/start"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()?;
        if !response.status().is_success() {
            return Err(TransportError::Rejected {
                context: "session start".to_string(),
                status: response.status().as_u16(),
            });
        }
        let session_id = response.text()?.trim().to_string();
        info!(session_id = %session_id, "session started");
        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    fn play_round(&mut self, request: &HourRequest) -> Result<HourResponse, TransportError> {
        let session_id = self.session_header()?.to_string();
        let response = self
            .client
            .post(self.url("/api/v1/play/round"))
            .header(API_KEY_HEADER, &self.api_key)
            .header(SESSION_HEADER, session_id)
            .json(request)
            .send()?;
        if !response.status().is_success() {
            return Err(TransportError::Rejected {
                context: format!("round D{:02}H{:02}", request.day, request.hour),
                status: response.status().as_u16(),
            });
        }
        Ok(response.json()?)
    }

    fn end_session(&mut self) -> Result<HourResponse, TransportError> {
        let session_id = self.session_header()?.to_string();
        let response = self
            .client
            .post(self.url("/api/v1/session/end"))
            .header(API_KEY_HEADER, &self.api_key)
            .header(SESSION_HEADER, session_id)
            .send()?;
        if !response.status().is_success() {
            return Err(TransportError::Rejected {
                context: "session end".to_string(),
                status: response.status().as_u16(),
            });
        }
        let parsed: HourResponse = response.json()?;
        info!(total_cost = parsed.total_cost, "session ended");
        self.session_id = None;
        Ok(parsed)
    }
}
