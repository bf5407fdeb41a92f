use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::config::{TwilioSettings, ZapierSettings};
use crate::models::{Match, Pro};

const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Errors from outbound notification calls
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Outbound notifications for match events.
///
/// Both channels are best-effort: a match is never rolled back because a text
/// message or a hook delivery failed. Callers use `match_created`, which logs
/// failures and returns nothing.
pub struct Notifier {
    client: Client,
    twilio: TwilioSettings,
    zapier: ZapierSettings,
    twilio_base_url: String,
}

impl Notifier {
    pub fn new(twilio: TwilioSettings, zapier: ZapierSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            twilio,
            zapier,
            twilio_base_url: TWILIO_API_BASE.to_string(),
        }
    }

    /// Point Twilio calls at a different host (tests).
    pub fn with_twilio_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.twilio_base_url = base_url.into();
        self
    }

    /// Announce a created match on every configured channel, best-effort.
    pub async fn match_created(&self, pro: &Pro, client_name: &str, record: &Match) {
        if self.twilio.enabled {
            let body = format!(
                "OwlDoor: {} {} has a new opportunity with {}. Check your dashboard for details.",
                pro.first_name, pro.last_name, client_name
            );
            if let Err(e) = self.send_sms(&pro.phone, &body).await {
                tracing::warn!("Match {} created but SMS notification failed: {}", record.id, e);
            }
        }

        if self.zapier.enabled {
            let payload = json!({
                "event": "match.created",
                "matchId": record.id,
                "proId": record.pro_id,
                "clientId": record.client_id,
                "score": record.score,
                "createdAt": record.created_at,
            });
            if let Err(e) = self.post_hook(&payload).await {
                tracing::warn!("Match {} created but Zapier hook failed: {}", record.id, e);
            }
        }
    }

    /// Send one SMS through the Twilio Messages API.
    pub async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        if to.is_empty() {
            return Err(NotifyError::ApiError("recipient has no phone number".into()));
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.twilio_base_url.trim_end_matches('/'),
            self.twilio.account_sid
        );

        let params = [
            ("To", to),
            ("From", self.twilio.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.twilio.account_sid, Some(&self.twilio.auth_token))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::ApiError(format!(
                "Twilio returned {}",
                response.status()
            )));
        }

        tracing::debug!("Sent SMS to {}", to);
        Ok(())
    }

    /// Post a JSON payload to the configured Zapier hook.
    pub async fn post_hook(&self, payload: &serde_json::Value) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.zapier.hook_url)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::ApiError(format!(
                "Zapier hook returned {}",
                response.status()
            )));
        }

        tracing::debug!("Posted Zapier hook event");
        Ok(())
    }
}
