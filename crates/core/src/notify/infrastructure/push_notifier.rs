use std::time::Duration;

use thiserror::Error;

use crate::notify::domain::notifier::Notifier;

/// Push service endpoint; the payload is a flat form body.
pub const DEFAULT_ENDPOINT: &str = "https://api.mynotifier.app";

const MESSAGE: &str = "Detected Face!! ";
const DESCRIPTION: &str = "Camera Detected Someone's face. Go check who is";
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum PushError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("notification POST to {endpoint} failed: {source}")]
    Send {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Sends a fixed "face detected" push notification over HTTP.
///
/// One blocking POST per call; the response is logged and otherwise
/// ignored, and failures are never retried.
pub struct PushNotifier {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl PushNotifier {
    pub fn new(api_key: String) -> Result<Self, PushError> {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Result<Self, PushError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(PushError::Client)?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

impl Notifier for PushNotifier {
    fn notify(&self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("sending push notification");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("apiKey", self.api_key.as_str()),
                ("message", MESSAGE),
                ("description", DESCRIPTION),
                ("type", "info"),
            ])
            .send()
            .map_err(|e| PushError::Send {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        log::debug!("push service responded {status}: {body}");
        Ok(())
    }
}
