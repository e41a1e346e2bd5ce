//! Client for the external real-time session provider (OpenVidu REST API).

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::RtcConfig;

#[async_trait]
pub trait RtcProvider: Send + Sync {
    /// Opens a session and returns its provider id.
    async fn create_session(&self) -> anyhow::Result<String>;
    /// Issues a connection token for a participant joining `session_id`.
    async fn create_connection(&self, session_id: &str) -> anyhow::Result<String>;
    async fn close_session(&self, session_id: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct OpenVidu {
    client: Client,
    base_url: String,
    secret: String,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ConnectionBody {
    token: String,
}

impl OpenVidu {
    const USER: &'static str = "OPENVIDUAPP";

    pub fn new(cfg: &RtcConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("build openvidu http client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            secret: cfg.secret.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/openvidu/api/{}", self.base_url, path)
    }
}

#[async_trait]
impl RtcProvider for OpenVidu {
    async fn create_session(&self) -> anyhow::Result<String> {
        let body: SessionBody = self
            .client
            .post(self.url("sessions"))
            .basic_auth(Self::USER, Some(&self.secret))
            .json(&json!({}))
            .send()
            .await
            .context("openvidu create session")?
            .error_for_status()
            .context("openvidu create session status")?
            .json()
            .await
            .context("openvidu create session body")?;
        debug!(session_id = %body.id, "rtc session created");
        Ok(body.id)
    }

    async fn create_connection(&self, session_id: &str) -> anyhow::Result<String> {
        let body: ConnectionBody = self
            .client
            .post(self.url(&format!("sessions/{}/connection", session_id)))
            .basic_auth(Self::USER, Some(&self.secret))
            .json(&json!({ "type": "WEBRTC", "role": "PUBLISHER" }))
            .send()
            .await
            .context("openvidu create connection")?
            .error_for_status()
            .context("openvidu create connection status")?
            .json()
            .await
            .context("openvidu create connection body")?;
        debug!(%session_id, "rtc connection created");
        Ok(body.token)
    }

    async fn close_session(&self, session_id: &str) -> anyhow::Result<()> {
        let res = self
            .client
            .delete(self.url(&format!("sessions/{}", session_id)))
            .basic_auth(Self::USER, Some(&self.secret))
            .send()
            .await
            .context("openvidu close session")?;
        // 404: the provider already dropped the session
        if res.status() != reqwest::StatusCode::NOT_FOUND {
            res.error_for_status().context("openvidu close session status")?;
        }
        debug!(%session_id, "rtc session closed");
        Ok(())
    }
}
