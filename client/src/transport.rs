use std::future::Future;

use reqwest::StatusCode;
use shared::protocol::{ActionResponse, LobbyAction, Snapshot};
use tracing::debug;

use crate::config::LobbyConfig;
use crate::error::{LobbyError, Result};

/// The two calls the lobby service understands.
///
/// [`HttpTransport`] is the real one; tests plug in their own.
pub trait LobbyTransport: Send + Sync + 'static {
    /// `GET` the full lobby snapshot.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot>> + Send;

    /// `POST` one action. Only a reply with `success: true` is `Ok`.
    fn post_action(
        &self,
        action: &LobbyAction,
    ) -> impl Future<Output = Result<ActionResponse>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &LobbyConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl LobbyTransport for HttpTransport {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(rejection("snapshot", status, &body));
        }

        let snapshot: Snapshot = serde_json::from_slice(&body)?;
        debug!(
            "📥 Snapshot: {} players, {} messages",
            snapshot.players.len(),
            snapshot.messages.len()
        );
        Ok(snapshot)
    }

    async fn post_action(&self, action: &LobbyAction) -> Result<ActionResponse> {
        debug!("📤 POST {} to {}", action.name(), self.endpoint);

        let response = self.client.post(&self.endpoint).json(action).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(rejection(action.name(), status, &body));
        }

        let reply: ActionResponse = serde_json::from_slice(&body)?;
        if !reply.success {
            return Err(LobbyError::Rejected {
                action: action.name(),
                status: status.as_u16(),
                message: reply
                    .error
                    .unwrap_or_else(|| "reply did not report success".to_string()),
            });
        }

        Ok(reply)
    }
}

// Error statuses normally carry `{"error": "..."}`, fall back to the raw body.
fn rejection(action: &'static str, status: StatusCode, body: &[u8]) -> LobbyError {
    let message = serde_json::from_slice::<ActionResponse>(body)
        .ok()
        .and_then(|reply| reply.error)
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    LobbyError::Rejected {
        action,
        status: status.as_u16(),
        message,
    }
}
