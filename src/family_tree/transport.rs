//! # Member API Transport
//!
//! The editing layer reaches the member store only through
//! [`MemberTransport`]. Calls come in two flavours:
//!
//! - `dispatch` - fire-and-forget; the outcome is logged by the transport and
//!   never reported back
//! - `send` - awaited, for callers that want to know whether the call landed
//!
//! [`HttpTransport`] is the `reqwest` implementation used against the real
//! API.

use std::future::Future;

use reqwest::{Client, Response};
use thiserror::Error;
use uuid::Uuid;

use crate::family_tree::commit::RemoteCall;
use crate::family_tree::config::Config;
use crate::shared::member::RawMember;
use crate::shared::SharedError;

/// Errors reported by an awaited call
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("member API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode member: {0}")]
    Decode(#[from] SharedError),
}

impl TransportError {
    /// Network failures, throttling and server errors are worth another try
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Network(_) => true,
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            TransportError::Decode(_) => false,
        }
    }
}

/// What the editing layer needs from the member store
pub trait MemberTransport {
    /// Issue a call without waiting for it
    fn dispatch(&self, call: RemoteCall);

    /// Issue a call and wait for the response status
    fn send(&self, call: RemoteCall) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// `GET member/{id}`: one whole subtree
    fn fetch(&self, id: Uuid) -> impl Future<Output = Result<RawMember, TransportError>> + Send;
}

/// `reqwest` client for the member API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: Config,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn with_client(config: Config, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl MemberTransport for HttpTransport {
    fn dispatch(&self, call: RemoteCall) {
        let url = self.config.api_url(&call.path());
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::error!(%url, "no tokio runtime, dropping member call");
            return;
        };

        let client = self.client.clone();
        handle.spawn(async move {
            let method = call.method();
            match execute(client, url.clone(), call).await {
                Ok(()) => tracing::debug!(?method, %url, "member call completed"),
                Err(e) => tracing::warn!(?method, %url, error = %e, "member call failed"),
            }
        });
    }

    fn send(&self, call: RemoteCall) -> impl Future<Output = Result<(), TransportError>> + Send {
        let url = self.config.api_url(&call.path());
        execute(self.client.clone(), url, call)
    }

    fn fetch(&self, id: Uuid) -> impl Future<Output = Result<RawMember, TransportError>> + Send {
        let url = self.config.api_url(&format!("member/{}", id));
        let client = self.client.clone();
        async move {
            let response = check_status(client.get(&url).send().await?).await?;
            let body = response.text().await?;
            Ok(RawMember::from_json(&body)?)
        }
    }
}

async fn execute(client: Client, url: String, call: RemoteCall) -> Result<(), TransportError> {
    let request = match &call {
        RemoteCall::CreateFamily(family) => client.post(&url).json(family),
        RemoteCall::AppendChildren { sons, .. } => client.post(&url).json(sons),
        RemoteCall::UpdateFields(updates) => client.put(&url).json(updates),
        RemoteCall::Delete(_) => client.delete(&url),
    };
    check_status(request.send().await?).await?;
    Ok(())
}

async fn check_status(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| status.to_string());
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}
