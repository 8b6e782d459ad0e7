//! Chrono Vault: persistence adapter for memory fragments.
//!
//! Writes are fire-and-forget appends to the hosted document store,
//! partitioned by application id and user id. The subscription is a live
//! view: a background poller publishes fresh snapshots, ordered by creation
//! time descending, into a watch channel. When the session identity is not
//! authenticated the adapter is inert.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;

use orion_schema::{MemoryFragment, SessionIdentity};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("document store unreachable: {0}")]
    Network(#[source] reqwest::Error),
    #[error("document store error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("malformed document store payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone)]
pub struct ChronoVault {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    poll_interval: Duration,
}

impl ChronoVault {
    pub fn new(base_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            app_id: app_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn collection_url(&self, user_id: &str) -> String {
        format!(
            "{}/v1/artifacts/{}/users/{}/chronoVault",
            self.base_url, self.app_id, user_id
        )
    }

    /// Appends one fragment to the caller's partition. The timestamp is
    /// server-assigned; the write is never retried.
    pub async fn store(
        &self,
        content: &str,
        identity: &SessionIdentity,
    ) -> Result<(), PersistError> {
        if !identity.authenticated {
            tracing::debug!("vault inert (unauthenticated), dropping write");
            return Ok(());
        }

        let url = self.collection_url(&identity.user_id);
        let doc = NewFragment {
            content,
            emotion_tag: "neutral",
            kind: "thought",
        };

        let mut req = self.client.post(&url).json(&doc);
        if let Some(token) = identity.id_token.as_deref() {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(PersistError::Network)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PersistError::Api { status, message });
        }

        tracing::info!(user_id = %identity.user_id, "memory fragment stored");
        Ok(())
    }

    /// One ordered query against the partition, most recent first.
    pub async fn list(
        &self,
        identity: &SessionIdentity,
    ) -> Result<Vec<MemoryFragment>, PersistError> {
        if !identity.authenticated {
            return Ok(Vec::new());
        }

        let url = self.collection_url(&identity.user_id);
        let mut req = self
            .client
            .get(&url)
            .query(&[("orderBy", "timestamp"), ("direction", "desc")]);
        if let Some(token) = identity.id_token.as_deref() {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(PersistError::Network)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PersistError::Api { status, message });
        }

        let body: FragmentList = resp
            .json()
            .await
            .map_err(|e| PersistError::Malformed(e.to_string()))?;

        let mut fragments = body.documents;
        fragments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(fragments)
    }

    /// Live view of the partition. Each poll that observes a change pushes a
    /// fresh snapshot; readers only ever see immutable snapshots. For an
    /// unauthenticated identity the receiver stays pinned to the empty list.
    pub fn subscribe(&self, identity: &SessionIdentity) -> watch::Receiver<Vec<MemoryFragment>> {
        let (tx, rx) = watch::channel(Vec::new());

        if !identity.authenticated {
            tokio::spawn(async move { tx.closed().await });
            return rx;
        }

        let vault = self.clone();
        let identity = identity.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(vault.poll_interval);
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                match vault.list(&identity).await {
                    Ok(fragments) => {
                        tx.send_if_modified(|current| {
                            if *current != fragments {
                                *current = fragments;
                                true
                            } else {
                                false
                            }
                        });
                    }
                    Err(e) => tracing::warn!("chrono vault poll failed: {e}"),
                }
            }
        });

        rx
    }
}

#[derive(Debug, Serialize)]
struct NewFragment<'a> {
    content: &'a str,
    #[serde(rename = "emotionTag")]
    emotion_tag: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Debug, Deserialize)]
struct FragmentList {
    #[serde(default)]
    documents: Vec<MemoryFragment>,
}
