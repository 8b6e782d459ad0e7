//! Session bootstrap against the hosted identity provider.
//!
//! One sign-in at startup yields a stable user identifier that partitions
//! the Chrono Vault. Bootstrap failure is not fatal: the caller falls back
//! to an anonymous, unauthenticated identity and the vault stays inert.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use orion_schema::SessionIdentity;

const IDENTITY_API_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl IdentityClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: IDENTITY_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Signs in with a pre-issued custom token when one is configured,
    /// otherwise anonymously.
    pub async fn bootstrap(&self, custom_token: Option<&str>) -> Result<SessionIdentity> {
        match custom_token {
            Some(token) => self.sign_in_with_custom_token(token).await,
            None => self.sign_in_anonymously().await,
        }
    }

    pub async fn sign_in_anonymously(&self) -> Result<SessionIdentity> {
        let url = format!("{}/accounts:signUp?key={}", self.base_url, self.api_key);
        let body = serde_json::json!({ "returnSecureToken": true });
        let identity = self.sign_in(&url, &body).await?;
        tracing::info!(user_id = %identity.user_id, "signed in anonymously");
        Ok(identity)
    }

    pub async fn sign_in_with_custom_token(&self, token: &str) -> Result<SessionIdentity> {
        let url = format!(
            "{}/accounts:signInWithCustomToken?key={}",
            self.base_url, self.api_key
        );
        let body = serde_json::json!({ "token": token, "returnSecureToken": true });
        let identity = self.sign_in(&url, &body).await?;
        tracing::info!(user_id = %identity.user_id, "signed in with custom token");
        Ok(identity)
    }

    async fn sign_in(&self, url: &str, body: &serde_json::Value) -> Result<SessionIdentity> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("identity provider unreachable")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("identity provider error ({status}): {text}"));
        }

        let grant: SignInResponse = resp
            .json()
            .await
            .context("unexpected identity provider payload")?;
        let user_id = grant
            .local_id
            .ok_or_else(|| anyhow!("identity provider returned no user id"))?;

        Ok(SessionIdentity {
            user_id,
            id_token: grant.id_token,
            authenticated: true,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    #[serde(default)]
    local_id: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn anonymous_sign_in_yields_authenticated_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts:signUp"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(
                serde_json::json!({ "returnSecureToken": true }),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localId": "uid-123",
                "idToken": "tok-abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = IdentityClient::new("test-key").with_base_url(server.uri());
        let identity = client.bootstrap(None).await.unwrap();
        assert_eq!(identity.user_id, "uid-123");
        assert_eq!(identity.id_token.as_deref(), Some("tok-abc"));
        assert!(identity.authenticated);
    }

    #[tokio::test]
    async fn custom_token_sign_in_posts_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts:signInWithCustomToken"))
            .and(body_partial_json(serde_json::json!({ "token": "ct-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localId": "uid-77",
                "idToken": "tok-x"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = IdentityClient::new("test-key").with_base_url(server.uri());
        let identity = client.bootstrap(Some("ct-1")).await.unwrap();
        assert_eq!(identity.user_id, "uid-77");
    }

    #[tokio::test]
    async fn provider_error_bubbles_up() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = IdentityClient::new("bad-key").with_base_url(server.uri());
        let err = client.bootstrap(None).await.unwrap_err();
        assert!(err.to_string().contains("identity provider error"));
    }

    #[tokio::test]
    async fn missing_user_id_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "idToken": "tok-only" })),
            )
            .mount(&server)
            .await;

        let client = IdentityClient::new("test-key").with_base_url(server.uri());
        let err = client.bootstrap(None).await.unwrap_err();
        assert!(err.to_string().contains("no user id"));
    }
}
