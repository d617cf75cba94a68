use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;
use crate::types::UserId;

/// Discord `OAuth2` configuration.
///
/// Required fields are constructor parameters — no runtime "missing field" errors.
///
/// ```rust,ignore
/// use forms_backend::DiscordConfig;
///
/// let config = DiscordConfig::new("my-client-id", "my-client-secret");
/// // Optional overrides via chaining:
/// let config = config
///     .with_token_url("https://custom.example.com/oauth2/token".parse()?);
/// ```
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) token_url: Url,
    pub(crate) user_url: Url,
}

impl DiscordConfig {
    /// Create a new Discord OAuth2 configuration.
    ///
    /// Required fields are parameters — compile-time enforcement, no `Result`.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: "https://discord.com/api/oauth2/token"
                .parse()
                .expect("valid default URL"),
            user_url: "https://discord.com/api/users/@me"
                .parse()
                .expect("valid default URL"),
        }
    }

    /// Override the token exchange endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: Url) -> Self {
        self.token_url = url;
        self
    }

    /// Override the user profile endpoint.
    #[must_use]
    pub fn with_user_url(mut self, url: Url) -> Self {
        self.user_url = url;
        self
    }

    /// `OAuth2` client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Token exchange endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// User profile endpoint URL.
    #[must_use]
    pub fn user_url(&self) -> &Url {
        &self.user_url
    }
}

/// Bearer credentials from the Discord token endpoint.
///
/// Short-lived: embedded into the session payload at issuance and never
/// persisted server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct BearerToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// Profile fields from the Discord user endpoint.
///
/// Only the fields the backend reads are typed; everything else Discord
/// sends is carried verbatim in `extra` and signed into the session as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DiscordUser {
    /// Display name: the global name when set, the login name otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// `OAuth2` client for the Discord API.
pub struct DiscordClient {
    config: DiscordConfig,
    http: reqwest::Client,
}

impl DiscordClient {
    /// Create a new Discord client.
    #[must_use]
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Exchange an authorization code (or, with `refresh` set, a refresh
    /// token) for bearer credentials. Single attempt, no retries.
    ///
    /// `origin` is the requesting frontend's origin; the redirect URI sent
    /// to Discord is derived from it and must match the one used for the
    /// browser leg of the flow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Exchange`]
    /// if the token endpoint returns a non-success status (invalid or
    /// expired code, provider outage).
    pub async fn exchange_code(
        &self,
        code: &str,
        origin: Option<&str>,
        refresh: bool,
    ) -> Result<BearerToken, Error> {
        let redirect_uri = format!("{}/callback", origin.unwrap_or_default());

        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        if refresh {
            params.push(("grant_type", "refresh_token"));
            params.push(("refresh_token", code));
        } else {
            params.push(("grant_type", "authorization_code"));
            params.push(("code", code));
            params.push(("redirect_uri", redirect_uri.as_str()));
        }

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await?;

        let response = ensure_success(response)
            .await
            .map_err(|(status, detail)| Error::Exchange { status, detail })?;
        response.json::<BearerToken>().await.map_err(Into::into)
    }

    /// Fetch the user's profile using an access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Profile`]
    /// if the profile endpoint returns a non-success status (e.g. the
    /// token was revoked between exchange and fetch).
    pub async fn fetch_user_details(&self, access_token: &str) -> Result<DiscordUser, Error> {
        let response = self
            .http
            .get(self.config.user_url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = ensure_success(response)
            .await
            .map_err(|(status, detail)| Error::Profile { status, detail })?;
        response.json::<DiscordUser>().await.map_err(Into::into)
    }
}

/// Checks HTTP response status; returns the response on success or the
/// status and body text for the caller's error variant.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, (u16, String)> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err((status, body))
}
