use url::Url;

use super::error::ApiError;
use crate::discord::{DiscordClient, DiscordConfig};

/// Shared settings used by both config and runtime state.
#[derive(Clone)]
pub(crate) struct ApiSettings {
    pub(crate) secret_key: String,
    pub(crate) production: bool,
    pub(crate) production_url: String,
}

impl ApiSettings {
    fn defaults(secret_key: String) -> Self {
        Self {
            secret_key,
            production: false,
            production_url: String::new(),
        }
    }
}

/// Backend configuration.
///
/// Required fields (`client`, the signing secret) are constructor
/// parameters — no runtime "missing field" errors.
///
/// Use [`from_env()`](ApiConfig::from_env) for convention-based setup,
/// or [`new()`](ApiConfig::new) with `with_*` methods for full control.
pub struct ApiConfig {
    pub(super) client: DiscordClient,
    pub(super) settings: ApiSettings,
}

impl ApiConfig {
    /// Create config with the required Discord client and signing secret.
    ///
    /// All optional fields use sensible defaults. Override with `with_*`
    /// methods.
    #[must_use]
    pub fn new(client: DiscordClient, secret_key: impl Into<String>) -> Self {
        Self {
            client,
            settings: ApiSettings::defaults(secret_key.into()),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `SECRET_KEY`: symmetric signing key for session tokens
    /// - `DISCORD_CLIENT_ID`: OAuth2 client ID
    /// - `DISCORD_CLIENT_SECRET`: OAuth2 client secret
    ///
    /// # Optional env vars
    /// - `PRODUCTION`: set to `"1"` or `"true"` for production cookie
    ///   attributes
    /// - `PRODUCTION_URL`: canonical frontend origin (required when
    ///   `PRODUCTION` is set)
    /// - `DISCORD_TOKEN_URL`: override the token exchange endpoint
    /// - `DISCORD_USER_URL`: override the user profile endpoint
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if required env vars are missing or
    /// URLs are invalid.
    pub fn from_env() -> Result<Self, ApiError> {
        let secret_key = std::env::var("SECRET_KEY")
            .map_err(|_| ApiError::Config("SECRET_KEY is required".into()))?;
        let client_id = std::env::var("DISCORD_CLIENT_ID")
            .map_err(|_| ApiError::Config("DISCORD_CLIENT_ID is required".into()))?;
        let client_secret = std::env::var("DISCORD_CLIENT_SECRET")
            .map_err(|_| ApiError::Config("DISCORD_CLIENT_SECRET is required".into()))?;

        let mut discord = DiscordConfig::new(client_id, client_secret);

        if let Ok(url_str) = std::env::var("DISCORD_TOKEN_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| ApiError::Config(format!("DISCORD_TOKEN_URL: {e}")))?;
            discord = discord.with_token_url(url);
        }
        if let Ok(url_str) = std::env::var("DISCORD_USER_URL") {
            let url: Url = url_str
                .parse()
                .map_err(|e| ApiError::Config(format!("DISCORD_USER_URL: {e}")))?;
            discord = discord.with_user_url(url);
        }

        let production = matches!(
            std::env::var("PRODUCTION").as_deref(),
            Ok("1") | Ok("true"),
        );
        let production_url = std::env::var("PRODUCTION_URL").unwrap_or_default();
        if production && production_url.is_empty() {
            return Err(ApiError::Config(
                "PRODUCTION_URL is required when PRODUCTION is set".into(),
            ));
        }

        Ok(Self::new(DiscordClient::new(discord), secret_key)
            .with_production(production)
            .with_production_url(production_url))
    }

    /// Mark this deployment as production: secure cookies, and same-site
    /// relaxation for non-canonical origins.
    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.settings.production = production;
        self
    }

    /// Canonical frontend origin, compared against the request `Origin`
    /// header by the cookie policy.
    #[must_use]
    pub fn with_production_url(mut self, url: impl Into<String>) -> Self {
        self.settings.production_url = url.into();
        self
    }
}
