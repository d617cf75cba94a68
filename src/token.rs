use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::discord::DiscordUser;
use crate::error::Error;

/// The claims signed into a session token.
///
/// The payload is the session: the access and refresh credentials, the
/// profile snapshot, and the expiry computed once at issuance. `expiry`
/// is never recomputed after issuance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Discord access token.
    pub token: String,
    /// Discord refresh token, exchanged on `/refresh`.
    pub refresh: String,
    /// Profile snapshot taken at issuance.
    pub user_details: DiscordUser,
    /// Issuance time plus the bearer token's `expires_in`.
    pub expiry: DateTime<Utc>,
}

/// Signs and verifies session tokens with a symmetric key.
///
/// HMAC-SHA256 over the payload claims — deterministic, no randomness.
/// The key is injected at construction and immutable afterwards.
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionCodec {
    /// Create a codec from the process-wide signing secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Encode a payload into a signed session token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Token`] if the payload cannot be serialized.
    pub fn encode(&self, payload: &SessionPayload) -> Result<String, Error> {
        jsonwebtoken::encode(&Header::default(), payload, &self.encoding)
            .map_err(|e| Error::Token(e.to_string()))
    }

    /// Decode a session token, verifying the signature and the embedded
    /// expiry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Token`] if the signature does not verify, the
    /// structure is malformed, or the expiry has passed. Callers treat
    /// this as "not authenticated", never as a server error.
    pub fn decode(&self, token: &str) -> Result<SessionPayload, Error> {
        // The payload carries its own ISO-8601 expiry claim instead of a
        // numeric `exp`, so registered-claim validation is switched off
        // and the expiry is checked against the decoded payload.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        let data = jsonwebtoken::decode::<SessionPayload>(token, &self.decoding, &validation)
            .map_err(|e| Error::Token(e.to_string()))?;

        if data.claims.expiry < Utc::now() {
            return Err(Error::Token("session expired".into()));
        }

        Ok(data.claims)
    }
}
