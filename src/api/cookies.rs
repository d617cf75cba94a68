use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

pub(super) const SESSION_COOKIE_NAME: &str = "token";
const SCHEME_PREFIX: &str = "JWT ";

/// Environment-dependent session cookie attributes.
///
/// Same-site `Strict` is only safe when the request truly comes from the
/// canonical production origin, or outside production where browsers are
/// lenient. Cross-origin production deployments (preview frontends) need
/// `SameSite=None` with the secure flag or the browser silently drops the
/// cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub domain: Option<String>,
    pub same_site: SameSite,
    pub secure: bool,
}

impl CookieAttributes {
    /// Decide the attributes for a request. First match wins:
    ///
    /// 1. origin is the production URL → pin the domain, `Strict`
    /// 2. not a production deployment → no domain, `Strict`
    /// 3. otherwise → the requesting origin, `None`
    ///
    /// A missing `Origin` header behaves as a non-matching origin with no
    /// domain attribute.
    #[must_use]
    pub fn evaluate(origin: Option<&str>, production: bool, production_url: &str) -> Self {
        if origin == Some(production_url) {
            Self {
                domain: Some(production_url.to_owned()),
                same_site: SameSite::Strict,
                secure: production,
            }
        } else if !production {
            Self {
                domain: None,
                same_site: SameSite::Strict,
                secure: false,
            }
        } else {
            Self {
                domain: origin.map(str::to_owned),
                same_site: SameSite::None,
                secure: true,
            }
        }
    }
}

/// Create the session cookie carrying a freshly signed token.
///
/// Max-age mirrors the bearer token's `expires_in`, so the cookie and the
/// embedded expiry lapse together.
pub(super) fn session_cookie(
    token: &str,
    attrs: CookieAttributes,
    max_age_secs: u64,
) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE_NAME, format!("{SCHEME_PREFIX}{token}")))
        .http_only(true)
        .secure(attrs.secure)
        .same_site(attrs.same_site)
        .path("/")
        .max_age(Duration::seconds(max_age_secs as i64));

    if let Some(domain) = attrs.domain {
        builder = builder.domain(domain);
    }

    builder.build()
}

/// Create the removal cookie for the session.
pub(super) fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Strip the scheme tag from a cookie value, tolerating the quoting some
/// cookie writers apply around values containing spaces.
pub(super) fn strip_scheme(value: &str) -> Option<&str> {
    value.trim_matches('"').strip_prefix(SCHEME_PREFIX)
}
