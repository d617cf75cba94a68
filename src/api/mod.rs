//! HTTP surface: authorization flow, session cookies, and forms routes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use forms_backend::api::{self, ApiConfig};
//! use forms_backend::store::MemoryFormStore;
//!
//! let config = ApiConfig::from_env()?;
//! let app = api::router(config, Arc::new(MemoryFormStore::new()));
//! axum::serve(listener, app).await?;
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod forms;
mod routes;
mod state;

pub use config::ApiConfig;
pub use cookies::CookieAttributes;
pub use error::ApiError;
pub use extractor::AuthSession;
pub use routes::{AuthorizeRequest, AuthorizeResponse, router};
