#![doc = include_str!("../README.md")]

pub mod api;
pub mod discord;
pub mod error;
pub mod models;
pub mod store;
pub mod token;
pub mod types;

// Re-exports for convenient access
pub use api::{ApiConfig, ApiError, AuthSession, CookieAttributes, router};
pub use discord::{BearerToken, DiscordClient, DiscordConfig, DiscordUser};
pub use error::Error;
pub use models::{Form, FormResponse, Question};
pub use store::{FormStore, MemoryFormStore, StoreError};
pub use token::{SessionCodec, SessionPayload};
pub use types::{FormId, ResponseId, UserId};
