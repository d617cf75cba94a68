use std::sync::Arc;

use super::config::ApiSettings;
use crate::discord::DiscordClient;
use crate::store::FormStore;
use crate::token::SessionCodec;

/// Shared state for route handlers.
///
/// Everything here is read-only after startup; concurrent requests never
/// serialize against each other.
#[derive(Clone)]
pub(super) struct ApiState {
    pub(super) discord: Arc<DiscordClient>,
    pub(super) codec: SessionCodec,
    pub(super) store: Arc<dyn FormStore>,
    pub(super) settings: ApiSettings,
}
