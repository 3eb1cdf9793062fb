use crate::config::WebConfig;
use petstore_core::{PetGateway, ReqwestTransport, Transport};
use std::sync::Arc;

/// Shared application state
///
/// Holds no per-request data; the upstream API is the only store.
#[derive(Clone)]
pub struct AppState {
    /// Front-end configuration
    pub config: Arc<WebConfig>,

    /// Gateway to the upstream pet-store API
    pub gateway: PetGateway,
}

impl AppState {
    /// Create state backed by a real `reqwest` transport
    pub fn new(config: WebConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create state over any transport (used by tests)
    pub fn with_transport(config: WebConfig, transport: Arc<dyn Transport>) -> Self {
        let gateway = PetGateway::new(
            config.base_url.as_deref(),
            config.api_key.as_deref(),
            transport,
        );
        Self {
            config: Arc::new(config),
            gateway,
        }
    }
}
