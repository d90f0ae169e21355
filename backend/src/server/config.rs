//! HTTP server configuration object.

use std::net::SocketAddr;

use questionnaire_backend::domain::UserId;
use questionnaire_backend::outbound::persistence::DbPool;

/// Everything `create_server` needs beyond the health flags.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) caller: UserId,
    pub(crate) cors_origins: Vec<String>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            caller: UserId::new(1),
            cors_origins: Vec::new(),
        }
    }

    /// Identity recorded as the actor of audited mutations.
    #[must_use]
    pub fn with_caller(mut self, caller: UserId) -> Self {
        self.caller = caller;
        self
    }

    /// Origins accepted by the CORS layer; empty accepts any origin.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}
