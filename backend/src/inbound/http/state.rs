//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminConsole, IdentityQuery, LoginService, MarketplaceService, NotificationFeed,
    RegistrationService, TransferService,
};

use super::view::{JsonPageRenderer, PageRenderer};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub identities: Arc<dyn IdentityQuery>,
    pub marketplace: Arc<dyn MarketplaceService>,
    pub transfers: Arc<dyn TransferService>,
    pub admin: Arc<dyn AdminConsole>,
    pub notifications: Arc<dyn NotificationFeed>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub identities: Arc<dyn IdentityQuery>,
    pub marketplace: Arc<dyn MarketplaceService>,
    pub transfers: Arc<dyn TransferService>,
    pub admin: Arc<dyn AdminConsole>,
    pub notifications: Arc<dyn NotificationFeed>,
    pub renderer: Arc<dyn PageRenderer>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle, rendering pages as JSON.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use bazaar::domain::{AdminService, IdentityService, LedgerService, NotificationFeedService};
    /// use bazaar::inbound::http::state::{HttpState, HttpStatePorts};
    /// use bazaar::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let identity = Arc::new(IdentityService::new(store.clone(), store.clone()));
    /// let ledger = Arc::new(LedgerService::new(store.clone(), store.clone()));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: identity.clone(),
    ///     registration: identity.clone(),
    ///     identities: identity,
    ///     marketplace: ledger.clone(),
    ///     transfers: ledger,
    ///     admin: Arc::new(AdminService::new(store.clone(), store.clone(), store.clone())),
    ///     notifications: Arc::new(NotificationFeedService::new(store)),
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_renderer(ports, Arc::new(JsonPageRenderer))
    }

    /// Construct state with a custom page renderer.
    pub fn with_renderer(ports: HttpStatePorts, renderer: Arc<dyn PageRenderer>) -> Self {
        let HttpStatePorts {
            login,
            registration,
            identities,
            marketplace,
            transfers,
            admin,
            notifications,
        } = ports;
        Self {
            login,
            registration,
            identities,
            marketplace,
            transfers,
            admin,
            notifications,
            renderer,
        }
    }
}
