//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::IdentityQuery;
use crate::domain::{AdminService, IdentityService, LedgerService, NotificationFeedService};
use crate::outbound::memory::InMemoryStore;

use super::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Ports backed by one shared in-memory store.
pub fn memory_ports(store: Arc<InMemoryStore>) -> HttpStatePorts {
    let identity = Arc::new(IdentityService::new(store.clone(), store.clone()));
    let ledger = Arc::new(LedgerService::new(store.clone(), store.clone()));
    HttpStatePorts {
        login: identity.clone(),
        registration: identity.clone(),
        identities: identity,
        marketplace: ledger.clone(),
        transfers: ledger,
        admin: Arc::new(AdminService::new(store.clone(), store.clone(), store.clone())),
        notifications: Arc::new(NotificationFeedService::new(store)),
    }
}

/// HTTP state over a fresh in-memory store, returning the store for seeding.
pub fn memory_http_state() -> (HttpState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    (HttpState::new(memory_ports(store.clone())), store)
}

/// HTTP state whose session resolution is delegated to `identities`.
pub fn http_state_with_identities(identities: Arc<dyn IdentityQuery>) -> HttpState {
    let mut ports = memory_ports(Arc::new(InMemoryStore::default()));
    ports.identities = identities;
    HttpState::new(ports)
}
