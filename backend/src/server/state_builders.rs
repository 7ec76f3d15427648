//! Builders wiring repositories into the HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use bazaar::domain::ports::{
    AccountRepository, LedgerRepository, NotificationRepository, ProductRepository,
    UserRepository,
};
use bazaar::domain::{AdminService, IdentityService, LedgerService, NotificationFeedService};
use bazaar::inbound::http::state::{HttpState, HttpStatePorts};
use bazaar::outbound::memory::InMemoryStore;
use bazaar::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselLedgerRepository, DieselNotificationRepository,
    DieselProductRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Driven adapters backing one deployment.
struct Repositories<U, A, P, N, L> {
    users: Arc<U>,
    accounts: Arc<A>,
    products: Arc<P>,
    notifications: Arc<N>,
    ledger: Arc<L>,
}

impl Repositories<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            accounts: store.clone(),
            products: store.clone(),
            notifications: store.clone(),
            ledger: store,
        }
    }
}

impl
    Repositories<
        DieselUserRepository,
        DieselAccountRepository,
        DieselProductRepository,
        DieselNotificationRepository,
        DieselLedgerRepository,
    >
{
    fn diesel(pool: &DbPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            products: Arc::new(DieselProductRepository::new(pool.clone())),
            notifications: Arc::new(DieselNotificationRepository::new(
                pool.clone(),
                clock.clone(),
            )),
            ledger: Arc::new(DieselLedgerRepository::new(pool.clone(), clock)),
        }
    }
}

impl<U, A, P, N, L> Repositories<U, A, P, N, L>
where
    U: UserRepository + 'static,
    A: AccountRepository + 'static,
    P: ProductRepository + 'static,
    N: NotificationRepository + 'static,
    L: LedgerRepository + 'static,
{
    /// Compose the domain services over these adapters.
    fn into_ports(self) -> HttpStatePorts {
        let identity = Arc::new(IdentityService::new(self.users.clone(), self.accounts));
        let ledger = Arc::new(LedgerService::new(self.products, self.ledger.clone()));
        let admin = Arc::new(AdminService::new(
            self.users,
            self.notifications.clone(),
            self.ledger,
        ));

        HttpStatePorts {
            login: identity.clone(),
            registration: identity.clone(),
            identities: identity,
            marketplace: ledger.clone(),
            transfers: ledger,
            admin,
            notifications: Arc::new(NotificationFeedService::new(self.notifications)),
        }
    }
}

/// Select the Diesel adapters when a pool is configured, the in-memory store
/// otherwise.
fn build_ports(pool: Option<&DbPool>) -> HttpStatePorts {
    match pool {
        Some(pool) => Repositories::diesel(pool, Arc::new(DefaultClock)).into_ports(),
        None => Repositories::in_memory(Arc::new(InMemoryStore::default())).into_ports(),
    }
}

/// Build the shared HTTP state for `config`.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(build_ports(config.db_pool.as_ref())))
}
