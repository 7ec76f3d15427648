//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `MarketplaceService`, ...) are called by the
//! HTTP adapter and implemented by the domain services. Driven ports
//! (`UserRepository`, `LedgerRepository`, ...) are called by the services and
//! implemented by the in-memory and PostgreSQL adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod admin_console;
mod identity_query;
mod ledger_repository;
mod login_service;
mod marketplace_service;
mod notification_feed;
mod notification_repository;
mod product_repository;
mod registration_service;
mod transfer_service;
mod user_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
#[cfg(test)]
pub use admin_console::MockAdminConsole;
pub use admin_console::AdminConsole;
#[cfg(test)]
pub use identity_query::MockIdentityQuery;
pub use identity_query::IdentityQuery;
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{LedgerPersistenceError, LedgerRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use marketplace_service::MockMarketplaceService;
pub use marketplace_service::MarketplaceService;
#[cfg(test)]
pub use notification_feed::MockNotificationFeed;
pub use notification_feed::NotificationFeed;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationPersistenceError, NotificationRepository};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductPersistenceError, ProductRepository};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::{RegistrationOutcome, RegistrationService};
#[cfg(test)]
pub use transfer_service::MockTransferService;
pub use transfer_service::TransferService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
