//! Domain primitives, ledger rules and use-case services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! layers, the pure rules that decide every balance mutation, and the
//! services that implement the driving ports on top of the driven ports.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Account, Product, Notification: stored entities.
//! - Identity: the authenticated user paired with their account.
//! - TransferOrder, PurchaseOrder, Settlement: ledger rules.

pub mod account;
pub mod admin_service;
pub mod auth;
pub mod error;
pub mod identity_service;
pub mod keys;
pub mod ledger;
pub mod ledger_service;
pub mod notification;
pub mod notification_service;
pub mod ports;
pub mod product;
pub mod trace_id;
pub mod user;

pub use self::account::{Account, DEFAULT_BALANCE, Identity};
pub use self::admin_service::AdminService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity_service::IdentityService;
pub use self::keys::{AccountId, NotificationId, ProductId, UserId};
pub use self::ledger::{
    BalanceChange, CreditOutcome, PurchaseOrder, PurchaseOutcome, PurchaseRejection, Settlement,
    TransferOrder, TransferOutcome, TransferRejection,
};
pub use self::ledger_service::LedgerService;
pub use self::notification::{
    CURRENCY, NewNotification, Notification, NOTIFICATION_MESSAGE_MAX, sort_newest_first,
};
pub use self::notification_service::NotificationFeedService;
pub use self::product::{
    LISTING_TEXT_MAX, ListingValidationError, NewListing, NewProduct, Product,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, LOGIN_ID_MAX, LoginId, User, UserValidationError,
    admin_on_registration,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bazaar::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
