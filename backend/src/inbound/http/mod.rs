//! HTTP inbound adapter exposing the ledger and marketplace pages.
//!
//! Handlers translate form posts into domain commands, resolve the caller
//! through [`access`] and hand page data to the configured
//! [`view::PageRenderer`].

pub mod access;
pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod health;
pub mod payments;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod transfers;
mod validation;
pub mod view;

use actix_web::web;

pub use crate::domain::ApiResult;

/// Register every page route on `cfg`.
///
/// The caller supplies the session middleware and the
/// [`state::HttpState`] app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bazaar::inbound::http::page_routes;
///
/// let _app = App::new().configure(page_routes);
/// ```
pub fn page_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::root)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::register_page)
        .service(auth::register)
        .service(auth::logout)
        .service(dashboard::home)
        .service(dashboard::accounts)
        .service(dashboard::bonuses)
        .service(dashboard::analytics)
        .service(payments::payments_page)
        .service(payments::trade)
        .service(transfers::transfers_page)
        .service(transfers::transfer)
        .service(admin::admin_page)
        .service(admin::admin_action);
}
