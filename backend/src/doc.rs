//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the HTTP surface. It registers:
//!
//! - **Paths**: every page route and the health probes
//! - **Schemas**: the domain entities rendered into pages, the error payload
//!   and the form bodies
//! - **Security**: Session cookie authentication scheme
//!
//! The generated document is served by Swagger UI in debug builds.

use crate::domain::{Account, Error, ErrorCode, Notification, Product, User};
use crate::inbound::http::forms::{AdminForm, LoginForm, PaymentsForm, RegisterForm, TransferForm};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP surface.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bazaar",
        description = "Session-authenticated ledger and marketplace pages, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::root,
        crate::inbound::http::auth::login_page,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::register_page,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::logout,
        crate::inbound::http::dashboard::home,
        crate::inbound::http::dashboard::accounts,
        crate::inbound::http::dashboard::bonuses,
        crate::inbound::http::dashboard::analytics,
        crate::inbound::http::payments::payments_page,
        crate::inbound::http::payments::trade,
        crate::inbound::http::transfers::transfers_page,
        crate::inbound::http::transfers::transfer,
        crate::inbound::http::admin::admin_page,
        crate::inbound::http::admin::admin_action,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Account,
        Product,
        Notification,
        LoginForm,
        RegisterForm,
        PaymentsForm,
        TransferForm,
        AdminForm
    )),
    tags(
        (name = "auth", description = "Login, registration and logout"),
        (name = "pages", description = "Read-only pages for signed-in users"),
        (name = "marketplace", description = "Listing and buying items"),
        (name = "ledger", description = "Transfers between users"),
        (name = "admin", description = "Administrator console"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
