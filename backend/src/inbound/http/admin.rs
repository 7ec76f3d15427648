//! Admin console: post news, credit accounts, promote users.
//!
//! Both routes require [`AdminViewer`]; anyone else gets `403 Access Denied`
//! rather than a redirect.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::debug;

use crate::domain::{ApiResult, CreditOutcome, User};

use super::access::AdminViewer;
use super::forms::{AdminCommand, AdminForm};
use super::state::HttpState;
use super::view::{Page, see_other};

const ADMIN_PATH: &str = "/admin";

#[derive(Serialize)]
struct AdminView {
    users: Vec<User>,
    is_admin: bool,
}

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Admin view"),
        (status = 403, description = "Access denied", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "adminConsole"
)]
#[get("/admin")]
pub async fn admin_page(
    state: web::Data<HttpState>,
    _admin: AdminViewer,
) -> ApiResult<HttpResponse> {
    let users = state.identities.list_users().await?;
    let page = Page::new(
        "admin",
        AdminView {
            users,
            is_admin: true,
        },
    )?;
    Ok(state.renderer.render(page))
}

/// Run one admin action and return to the console.
///
/// Crediting an account-less user and promoting an unknown user are no-ops.
#[utoipa::path(
    post,
    path = "/admin",
    request_body(content = AdminForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to /admin"),
        (status = 400, description = "Malformed form", body = crate::domain::Error),
        (status = 403, description = "Access denied", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "adminAction"
)]
#[post("/admin")]
pub async fn admin_action(
    state: web::Data<HttpState>,
    admin: AdminViewer,
    form: web::Form<AdminForm>,
) -> ApiResult<HttpResponse> {
    let actor = admin.identity().user();
    match AdminCommand::try_from(form.into_inner())? {
        AdminCommand::PostNews(text) => {
            state.admin.post_news(actor, &text).await?;
        }
        AdminCommand::AddMoney { user, amount } => {
            if let CreditOutcome::UnknownAccount = state.admin.credit(actor, user, amount).await? {
                debug!(%user, "credit ignored for unknown account");
            }
        }
        AdminCommand::MakeAdmin(user) => {
            state.admin.promote(actor, user).await?;
        }
    }
    Ok(see_other(ADMIN_PATH))
}
