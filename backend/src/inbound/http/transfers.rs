//! Transfers page: pick another user and send them part of your balance.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::debug;

use crate::domain::{ApiResult, Identity, TransferOutcome, User};

use super::access::Viewer;
use super::forms::{TransferCommand, TransferForm};
use super::state::HttpState;
use super::view::{Page, see_other};

const TRANSFERS_PATH: &str = "/transfers";

#[derive(Serialize)]
struct TransfersView {
    users: Vec<User>,
    balance: f64,
    is_admin: bool,
}

async fn render_transfers(state: &HttpState, identity: &Identity) -> ApiResult<HttpResponse> {
    let caller = identity.user().id();
    let users = state
        .identities
        .list_users()
        .await?
        .into_iter()
        .filter(|user| user.id() != caller)
        .collect();
    let page = Page::new(
        "transfers",
        TransfersView {
            users,
            balance: identity.balance(),
            is_admin: identity.user().is_admin(),
        },
    )?;
    Ok(state.renderer.render(page))
}

/// Transfer form listing every user except the caller.
#[utoipa::path(
    get,
    path = "/transfers",
    responses(
        (status = 200, description = "Transfers view"),
        (status = 303, description = "Not logged in; redirect to /login")
    ),
    tags = ["ledger"],
    operation_id = "transfers"
)]
#[get("/transfers")]
pub async fn transfers_page(
    state: web::Data<HttpState>,
    viewer: Viewer,
) -> ApiResult<HttpResponse> {
    render_transfers(&state, viewer.identity()).await
}

/// Move `amount` from the caller to `target_id`.
///
/// A rejected transfer changes nothing and re-renders the form with the
/// caller's unchanged balance.
#[utoipa::path(
    post,
    path = "/transfers",
    request_body(content = TransferForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Transfer completed; redirect to /transfers"),
        (status = 200, description = "Transfer rejected; transfers view"),
        (status = 400, description = "Malformed form", body = crate::domain::Error)
    ),
    tags = ["ledger"],
    operation_id = "transfer"
)]
#[post("/transfers")]
pub async fn transfer(
    state: web::Data<HttpState>,
    viewer: Viewer,
    form: web::Form<TransferForm>,
) -> ApiResult<HttpResponse> {
    let TransferCommand { target, amount } = TransferCommand::try_from(form.into_inner())?;
    match state
        .transfers
        .transfer(viewer.identity(), target, amount)
        .await?
    {
        TransferOutcome::Completed { .. } => Ok(see_other(TRANSFERS_PATH)),
        TransferOutcome::Rejected(reason) => {
            debug!(%target, %reason, "transfer declined");
            render_transfers(&state, viewer.identity()).await
        }
    }
}
