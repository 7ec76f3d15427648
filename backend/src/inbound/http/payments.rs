//! Marketplace page: browse listings, sell an item, buy an item.
//!
//! Selling and buying both redirect back to `/payments` whatever the outcome;
//! a declined purchase simply leaves the listing and balances untouched.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::debug;

use crate::domain::{ApiResult, Product, PurchaseOutcome};

use super::access::Viewer;
use super::forms::{PaymentsCommand, PaymentsForm};
use super::state::HttpState;
use super::view::{Page, see_other};

const PAYMENTS_PATH: &str = "/payments";

#[derive(Serialize)]
struct PaymentsView {
    products: Vec<Product>,
    balance: f64,
    is_admin: bool,
}

/// Every listing currently for sale, including the viewer's own.
#[utoipa::path(
    get,
    path = "/payments",
    responses(
        (status = 200, description = "Payments view"),
        (status = 303, description = "Not logged in; redirect to /login")
    ),
    tags = ["marketplace"],
    operation_id = "payments"
)]
#[get("/payments")]
pub async fn payments_page(
    state: web::Data<HttpState>,
    viewer: Viewer,
) -> ApiResult<HttpResponse> {
    let products = state.marketplace.listings().await?;
    let identity = viewer.identity();
    let page = Page::new(
        "payments",
        PaymentsView {
            products,
            balance: identity.balance(),
            is_admin: identity.user().is_admin(),
        },
    )?;
    Ok(state.renderer.render(page))
}

/// List an item for sale (`action=sell`) or buy one (`action=buy`).
///
/// The seller name and key come from the session, never from the form.
#[utoipa::path(
    post,
    path = "/payments",
    request_body(content = PaymentsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to /payments"),
        (status = 400, description = "Malformed form", body = crate::domain::Error)
    ),
    tags = ["marketplace"],
    operation_id = "tradeListing"
)]
#[post("/payments")]
pub async fn trade(
    state: web::Data<HttpState>,
    viewer: Viewer,
    form: web::Form<PaymentsForm>,
) -> ApiResult<HttpResponse> {
    match PaymentsCommand::try_from(form.into_inner())? {
        PaymentsCommand::Sell(listing) => {
            state.marketplace.sell(viewer.identity(), listing).await?;
        }
        PaymentsCommand::Buy(product) => {
            if let PurchaseOutcome::Rejected(reason) =
                state.marketplace.buy(viewer.identity(), product).await?
            {
                debug!(%product, %reason, "purchase declined");
            }
        }
    }
    Ok(see_other(PAYMENTS_PATH))
}
