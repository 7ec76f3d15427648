//! Access-control extractors for page handlers.
//!
//! [`Viewer`] resolves the session's user key into an [`Identity`] and turns
//! anything else into `unauthorized`, which the error mapping renders as a
//! redirect to the login page. [`AdminViewer`] additionally requires the
//! `is_admin` flag and refuses with `403` without redirecting, including for
//! anonymous callers.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, Identity};

use super::session::SessionContext;
use super::state::HttpState;

/// Message returned with every admin refusal.
pub const ACCESS_DENIED: &str = "Access Denied";

/// Authenticated caller with their account.
#[derive(Debug, Clone)]
pub struct Viewer(pub Identity);

impl Viewer {
    /// The caller's user and account.
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

/// Authenticated caller holding the admin flag.
#[derive(Debug, Clone)]
pub struct AdminViewer(pub Identity);

impl AdminViewer {
    /// The admin's user and account.
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

fn state_of(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))
}

async fn resolve_viewer(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> Result<Option<Identity>, Error> {
    let Some(user_id) = session.user_id() else {
        return Ok(None);
    };
    let identity = state.identities.resolve(user_id).await?;
    if identity.is_none() {
        debug!(%user_id, "session bound to an unknown user");
    }
    Ok(identity)
}

impl FromRequest for Viewer {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let state = state_of(req);
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = session.await?;
            resolve_viewer(state?, session)
                .await?
                .map(Viewer)
                .ok_or_else(|| Error::unauthorized("login required"))
        })
    }
}

impl FromRequest for AdminViewer {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let state = state_of(req);
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = session.await?;
            match resolve_viewer(state?, session).await? {
                Some(identity) if identity.user().is_admin() => Ok(AdminViewer(identity)),
                _ => Err(Error::forbidden(ACCESS_DENIED)),
            }
        })
    }
}
