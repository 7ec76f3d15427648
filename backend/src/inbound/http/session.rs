//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session holds exactly one value: the authenticated user's key.
//! Handlers bind it on login, read it through the access-control extractors
//! and clear it on logout.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session to `user_id`, discarding any prior state.
    ///
    /// The session is renewed so a cookie issued before login cannot be
    /// replayed afterwards.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        // `purge` would mark the session as dropped and swallow the insert.
        self.0.clear();
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the bound user key, if any.
    ///
    /// A value that does not decode as a key is treated as no binding.
    pub fn user_id(&self) -> Option<UserId> {
        match self.0.get::<i32>(USER_ID_KEY) {
            Ok(raw) => raw.map(UserId::new),
            Err(error) => {
                warn!(%error, "unreadable user id in session cookie");
                None
            }
        }
    }

    /// Drop every session value. Safe to call on an empty session.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
