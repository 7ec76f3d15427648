//! Administrator use-cases: news, credits and promotions.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::identity_service::map_user_error;
use crate::domain::ledger_service::map_ledger_error;
use crate::domain::notification_service::map_notification_error;
use crate::domain::ports::{AdminConsole, LedgerRepository, NotificationRepository, UserRepository};
use crate::domain::{CreditOutcome, Error, NewNotification, Notification, User, UserId};

/// Admin service implementing [`AdminConsole`].
#[derive(Clone)]
pub struct AdminService<U, N, L> {
    users: Arc<U>,
    notifications: Arc<N>,
    ledger: Arc<L>,
}

impl<U, N, L> AdminService<U, N, L> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, notifications: Arc<N>, ledger: Arc<L>) -> Self {
        Self {
            users,
            notifications,
            ledger,
        }
    }
}

fn require_admin(actor: &User) -> Result<(), Error> {
    if actor.is_admin() {
        Ok(())
    } else {
        warn!(user_id = %actor.id(), "non-admin reached the admin console");
        Err(Error::forbidden("administrator access required"))
    }
}

#[async_trait]
impl<U, N, L> AdminConsole for AdminService<U, N, L>
where
    U: UserRepository,
    N: NotificationRepository,
    L: LedgerRepository,
{
    async fn post_news(&self, actor: &User, text: &str) -> Result<Notification, Error> {
        require_admin(actor)?;
        let posted = self
            .notifications
            .post(&NewNotification::broadcast(text))
            .await
            .map_err(map_notification_error)?;
        info!(admin_id = %actor.id(), notification_id = %posted.id(), "news posted");
        Ok(posted)
    }

    async fn credit(
        &self,
        actor: &User,
        user: UserId,
        amount: f64,
    ) -> Result<CreditOutcome, Error> {
        require_admin(actor)?;
        let outcome = self
            .ledger
            .credit(user, amount)
            .await
            .map_err(map_ledger_error)?;
        match outcome {
            CreditOutcome::Credited { balance } => info!(
                admin_id = %actor.id(),
                user_id = %user,
                amount,
                balance,
                "account credited"
            ),
            CreditOutcome::UnknownAccount => {
                debug!(admin_id = %actor.id(), user_id = %user, "credit skipped: no account");
            }
        }
        Ok(outcome)
    }

    async fn promote(&self, actor: &User, user: UserId) -> Result<bool, Error> {
        require_admin(actor)?;
        let promoted = self.users.promote(user).await.map_err(map_user_error)?;
        if promoted {
            info!(admin_id = %actor.id(), user_id = %user, "user promoted to admin");
        } else {
            debug!(admin_id = %actor.id(), user_id = %user, "promotion skipped: unknown user");
        }
        Ok(promoted)
    }
}
