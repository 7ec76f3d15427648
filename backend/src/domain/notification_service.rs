//! Notification read path.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{NotificationFeed, NotificationPersistenceError, NotificationRepository};
use crate::domain::{Error, Notification, UserId, sort_newest_first};

/// Feed service implementing [`NotificationFeed`].
#[derive(Clone)]
pub struct NotificationFeedService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationFeedService<N> {
    /// Create a new service over the notification repository.
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

pub(crate) fn map_notification_error(error: NotificationPersistenceError) -> Error {
    match error {
        NotificationPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationPersistenceError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[async_trait]
impl<N> NotificationFeed for NotificationFeedService<N>
where
    N: NotificationRepository,
{
    async fn visible_to(&self, viewer: UserId) -> Result<Vec<Notification>, Error> {
        let mut visible = self
            .notifications
            .visible_to(viewer)
            .await
            .map_err(map_notification_error)?;
        visible.retain(|note| note.is_visible_to(viewer));
        sort_newest_first(&mut visible);
        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::NotificationId;
    use crate::domain::ports::MockNotificationRepository;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).single().expect("timestamp")
    }

    #[rstest]
    #[tokio::test]
    async fn feed_is_newest_first_and_scoped_to_viewer() {
        let viewer = UserId::new(2);
        let mut repo = MockNotificationRepository::new();
        repo.expect_visible_to().return_once(|_| {
            Ok(vec![
                Notification::new(NotificationId::new(1), "welcome", None, at(10)),
                Notification::new(NotificationId::new(2), "yours", Some(UserId::new(2)), at(30)),
                Notification::new(NotificationId::new(3), "theirs", Some(UserId::new(3)), at(40)),
                Notification::new(NotificationId::new(4), "news", None, at(20)),
            ])
        });
        let service = NotificationFeedService::new(Arc::new(repo));

        let feed = service.visible_to(viewer).await.expect("feed");
        let messages: Vec<&str> = feed.iter().map(Notification::message).collect();
        assert_eq!(messages, vec!["yours", "news", "welcome"]);
    }

    #[rstest]
    #[tokio::test]
    async fn feed_maps_connection_errors() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_visible_to()
            .return_once(|_| Err(NotificationPersistenceError::connection("gone")));
        let service = NotificationFeedService::new(Arc::new(repo));

        let err = service.visible_to(UserId::new(1)).await.expect_err("error");
        assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
    }
}
