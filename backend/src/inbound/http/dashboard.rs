//! Read-only pages for signed-in users: dashboard, account and info pages.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;

use crate::domain::{ApiResult, Notification, User};

use super::access::Viewer;
use super::state::HttpState;
use super::view::Page;

#[derive(Serialize)]
struct HomeView<'a> {
    user: &'a User,
    balance: f64,
    notifications: Vec<Notification>,
    is_admin: bool,
}

#[derive(Serialize)]
struct AccountView<'a> {
    user: &'a User,
    balance: f64,
    is_admin: bool,
}

#[derive(Serialize)]
struct InfoView {
    is_admin: bool,
}

/// Dashboard with the balance and every notification the viewer may see,
/// newest first.
#[utoipa::path(
    get,
    path = "/home",
    responses(
        (status = 200, description = "Home view"),
        (status = 303, description = "Not logged in; redirect to /login")
    ),
    tags = ["pages"],
    operation_id = "home"
)]
#[get("/home")]
pub async fn home(state: web::Data<HttpState>, viewer: Viewer) -> ApiResult<HttpResponse> {
    let identity = viewer.identity();
    let user = identity.user();
    let notifications = state.notifications.visible_to(user.id()).await?;
    let page = Page::new(
        "home",
        HomeView {
            user,
            balance: identity.balance(),
            notifications,
            is_admin: user.is_admin(),
        },
    )?;
    Ok(state.renderer.render(page))
}

/// Balance overview.
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "Accounts view"),
        (status = 303, description = "Not logged in; redirect to /login")
    ),
    tags = ["pages"],
    operation_id = "accounts"
)]
#[get("/accounts")]
pub async fn accounts(state: web::Data<HttpState>, viewer: Viewer) -> ApiResult<HttpResponse> {
    let identity = viewer.identity();
    let page = Page::new(
        "accounts",
        AccountView {
            user: identity.user(),
            balance: identity.balance(),
            is_admin: identity.user().is_admin(),
        },
    )?;
    Ok(state.renderer.render(page))
}

fn info_page(state: &HttpState, view: &'static str, viewer: &Viewer) -> ApiResult<HttpResponse> {
    let page = Page::new(
        view,
        InfoView {
            is_admin: viewer.identity().user().is_admin(),
        },
    )?;
    Ok(state.renderer.render(page))
}

/// Static bonuses page.
#[utoipa::path(
    get,
    path = "/bonuses",
    responses(
        (status = 200, description = "Bonuses view"),
        (status = 303, description = "Not logged in; redirect to /login")
    ),
    tags = ["pages"],
    operation_id = "bonuses"
)]
#[get("/bonuses")]
pub async fn bonuses(state: web::Data<HttpState>, viewer: Viewer) -> ApiResult<HttpResponse> {
    info_page(&state, "bonuses", &viewer)
}

/// Static analytics page.
#[utoipa::path(
    get,
    path = "/analytics",
    responses(
        (status = 200, description = "Analytics view"),
        (status = 303, description = "Not logged in; redirect to /login")
    ),
    tags = ["pages"],
    operation_id = "analytics"
)]
#[get("/analytics")]
pub async fn analytics(state: web::Data<HttpState>, viewer: Viewer) -> ApiResult<HttpResponse> {
    info_page(&state, "analytics", &viewer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{NotificationFeed, UserRepository};
    use crate::domain::{NotificationId, Registration, UserId};
    use crate::inbound::http::session::SessionContext;
    use crate::inbound::http::test_utils::{
        memory_http_state, session_cookie, test_session_middleware,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    struct FixedFeed(Vec<Notification>);

    #[async_trait]
    impl NotificationFeed for FixedFeed {
        async fn visible_to(&self, _viewer: UserId) -> ApiResult<Vec<Notification>> {
            Ok(self.0.clone())
        }
    }

    macro_rules! dashboard_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .wrap(test_session_middleware())
                    .route(
                        "/as/{id}",
                        web::get().to(
                            |session: SessionContext, id: web::Path<i32>| async move {
                                session.persist_user(UserId::new(id.into_inner()))?;
                                Ok::<_, crate::domain::Error>(HttpResponse::Ok())
                            },
                        ),
                    )
                    .service(home)
                    .service(accounts)
                    .service(bonuses)
                    .service(analytics),
            )
            .await
        };
    }

    macro_rules! cookie_for {
        ($app:expr, $id:expr) => {{
            let res = test::call_service(
                &$app,
                test::TestRequest::get()
                    .uri(&format!("/as/{}", $id))
                    .to_request(),
            )
            .await;
            session_cookie(&res).expect("session cookie")
        }};
    }

    async fn register(store: &crate::outbound::memory::InMemoryStore, login: &str) -> UserId {
        let registration =
            Registration::try_from_parts(login, &login.to_uppercase(), "pw").expect("registration");
        store
            .register(&registration)
            .await
            .expect("registered")
            .user()
            .id()
    }

    #[rstest]
    #[actix_web::test]
    async fn home_shows_balance_and_feed() {
        let (mut state, store) = memory_http_state();
        let ada = register(&store, "ada").await;
        let notice = Notification::new(NotificationId::new(1), "Welcome", None, chrono::Utc::now());
        state.notifications = Arc::new(FixedFeed(vec![notice]));
        let app = dashboard_app!(state);
        let cookie = cookie_for!(app, ada);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/home").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["view"], "home");
        assert_eq!(body["data"]["balance"], json!(1000.0));
        assert_eq!(body["data"]["is_admin"], json!(true));
        assert_eq!(body["data"]["user"]["displayName"], "ADA");
        assert_eq!(body["data"]["notifications"][0]["message"], "Welcome");
    }

    #[rstest]
    #[case("/accounts", "accounts")]
    #[case("/bonuses", "bonuses")]
    #[case("/analytics", "analytics")]
    #[actix_web::test]
    async fn info_pages_carry_the_admin_flag(#[case] uri: &str, #[case] view: &str) {
        let (state, store) = memory_http_state();
        register(&store, "ada").await;
        let bob = register(&store, "bob").await;
        let app = dashboard_app!(state);
        let cookie = cookie_for!(app, bob);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["view"], view);
        assert_eq!(body["data"]["is_admin"], json!(false));
    }

    #[rstest]
    #[case("/home")]
    #[case("/accounts")]
    #[case("/bonuses")]
    #[case("/analytics")]
    #[actix_web::test]
    async fn anonymous_visitors_are_redirected(#[case] uri: &str) {
        let (state, _store) = memory_http_state();
        let app = dashboard_app!(state);

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }
}
