//! Authentication pages: landing redirect, login, registration and logout.
//!
//! ```text
//! GET  /          -> 303 /home | /login
//! POST /login     login_id=ada&password=pw
//! POST /register  login_id=ada&name=Ada&password=pw
//! GET  /logout    -> 303 /login
//! ```

use actix_web::{HttpResponse, get, post, web};
use tracing::debug;

use crate::domain::ports::RegistrationOutcome;
use crate::domain::{ApiResult, ErrorCode, Registration};

use super::error::LOGIN_PATH;
use super::forms::{LoginForm, RegisterForm};
use super::session::SessionContext;
use super::state::HttpState;
use super::view::{Page, see_other};

/// Landing page for authenticated users.
pub const HOME_PATH: &str = "/home";

const LOGIN_VIEW: &str = "login";
const REGISTER_VIEW: &str = "register";

/// Send the visitor to their dashboard or to the login form.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 303, description = "Redirect to /home or /login")),
    tags = ["auth"],
    operation_id = "root",
    security([])
)]
#[get("/")]
pub async fn root(session: SessionContext) -> HttpResponse {
    if session.user_id().is_some() {
        see_other(HOME_PATH)
    } else {
        see_other(LOGIN_PATH)
    }
}

/// Render the login form.
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Login view")),
    tags = ["auth"],
    operation_id = "loginPage",
    security([])
)]
#[get("/login")]
pub async fn login_page(state: web::Data<HttpState>) -> HttpResponse {
    state.renderer.render(Page::blank(LOGIN_VIEW))
}

/// Check credentials and bind the session to the matching user.
///
/// A mismatch re-renders the login form; nothing else reveals whether the
/// login id exists.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in; redirect to /home", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 200, description = "Credentials rejected; login view"),
        (status = 503, description = "Store unavailable", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let credentials = match form.credentials() {
        Ok(credentials) => credentials,
        Err(error) => {
            debug!(%error, "login form failed validation");
            return Ok(state.renderer.render(Page::blank(LOGIN_VIEW)));
        }
    };
    match state.login.authenticate(&credentials).await {
        Ok(user_id) => {
            session.persist_user(user_id)?;
            Ok(see_other(HOME_PATH))
        }
        Err(error) if matches!(error.code(), ErrorCode::Unauthorized) => {
            Ok(state.renderer.render(Page::blank(LOGIN_VIEW)))
        }
        Err(error) => Err(error),
    }
}

/// Render the registration form.
#[utoipa::path(
    get,
    path = "/register",
    responses((status = 200, description = "Registration view")),
    tags = ["auth"],
    operation_id = "registerPage",
    security([])
)]
#[get("/register")]
pub async fn register_page(state: web::Data<HttpState>) -> HttpResponse {
    state.renderer.render(Page::blank(REGISTER_VIEW))
}

/// Create a user and their account. The first user becomes the admin.
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered; redirect to /login"),
        (status = 200, description = "Login id taken; registration view"),
        (status = 400, description = "Blank or oversized field", body = crate::domain::Error),
        (status = 503, description = "Store unavailable", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(form.into_inner())?;
    match state.registration.register(&registration).await? {
        RegistrationOutcome::Registered(_) => Ok(see_other(LOGIN_PATH)),
        RegistrationOutcome::LoginTaken => Ok(state.renderer.render(Page::blank(REGISTER_VIEW))),
    }
}

/// Drop all session state. Safe to call when already logged out.
#[utoipa::path(
    get,
    path = "/logout",
    responses((status = 303, description = "Redirect to /login")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    see_other(LOGIN_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::domain::ports::{LoginService, MockLoginService};
    use crate::inbound::http::test_utils::{memory_http_state, session_cookie, test_session_middleware};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn location<B>(res: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    macro_rules! auth_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .wrap(test_session_middleware())
                    .service(root)
                    .service(login_page)
                    .service(login)
                    .service(register_page)
                    .service(register)
                    .service(logout),
            )
            .await
        };
    }

    fn form_post(uri: &str, body: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(body.to_owned())
    }

    #[rstest]
    #[actix_web::test]
    async fn register_then_login_binds_the_session() {
        let (state, _store) = memory_http_state();
        let app = auth_app!(state);

        let res = test::call_service(
            &app,
            form_post("/register", "login_id=ada&name=Ada&password=pw").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res).as_deref(), Some(LOGIN_PATH));

        let res = test::call_service(
            &app,
            form_post("/login", "login_id=ada&password=pw").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res).as_deref(), Some(HOME_PATH));
        let cookie = session_cookie(&res).expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some(HOME_PATH));
    }

    #[rstest]
    #[actix_web::test]
    async fn wrong_password_re_renders_login() {
        let (state, _store) = memory_http_state();
        let app = auth_app!(state);
        test::call_service(
            &app,
            form_post("/register", "login_id=ada&name=Ada&password=pw").to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            form_post("/login", "login_id=ada&password=nope").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(session_cookie(&res).is_none());
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["view"], LOGIN_VIEW);
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_login_re_renders_registration() {
        let (state, _store) = memory_http_state();
        let app = auth_app!(state);
        for expected in [StatusCode::SEE_OTHER, StatusCode::OK] {
            let res = test::call_service(
                &app,
                form_post("/register", "login_id=ada&name=Ada&password=pw").to_request(),
            )
            .await;
            assert_eq!(res.status(), expected);
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_registration_fields_are_bad_requests() {
        let (state, _store) = memory_http_state();
        let app = auth_app!(state);

        let res = test::call_service(
            &app,
            form_post("/register", "login_id=&name=Ada&password=pw").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "login_id");
    }

    #[rstest]
    #[actix_web::test]
    async fn store_outages_surface_as_errors() {
        let mut login_service = MockLoginService::new();
        login_service
            .expect_authenticate()
            .times(1)
            .return_once(|_| Err(Error::service_unavailable("store down")));
        let (mut state, _store) = memory_http_state();
        state.login = Arc::new(login_service) as Arc<dyn LoginService>;
        let app = auth_app!(state);

        let res = test::call_service(
            &app,
            form_post("/login", "login_id=ada&password=pw").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[actix_web::test]
    async fn root_sends_anonymous_visitors_to_login() {
        let (state, _store) = memory_http_state();
        let app = auth_app!(state);

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res).as_deref(), Some(LOGIN_PATH));
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_twice_stays_logged_out() {
        let (state, _store) = memory_http_state();
        let app = auth_app!(state);

        for _ in 0..2 {
            let res =
                test::call_service(&app, test::TestRequest::get().uri("/logout").to_request())
                    .await;
            assert_eq!(res.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&res).as_deref(), Some(LOGIN_PATH));
        }
    }
}
