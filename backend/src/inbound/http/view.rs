//! Presentation seam for page handlers.
//!
//! Handlers describe *what* to show as a [`Page`]: a view name plus a JSON
//! data payload. A [`PageRenderer`] decides *how* it reaches the client. The
//! bundled [`JsonPageRenderer`] serialises the page as
//! `{"view": "...", "data": {...}}`, which keeps the HTTP surface testable
//! without a template engine.

use actix_web::http::header;
use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::Value;

use crate::domain::Error;

/// A named view and the data it is rendered with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    view: &'static str,
    data: Value,
}

impl Page {
    /// Build a page from any serialisable payload.
    ///
    /// # Examples
    /// ```
    /// use bazaar::inbound::http::view::Page;
    /// use serde_json::json;
    ///
    /// let page = Page::new("bonuses", json!({"is_admin": false})).expect("serialisable");
    /// assert_eq!(page.view(), "bonuses");
    /// ```
    pub fn new(view: &'static str, data: impl Serialize) -> Result<Self, Error> {
        let data = serde_json::to_value(data)
            .map_err(|err| Error::internal(format!("failed to serialise {view} view: {err}")))?;
        Ok(Self { view, data })
    }

    /// A page with no data, used for the login and registration forms.
    pub fn blank(view: &'static str) -> Self {
        Self {
            view,
            data: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn view(&self) -> &'static str {
        self.view
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// Renders pages into HTTP responses.
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: Page) -> HttpResponse;
}

/// Renderer emitting each page as a JSON document with status 200.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPageRenderer;

impl PageRenderer for JsonPageRenderer {
    fn render(&self, page: Page) -> HttpResponse {
        HttpResponse::Ok()
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(page)
    }
}

/// `303 See Other` redirect to `path`.
pub fn see_other(path: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, path))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[actix_web::test]
    async fn json_renderer_wraps_view_and_data() {
        let page = Page::new("home", json!({"balance": 1000.0})).expect("page");
        let response = JsonPageRenderer.render(page);
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body()).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body, json!({"view": "home", "data": {"balance": 1000.0}}));
    }

    #[rstest]
    fn blank_pages_carry_an_empty_object() {
        assert_eq!(Page::blank("login").data(), &json!({}));
    }

    #[rstest]
    fn see_other_sets_location() {
        let response = see_other("/payments");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/payments")
        );
    }
}
