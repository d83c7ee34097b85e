//! Custom Axum extractors.
//!
//! - [`Messages`]: the caller's locale paired with the message catalog
//!
//! # Examples
//!
//! ```ignore
//! use todolist_core::MessageId;
//! use todolist_web::extractors::Messages;
//!
//! async fn handler(messages: Messages) -> String {
//!     messages.text(MessageId::TodoDeleted)
//! }
//! ```

use crate::locale::{Locale, MessageCatalog};
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use std::fmt;
use std::sync::Arc;
use todolist_core::MessageId;

/// Localized message lookup for one request.
///
/// The locale is the first supported language in `Accept-Language`, or the
/// application's default locale when none matches.
#[derive(Clone)]
pub struct Messages {
    locale: Locale,
    catalog: Arc<dyn MessageCatalog>,
}

impl Messages {
    /// Pair `locale` with `catalog`
    #[must_use]
    pub fn new(locale: Locale, catalog: Arc<dyn MessageCatalog>) -> Self {
        Self { locale, catalog }
    }

    /// The negotiated locale
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Text for `id` in the negotiated locale
    #[must_use]
    pub fn text(&self, id: MessageId) -> String {
        self.catalog.message(id, self.locale)
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Messages {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(Locale::negotiate)
            .unwrap_or(state.default_locale);

        Ok(Self::new(locale, Arc::clone(&state.catalog)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;
    use todolist_core::TodoEnvironment;
    use todolist_runtime::TodoStore;
    use todolist_testing::{InMemoryRepository, test_clock};

    fn state(default_locale: Locale) -> AppState {
        let store = TodoStore::new(
            Arc::new(InMemoryRepository::new()),
            TodoEnvironment::new(Arc::new(test_clock())),
        );
        AppState::new(store).with_default_locale(default_locale)
    }

    async fn extract(header: Option<&str>, state: &AppState) -> Messages {
        let mut builder = Request::builder().uri("/todos");
        if let Some(value) = header {
            builder = builder.header(ACCEPT_LANGUAGE, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        Messages::from_request_parts(&mut parts, state).await.unwrap()
    }

    #[tokio::test]
    async fn test_header_selects_locale() {
        let messages = extract(Some("ko-KR,en;q=0.5"), &state(Locale::En)).await;
        assert_eq!(messages.locale(), Locale::Ko);
        assert_eq!(messages.text(MessageId::TodoNotFound), "할 일 항목을 찾을 수 없습니다");
    }

    #[tokio::test]
    async fn test_missing_or_unsupported_header_uses_default() {
        let state = state(Locale::Ko);
        assert_eq!(extract(None, &state).await.locale(), Locale::Ko);
        assert_eq!(extract(Some("fr-FR"), &state).await.locale(), Locale::Ko);
    }
}
