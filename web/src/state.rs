//! Application state shared across all HTTP handlers.

use crate::locale::{Locale, MessageCatalog, StaticCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use todolist_runtime::TodoStore;

/// Application state shared across all HTTP handlers.
///
/// # Examples
///
/// ```ignore
/// let state = AppState::new(store)
///     .with_default_locale(Locale::Ko)
///     .with_templates_dir("templates")
///     .with_metrics(handle);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The todo store
    pub store: TodoStore,
    /// Message text source
    pub catalog: Arc<dyn MessageCatalog>,
    /// Locale used when `Accept-Language` names nothing supported
    pub default_locale: Locale,
    /// Directory holding `index.html`
    pub templates_dir: Arc<PathBuf>,
    /// Prometheus handle rendered by `GET /metrics`
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State with the built-in catalog, English default, `templates/` and no
    /// metrics exporter.
    #[must_use]
    pub fn new(store: TodoStore) -> Self {
        Self {
            store,
            catalog: Arc::new(StaticCatalog),
            default_locale: Locale::default(),
            templates_dir: Arc::new(PathBuf::from("templates")),
            metrics: None,
        }
    }

    /// Replace the message catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn MessageCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the fallback locale
    #[must_use]
    pub const fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Set the directory `GET /` serves `index.html` from
    #[must_use]
    pub fn with_templates_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.templates_dir = Arc::new(dir.as_ref().to_path_buf());
        self
    }

    /// Expose `handle` on `GET /metrics`
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("default_locale", &self.default_locale)
            .field("templates_dir", &self.templates_dir)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
