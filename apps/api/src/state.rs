use std::sync::Arc;

use crate::config::Config;
use crate::extraction::matchers::MatcherSet;
use crate::notify::Notifier;
use crate::store::ResultStore;
use crate::uploads::UploadStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable result store. Default: InMemoryResultStore.
    pub store: Arc<dyn ResultStore>,
    pub uploads: UploadStorage,
    /// Registered field matchers, built once from config.
    pub matchers: Arc<MatcherSet>,
    /// Console (simulation) or SMTP notifier, chosen by EMAIL_ENABLED.
    pub notifier: Arc<dyn Notifier>,
}
