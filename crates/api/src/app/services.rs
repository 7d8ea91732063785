//! Store selection and shared per-process state.

use std::sync::Arc;

use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use pollsite_infra::{seed, InMemoryPollStore, PollStore, StoreError};

use crate::app::errors;
use crate::app::templates::Templates;
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to load templates: {0}")]
    Templates(#[from] handlebars::TemplateError),

    #[error("failed to prepare poll store: {0}")]
    Store(#[from] StoreError),
}

/// State every handler receives: the poll store and the template registry.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn PollStore>,
    templates: Arc<Templates>,
}

impl AppServices {
    pub fn new(store: Arc<dyn PollStore>) -> Result<Self, ServiceError> {
        Ok(Self {
            store,
            templates: Arc::new(Templates::new()?),
        })
    }

    pub fn store(&self) -> &dyn PollStore {
        self.store.as_ref()
    }

    /// Render `template` as a 200 HTML page, or a 500 page if rendering fails.
    pub fn render<T: Serialize>(&self, template: &'static str, context: &T) -> Response {
        match self.templates.render(template, context) {
            Ok(body) => Html(body).into_response(),
            Err(e) => {
                tracing::error!(template, error = %e, "template rendering failed");
                errors::server_error()
            }
        }
    }
}

/// Pick the poll store from config, optionally seed it, and load templates.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServiceError> {
    let store: Arc<dyn PollStore> = if config.use_persistent_stores {
        persistent_store(config).await?
    } else {
        tracing::info!("using in-memory poll store");
        Arc::new(InMemoryPollStore::new())
    };

    if config.seed_demo {
        seed::seed_demo(store.as_ref(), Utc::now()).await?;
    }

    AppServices::new(store)
}

#[cfg(feature = "postgres")]
async fn persistent_store(config: &AppConfig) -> Result<Arc<dyn PollStore>, ServiceError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| StoreError::Unavailable("DATABASE_URL is not set".into()))?;

    let store = pollsite_infra::PostgresPollStore::connect(url).await?;
    store.migrate().await?;
    tracing::info!("using postgres poll store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn persistent_store(_config: &AppConfig) -> Result<Arc<dyn PollStore>, ServiceError> {
    tracing::warn!(
        "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
    );
    Ok(Arc::new(InMemoryPollStore::new()))
}
