use crate::server::config::{DatabaseRegistry, ServerConfig};
use seqpage::{MemoryStore, NotionClient, PageCreator, SequenceStore};
use std::sync::Arc;

/// Shared, read-only state handed to every request.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    backend: Backend,
    registry: DatabaseRegistry,
    title_property: String,
    max_pages_per_request: u32,
}

#[derive(Debug)]
pub enum Backend {
    Ready(PageCreator),
    Misconfigured(Vec<&'static str>),
}

impl AppState {
    pub fn new(
        backend: Backend,
        registry: DatabaseRegistry,
        title_property: impl Into<String>,
        max_pages_per_request: u32,
    ) -> Self {
        let backend = match backend {
            Backend::Ready(_) if registry.is_empty() => {
                Backend::Misconfigured(vec!["NOTION_<NAME>_DATABASE_ID"])
            }
            other => other,
        };
        Self {
            inner: Arc::new(Inner {
                backend,
                registry,
                title_property: title_property.into(),
                max_pages_per_request,
            }),
        }
    }

    /// Picks the store from the configuration: Notion, or memory for dry
    /// runs. Incomplete configurations get no store at all.
    pub fn from_config(config: &ServerConfig) -> Self {
        let missing = config.missing_settings();
        let backend = if !missing.is_empty() {
            Backend::Misconfigured(missing)
        } else {
            let store: Arc<dyn SequenceStore> = match (&config.notion_api_key, config.dry_run) {
                (Some(key), false) => Arc::new(NotionClient::with_base_url(
                    key.as_str(),
                    config.notion_base_url.as_str(),
                )),
                _ => Arc::new(MemoryStore::new()),
            };
            Backend::Ready(
                PageCreator::new(store)
                    .with_sequence_property(config.sequence_property.as_str())
                    .serialized(config.serialize_creates),
            )
        };

        Self::new(
            backend,
            config.registry.clone(),
            config.title_property.as_str(),
            config.max_pages_per_request,
        )
    }

    pub fn backend(&self) -> &Backend {
        &self.inner.backend
    }

    pub fn registry(&self) -> &DatabaseRegistry {
        &self.inner.registry
    }

    pub fn title_property(&self) -> &str {
        &self.inner.title_property
    }

    pub fn max_pages_per_request(&self) -> u32 {
        self.inner.max_pages_per_request
    }
}
