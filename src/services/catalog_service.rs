use crate::error::Result;
use crate::upstream::Backend;
use serde_json::Value;

/// Read-only proxy over the upstream event catalog. Public surface; no
/// session required.
#[derive(Clone, Debug)]
pub struct CatalogService {
    backend: Backend,
}

impl CatalogService {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn list_events(&self, search: Option<&str>) -> Result<Value> {
        let path = search
            .filter(|q| !q.is_empty())
            .map_or_else(|| "events".to_string(), |q| format!("events?search={}", urlencoding::encode(q)));
        self.backend.get(&path, None).await
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn get_event(&self, id: &str) -> Result<Value> {
        self.backend.get(&format!("events/{}", urlencoding::encode(id)), None).await
    }
}
