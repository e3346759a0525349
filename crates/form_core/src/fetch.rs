//! Component detail fetching.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{ComponentId, UiSpec},
    error::ApiError,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::LoadError;

#[async_trait]
pub trait ComponentSpecSource: Send + Sync {
    async fn fetch_component_spec(&self, id: &ComponentId) -> Result<UiSpec, LoadError>;
}

/// Loads component details over HTTP and keeps successful responses cached
/// by component id.
pub struct HttpComponentSpecSource {
    http: Client,
    detail_endpoint: Url,
    cache: RwLock<HashMap<ComponentId, UiSpec>>,
}

impl HttpComponentSpecSource {
    pub fn new(http: Client, detail_endpoint: Url) -> Self {
        Self {
            http,
            detail_endpoint,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn invalidate(&self, id: &ComponentId) -> bool {
        self.cache.write().await.remove(id).is_some()
    }

    fn detail_url(&self, id: &ComponentId) -> Result<Url, LoadError> {
        let mut url = self.detail_endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| LoadError::InvalidEndpoint {
                url: self.detail_endpoint.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl ComponentSpecSource for HttpComponentSpecSource {
    async fn fetch_component_spec(&self, id: &ComponentId) -> Result<UiSpec, LoadError> {
        if let Some(spec) = self.cache.read().await.get(id) {
            debug!(component_id = %id, "component detail served from cache");
            return Ok(spec.clone());
        }

        let url = self.detail_url(id)?;
        let unreachable = |source| LoadError::Unreachable {
            component_id: id.clone(),
            source,
        };
        let response = self.http.get(url).send().await.map_err(unreachable)?;
        let status = response.status();
        let body = response.bytes().await.map_err(unreachable)?;

        if !status.is_success() {
            warn!(component_id = %id, status = status.as_u16(), "component detail request failed");
            return Err(LoadError::Status {
                component_id: id.clone(),
                status: status.as_u16(),
                api_error: serde_json::from_slice::<ApiError>(&body).ok(),
            });
        }

        let spec: UiSpec =
            serde_json::from_slice(&body).map_err(|source| LoadError::MalformedBody {
                component_id: id.clone(),
                source,
            })?;
        info!(component_id = %id, "component detail loaded");
        self.cache.write().await.insert(id.clone(), spec.clone());
        Ok(spec)
    }
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
