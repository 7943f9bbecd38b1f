//! Boundary geometry loading and memoization.
//!
//! Geometry is static reference data: fetched at most once per region code,
//! validated, then held for the process lifetime. A malformed or empty
//! payload is a failure and never enters the cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;

use crate::error::AtlasError;

pub const DEFAULT_GEO_BASE: &str = "https://geo.datav.aliyun.com/areas_v3/bound";

/// Validated feature collection for one region: the raw upstream payload
/// plus the administrative names it contains.
#[derive(Debug, Clone)]
pub struct GeometryAsset {
    pub code: String,
    pub feature_names: Vec<String>,
    pub raw: Value,
}

impl GeometryAsset {
    /// Validates an upstream payload. Missing or empty feature lists are
    /// fetch failures, not empty successes.
    pub fn from_value(code: &str, raw: Value) -> Result<Self, AtlasError> {
        let features = raw
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| fetch_failed(code, "missing feature collection"))?;

        if features.is_empty() {
            return Err(fetch_failed(code, "empty feature collection"));
        }

        let feature_names = features
            .iter()
            .filter_map(|feature| feature.pointer("/properties/name"))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();

        Ok(Self {
            code: code.to_string(),
            feature_names,
            raw,
        })
    }
}

/// Memoizes geometry by region code. Owned by whoever mounts the views and
/// injected into them; shared across views for the process lifetime.
#[derive(Default)]
pub struct GeometryCache {
    inner: RwLock<HashMap<String, Arc<GeometryAsset>>>,
}

impl GeometryCache {
    pub fn get(&self, code: &str) -> Option<Arc<GeometryAsset>> {
        self.inner.read().unwrap().get(code).cloned()
    }

    pub fn insert(&self, asset: GeometryAsset) -> Arc<GeometryAsset> {
        let asset = Arc::new(asset);
        self.inner
            .write()
            .unwrap()
            .insert(asset.code.clone(), asset.clone());
        asset
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The async seam: how raw geometry payloads are obtained.
pub trait FetchGeometry {
    fn fetch(&self, code: &str) -> impl Future<Output = Result<Value, AtlasError>> + Send;
}

/// Fetches from the geometry source over HTTP, `{base}/{code}_full.json`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: String,
}

impl HttpFetcher {
    pub fn new(base: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("HTTP client misconfigured!");

        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl FetchGeometry for HttpFetcher {
    async fn fetch(&self, code: &str) -> Result<Value, AtlasError> {
        let url = format!("{}/{}_full.json", self.base, code);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_failed(code, &e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_failed(code, &format!("status {}", response.status())));
        }

        response
            .json()
            .await
            .map_err(|e| fetch_failed(code, &e.to_string()))
    }
}

/// Loads geometry through the cache. The cache check happens before any
/// fetch, so overlapping loads for one code collapse to a single request in
/// the common path; the remaining race is harmless since fetches are
/// idempotent reads.
pub async fn load_geometry<F: FetchGeometry>(
    cache: &GeometryCache,
    fetcher: &F,
    code: &str,
) -> Result<Arc<GeometryAsset>, AtlasError> {
    if let Some(asset) = cache.get(code) {
        return Ok(asset);
    }

    let raw = fetcher.fetch(code).await?;
    let asset = GeometryAsset::from_value(code, raw)?;

    Ok(cache.insert(asset))
}

fn fetch_failed(code: &str, reason: &str) -> AtlasError {
    AtlasError::GeometryFetch {
        code: code.to_string(),
        reason: reason.to_string(),
    }
}
