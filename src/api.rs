use crate::model::{Category, Franchise, FranchiseId, Order, null_as_default};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while talking to the franchise API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(e) => format!("Network error: {}", e),
            ApiError::Status { status, .. } => format!("Server error ({})", status),
            ApiError::Decode(e) => format!("Data format error: {}", e),
            ApiError::InvalidUrl(msg) => format!("Configuration error: {}", msg),
        }
    }
}

/// `{ franchises: [...] }` envelope shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
struct FranchiseList {
    #[serde(default, deserialize_with = "null_as_default")]
    franchises: Vec<Franchise>,
}

/// Payload of `GET /api/franchises/{id}/orders`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FranchiseOrders {
    #[serde(default)]
    pub franchise: Option<Franchise>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub orders: Vec<Order>,
}

impl FranchiseOrders {
    pub fn total_items(&self) -> usize {
        self.orders.iter().map(|o| o.items.len()).sum()
    }
}

/// Read-only view of the franchise REST API.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn popular(&self, limit: usize) -> Result<Vec<Franchise>, ApiError>;

    async fn category(&self, category: &Category, limit: usize)
    -> Result<Vec<Franchise>, ApiError>;

    async fn franchise_orders(&self, id: &FranchiseId) -> Result<FranchiseOrders, ApiError>;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Franchise>, ApiError>;
}

/// HTTP implementation of [`Backend`].
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("{base_url}: not a base URL")));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base })
    }

    /// Build `{base}/api/{segments...}?{query}` with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api");
            for segment in segments {
                path.push(segment);
            }
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn popular(&self, limit: usize) -> Result<Vec<Franchise>, ApiError> {
        let url = self.endpoint(&["franchises"], &[("limit", limit.to_string())]);
        let list: FranchiseList = self.get_json(url).await?;
        Ok(list.franchises)
    }

    async fn category(
        &self,
        category: &Category,
        limit: usize,
    ) -> Result<Vec<Franchise>, ApiError> {
        let url = self.endpoint(
            &["categories", category.key(), "franchises"],
            &[("limit", limit.to_string())],
        );
        let list: FranchiseList = self.get_json(url).await?;
        Ok(list.franchises)
    }

    async fn franchise_orders(&self, id: &FranchiseId) -> Result<FranchiseOrders, ApiError> {
        let url = self.endpoint(&["franchises", id.as_str(), "orders"], &[]);
        self.get_json(url).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Franchise>, ApiError> {
        let url = self.endpoint(
            &["search"],
            &[("q", query.to_string()), ("limit", limit.to_string())],
        );
        let list: FranchiseList = self.get_json(url).await?;
        Ok(list.franchises)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory backend. Unknown categories answer with an empty list,
    /// anything listed in `failing` answers with HTTP 500.
    #[derive(Default)]
    pub struct FakeBackend {
        pub popular: Vec<Franchise>,
        pub categories: HashMap<String, Vec<Franchise>>,
        pub orders: HashMap<String, FranchiseOrders>,
        pub search: Vec<Franchise>,
        pub failing: Vec<String>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn record(&self, call: String) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call.clone());
            if self.failing.contains(&call) {
                return Err(ApiError::Status { status: 500, url: call });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn popular(&self, limit: usize) -> Result<Vec<Franchise>, ApiError> {
            self.record("popular".to_string())?;
            Ok(self.popular.iter().take(limit).cloned().collect())
        }

        async fn category(
            &self,
            category: &Category,
            limit: usize,
        ) -> Result<Vec<Franchise>, ApiError> {
            self.record(format!("category:{}", category.key()))?;
            Ok(self
                .categories
                .get(category.key())
                .map(|list| list.iter().take(limit).cloned().collect())
                .unwrap_or_default())
        }

        async fn franchise_orders(&self, id: &FranchiseId) -> Result<FranchiseOrders, ApiError> {
            self.record(format!("orders:{}", id))?;
            Ok(self.orders.get(id.as_str()).cloned().unwrap_or_default())
        }

        async fn search(&self, query: &str, limit: usize) -> Result<Vec<Franchise>, ApiError> {
            self.record(format!("search:{}", query))?;
            Ok(self.search.iter().take(limit).cloned().collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_popular() {
        let c = client("http://localhost:5000");
        let url = c.endpoint(&["franchises"], &[("limit", "8".to_string())]);
        assert_eq!(url.as_str(), "http://localhost:5000/api/franchises?limit=8");
    }

    #[test]
    fn test_endpoint_category_and_orders() {
        let c = client("http://localhost:5000/");
        let url = c.endpoint(
            &["categories", Category::Movies.key(), "franchises"],
            &[("limit", "10".to_string())],
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/categories/movies/franchises?limit=10"
        );

        let id = FranchiseId::new("7f3a");
        let url = c.endpoint(&["franchises", id.as_str(), "orders"], &[]);
        assert_eq!(url.as_str(), "http://localhost:5000/api/franchises/7f3a/orders");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes() {
        let c = client("https://example.com/site");
        let url = c.endpoint(&["search"], &[("q", "Fast & Furious".to_string())]);
        assert_eq!(url.as_str(), "https://example.com/site/api/search?q=Fast+%26+Furious");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("not a url", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_franchise_orders_payload_defaults() {
        let payload: FranchiseOrders = serde_json::from_value(json!({
            "franchise": { "id": "1", "name": "Halo", "category": "games", "slug": "halo" },
            "orders": null
        }))
        .unwrap();
        assert!(payload.franchise.is_some());
        assert!(payload.orders.is_empty());
        assert_eq!(payload.total_items(), 0);

        let list: FranchiseList = serde_json::from_value(json!({})).unwrap();
        assert!(list.franchises.is_empty());
    }
}
