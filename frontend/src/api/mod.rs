use std::time::Duration;

use gloo_net::http::Request;
use serde::{de::DeserializeOwned, Serialize};
use shared::autocomplete::{DEFAULT_DEBOUNCE, DEFAULT_MIN_QUERY_LEN};
use shared::{
    Address, ApiError, ApiSuccess, CustomerSearchResult, ProductSearchResult,
    ResolveAddressRequest, ResolveAddressResponse,
};

pub const API_BASE: &str = "/api";

/// Tuning for the search widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub api_base: String,
    pub debounce_ms: u64,
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

pub struct ApiClient;

impl ApiClient {
    /// Call an endpoint that wraps its payload in `ApiSuccess`.
    async fn request<T: DeserializeOwned>(
        base: &str,
        method: &str,
        path: &str,
        body: Option<impl Serialize>,
    ) -> Result<T, String> {
        let url = endpoint(base, path);

        let request = match method {
            "GET" => Request::get(&url),
            "POST" => Request::post(&url),
            "PUT" => Request::put(&url),
            _ => return Err("Invalid method".to_string()),
        };

        let response = if let Some(body) = body {
            request
                .header("Content-Type", "application/json")
                .json(&body)
                .map_err(|e| e.to_string())?
                .send()
                .await
                .map_err(|e| e.to_string())?
        } else {
            request.send().await.map_err(|e| e.to_string())?
        };

        if response.ok() {
            let result: ApiSuccess<T> = response.json().await.map_err(|e| e.to_string())?;
            Ok(result.data)
        } else {
            let error: ApiError = response.json().await.unwrap_or(ApiError {
                error: "unknown".to_string(),
                message: "An unknown error occurred".to_string(),
            });
            Err(error.message)
        }
    }

    /// Call an endpoint that returns a bare JSON array.
    async fn get_list<T: DeserializeOwned>(
        base: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, String> {
        let url = endpoint(base, path);
        let response = Request::get(&url)
            .query(query.iter().copied())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.ok() {
            return Err(format!("{} returned status {}", path, response.status()));
        }
        response.json().await.map_err(|e| e.to_string())
    }

    // Search endpoints
    pub async fn search_customers(
        config: &SearchConfig,
        query: &str,
    ) -> Result<Vec<CustomerSearchResult>, String> {
        Self::get_list(&config.api_base, "/customers/search", &[("q", query)]).await
    }

    pub async fn search_products(
        config: &SearchConfig,
        query: &str,
    ) -> Result<Vec<ProductSearchResult>, String> {
        Self::get_list(&config.api_base, "/products/search", &[("q", query)]).await
    }

    // Customer address endpoints
    pub async fn get_customer_addresses(
        config: &SearchConfig,
        customer_id: &str,
    ) -> Result<Vec<Address>, String> {
        Self::get_list(&config.api_base, &format!("/customer/{}/addresses", customer_id), &[]).await
    }

    /// The account number goes in the body as `request.account_number`.
    pub async fn resolve_address(
        config: &SearchConfig,
        request: ResolveAddressRequest,
    ) -> Result<ResolveAddressResponse, String> {
        Self::request(&config.api_base, "POST", "/customers/addresses/resolve", Some(request)).await
    }
}
