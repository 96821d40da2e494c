// ABOUTME: REST implementation of the backend traits over the hosted platform's HTTP API
// ABOUTME: PostgREST-style row endpoints plus the callable-function endpoint, shared pooled client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cadence Fitness

use crate::backend::{decode_envelope, Condition, DataStore, Filter, FunctionInvoker};
use crate::config::BackendConfig;
use crate::context::Session;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use serde_json::Value;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Global shared HTTP client with connection pooling
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        ClientBuilder::new()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Render a filter as PostgREST query parameters (`col=eq.val`, `col=is.null`)
fn filter_query(filter: &Filter) -> String {
    filter
        .conditions()
        .iter()
        .map(|cond| match cond {
            Condition::Eq { column, value } => {
                format!("{column}=eq.{}", urlencoding::encode(value))
            }
            Condition::IsNull { column } => format!("{column}=is.null"),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// REST backend bound to one authenticated session.
///
/// Cheap to clone; the HTTP client is shared process-wide. Row-level
/// ownership is enforced server-side against the bearer token, so the core
/// never sends another user's rows even if a filter is too loose.
#[derive(Debug, Clone)]
pub struct RestBackend {
    base_url: Url,
    api_key: String,
    access_token: String,
}

impl RestBackend {
    /// Open a backend for the given session
    #[must_use]
    pub fn new(config: &BackendConfig, session: &Session) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            access_token: session.access_token.clone(),
        }
    }

    fn table_url(&self, table: &str, filter: &Filter) -> AppResult<Url> {
        let mut url = self
            .base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| AppError::internal(format!("building url for {table}: {e}")))?;
        let query = filter_query(filter);
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.access_token)
    }

    async fn read_rows(response: reqwest::Response, table: &str) -> AppResult<Vec<Value>> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(backend_failure(table, status, &body));
        }
        let value: Value = serde_json::from_str(&body)?;
        match value {
            Value::Array(rows) => Ok(rows),
            // Single-object representation responses
            row @ Value::Object(_) => Ok(vec![row]),
            other => Err(AppError::backend(format!(
                "{table}: unexpected response shape: {other}"
            ))),
        }
    }
}

fn backend_failure(table: &str, status: StatusCode, body: &str) -> AppError {
    let snippet: String = body.chars().take(200).collect();
    AppError::backend(format!("{table}: HTTP {status}: {snippet}")).with_resource_id(table)
}

#[async_trait]
impl DataStore for RestBackend {
    async fn query(&self, table: &str, filter: &Filter) -> AppResult<Vec<Value>> {
        let url = self.table_url(table, filter)?;
        let response = self.authorized(shared_client().get(url)).send().await?;
        Self::read_rows(response, table).await
    }

    async fn insert(&self, table: &str, row: Value) -> AppResult<Value> {
        let url = self.table_url(table, &Filter::new())?;
        let response = self
            .authorized(shared_client().post(url))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let mut rows = Self::read_rows(response, table).await?;
        rows.pop()
            .ok_or_else(|| AppError::backend(format!("{table}: insert returned no row")))
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> AppResult<Value> {
        let filter = Filter::new().eq("id", id);
        let url = self.table_url(table, &filter)?;
        let response = self
            .authorized(shared_client().patch(url))
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        let mut rows = Self::read_rows(response, table).await?;
        rows.pop().ok_or_else(|| {
            AppError::not_found(format!("{table}: no row with id {id}")).with_resource_id(id)
        })
    }

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()> {
        if filter.is_empty() {
            return Err(AppError::invalid_input(format!(
                "refusing unfiltered delete on {table}"
            )));
        }
        let url = self.table_url(table, filter)?;
        let response = self.authorized(shared_client().delete(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(backend_failure(table, status, &body));
        }
        Ok(())
    }
}

#[async_trait]
impl FunctionInvoker for RestBackend {
    async fn invoke(&self, name: &str, payload: Value) -> AppResult<Value> {
        let url = self
            .base_url
            .join(&format!("functions/v1/{name}"))
            .map_err(|e| AppError::internal(format!("building url for {name}: {e}")))?;
        let response = self
            .authorized(shared_client().post(url))
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() && status != StatusCode::BAD_REQUEST {
            // Functions report domain errors in the envelope with a 400;
            // anything else is a transport/platform failure.
            return Err(backend_failure(name, status, &body));
        }
        let envelope: Value = serde_json::from_str(&body)?;
        decode_envelope(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_rendering() {
        let filter = Filter::new()
            .eq("user_id", "u1")
            .eq("name", "Push Pull")
            .is_null("routine_id");
        assert_eq!(
            filter_query(&filter),
            "user_id=eq.u1&name=eq.Push%20Pull&routine_id=is.null"
        );
        assert_eq!(filter_query(&Filter::new()), "");
    }
}
