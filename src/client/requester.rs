// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GraphQL request layer.
//!
//! Builds the JSON request for a GraphQL document, authenticates it with the
//! API token (basic auth), optionally signs it with a node key, sends it and
//! unwraps the `data` member of the response. Failures are logged and
//! returned immediately; nothing is retried.

use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use reqwest::{Client, Request, StatusCode};
use serde_json::{json, Map, Value};
use tracing::{debug, error};
use url::Url;

use crate::config::ClientConfig;
use crate::crypto::SigningKey;
use crate::error::{LightsparkError, Result};

/// Header carrying the node signature of a mutation body.
pub const SIGNING_HEADER: &str = "X-Lightspark-Signing";
/// Header naming the GraphQL operation, for server-side routing and logs.
pub const OPERATION_HEADER: &str = "X-GraphQL-Operation";
/// Header identifying the SDK and its version.
pub const SDK_HEADER: &str = "X-Lightspark-SDK";

/// How long a signed request stays valid, in seconds.
const SIGNATURE_VALIDITY_SECS: i64 = 3600;

fn sdk_version() -> String {
    format!("lightspark-rust-sdk/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

/// Kind and name of the operation a document declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: String,
}

impl Operation {
    /// Read `query|mutation|subscription <Name>` from the start of `document`.
    pub fn parse(document: &str) -> Result<Self> {
        let invalid = || {
            LightsparkError::InvalidQuery(
                "document must start with `query`, `mutation` or `subscription` and a name"
                    .to_string(),
            )
        };

        let trimmed = document.trim_start();
        let keyword_end = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let kind = match &trimmed[..keyword_end] {
            "query" => OperationKind::Query,
            "mutation" => OperationKind::Mutation,
            "subscription" => OperationKind::Subscription,
            _ => return Err(invalid()),
        };

        let rest = &trimmed[keyword_end..];
        if !rest.starts_with(char::is_whitespace) {
            return Err(invalid());
        }
        let rest = rest.trim_start();
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid());
        }

        Ok(Self { kind, name })
    }
}

/// Sends GraphQL requests to one endpoint with one set of credentials.
#[derive(Debug, Clone)]
pub struct Requester {
    http: Client,
    endpoint: Url,
    client_id: String,
    client_secret: String,
}

impl Requester {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(sdk_version())
            .build()
            .map_err(|e| LightsparkError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the HTTP request for `document` without sending it.
    pub fn build_request(
        &self,
        document: &str,
        variables: Value,
        signing_key: Option<&SigningKey>,
    ) -> Result<(Operation, Request)> {
        let operation = Operation::parse(document)?;

        let mut payload = Map::new();
        payload.insert("query".to_string(), Value::String(document.to_string()));
        payload.insert("variables".to_string(), variables);
        payload.insert(
            "operationName".to_string(),
            Value::String(operation.name.clone()),
        );
        if signing_key.is_some() {
            let expires_at = Utc::now() + Duration::seconds(SIGNATURE_VALIDITY_SECS);
            payload.insert("nonce".to_string(), json!(OsRng.next_u32()));
            payload.insert("expires_at".to_string(), json!(expires_at.to_rfc3339()));
        }

        // The signature covers these exact bytes.
        let body = serde_json::to_vec(&Value::Object(payload))
            .map_err(|e| LightsparkError::InvalidQuery(format!("serialize body failed: {e}")))?;

        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Content-Type", "application/json")
            .header(OPERATION_HEADER, &operation.name)
            .header(SDK_HEADER, sdk_version());

        if let Some(key) = signing_key {
            let signature = key.signature_header(&body)?;
            builder = builder.header(SIGNING_HEADER, signature);
        }

        let request = builder
            .body(body)
            .build()
            .map_err(|e| LightsparkError::Http(format!("failed to build request: {e}")))?;
        Ok((operation, request))
    }

    /// Execute `document` and return the response's `data` member.
    pub async fn execute_graphql_request(
        &self,
        document: &str,
        variables: Value,
        signing_key: Option<&SigningKey>,
    ) -> Result<Value> {
        let (operation, request) = self.build_request(document, variables, signing_key)?;
        debug!(
            operation = %operation.name,
            signed = signing_key.is_some(),
            "Sending GraphQL request"
        );

        let response = self.http.execute(request).await.map_err(|e| {
            error!(operation = %operation.name, error = %e, "GraphQL request failed");
            LightsparkError::Http(format!("{} failed: {e}", operation.name))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(operation = %operation.name, error = %e, "Failed to read GraphQL response");
            LightsparkError::Http(format!("{} response unreadable: {e}", operation.name))
        })?;

        parse_graphql_response(status, &body).inspect_err(|e| {
            error!(
                operation = %operation.name,
                status = status.as_u16(),
                code = e.code(),
                error = %e,
                "GraphQL request returned an error"
            );
        })
    }
}

/// Turn an HTTP status and body into the GraphQL `data` value.
pub fn parse_graphql_response(status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        return Err(LightsparkError::Http(format!("request returned {status}: {body}")));
    }

    let response: Value = serde_json::from_str(body)
        .map_err(|e| LightsparkError::InvalidResponse(format!("invalid JSON: {e}")))?;

    if let Some(errors) = response.get("errors").and_then(Value::as_array) {
        if let Some(first) = errors.first() {
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown GraphQL error");
            return Err(LightsparkError::GraphQl(message.to_string()));
        }
    }

    match response.get("data") {
        Some(data) if !data.is_null() => Ok(data.clone()),
        _ => Err(LightsparkError::InvalidResponse(
            "response has no data".to_string(),
        )),
    }
}
