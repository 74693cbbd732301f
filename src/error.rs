// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Top-level SDK error.
//!
//! Every failure surfaced to callers carries a short, stable string code
//! (see [`LightsparkError::code`]) plus a human readable message. Nothing is
//! retried; callers decide what to do with a failed call.

use crate::config::ConfigError;
use crate::crypto::{CryptoError, SigningError};

/// Error type returned by every public SDK operation.
#[derive(Debug, thiserror::Error)]
pub enum LightsparkError {
    /// The server answered with a non-empty GraphQL `errors` list.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Transport failure or non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response could not be decoded into the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The GraphQL document has no recognizable operation header.
    #[error("Invalid GraphQL document: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Webhook HMAC did not match the signature header.
    #[error("Webhook message hash does not match signature")]
    InvalidWebhookSignature,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LightsparkError {
    /// Get the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            LightsparkError::GraphQl(_) => "GRAPHQL_ERROR",
            LightsparkError::Http(_) => "HTTP_ERROR",
            LightsparkError::InvalidResponse(_) => "INVALID_RESPONSE",
            LightsparkError::InvalidQuery(_) => "INVALID_QUERY",
            LightsparkError::Crypto(_) => "CRYPTO_EXCEPTION",
            LightsparkError::Signing(_) => "SIGNING_ERROR",
            LightsparkError::InvalidWebhookSignature => "INVALID_WEBHOOK_SIGNATURE",
            LightsparkError::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Result alias used throughout the SDK.
pub type Result<T, E = LightsparkError> = std::result::Result<T, E>;
