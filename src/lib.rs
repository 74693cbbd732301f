// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lightspark SDK - Lightning Network API client
//!
//! This crate talks to the Lightspark GraphQL API. It holds node signing keys
//! for the caller, signs requests that move funds and verifies the HMAC on
//! incoming webhooks.
//!
//! ## Modules
//!
//! - `client` - GraphQL requester, node key store and high-level operations
//! - `config` - Environment-driven client configuration
//! - `crypto` - Versioned key encryption and request signing
//! - `error` - Error type with stable error codes
//! - `logging` - Tracing subscriber setup
//! - `objects` - API entities and enums
//! - `webhooks` - Webhook signature verification and event parsing

pub mod client;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod objects;
pub mod webhooks;

#[cfg(test)]
mod test_utils;

pub use client::{LightsparkClient, NodeKeyStore, SigningKeyLoader};
pub use config::ClientConfig;
pub use error::{LightsparkError, Result};
