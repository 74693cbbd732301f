// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lightspark API client.
//!
//! - `requester` - GraphQL over HTTP with basic auth and request signing
//! - `keys` - node signing keys available to a client
//! - `queries` - the GraphQL documents behind the operations below

pub mod keys;
mod queries;
pub mod requester;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::info;

pub use keys::{NodeKeyStore, SigningKeyLoader};
pub use requester::Requester;

use crate::config::ClientConfig;
use crate::crypto::{self, SigningError};
use crate::error::{LightsparkError, Result};
use crate::objects::{Account, EncryptedSigningPrivateKey, Invoice, OutgoingPayment};

/// High-level client for the Lightspark API.
///
/// Mutations that move funds are signed with the node's key from the
/// injected [`NodeKeyStore`]; load it first with
/// [`LightsparkClient::load_node_signing_key`].
#[derive(Debug, Clone)]
pub struct LightsparkClient {
    requester: Requester,
    keys: NodeKeyStore,
}

impl LightsparkClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_key_store(config, NodeKeyStore::new())
    }

    pub fn with_key_store(config: ClientConfig, keys: NodeKeyStore) -> Result<Self> {
        Ok(Self {
            requester: Requester::new(&config)?,
            keys,
        })
    }

    pub fn key_store(&self) -> &NodeKeyStore {
        &self.keys
    }

    /// Execute an arbitrary GraphQL document.
    ///
    /// With `signing_node_id`, the request is signed with that node's key,
    /// which must already be loaded.
    pub async fn execute_graphql_request(
        &self,
        document: &str,
        variables: Value,
        signing_node_id: Option<&str>,
    ) -> Result<Value> {
        let signing_key = match signing_node_id {
            Some(node_id) => Some(
                self.keys
                    .get(node_id)
                    .await
                    .ok_or_else(|| SigningError::MissingKey(node_id.to_string()))?,
            ),
            None => None,
        };
        self.requester
            .execute_graphql_request(document, variables, signing_key.as_ref())
            .await
    }

    pub async fn get_current_account(&self) -> Result<Account> {
        let data = self
            .execute_graphql_request(queries::CURRENT_ACCOUNT, json!({}), None)
            .await?;
        extract(&data, "/current_account")
    }

    /// Fetch and decrypt a node's RSA signing key (PKCS#8 DER).
    pub async fn recover_node_signing_key(&self, node_id: &str, password: &str) -> Result<Vec<u8>> {
        let encrypted = self.fetch_encrypted_signing_key(node_id).await?;
        Ok(crypto::decrypt_private_key(
            &encrypted.cipher,
            &encrypted.encrypted_value,
            password,
        )?)
    }

    /// Load a node's signing key into the key store.
    ///
    /// Replaces any key already stored for `node_id`.
    ///
    /// # Arguments
    /// * `node_id` - Node the key signs for
    /// * `loader` - Recover the encrypted RSA key with the node password, or
    ///   derive a secp256k1 key from the master seed
    ///
    /// # Returns
    /// * `Ok(())` - The key is stored and later mutations for the node are signed
    /// * `Err(LightsparkError)` - `CRYPTO_EXCEPTION` on a wrong password,
    ///   `SIGNING_ERROR` on an unusable key, or a request error from recovery
    pub async fn load_node_signing_key(
        &self,
        node_id: &str,
        loader: SigningKeyLoader,
    ) -> Result<()> {
        let key = match loader {
            SigningKeyLoader::NodeIdAndPassword { password } => {
                let encrypted = self.fetch_encrypted_signing_key(node_id).await?;
                keys::rsa_key_from_encrypted(&encrypted, &password)?
            }
            SigningKeyLoader::MasterSeed { seed, network } => keys::seed_key(&seed, network)?,
        };

        self.keys.insert(node_id, key).await;
        info!(node_id = %node_id, "Loaded node signing key");
        Ok(())
    }

    pub async fn create_invoice(
        &self,
        node_id: &str,
        amount_msats: i64,
        memo: Option<&str>,
        expiry_secs: Option<i32>,
    ) -> Result<Invoice> {
        let variables = json!({
            "node_id": node_id,
            "amount_msats": amount_msats,
            "memo": memo,
            "expiry_secs": expiry_secs,
        });
        let data = self
            .execute_graphql_request(&queries::create_invoice(), variables, None)
            .await?;
        extract(&data, "/create_invoice/invoice")
    }

    /// Pay a BOLT11 invoice from `node_id`. Requires the node's signing key.
    ///
    /// # Arguments
    /// * `encoded_invoice` - BOLT11 payment request
    /// * `timeout_secs` - How long the node keeps trying to route
    /// * `maximum_fees_msats` - Upper bound on routing fees
    /// * `amount_msats` - Amount for zero-amount invoices
    ///
    /// # Returns
    /// * `Ok(OutgoingPayment)` - The payment as created, usually still pending
    /// * `Err(LightsparkError)` - `SIGNING_ERROR` before any request when no key
    ///   is loaded for `node_id`
    pub async fn pay_invoice(
        &self,
        node_id: &str,
        encoded_invoice: &str,
        timeout_secs: i32,
        maximum_fees_msats: i64,
        amount_msats: Option<i64>,
    ) -> Result<OutgoingPayment> {
        let variables = json!({
            "node_id": node_id,
            "encoded_invoice": encoded_invoice,
            "timeout_secs": timeout_secs,
            "maximum_fees_msats": maximum_fees_msats,
            "amount_msats": amount_msats,
        });
        let data = self
            .execute_graphql_request(&queries::pay_invoice(), variables, Some(node_id))
            .await?;
        extract(&data, "/pay_invoice/payment")
    }

    async fn fetch_encrypted_signing_key(
        &self,
        node_id: &str,
    ) -> Result<EncryptedSigningPrivateKey> {
        let data = self
            .execute_graphql_request(
                queries::RECOVER_NODE_SIGNING_KEY,
                json!({ "node_id": node_id }),
                None,
            )
            .await?;
        extract(&data, "/entity/encrypted_signing_private_key").map_err(|_| {
            LightsparkError::InvalidResponse(format!(
                "node {node_id} has no recoverable signing key"
            ))
        })
    }
}

/// Deserialize the value at `pointer` inside a response's `data`.
fn extract<T: DeserializeOwned>(data: &Value, pointer: &str) -> Result<T> {
    let value = data
        .pointer(pointer)
        .filter(|v| !v.is_null())
        .ok_or_else(|| LightsparkError::InvalidResponse(format!("missing {pointer} in response")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| LightsparkError::InvalidResponse(format!("{pointer}: {e}")))
}
