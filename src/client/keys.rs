// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Node signing keys held by a client.
//!
//! The store is an explicit handle passed to the client rather than hidden
//! client state, so callers control which keys exist and for how long. Keys
//! are inserted on demand and only removed by the caller.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::crypto::{self, RsaSigningKey, Secp256k1SigningKey, SigningKey};
use crate::error::Result;
use crate::objects::{BitcoinNetwork, EncryptedSigningPrivateKey};

/// How to obtain a node's signing key.
#[derive(Clone)]
pub enum SigningKeyLoader {
    /// Recover the node's encrypted RSA key from the API and decrypt it with
    /// the node password.
    NodeIdAndPassword { password: String },
    /// Derive a secp256k1 key from the node's master seed.
    MasterSeed {
        seed: Vec<u8>,
        network: BitcoinNetwork,
    },
}

impl std::fmt::Debug for SigningKeyLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningKeyLoader::NodeIdAndPassword { .. } => f.write_str("NodeIdAndPassword(..)"),
            SigningKeyLoader::MasterSeed { network, .. } => {
                write!(f, "MasterSeed({network:?})")
            }
        }
    }
}

/// Map of node id to that node's signing key.
///
/// Cloning yields another handle to the same map.
#[derive(Clone, Default)]
pub struct NodeKeyStore {
    keys: Arc<RwLock<HashMap<String, SigningKey>>>,
}

impl std::fmt::Debug for NodeKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NodeKeyStore(..)")
    }
}

impl NodeKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the key for `node_id`.
    pub async fn insert(&self, node_id: impl Into<String>, key: SigningKey) {
        self.keys.write().await.insert(node_id.into(), key);
    }

    pub async fn get(&self, node_id: &str) -> Option<SigningKey> {
        self.keys.read().await.get(node_id).cloned()
    }

    pub async fn contains(&self, node_id: &str) -> bool {
        self.keys.read().await.contains_key(node_id)
    }

    pub async fn remove(&self, node_id: &str) -> Option<SigningKey> {
        self.keys.write().await.remove(node_id)
    }

    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }
}

/// Decrypt a recovered key and parse it as an RSA signing key.
pub fn rsa_key_from_encrypted(
    encrypted: &EncryptedSigningPrivateKey,
    password: &str,
) -> Result<SigningKey> {
    let der = crypto::decrypt_private_key(&encrypted.cipher, &encrypted.encrypted_value, password)?;
    Ok(RsaSigningKey::from_pkcs8_der(&der)?.into())
}

/// Derive the secp256k1 signing key for a master seed.
pub fn seed_key(seed: &[u8], network: BitcoinNetwork) -> Result<SigningKey> {
    Ok(Secp256k1SigningKey::from_master_seed(seed, network)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        FIXTURE_PASSWORD, MASTER_SEED_HEX, RSA_SIGNING_KEY_CIPHER, RSA_SIGNING_KEY_ENCRYPTED,
    };

    fn encrypted_fixture() -> EncryptedSigningPrivateKey {
        EncryptedSigningPrivateKey {
            encrypted_value: RSA_SIGNING_KEY_ENCRYPTED.to_string(),
            cipher: RSA_SIGNING_KEY_CIPHER.to_string(),
        }
    }

    #[test]
    fn recovered_key_decrypts_to_rsa() {
        let key = rsa_key_from_encrypted(&encrypted_fixture(), FIXTURE_PASSWORD).unwrap();
        assert!(matches!(key, SigningKey::Rsa(_)));
    }

    #[test]
    fn wrong_password_is_crypto_error() {
        let err = rsa_key_from_encrypted(&encrypted_fixture(), "nope").unwrap_err();
        assert_eq!(err.code(), "CRYPTO_EXCEPTION");
    }

    #[tokio::test]
    async fn store_insert_get_remove() {
        let store = NodeKeyStore::new();
        assert!(store.is_empty().await);

        let seed = hex::decode(MASTER_SEED_HEX).unwrap();
        let key = seed_key(&seed, BitcoinNetwork::Regtest).unwrap();
        store.insert("node-1", key).await;

        assert!(store.contains("node-1").await);
        assert!(store.get("node-2").await.is_none());
        assert_eq!(store.len().await, 1);

        assert!(store.remove("node-1").await.is_some());
        assert!(!store.contains("node-1").await);
    }

    #[tokio::test]
    async fn clones_share_keys() {
        let store = NodeKeyStore::new();
        let handle = store.clone();

        let seed = hex::decode(MASTER_SEED_HEX).unwrap();
        handle
            .insert("node-1", seed_key(&seed, BitcoinNetwork::Regtest).unwrap())
            .await;

        assert!(store.contains("node-1").await);
    }

    #[test]
    fn loader_debug_hides_secrets() {
        let loader = SigningKeyLoader::NodeIdAndPassword {
            password: "hunter2".to_string(),
        };
        assert!(!format!("{loader:?}").contains("hunter2"));

        let loader = SigningKeyLoader::MasterSeed {
            seed: vec![0xab; 16],
            network: BitcoinNetwork::Regtest,
        };
        assert!(!format!("{loader:?}").contains("ab"));
    }
}
