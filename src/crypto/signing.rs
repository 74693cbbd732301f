// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing keys for mutating GraphQL requests.
//!
//! A node authenticates its mutations with one of two key kinds:
//!
//! - an RSA key recovered from the server (encrypted under the node password),
//!   signing with RSA-PSS / SHA-256 / MGF1-SHA-256
//! - a secp256k1 key derived from the node's master seed at `m/5`, signing
//!   with ECDSA over SHA-256 (64-byte compact signatures)
//!
//! Signatures travel in the `X-Lightspark-Signing` header as a small JSON
//! envelope, see [`SigningKey::signature_header`].

use std::str::FromStr;

use base64ct::{Base64, Encoding};
use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::Secp256k1;
use k256::ecdsa::signature::Signer;
use rand_core::OsRng;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pss::BlindedSigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;
use serde::Serialize;
use sha2::Sha256;

use crate::objects::BitcoinNetwork;

/// Derivation path of the request signing key under a node's master seed.
pub const SIGNING_KEY_PATH: &str = "m/5";

/// Version tag written into the signature envelope.
const SIGNATURE_ENVELOPE_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("No signing key loaded for node {0}")]
    MissingKey(String),
}

/// RSA private key used for RSA-PSS request signatures.
#[derive(Clone)]
pub struct RsaSigningKey {
    inner: RsaPrivateKey,
}

impl RsaSigningKey {
    /// Parse a PKCS#8 DER private key (the format recovered from the server).
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self, SigningError> {
        let inner = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| SigningError::InvalidKey(format!("PKCS#8 DER: {e}")))?;
        Ok(Self { inner })
    }

    /// Parse a PEM private key, accepting PKCS#8 and PKCS#1 encodings.
    pub fn from_pem(pem_str: &str) -> Result<Self, SigningError> {
        let pem = pem::parse(pem_str)
            .map_err(|e| SigningError::InvalidKey(format!("Invalid PEM: {e}")))?;

        let inner = RsaPrivateKey::from_pkcs8_der(pem.contents())
            .or_else(|_| RsaPrivateKey::from_pkcs1_der(pem.contents()))
            .map_err(|e| SigningError::InvalidKey(format!("Invalid key format: {e}")))?;
        Ok(Self { inner })
    }

    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SigningError> {
        let signing_key = BlindedSigningKey::<Sha256>::new(self.inner.clone());
        let signature = signing_key
            .try_sign_with_rng(&mut OsRng, payload)
            .map_err(|e| SigningError::Signing(format!("RSA-PSS: {e}")))?;
        Ok(signature.to_vec())
    }

    #[cfg(test)]
    pub(crate) fn private_key(&self) -> &RsaPrivateKey {
        &self.inner
    }
}

impl std::fmt::Debug for RsaSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RsaSigningKey(..)")
    }
}

/// secp256k1 key derived from a node master seed.
#[derive(Clone)]
pub struct Secp256k1SigningKey {
    inner: k256::ecdsa::SigningKey,
}

impl Secp256k1SigningKey {
    /// Derive the request signing key at [`SIGNING_KEY_PATH`].
    ///
    /// # Arguments
    /// * `seed` - Node master seed bytes
    /// * `network` - Node network; the derived key is the same on all networks
    ///
    /// # Returns
    /// * `Ok(Secp256k1SigningKey)` - Key at `m/5`
    /// * `Err(SigningError::KeyDerivation)` - If the seed length is invalid
    pub fn from_master_seed(seed: &[u8], network: BitcoinNetwork) -> Result<Self, SigningError> {
        Self::derive(seed, network, SIGNING_KEY_PATH)
    }

    /// Derive a key at an arbitrary BIP32 path (`m/...`).
    pub fn derive(seed: &[u8], network: BitcoinNetwork, path: &str) -> Result<Self, SigningError> {
        let secp = Secp256k1::new();

        let master = Xpriv::new_master(network.to_bitcoin(), seed)
            .map_err(|e| SigningError::KeyDerivation(e.to_string()))?;
        let path = DerivationPath::from_str(path)
            .map_err(|e| SigningError::KeyDerivation(format!("{path}: {e}")))?;
        let derived = master
            .derive_priv(&secp, &path)
            .map_err(|e| SigningError::KeyDerivation(e.to_string()))?;

        Self::from_secret_bytes(&derived.private_key.secret_bytes())
    }

    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, SigningError> {
        let inner = k256::ecdsa::SigningKey::from_slice(bytes)
            .map_err(|e| SigningError::InvalidKey(format!("secp256k1: {e}")))?;
        Ok(Self { inner })
    }

    /// Compressed SEC1 public key (33 bytes).
    pub fn public_key(&self) -> Vec<u8> {
        self.inner.verifying_key().to_encoded_point(true).as_bytes().to_vec()
    }

    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let signature: k256::ecdsa::Signature = self.inner.sign(payload);
        signature.to_bytes().to_vec()
    }
}

impl std::fmt::Debug for Secp256k1SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1SigningKey({})", hex::encode(self.public_key()))
    }
}

/// A node's request signing key.
#[derive(Debug, Clone)]
pub enum SigningKey {
    Rsa(RsaSigningKey),
    Secp256k1(Secp256k1SigningKey),
}

#[derive(Serialize)]
struct SignatureEnvelope<'a> {
    v: u8,
    signature: &'a str,
}

impl SigningKey {
    /// Sign the exact bytes that will be sent as the request body.
    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, SigningError> {
        match self {
            SigningKey::Rsa(key) => key.sign(payload),
            SigningKey::Secp256k1(key) => Ok(key.sign(payload)),
        }
    }

    /// Sign `payload` and wrap the result as `{"v":1,"signature":"<base64>"}`.
    pub fn signature_header(&self, payload: &[u8]) -> Result<String, SigningError> {
        let signature = Base64::encode_string(&self.sign(payload)?);
        serde_json::to_string(&SignatureEnvelope {
            v: SIGNATURE_ENVELOPE_VERSION,
            signature: &signature,
        })
        .map_err(|e| SigningError::Signing(e.to_string()))
    }
}

impl From<RsaSigningKey> for SigningKey {
    fn from(key: RsaSigningKey) -> Self {
        SigningKey::Rsa(key)
    }
}

impl From<Secp256k1SigningKey> for SigningKey {
    fn from(key: Secp256k1SigningKey) -> Self {
        SigningKey::Secp256k1(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MASTER_SEED_HEX, MASTER_SEED_M5_PUBKEY_HEX, RSA_SIGNING_KEY_PEM};
    use k256::ecdsa::signature::Verifier;
    use rsa::signature::Verifier as _;
    use serde_json::Value;

    fn seed() -> Vec<u8> {
        hex::decode(MASTER_SEED_HEX).unwrap()
    }

    #[test]
    fn rsa_key_parses_from_pem() {
        let result = RsaSigningKey::from_pem(RSA_SIGNING_KEY_PEM);
        assert!(result.is_ok(), "Failed to parse PEM: {:?}", result.err());
    }

    #[test]
    fn rsa_garbage_is_rejected() {
        let err = RsaSigningKey::from_pem("not a pem").unwrap_err();
        assert!(matches!(err, SigningError::InvalidKey(_)));
        let err = RsaSigningKey::from_pkcs8_der(b"\x30\x03\x02\x01\x00").unwrap_err();
        assert!(matches!(err, SigningError::InvalidKey(_)));
    }

    #[test]
    fn rsa_pss_signature_verifies() {
        let key = RsaSigningKey::from_pem(RSA_SIGNING_KEY_PEM).unwrap();
        let payload = br#"{"query":"mutation PayInvoice"}"#;
        let signature = key.sign(payload).unwrap();

        let verifying_key =
            rsa::pss::VerifyingKey::<Sha256>::new(key.private_key().to_public_key());
        let signature = rsa::pss::Signature::try_from(signature.as_slice()).unwrap();
        assert!(verifying_key.verify(payload, &signature).is_ok());
        assert!(verifying_key.verify(b"tampered", &signature).is_err());
    }

    #[test]
    fn master_seed_derives_known_key() {
        let key = Secp256k1SigningKey::from_master_seed(&seed(), BitcoinNetwork::Regtest).unwrap();
        assert_eq!(hex::encode(key.public_key()), MASTER_SEED_M5_PUBKEY_HEX);
    }

    #[test]
    fn derivation_ignores_network() {
        let mainnet = Secp256k1SigningKey::from_master_seed(&seed(), BitcoinNetwork::Mainnet).unwrap();
        let signet = Secp256k1SigningKey::from_master_seed(&seed(), BitcoinNetwork::Signet).unwrap();
        assert_eq!(mainnet.public_key(), signet.public_key());
    }

    #[test]
    fn bad_derivation_path_is_rejected() {
        let err = Secp256k1SigningKey::derive(&seed(), BitcoinNetwork::Regtest, "x/5").unwrap_err();
        assert!(matches!(err, SigningError::KeyDerivation(_)));
    }

    #[test]
    fn secp256k1_signature_verifies() {
        let key = Secp256k1SigningKey::from_master_seed(&seed(), BitcoinNetwork::Regtest).unwrap();
        let payload = b"payload";
        let signature = key.sign(payload);
        assert_eq!(signature.len(), 64);

        let pubkey = hex::decode(MASTER_SEED_M5_PUBKEY_HEX).unwrap();
        let verifying_key = k256::ecdsa::VerifyingKey::from_sec1_bytes(&pubkey).unwrap();
        let signature = k256::ecdsa::Signature::from_slice(&signature).unwrap();
        assert!(verifying_key.verify(payload, &signature).is_ok());
        assert!(signature.normalize_s().is_none(), "signature should be low-S");
    }

    #[test]
    fn signature_header_is_versioned_envelope() {
        let key: SigningKey = Secp256k1SigningKey::from_master_seed(&seed(), BitcoinNetwork::Regtest)
            .unwrap()
            .into();
        let header = key.signature_header(b"payload").unwrap();

        let envelope: Value = serde_json::from_str(&header).unwrap();
        assert_eq!(envelope["v"], 1);
        let signature = Base64::decode_vec(envelope["signature"].as_str().unwrap()).unwrap();
        assert_eq!(signature.len(), 64);
    }
}
