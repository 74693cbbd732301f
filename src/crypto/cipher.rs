// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password-based encryption of node signing keys.
//!
//! Encrypted keys travel as a pair: a small header describing the scheme and a
//! base64 payload. New ciphertexts always use the current version (v4); older
//! versions can only be decrypted.
//!
//! | Version | Cipher          | Payload layout                           | PBKDF2 output  |
//! |---------|-----------------|------------------------------------------|----------------|
//! | 0, 1    | AES-256-CBC     | `["Salted__"] salt(8) ciphertext`        | key(32) iv(16) |
//! | 2       | AES-256-GCM     | `["Salted__"] salt(8) ciphertext`        | key(32) iv(16) |
//! | 3       | AES-256-GCM     | `nonce(12) ciphertext salt(8)`           | key(32)        |
//! | 4       | AES-256-GCM     | `salt(16) ciphertext`                    | key(32) iv(12) |
//!
//! The header is either the legacy string `AES_256_CBC_PBKDF2_5000_SHA256`
//! (version 0, 5000 iterations) or JSON of the form `{"v": 4, "i": 500000}`.
//! Headers carrying `"lsv": 2` are treated as version 3.

use aes_gcm::aead::{consts::U16, generic_array::GenericArray, Aead};
use aes_gcm::{Aes256Gcm, AesGcm, KeyInit, Nonce};
use base64ct::{Base64, Encoding};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use rand_core::{OsRng, RngCore};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
/// AES-256-GCM with the 16-byte IV carried over from the CBC layout.
type Aes256GcmWideIv = AesGcm<aes::Aes256, U16>;

/// Header string used by the oldest encrypted keys.
pub const LEGACY_HEADER: &str = "AES_256_CBC_PBKDF2_5000_SHA256";

/// Iterations assumed when a header omits `i`.
const LEGACY_ITERATIONS: u32 = 5000;

/// Iterations used for new ciphertexts.
pub const DEFAULT_ITERATIONS: u32 = 500_000;

const OPENSSL_MAGIC: &[u8] = b"Salted__";
const KEY_LEN: usize = 32;
const LEGACY_IV_LEN: usize = 16;
const GCM_NONCE_LEN: usize = 12;
const SHORT_SALT_LEN: usize = 8;
const SALT_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("Unknown version {0}")]
    UnknownVersion(i64),

    #[error("Malformed cipher header: {0}")]
    MalformedHeader(String),

    #[error("Invalid encrypted payload: {0}")]
    InvalidEncoding(String),

    #[error("Decryption failed (wrong password or corrupted data)")]
    Decrypt,

    #[error("Encryption failed")]
    Encrypt,
}

/// Scheme version recorded in the cipher header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherVersion {
    V0,
    V1,
    V2,
    V3,
    V4,
}

/// Decodes a raw (base64-decoded) payload under a password.
type Decoder = fn(&[u8], &[u8], u32) -> Result<Vec<u8>, CryptoError>;

impl CipherVersion {
    /// Version used for all new ciphertexts.
    pub const CURRENT: CipherVersion = CipherVersion::V4;

    pub fn as_i64(self) -> i64 {
        match self {
            CipherVersion::V0 => 0,
            CipherVersion::V1 => 1,
            CipherVersion::V2 => 2,
            CipherVersion::V3 => 3,
            CipherVersion::V4 => 4,
        }
    }

    fn decoder(self) -> Decoder {
        match self {
            CipherVersion::V0 | CipherVersion::V1 => decode_salted_cbc,
            CipherVersion::V2 => decode_salted_gcm,
            CipherVersion::V3 => decode_trailing_salt_gcm,
            CipherVersion::V4 => decode_leading_salt_gcm,
        }
    }
}

impl TryFrom<i64> for CipherVersion {
    type Error = CryptoError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CipherVersion::V0),
            1 => Ok(CipherVersion::V1),
            2 => Ok(CipherVersion::V2),
            3 => Ok(CipherVersion::V3),
            4 => Ok(CipherVersion::V4),
            other => Err(CryptoError::UnknownVersion(other)),
        }
    }
}

/// Parsed cipher header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherHeader {
    pub version: CipherVersion,
    pub iterations: u32,
}

#[derive(Deserialize)]
struct RawHeader {
    v: Option<i64>,
    i: Option<u32>,
    lsv: Option<i64>,
}

impl CipherHeader {
    /// Parse a header string as stored next to an encrypted key.
    pub fn parse(header: &str) -> Result<Self, CryptoError> {
        let header = header.trim();
        if header == LEGACY_HEADER {
            return Ok(Self {
                version: CipherVersion::V0,
                iterations: LEGACY_ITERATIONS,
            });
        }

        let raw: RawHeader = serde_json::from_str(header)
            .map_err(|e| CryptoError::MalformedHeader(e.to_string()))?;
        let version = match (raw.lsv, raw.v) {
            (Some(2), _) => 3,
            (_, Some(v)) => v,
            (_, None) => {
                return Err(CryptoError::MalformedHeader(
                    "header has neither `v` nor `lsv`".to_string(),
                ))
            }
        };

        Ok(Self {
            version: CipherVersion::try_from(version)?,
            iterations: raw.i.unwrap_or(LEGACY_ITERATIONS),
        })
    }

    /// Render the header as JSON (`{"v":4,"i":500000}`).
    pub fn to_json(&self) -> String {
        format!(r#"{{"v":{},"i":{}}}"#, self.version.as_i64(), self.iterations)
    }
}

/// An encrypted key together with the header needed to decrypt it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedKey {
    pub header: String,
    pub value: String,
}

/// Encrypt `plaintext` under `password` with the current scheme.
pub fn encrypt_private_key(plaintext: &[u8], password: &str) -> Result<EncryptedKey, CryptoError> {
    encrypt_with_iterations(plaintext, password, DEFAULT_ITERATIONS)
}

/// Encrypt with an explicit PBKDF2 iteration count.
///
/// # Arguments
/// * `plaintext` - Key bytes to protect (PKCS#8 DER for node keys)
/// * `password` - Node password
/// * `iterations` - PBKDF2-HMAC-SHA256 rounds, recorded in the header
///
/// # Returns
/// * `Ok(EncryptedKey)` - v4 header JSON and base64 `salt || ciphertext`
/// * `Err(CryptoError::Encrypt)` - If AES-GCM sealing fails
pub fn encrypt_with_iterations(
    plaintext: &[u8],
    password: &str,
    iterations: u32,
) -> Result<EncryptedKey, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let material = derive::<{ KEY_LEN + GCM_NONCE_LEN }>(password.as_bytes(), &salt, iterations);
    let (key, nonce) = material.split_at(KEY_LEN);

    let mut value = salt.to_vec();
    value.extend(gcm_seal(key, nonce, plaintext)?);

    let header = CipherHeader {
        version: CipherVersion::CURRENT,
        iterations,
    };
    Ok(EncryptedKey {
        header: header.to_json(),
        value: Base64::encode_string(&value),
    })
}

/// Decrypt a base64 `value` produced under the scheme described by `header`.
///
/// The header is validated before the payload is touched, so an unknown
/// version fails without decoding or deriving anything.
///
/// # Arguments
/// * `header` - Legacy header string or JSON `{"v": .., "i": .., "lsv": ..}`
/// * `value` - Base64 payload in the layout of the header's version
/// * `password` - Node password
///
/// # Returns
/// * `Ok(Vec<u8>)` - Decrypted key bytes
/// * `Err(CryptoError::UnknownVersion)` - If the version is outside 0-4
/// * `Err(CryptoError::Decrypt)` - On a wrong password or tampered payload
pub fn decrypt_private_key(
    header: &str,
    value: &str,
    password: &str,
) -> Result<Vec<u8>, CryptoError> {
    let header = CipherHeader::parse(header)?;
    debug!(
        version = header.version.as_i64(),
        iterations = header.iterations,
        "Decrypting private key"
    );

    let decoded = Base64::decode_vec(value.trim())
        .map_err(|e| CryptoError::InvalidEncoding(format!("base64: {e}")))?;

    (header.version.decoder())(&decoded, password.as_bytes(), header.iterations)
}

fn derive<const N: usize>(password: &[u8], salt: &[u8], iterations: u32) -> [u8; N] {
    let mut out = [0u8; N];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
    out
}

/// Split an OpenSSL-style salted payload into `(salt, ciphertext)`.
fn split_salted(decoded: &[u8]) -> Result<(&[u8], &[u8]), CryptoError> {
    let body = decoded.strip_prefix(OPENSSL_MAGIC).unwrap_or(decoded);
    if body.len() <= SHORT_SALT_LEN {
        return Err(CryptoError::InvalidEncoding(format!(
            "payload too short: {} bytes",
            decoded.len()
        )));
    }
    Ok(body.split_at(SHORT_SALT_LEN))
}

fn decode_salted_cbc(decoded: &[u8], password: &[u8], iterations: u32) -> Result<Vec<u8>, CryptoError> {
    let (salt, ciphertext) = split_salted(decoded)?;
    let material = derive::<{ KEY_LEN + LEGACY_IV_LEN }>(password, salt, iterations);
    let (key, iv) = material.split_at(KEY_LEN);

    Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| CryptoError::Decrypt)?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::Decrypt)
}

fn decode_salted_gcm(decoded: &[u8], password: &[u8], iterations: u32) -> Result<Vec<u8>, CryptoError> {
    let (salt, ciphertext) = split_salted(decoded)?;
    let material = derive::<{ KEY_LEN + LEGACY_IV_LEN }>(password, salt, iterations);
    let (key, iv) = material.split_at(KEY_LEN);

    Aes256GcmWideIv::new_from_slice(key)
        .map_err(|_| CryptoError::Decrypt)?
        .decrypt(GenericArray::from_slice(iv), ciphertext)
        .map_err(|_| CryptoError::Decrypt)
}

fn decode_trailing_salt_gcm(
    decoded: &[u8],
    password: &[u8],
    iterations: u32,
) -> Result<Vec<u8>, CryptoError> {
    if decoded.len() <= GCM_NONCE_LEN + SHORT_SALT_LEN {
        return Err(CryptoError::InvalidEncoding(format!(
            "payload too short: {} bytes",
            decoded.len()
        )));
    }
    let (nonce, rest) = decoded.split_at(GCM_NONCE_LEN);
    let (ciphertext, salt) = rest.split_at(rest.len() - SHORT_SALT_LEN);
    let key = derive::<KEY_LEN>(password, salt, iterations);
    gcm_open(&key, nonce, ciphertext)
}

fn decode_leading_salt_gcm(
    decoded: &[u8],
    password: &[u8],
    iterations: u32,
) -> Result<Vec<u8>, CryptoError> {
    if decoded.len() <= SALT_LEN {
        return Err(CryptoError::InvalidEncoding(format!(
            "payload too short: {} bytes",
            decoded.len()
        )));
    }
    let (salt, ciphertext) = decoded.split_at(SALT_LEN);
    let material = derive::<{ KEY_LEN + GCM_NONCE_LEN }>(password, salt, iterations);
    let (key, nonce) = material.split_at(KEY_LEN);
    gcm_open(key, nonce, ciphertext)
}

fn gcm_open(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Decrypt)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Decrypt)
}

fn gcm_seal(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::Encrypt)?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::Encrypt)
}
