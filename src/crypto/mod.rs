// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cryptographic helpers for node signing keys.
//!
//! - `cipher` - password-based encryption of private keys at rest, with
//!   decoders for every historical header version
//! - `signing` - RSA-PSS and secp256k1 signatures over outgoing mutation
//!   payloads

pub mod cipher;
pub mod signing;

pub use cipher::{
    decrypt_private_key, encrypt_private_key, encrypt_with_iterations, CipherHeader,
    CipherVersion, CryptoError, EncryptedKey,
};
pub use signing::{RsaSigningKey, Secp256k1SigningKey, SigningError, SigningKey};
