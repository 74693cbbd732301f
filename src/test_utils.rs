// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

/// Password every cipher fixture was encrypted under.
pub const FIXTURE_PASSWORD: &str = "correct horse battery";

/// Plaintext behind every cipher fixture.
pub const FIXTURE_PLAINTEXT: &[u8] = b"testtest";

/// Version 0 ciphertext stored under the legacy string header.
pub const LEGACY_FIXTURE: &str = "U2FsdGVkX18BAgMEBQYHCColLgh9JsWjkhZ7rCwnTVI=";

/// `(header, value)` pairs, one per supported version.
pub const CIPHER_FIXTURES: [(&str, &str); 6] = [
    (
        "AES_256_CBC_PBKDF2_5000_SHA256",
        "U2FsdGVkX18BAgMEBQYHCColLgh9JsWjkhZ7rCwnTVI=",
    ),
    (
        r#"{"v": 0, "i": 1000}"#,
        "U2FsdGVkX18BAgMEBQYHCLcBlYB1sCxkg475+WXKMhQ=",
    ),
    (
        r#"{"v": 1, "i": 1000}"#,
        "U2FsdGVkX18JCgsMDQ4PEM8B1iv2H1EV03xzHyPFxGs=",
    ),
    (
        r#"{"v": 2, "i": 1000}"#,
        "AQIDBAUGBwgBk8Wr4sgvJT1TGbW8DeHfLNJOLUG6lSo=",
    ),
    (
        r#"{"v": 0, "lsv": 2, "i": 1000}"#,
        "KCkqKywtLi8wMTIzlnLDepFFxTBi44Y582OPthkySdpszXTdAQIDBAUGBwg=",
    ),
    (
        r#"{"v": 4, "i": 1000}"#,
        "EBESExQVFhcYGRobHB0eH8+1n/R+rq4dwCa8OxQd4jeSEiIzutQQuA==",
    ),
];

/// 2048-bit RSA key in PKCS#8 PEM form.
pub const RSA_SIGNING_KEY_PEM: &str = include_str!("testdata/rsa_signing_key.pem");

/// PKCS#8 DER of [`RSA_SIGNING_KEY_PEM`], encrypted as `{"v":4,"i":1000}`
/// under [`FIXTURE_PASSWORD`].
pub const RSA_SIGNING_KEY_ENCRYPTED: &str = include_str!("testdata/rsa_signing_key.enc");
pub const RSA_SIGNING_KEY_CIPHER: &str = r#"{"v":4,"i":1000}"#;

/// BIP32 test vector 1 seed.
pub const MASTER_SEED_HEX: &str = "000102030405060708090a0b0c0d0e0f";

/// Compressed public key at `m/5` for [`MASTER_SEED_HEX`].
pub const MASTER_SEED_M5_PUBKEY_HEX: &str =
    "0305ec5990bad0fadc5f250d60108245e88166c347deed9ec55c84b76f42b7d7f3";

pub const WEBHOOK_SECRET: &str = "3gZ5oQQUASYmqQNuEk24";

pub const WEBHOOK_BODY: &[u8] = br#"{"event_type":"NODE_STATUS","timestamp":"2023-05-17T23:56:47.874449+00:00","wallet_id":null,"event_id":"1615c8be5aa44e429eba700db2ed8ca5","entity_id":"lightning_node:01882c25-157a-f96b-0000-362d42b64397"}"#;

/// Lowercase hex HMAC-SHA256 of [`WEBHOOK_BODY`] under [`WEBHOOK_SECRET`].
pub const WEBHOOK_SIGNATURE: &str =
    "751ce75433556de90ab38bd428de02048181f964960b4869ffe33577e5072ada";
