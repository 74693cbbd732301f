// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Entity records returned by the API.
//!
//! These are immutable snapshots of what the server returned. Links to other
//! entities are kept as [`EntityRef`]s (ids only) instead of nested objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{
    BitcoinNetwork, CurrencyUnit, PaymentFailureReason, PaymentRequestStatus, TransactionStatus,
};

// =============================================================================
// Shared
// =============================================================================

/// Reference to another entity by its opaque id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyAmount {
    /// Value in `original_unit`.
    pub original_value: i64,
    pub original_unit: CurrencyUnit,
    pub preferred_currency_unit: CurrencyUnit,
    /// Value in the preferred unit, rounded to the unit's smallest step.
    pub preferred_currency_value_rounded: i64,
    pub preferred_currency_value_approx: f64,
}

impl CurrencyAmount {
    /// The amount in millisatoshis, when the original unit is bitcoin based.
    pub fn to_millisatoshis(&self) -> Option<i64> {
        self.original_unit
            .millisatoshis_per_unit()
            .and_then(|factor| self.original_value.checked_mul(factor))
    }
}

// =============================================================================
// Account & Node
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: Option<String>,
}

/// A node signing key as stored on the server, encrypted under the node
/// password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedSigningPrivateKey {
    /// Base64 ciphertext.
    pub encrypted_value: String,
    /// Cipher header, see [`crate::crypto::CipherHeader`].
    pub cipher: String,
}

// =============================================================================
// Invoices & Payments
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceData {
    pub encoded_payment_request: String,
    pub bitcoin_network: BitcoinNetwork,
    pub payment_hash: String,
    pub amount: CurrencyAmount,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: InvoiceData,
    pub status: PaymentRequestStatus,
    pub amount_paid: Option<CurrencyAmount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutgoingPayment {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: TransactionStatus,
    pub resolved_at: Option<DateTime<Utc>>,
    pub amount: CurrencyAmount,
    pub transaction_hash: Option<String>,
    /// The node that sent the payment.
    pub origin: EntityRef,
    pub fees: Option<CurrencyAmount>,
    pub failure_reason: Option<PaymentFailureReason>,
}
