// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Objects
//!
//! Typed views of the entities this SDK reads from the API. Field names match
//! the GraphQL schema (snake_case), so responses deserialize directly.

pub mod entities;
pub mod enums;

pub use entities::{
    Account, CurrencyAmount, EncryptedSigningPrivateKey, EntityRef, Invoice, InvoiceData,
    OutgoingPayment,
};
pub use enums::{
    BitcoinNetwork, CurrencyUnit, PaymentFailureReason, PaymentRequestStatus, TransactionStatus,
    UnknownNetwork, WebhookEventType,
};
