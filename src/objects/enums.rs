// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server enums.
//!
//! The API adds enum values over time. Every enum here carries a
//! `FutureValue` variant which any unrecognized string deserializes into, so
//! older SDK builds keep parsing newer responses.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrencyUnit {
    Bitcoin,
    Satoshi,
    Millisatoshi,
    Usd,
    Nanobitcoin,
    Microbitcoin,
    Millibitcoin,
    #[serde(other)]
    FutureValue,
}

impl CurrencyUnit {
    /// Number of millisatoshis in one unit, for bitcoin denominated units.
    pub fn millisatoshis_per_unit(&self) -> Option<i64> {
        match self {
            CurrencyUnit::Bitcoin => Some(100_000_000_000),
            CurrencyUnit::Millibitcoin => Some(100_000_000),
            CurrencyUnit::Microbitcoin => Some(100_000),
            CurrencyUnit::Satoshi => Some(1_000),
            CurrencyUnit::Nanobitcoin => Some(100),
            CurrencyUnit::Millisatoshi => Some(1),
            CurrencyUnit::Usd | CurrencyUnit::FutureValue => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BitcoinNetwork {
    Mainnet,
    Regtest,
    Signet,
    Testnet,
    #[serde(other)]
    FutureValue,
}

impl BitcoinNetwork {
    /// Map to the network type used for BIP32 derivation.
    ///
    /// Derived keys do not depend on the network, so unknown networks fall
    /// back to mainnet.
    pub fn to_bitcoin(self) -> bitcoin::Network {
        match self {
            BitcoinNetwork::Mainnet | BitcoinNetwork::FutureValue => bitcoin::Network::Bitcoin,
            BitcoinNetwork::Regtest => bitcoin::Network::Regtest,
            BitcoinNetwork::Signet => bitcoin::Network::Signet,
            BitcoinNetwork::Testnet => bitcoin::Network::Testnet,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown bitcoin network: {0}")]
pub struct UnknownNetwork(pub String);

/// Parses a network name, ignoring case. `FutureValue` is never produced.
impl FromStr for BitcoinNetwork {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAINNET" => Ok(BitcoinNetwork::Mainnet),
            "REGTEST" => Ok(BitcoinNetwork::Regtest),
            "SIGNET" => Ok(BitcoinNetwork::Signet),
            "TESTNET" => Ok(BitcoinNetwork::Testnet),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentRequestStatus {
    Open,
    Closed,
    #[serde(other)]
    FutureValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
    NotStarted,
    Cancelled,
    #[serde(other)]
    FutureValue,
}

impl TransactionStatus {
    /// Whether the server will not update this transaction again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Success | TransactionStatus::Failed | TransactionStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFailureReason {
    None,
    Timeout,
    NoRoute,
    Error,
    IncorrectPaymentDetails,
    InsufficientBalance,
    InvoiceAlreadyPaid,
    SelfPayment,
    InvoiceExpired,
    InvoiceCancelled,
    RiskScreeningFailed,
    InsufficientBalanceOnSinglePathInvoice,
    #[serde(other)]
    FutureValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookEventType {
    PaymentFinished,
    ForceClosure,
    WithdrawalFinished,
    FundsReceived,
    NodeStatus,
    UmaInvitationClaimed,
    WalletStatus,
    WalletOutgoingPaymentFinished,
    WalletIncomingPaymentFinished,
    WalletWithdrawalFinished,
    WalletFundsReceived,
    RemoteSigning,
    LowBalance,
    HighBalance,
    ChannelOpened,
    ChannelOpeningFees,
    #[serde(other)]
    FutureValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_become_future_value() {
        let unit: CurrencyUnit = serde_json::from_str(r#""DOGECOIN""#).unwrap();
        assert_eq!(unit, CurrencyUnit::FutureValue);

        let event: WebhookEventType = serde_json::from_str(r#""SOMETHING_NEW""#).unwrap();
        assert_eq!(event, WebhookEventType::FutureValue);

        let status: TransactionStatus = serde_json::from_str(r#""REFUNDED""#).unwrap();
        assert_eq!(status, TransactionStatus::FutureValue);
    }

    #[test]
    fn known_values_use_screaming_snake_case() {
        let status: TransactionStatus = serde_json::from_str(r#""NOT_STARTED""#).unwrap();
        assert_eq!(status, TransactionStatus::NotStarted);
        assert_eq!(
            serde_json::to_string(&PaymentFailureReason::NoRoute).unwrap(),
            r#""NO_ROUTE""#
        );
        assert_eq!(
            serde_json::to_string(&BitcoinNetwork::Regtest).unwrap(),
            r#""REGTEST""#
        );
    }

    #[test]
    fn network_parses_case_insensitively() {
        assert_eq!("regtest".parse::<BitcoinNetwork>(), Ok(BitcoinNetwork::Regtest));
        assert_eq!(" MAINNET ".parse::<BitcoinNetwork>(), Ok(BitcoinNetwork::Mainnet));

        let err = "liquid".parse::<BitcoinNetwork>().unwrap_err();
        assert_eq!(err, UnknownNetwork("liquid".to_string()));
        assert!("FUTURE_VALUE".parse::<BitcoinNetwork>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(TransactionStatus::Success.is_terminal());
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(!TransactionStatus::FutureValue.is_terminal());
    }

    #[test]
    fn millisatoshi_conversion_factors() {
        assert_eq!(CurrencyUnit::Satoshi.millisatoshis_per_unit(), Some(1_000));
        assert_eq!(CurrencyUnit::Usd.millisatoshis_per_unit(), None);
    }
}
