// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use lightspark_sdk::config::{self, ClientConfig};
use lightspark_sdk::crypto::{self, SigningError};
use lightspark_sdk::logging::{self, LogFormat};
use lightspark_sdk::objects::{BitcoinNetwork, UnknownNetwork};
use lightspark_sdk::webhooks::WebhookEvent;
use lightspark_sdk::{LightsparkClient, LightsparkError, Result, SigningKeyLoader};

#[derive(Debug, Parser)]
#[command(name = "lightspark-cli", version, about = "Lightspark API client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the account owning the API token.
    Account,

    /// Create a Lightning invoice on a node.
    CreateInvoice {
        #[arg(long)]
        node_id: String,
        #[arg(long)]
        amount_msats: i64,
        #[arg(long)]
        memo: Option<String>,
        #[arg(long)]
        expiry_secs: Option<i32>,
    },

    /// Pay a BOLT11 invoice from a node, signing the request with its key.
    PayInvoice {
        #[arg(long)]
        node_id: String,
        #[arg(long)]
        invoice: String,
        #[arg(long, default_value_t = 60)]
        timeout_secs: i32,
        #[arg(long)]
        maximum_fees_msats: i64,
        #[arg(long)]
        amount_msats: Option<i64>,
        /// Node password, for nodes whose key is stored encrypted server side.
        #[arg(long, env = "LIGHTSPARK_NODE_PASSWORD", conflicts_with = "master_seed_hex")]
        password: Option<String>,
        /// Hex master seed, for nodes that sign with a derived secp256k1 key.
        #[arg(long, env = "LIGHTSPARK_MASTER_SEED_HEX")]
        master_seed_hex: Option<String>,
        #[arg(long, default_value = "mainnet")]
        network: String,
    },

    /// Decrypt an encrypted node key and print it as hex.
    DecryptKey {
        /// Cipher header (`{"v":4,"i":...}` or the legacy string).
        #[arg(long)]
        cipher: String,
        #[arg(long)]
        value: String,
        #[arg(long, env = "LIGHTSPARK_NODE_PASSWORD")]
        password: String,
    },

    /// Encrypt an RSA signing key PEM with the current scheme.
    EncryptKey {
        /// PEM file; defaults to the configured signing key.
        #[arg(long)]
        key_file: Option<String>,
        #[arg(long, env = "LIGHTSPARK_NODE_PASSWORD")]
        password: String,
        #[arg(long, default_value_t = crypto::cipher::DEFAULT_ITERATIONS)]
        iterations: u32,
    },

    /// Verify a webhook delivery body against its signature header.
    VerifyWebhook {
        #[arg(long)]
        body_file: String,
        #[arg(long)]
        signature: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = logging::init_tracing(LogFormat::from_env()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", json!({ "code": e.code(), "message": e.to_string() }));
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Account => {
            let account = client()?.get_current_account().await?;
            print_json(&account)
        }
        Command::CreateInvoice {
            node_id,
            amount_msats,
            memo,
            expiry_secs,
        } => {
            let invoice = client()?
                .create_invoice(&node_id, amount_msats, memo.as_deref(), expiry_secs)
                .await?;
            print_json(&invoice)
        }
        Command::PayInvoice {
            node_id,
            invoice,
            timeout_secs,
            maximum_fees_msats,
            amount_msats,
            password,
            master_seed_hex,
            network,
        } => {
            let loader = signing_key_loader(password, master_seed_hex, &network)?;
            let client = client()?;
            client.load_node_signing_key(&node_id, loader).await?;
            let payment = client
                .pay_invoice(
                    &node_id,
                    &invoice,
                    timeout_secs,
                    maximum_fees_msats,
                    amount_msats,
                )
                .await?;
            print_json(&payment)
        }
        Command::DecryptKey {
            cipher,
            value,
            password,
        } => {
            let plaintext = crypto::decrypt_private_key(&cipher, &value, &password)?;
            println!("{}", hex::encode(plaintext));
            Ok(())
        }
        Command::EncryptKey {
            key_file,
            password,
            iterations,
        } => {
            let pem_str = match key_file {
                Some(path) => config::read_pem_file(&path)?,
                None => config::load_signing_key_pem()?,
            };
            let pem = pem::parse(&pem_str)
                .map_err(|e| SigningError::InvalidKey(format!("Invalid PEM: {e}")))?;
            let encrypted = crypto::encrypt_with_iterations(pem.contents(), &password, iterations)?;
            println!(
                "{}",
                json!({ "cipher": encrypted.header, "encrypted_value": encrypted.value })
            );
            Ok(())
        }
        Command::VerifyWebhook {
            body_file,
            signature,
        } => {
            let body = fs::read(&body_file).map_err(|e| {
                LightsparkError::InvalidResponse(format!("failed to read {body_file}: {e}"))
            })?;
            let secret = config::webhook_signing_key()?;
            let event = WebhookEvent::verify_and_parse(&body, &signature, &secret)?;
            info!(event_id = %event.event_id, "Webhook signature verified");
            print_json(&event)
        }
    }
}

fn client() -> Result<LightsparkClient> {
    LightsparkClient::new(ClientConfig::from_env()?)
}

fn signing_key_loader(
    password: Option<String>,
    master_seed_hex: Option<String>,
    network: &str,
) -> Result<SigningKeyLoader> {
    if let Some(password) = password {
        return Ok(SigningKeyLoader::NodeIdAndPassword { password });
    }

    let seed_hex = master_seed_hex.ok_or_else(|| {
        SigningError::InvalidKey("either a node password or a master seed is required".to_string())
    })?;
    let seed = hex::decode(seed_hex.trim())
        .map_err(|e| SigningError::InvalidKey(format!("master seed is not hex: {e}")))?;
    let network: BitcoinNetwork = network
        .parse()
        .map_err(|e: UnknownNetwork| SigningError::InvalidKey(e.to_string()))?;
    Ok(SigningKeyLoader::MasterSeed { seed, network })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| LightsparkError::InvalidResponse(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}
