// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GraphQL documents used by [`super::LightsparkClient`].

const CURRENCY_AMOUNT_FIELDS: &str = "
    original_value
    original_unit
    preferred_currency_unit
    preferred_currency_value_rounded
    preferred_currency_value_approx
";

pub const CURRENT_ACCOUNT: &str = "
query CurrentAccount {
    current_account {
        id
        created_at
        updated_at
        name
    }
}
";

pub const RECOVER_NODE_SIGNING_KEY: &str = "
query RecoverNodeSigningKey($node_id: ID!) {
    entity(id: $node_id) {
        __typename
        ... on LightsparkNodeWithOSK {
            encrypted_signing_private_key {
                encrypted_value
                cipher
            }
        }
    }
}
";

pub fn create_invoice() -> String {
    format!(
        "
mutation CreateInvoice(
    $node_id: ID!
    $amount_msats: Long!
    $memo: String
    $expiry_secs: Int
) {{
    create_invoice(input: {{
        node_id: $node_id
        amount_msats: $amount_msats
        memo: $memo
        expiry_secs: $expiry_secs
    }}) {{
        invoice {{
            id
            created_at
            updated_at
            status
            amount_paid {{ {CURRENCY_AMOUNT_FIELDS} }}
            data {{
                encoded_payment_request
                bitcoin_network
                payment_hash
                amount {{ {CURRENCY_AMOUNT_FIELDS} }}
                created_at
                expires_at
                memo
            }}
        }}
    }}
}}
"
    )
}

pub fn pay_invoice() -> String {
    format!(
        "
mutation PayInvoice(
    $node_id: ID!
    $encoded_invoice: String!
    $timeout_secs: Int!
    $maximum_fees_msats: Long!
    $amount_msats: Long
) {{
    pay_invoice(input: {{
        node_id: $node_id
        encoded_invoice: $encoded_invoice
        timeout_secs: $timeout_secs
        maximum_fees_msats: $maximum_fees_msats
        amount_msats: $amount_msats
    }}) {{
        payment {{
            id
            created_at
            updated_at
            status
            resolved_at
            amount {{ {CURRENCY_AMOUNT_FIELDS} }}
            transaction_hash
            origin {{ id }}
            fees {{ {CURRENCY_AMOUNT_FIELDS} }}
            failure_reason
        }}
    }}
}}
"
    )
}
