//! Synthetic wire messages.
//!
//! Used by [`MockNodeTransport`](crate::ports::MockNodeTransport) to answer
//! calls and by tests as fixtures. Values are plausible but carry no chain
//! meaning.

use super::messages::*;

/// Block info with the given hash and height and fixed header fields.
pub fn block_info(hash: Vec<u8>, height: i32) -> BlockInfo {
    BlockInfo {
        hash,
        height,
        version: 0x2000_0000,
        previous_block: vec![0x11; 32],
        merkle_root: vec![0x22; 32],
        timestamp: 1_600_000_000,
        bits: 0x1802_7a3b,
        nonce: 2_083_236_893,
        confirmations: 12,
        difficulty: 123_456.789,
        next_block_hash: vec![0x33; 32],
        size: 2_048,
        median_time: 1_599_999_000,
    }
}

/// Synthetic hash for a block addressed only by height.
pub fn hash_for_height(height: i32) -> Vec<u8> {
    height.to_le_bytes().repeat(8)
}

/// One-input, one-output transaction with the given hash.
pub fn transaction(hash: Vec<u8>) -> Transaction {
    Transaction {
        hash,
        version: 2,
        inputs: vec![transaction::Input {
            index: 0,
            outpoint: Some(transaction::input::Outpoint {
                hash: vec![0x44; 32],
                index: 3,
            }),
            signature_script: vec![0x47, 0x30],
            sequence: u32::MAX,
            value: 50_000,
            previous_script: vec![0x76, 0xa9],
            address: "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a".to_string(),
        }],
        outputs: vec![transaction::Output {
            index: 0,
            value: 49_000,
            pubkey_script: vec![0x76, 0xa9, 0x14],
            address: "bitcoincash:qr95sy3j9xwd2ap32xkykttr4cvcu7as4y0qverfuy".to_string(),
            script_class: "pubkeyhash".to_string(),
            disassembled_script: "OP_DUP OP_HASH160".to_string(),
        }],
        lock_time: 0,
        size: 226,
        timestamp: 1_600_000_100,
        confirmations: 0,
        block_height: 0,
        block_hash: Vec::new(),
    }
}

/// Mempool entry wrapping [`transaction`].
pub fn mempool_transaction(hash: Vec<u8>) -> MempoolTransaction {
    MempoolTransaction {
        transaction: Some(transaction(hash)),
        added_time: 1_600_000_100,
        added_height: 650_000,
        fee: 1_000,
        fee_per_kb: 4_424,
        starting_priority: 0.5,
    }
}

/// Unspent output at the given outpoint.
pub fn unspent_output(hash: Vec<u8>, index: u32) -> UnspentOutput {
    UnspentOutput {
        outpoint: Some(transaction::input::Outpoint { hash, index }),
        pubkey_script: vec![0x76, 0xa9, 0x14],
        value: 546,
        is_coinbase: false,
        block_height: 650_000,
    }
}

/// Regtest chain summary.
pub fn blockchain_info() -> GetBlockchainInfoResponse {
    GetBlockchainInfoResponse {
        bitcoin_net: get_blockchain_info_response::BitcoinNet::Regtest as i32,
        best_height: 650_000,
        best_block_hash: vec![0xbe; 32],
        difficulty: 123_456.789,
        median_time: 1_599_999_000,
        tx_index: true,
        addr_index: true,
    }
}

/// Connected-block notification for the given block.
pub fn block_notification(hash: Vec<u8>, height: i32) -> BlockNotification {
    BlockNotification {
        r#type: block_notification::Type::Connected as i32,
        block: Some(block_notification::Block::BlockInfo(block_info(hash, height))),
    }
}

/// Unconfirmed-transaction notification for the given hash.
pub fn transaction_notification(hash: Vec<u8>) -> TransactionNotification {
    TransactionNotification {
        r#type: transaction_notification::Type::Unconfirmed as i32,
        transaction: Some(
            transaction_notification::Transaction::UnconfirmedTransaction(mempool_transaction(
                hash,
            )),
        ),
    }
}
