//! # Domain Entities
//!
//! Immutable snapshots built from a single node reply or push message.
//! None of them holds a reference to the connection.

use serde::{Deserialize, Serialize};

use super::value_objects::{BlockEventKind, Hash, Network, Outpoint};

/// Consensus header of a block, independent of its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block version
    pub version: i32,
    /// Hash of the parent block
    pub previous_block_hash: Hash,
    /// Merkle root of the block's transactions
    pub merkle_root: Hash,
    /// Block time (seconds since epoch)
    pub timestamp: i64,
    /// Compact difficulty target
    pub target_bits: u32,
    /// Mining nonce
    pub nonce: u32,
}

/// Header plus chain position and summary data of one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInformation {
    /// Block hash
    pub hash: Hash,
    /// Block height
    pub height: i32,
    /// Consensus header
    pub header: BlockHeader,
    /// Confirmations at query time
    pub confirmations: i32,
    /// Difficulty at this block
    pub difficulty: f64,
    /// Hash of the next block; empty at the tip
    pub next_block_hash: Hash,
    /// Serialized size in bytes
    pub size: i32,
    /// Median time of the previous eleven blocks
    pub median_time: i64,
}

/// A block with its ordered transaction hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block hash
    pub hash: Hash,
    /// Block height
    pub height: i32,
    /// Consensus header
    pub header: BlockHeader,
    /// Transaction hashes in block order
    pub transaction_hashes: Vec<Hash>,
    /// Confirmations at query time
    pub confirmations: i32,
    /// Difficulty at this block
    pub difficulty: f64,
    /// Median time of the previous eleven blocks
    pub median_time: i64,
    /// Serialized size in bytes
    pub size: i32,
    /// Hash of the next block; empty at the tip
    pub next_block_hash: Hash,
}

impl Block {
    /// Whether this block is the current chain tip.
    pub fn is_tip(&self) -> bool {
        self.next_block_hash.is_empty()
    }
}

/// Summary of the node's view of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blockchain {
    /// Network the node runs on
    pub network: Network,
    /// Height of the best block
    pub last_block_height: i32,
    /// Hash of the best block
    pub last_block_hash: Hash,
    /// Current difficulty
    pub difficulty: f64,
    /// Median time of the last eleven blocks
    pub last_eleven_blocks_median_time: i64,
    /// Node keeps a full transaction index
    pub has_full_transaction_index: bool,
    /// Node keeps an address index
    pub has_address_index: bool,
}

/// Transaction input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    /// Position within the transaction
    pub index: u32,
    /// Output being spent
    pub outpoint: Outpoint,
    /// Value of the spent output (satoshis)
    pub value: i64,
    /// Address of the spent output
    pub address: String,
    /// Locking script of the spent output
    pub previous_locking_script: Vec<u8>,
    /// Unlocking (signature) script
    pub unlocking_script: Vec<u8>,
    /// Sequence number
    pub sequence: u32,
}

/// Transaction output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Position within the transaction
    pub index: u32,
    /// Value (satoshis)
    pub value: i64,
    /// Receiving address
    pub address: String,
    /// Script class label reported by the node
    pub script_class: String,
    /// Locking script
    pub locking_script: Vec<u8>,
}

/// A transaction as reported by the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash
    pub hash: Hash,
    /// Transaction version
    pub version: i32,
    /// Inputs in transaction order
    pub inputs: Vec<Input>,
    /// Outputs in transaction order
    pub outputs: Vec<Output>,
    /// Lock time
    pub lock_time: u32,
    /// Serialized size in bytes
    pub size: i32,
    /// Time first seen or block time
    pub timestamp: i64,
    /// Confirmations at query time
    pub confirmations: i32,
    /// Containing block hash; empty while unconfirmed
    pub block_hash: Hash,
    /// Containing block height
    pub block_height: i32,
}

/// A mempool transaction with its admission data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnconfirmedTransaction {
    /// The transaction
    pub transaction: Transaction,
    /// Time it entered the mempool
    pub added_time: i64,
    /// Chain height when it entered the mempool
    pub added_height: i32,
    /// Fee paid (satoshis)
    pub fee: i64,
    /// Fee per kilobyte (satoshis)
    pub fee_per_kb: i64,
    /// Priority when it entered the mempool
    pub starting_priority: f64,
}

/// One spendable output at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    /// Output reference
    pub outpoint: Outpoint,
    /// Value (satoshis)
    pub value: i64,
    /// Locking script
    pub locking_script: Vec<u8>,
    /// Height of the block that created it
    pub block_height: i32,
    /// Created by a coinbase transaction
    pub is_coinbase: bool,
}

/// Partial merkle tree proving a transaction's inclusion in a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Hash of the containing block
    pub block_hash: Hash,
    /// Header of the containing block
    pub header: BlockHeader,
    /// Proof hashes in wire order
    pub hashes: Vec<Hash>,
    /// Partial merkle tree flag bits
    pub flags: Vec<u8>,
}

/// Mempool size summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MempoolInformation {
    /// Number of transactions
    pub transaction_count: u32,
    /// Total size in bytes
    pub size_in_bytes: u32,
}

/// Transactions matched by a selector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSet {
    /// Confirmed transactions
    pub confirmed: Vec<Transaction>,
    /// Mempool transactions
    pub unconfirmed: Vec<UnconfirmedTransaction>,
}

/// Serialized transactions matched by a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransactionSet {
    /// Confirmed transactions
    pub confirmed: Vec<Vec<u8>>,
    /// Mempool transactions
    pub unconfirmed: Vec<Vec<u8>>,
}

/// Acknowledgment of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedTransaction {
    /// Hash the node computed for the transaction
    pub hash: Hash,
}

/// Block notification payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEvent {
    /// Connected or disconnected
    pub kind: BlockEventKind,
    /// The block
    pub block: BlockInformation,
}

/// Mempool transaction notification payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEvent {
    /// The newly seen transaction
    pub transaction: UnconfirmedTransaction,
}
