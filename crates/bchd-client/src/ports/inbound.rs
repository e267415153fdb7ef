//! # Inbound Ports
//!
//! API trait defining what the BCHD client offers its callers.

use async_trait::async_trait;

use crate::domain::{
    Block, BlockHeader, BlockInformation, BlockSelector, Blockchain, ClientError, Hash,
    MempoolInformation, MerkleProof, Outpoint, RawTransactionSet, SubmittedTransaction,
    Transaction, TransactionSelector, TransactionSet, UnconfirmedTransaction, UnspentOutput,
};

/// BCHD query API - inbound port.
///
/// Every method is one request/response exchange with the node (two for
/// [`get_headers_above`](Self::get_headers_above)) and returns domain values
/// only.
#[async_trait]
pub trait BchdApi: Send + Sync {
    /// Chain summary of the node.
    async fn get_blockchain(&self) -> Result<Blockchain, ClientError>;

    /// Consensus header of the selected block.
    async fn get_block_header(&self, selector: BlockSelector)
        -> Result<BlockHeader, ClientError>;

    /// Header plus chain position of the selected block.
    async fn get_block_information(
        &self,
        selector: BlockSelector,
    ) -> Result<BlockInformation, ClientError>;

    /// Selected block with its transaction hashes.
    async fn get_block(&self, selector: BlockSelector) -> Result<Block, ClientError>;

    /// Serialized selected block.
    async fn get_raw_block(&self, selector: BlockSelector) -> Result<Vec<u8>, ClientError>;

    /// Compact filter of the selected block.
    async fn get_block_filter(&self, selector: BlockSelector) -> Result<Vec<u8>, ClientError>;

    /// Headers following the first locator the node knows, up to `stop`.
    async fn get_headers(
        &self,
        locators: Vec<Hash>,
        stop: Option<Hash>,
    ) -> Result<Vec<BlockHeader>, ClientError>;

    /// Headers above the block at `height`.
    async fn get_headers_above(&self, height: i32) -> Result<Vec<BlockHeader>, ClientError>;

    /// Inclusion proof of a confirmed transaction.
    async fn get_merkle_proof(&self, transaction_hash: Hash)
        -> Result<MerkleProof, ClientError>;

    /// Mempool size summary.
    async fn get_mempool_information(&self) -> Result<MempoolInformation, ClientError>;

    /// Hashes of all mempool transactions.
    async fn get_mempool_transaction_hashes(&self) -> Result<Vec<Hash>, ClientError>;

    /// All mempool transactions with admission data.
    async fn get_mempool_transactions(&self)
        -> Result<Vec<UnconfirmedTransaction>, ClientError>;

    /// Transaction by hash.
    async fn get_transaction(&self, hash: Hash) -> Result<Transaction, ClientError>;

    /// Serialized transaction by hash.
    async fn get_raw_transaction(&self, hash: Hash) -> Result<Vec<u8>, ClientError>;

    /// Transactions of a block or an address.
    async fn get_transactions(
        &self,
        selector: TransactionSelector,
    ) -> Result<TransactionSet, ClientError>;

    /// Serialized transactions of a block or an address.
    async fn get_raw_transactions(
        &self,
        selector: TransactionSelector,
    ) -> Result<RawTransactionSet, ClientError>;

    /// The output at `outpoint` if it is unspent.
    async fn get_unspent_output(
        &self,
        outpoint: Outpoint,
        include_unconfirmed: bool,
    ) -> Result<UnspentOutput, ClientError>;

    /// Unspent outputs paying to `address`.
    async fn get_unspent_outputs(
        &self,
        address: String,
        include_unconfirmed: bool,
    ) -> Result<Vec<UnspentOutput>, ClientError>;

    /// Broadcast a serialized transaction.
    async fn submit_transaction(
        &self,
        raw_transaction: Vec<u8>,
    ) -> Result<SubmittedTransaction, ClientError>;
}
