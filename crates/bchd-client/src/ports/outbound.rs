//! # Outbound Ports
//!
//! The node transport the client drives, plus an in-memory mock.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::domain::ClientError;
use crate::wire::{self, samples};

/// Server-push stream of wire messages. Ends when the node closes it.
pub type PushStream<T> = BoxStream<'static, Result<T, ClientError>>;

/// Node transport - outbound port.
///
/// One method per remote call and per push stream. Implementations map
/// transport failures into [`ClientError`] and must allow concurrent calls.
#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// Endpoint this transport talks to (for logging).
    fn endpoint(&self) -> &str;

    /// `GetBlockchainInfo`
    async fn get_blockchain_info(
        &self,
        request: wire::GetBlockchainInfoRequest,
    ) -> Result<wire::GetBlockchainInfoResponse, ClientError>;

    /// `GetBlockInfo`
    async fn get_block_info(
        &self,
        request: wire::GetBlockInfoRequest,
    ) -> Result<wire::GetBlockInfoResponse, ClientError>;

    /// `GetBlock`
    async fn get_block(
        &self,
        request: wire::GetBlockRequest,
    ) -> Result<wire::GetBlockResponse, ClientError>;

    /// `GetRawBlock`
    async fn get_raw_block(
        &self,
        request: wire::GetRawBlockRequest,
    ) -> Result<wire::GetRawBlockResponse, ClientError>;

    /// `GetBlockFilter`
    async fn get_block_filter(
        &self,
        request: wire::GetBlockFilterRequest,
    ) -> Result<wire::GetBlockFilterResponse, ClientError>;

    /// `GetHeaders`
    async fn get_headers(
        &self,
        request: wire::GetHeadersRequest,
    ) -> Result<wire::GetHeadersResponse, ClientError>;

    /// `GetMerkleProof`
    async fn get_merkle_proof(
        &self,
        request: wire::GetMerkleProofRequest,
    ) -> Result<wire::GetMerkleProofResponse, ClientError>;

    /// `GetMempoolInfo`
    async fn get_mempool_info(
        &self,
        request: wire::GetMempoolInfoRequest,
    ) -> Result<wire::GetMempoolInfoResponse, ClientError>;

    /// `GetMempool`
    async fn get_mempool(
        &self,
        request: wire::GetMempoolRequest,
    ) -> Result<wire::GetMempoolResponse, ClientError>;

    /// `GetTransaction`
    async fn get_transaction(
        &self,
        request: wire::GetTransactionRequest,
    ) -> Result<wire::GetTransactionResponse, ClientError>;

    /// `GetRawTransaction`
    async fn get_raw_transaction(
        &self,
        request: wire::GetRawTransactionRequest,
    ) -> Result<wire::GetRawTransactionResponse, ClientError>;

    /// `GetAddressTransactions`
    async fn get_address_transactions(
        &self,
        request: wire::GetAddressTransactionsRequest,
    ) -> Result<wire::GetAddressTransactionsResponse, ClientError>;

    /// `GetRawAddressTransactions`
    async fn get_raw_address_transactions(
        &self,
        request: wire::GetRawAddressTransactionsRequest,
    ) -> Result<wire::GetRawAddressTransactionsResponse, ClientError>;

    /// `GetUnspentOutput`
    async fn get_unspent_output(
        &self,
        request: wire::GetUnspentOutputRequest,
    ) -> Result<wire::GetUnspentOutputResponse, ClientError>;

    /// `GetAddressUnspentOutputs`
    async fn get_address_unspent_outputs(
        &self,
        request: wire::GetAddressUnspentOutputsRequest,
    ) -> Result<wire::GetAddressUnspentOutputsResponse, ClientError>;

    /// `SubmitTransaction`
    async fn submit_transaction(
        &self,
        request: wire::SubmitTransactionRequest,
    ) -> Result<wire::SubmitTransactionResponse, ClientError>;

    /// `SubscribeBlocks` (server stream)
    async fn subscribe_blocks(
        &self,
        request: wire::SubscribeBlocksRequest,
    ) -> Result<PushStream<wire::BlockNotification>, ClientError>;

    /// `SubscribeTransactions` (server stream)
    async fn subscribe_transactions(
        &self,
        request: wire::SubscribeTransactionsRequest,
    ) -> Result<PushStream<wire::TransactionNotification>, ClientError>;
}

/// A request as it was handed to the transport.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum NodeRequest {
    GetBlockchainInfo(wire::GetBlockchainInfoRequest),
    GetBlockInfo(wire::GetBlockInfoRequest),
    GetBlock(wire::GetBlockRequest),
    GetRawBlock(wire::GetRawBlockRequest),
    GetBlockFilter(wire::GetBlockFilterRequest),
    GetHeaders(wire::GetHeadersRequest),
    GetMerkleProof(wire::GetMerkleProofRequest),
    GetMempoolInfo(wire::GetMempoolInfoRequest),
    GetMempool(wire::GetMempoolRequest),
    GetTransaction(wire::GetTransactionRequest),
    GetRawTransaction(wire::GetRawTransactionRequest),
    GetAddressTransactions(wire::GetAddressTransactionsRequest),
    GetRawAddressTransactions(wire::GetRawAddressTransactionsRequest),
    GetUnspentOutput(wire::GetUnspentOutputRequest),
    GetAddressUnspentOutputs(wire::GetAddressUnspentOutputsRequest),
    SubmitTransaction(wire::SubmitTransactionRequest),
    SubscribeBlocks(wire::SubscribeBlocksRequest),
    SubscribeTransactions(wire::SubscribeTransactionsRequest),
}

impl NodeRequest {
    /// Remote method name, as used in logs and metric labels.
    pub fn method(&self) -> &'static str {
        match self {
            Self::GetBlockchainInfo(_) => "GetBlockchainInfo",
            Self::GetBlockInfo(_) => "GetBlockInfo",
            Self::GetBlock(_) => "GetBlock",
            Self::GetRawBlock(_) => "GetRawBlock",
            Self::GetBlockFilter(_) => "GetBlockFilter",
            Self::GetHeaders(_) => "GetHeaders",
            Self::GetMerkleProof(_) => "GetMerkleProof",
            Self::GetMempoolInfo(_) => "GetMempoolInfo",
            Self::GetMempool(_) => "GetMempool",
            Self::GetTransaction(_) => "GetTransaction",
            Self::GetRawTransaction(_) => "GetRawTransaction",
            Self::GetAddressTransactions(_) => "GetAddressTransactions",
            Self::GetRawAddressTransactions(_) => "GetRawAddressTransactions",
            Self::GetUnspentOutput(_) => "GetUnspentOutput",
            Self::GetAddressUnspentOutputs(_) => "GetAddressUnspentOutputs",
            Self::SubmitTransaction(_) => "SubmitTransaction",
            Self::SubscribeBlocks(_) => "SubscribeBlocks",
            Self::SubscribeTransactions(_) => "SubscribeTransactions",
        }
    }
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

type PushSender<T> = mpsc::UnboundedSender<Result<T, ClientError>>;

struct MockState {
    requests: Vec<NodeRequest>,
    failures: HashMap<&'static str, ClientError>,
    stalled: HashSet<&'static str>,
    blockchain: wire::GetBlockchainInfoResponse,
    block_transactions: Vec<Vec<u8>>,
    headers: Vec<wire::BlockInfo>,
    mempool: Vec<wire::MempoolTransaction>,
    unspent: Vec<wire::UnspentOutput>,
    raw_block: Vec<u8>,
    block_filter: Vec<u8>,
    raw_transaction: Vec<u8>,
    block_streams: Vec<PushSender<wire::BlockNotification>>,
    transaction_streams: Vec<PushSender<wire::TransactionNotification>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            failures: HashMap::new(),
            stalled: HashSet::new(),
            blockchain: samples::blockchain_info(),
            block_transactions: vec![vec![0x01; 32], vec![0x02; 32]],
            headers: Vec::new(),
            mempool: Vec::new(),
            unspent: Vec::new(),
            raw_block: vec![0x00; 80],
            block_filter: vec![0x01, 0x5d, 0x8f],
            raw_transaction: vec![0x02, 0x00, 0x00, 0x00],
            block_streams: Vec::new(),
            transaction_streams: Vec::new(),
        }
    }
}

/// In-memory node for testing.
///
/// Answers every call from [`samples`] data, echoing the identifiers it was
/// asked about, and records each request. Calls can be made to fail or to
/// never resolve, and push messages are injected with
/// [`push_block`](Self::push_block) / [`push_transaction`](Self::push_transaction).
#[derive(Default)]
pub struct MockNodeTransport {
    state: Mutex<MockState>,
}

impl MockNodeTransport {
    /// Create a mock with default canned data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `method` fail with `error`.
    pub fn fail(&self, method: &'static str, error: ClientError) {
        self.state.lock().failures.insert(method, error);
    }

    /// Make every call to `method` hang forever.
    pub fn stall(&self, method: &'static str) {
        self.state.lock().stalled.insert(method);
    }

    /// Replace the `GetBlockchainInfo` reply.
    pub fn set_blockchain(&self, reply: wire::GetBlockchainInfoResponse) {
        self.state.lock().blockchain = reply;
    }

    /// Transaction hashes listed in every `GetBlock` reply.
    pub fn set_block_transactions(&self, hashes: Vec<Vec<u8>>) {
        self.state.lock().block_transactions = hashes;
    }

    /// Headers returned by `GetHeaders`.
    pub fn set_headers(&self, headers: Vec<wire::BlockInfo>) {
        self.state.lock().headers = headers;
    }

    /// Mempool contents.
    pub fn set_mempool(&self, entries: Vec<wire::MempoolTransaction>) {
        self.state.lock().mempool = entries;
    }

    /// Outputs returned by `GetAddressUnspentOutputs`.
    pub fn set_unspent_outputs(&self, outputs: Vec<wire::UnspentOutput>) {
        self.state.lock().unspent = outputs;
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<NodeRequest> {
        self.state.lock().requests.clone()
    }

    /// Number of requests received for `method`.
    pub fn request_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method() == method)
            .count()
    }

    /// Deliver a block notification to every open block stream.
    ///
    /// Returns the number of streams that accepted it.
    pub fn push_block(&self, notification: wire::BlockNotification) -> usize {
        broadcast(&mut self.state.lock().block_streams, Ok(notification))
    }

    /// Deliver a transaction notification to every open transaction stream.
    pub fn push_transaction(&self, notification: wire::TransactionNotification) -> usize {
        broadcast(&mut self.state.lock().transaction_streams, Ok(notification))
    }

    /// Terminate every open stream with `error`.
    pub fn fail_streams(&self, error: ClientError) {
        let mut state = self.state.lock();
        broadcast(&mut state.block_streams, Err(error.clone()));
        broadcast(&mut state.transaction_streams, Err(error));
        state.block_streams.clear();
        state.transaction_streams.clear();
    }

    /// End every open stream normally, as a node shutting down would.
    pub fn end_streams(&self) {
        let mut state = self.state.lock();
        state.block_streams.clear();
        state.transaction_streams.clear();
    }

    /// Number of streams whose receiving side is still alive.
    pub fn open_streams(&self) -> usize {
        let state = self.state.lock();
        state.block_streams.iter().filter(|s| !s.is_closed()).count()
            + state
                .transaction_streams
                .iter()
                .filter(|s| !s.is_closed())
                .count()
    }

    async fn enter(&self, request: NodeRequest) -> Result<(), ClientError> {
        let method = request.method();
        let (failure, stalled) = {
            let mut state = self.state.lock();
            state.requests.push(request);
            (
                state.failures.get(method).cloned(),
                state.stalled.contains(method),
            )
        };

        if stalled {
            std::future::pending::<()>().await;
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn broadcast<T: Clone>(senders: &mut Vec<PushSender<T>>, item: Result<T, ClientError>) -> usize {
    senders.retain(|sender| sender.send(item.clone()).is_ok());
    senders.len()
}

fn selected_block(selector: Option<wire::HashOrHeight>) -> wire::BlockInfo {
    match selector {
        Some(wire::HashOrHeight::Hash(hash)) => samples::block_info(hash, 0),
        Some(wire::HashOrHeight::Height(height)) => {
            samples::block_info(samples::hash_for_height(height), height)
        }
        None => samples::block_info(Vec::new(), 0),
    }
}

#[async_trait]
impl NodeTransport for MockNodeTransport {
    fn endpoint(&self) -> &str {
        "mock://bchd"
    }

    async fn get_blockchain_info(
        &self,
        request: wire::GetBlockchainInfoRequest,
    ) -> Result<wire::GetBlockchainInfoResponse, ClientError> {
        self.enter(NodeRequest::GetBlockchainInfo(request)).await?;
        Ok(self.state.lock().blockchain.clone())
    }

    async fn get_block_info(
        &self,
        request: wire::GetBlockInfoRequest,
    ) -> Result<wire::GetBlockInfoResponse, ClientError> {
        let selector = request.hash_or_height.clone();
        self.enter(NodeRequest::GetBlockInfo(request)).await?;
        Ok(wire::GetBlockInfoResponse {
            info: Some(selected_block(selector)),
        })
    }

    async fn get_block(
        &self,
        request: wire::GetBlockRequest,
    ) -> Result<wire::GetBlockResponse, ClientError> {
        let selector = request.hash_or_height.clone();
        self.enter(NodeRequest::GetBlock(request)).await?;

        let transaction_data = self
            .state
            .lock()
            .block_transactions
            .iter()
            .map(|hash| wire::block::TransactionData {
                txids_or_txs: Some(wire::block::transaction_data::TxidsOrTxs::TransactionHash(
                    hash.clone(),
                )),
            })
            .collect();

        Ok(wire::GetBlockResponse {
            block: Some(wire::Block {
                info: Some(selected_block(selector)),
                transaction_data,
            }),
        })
    }

    async fn get_raw_block(
        &self,
        request: wire::GetRawBlockRequest,
    ) -> Result<wire::GetRawBlockResponse, ClientError> {
        self.enter(NodeRequest::GetRawBlock(request)).await?;
        Ok(wire::GetRawBlockResponse {
            block: self.state.lock().raw_block.clone(),
        })
    }

    async fn get_block_filter(
        &self,
        request: wire::GetBlockFilterRequest,
    ) -> Result<wire::GetBlockFilterResponse, ClientError> {
        self.enter(NodeRequest::GetBlockFilter(request)).await?;
        Ok(wire::GetBlockFilterResponse {
            filter: self.state.lock().block_filter.clone(),
        })
    }

    async fn get_headers(
        &self,
        request: wire::GetHeadersRequest,
    ) -> Result<wire::GetHeadersResponse, ClientError> {
        self.enter(NodeRequest::GetHeaders(request)).await?;
        Ok(wire::GetHeadersResponse {
            headers: self.state.lock().headers.clone(),
        })
    }

    async fn get_merkle_proof(
        &self,
        request: wire::GetMerkleProofRequest,
    ) -> Result<wire::GetMerkleProofResponse, ClientError> {
        let transaction_hash = request.transaction_hash.clone();
        self.enter(NodeRequest::GetMerkleProof(request)).await?;
        Ok(wire::GetMerkleProofResponse {
            block: Some(samples::block_info(vec![0xb1; 32], 650_000)),
            hashes: vec![transaction_hash, vec![0x55; 32]],
            flags: vec![0x1d],
        })
    }

    async fn get_mempool_info(
        &self,
        request: wire::GetMempoolInfoRequest,
    ) -> Result<wire::GetMempoolInfoResponse, ClientError> {
        self.enter(NodeRequest::GetMempoolInfo(request)).await?;
        let state = self.state.lock();
        let bytes = state
            .mempool
            .iter()
            .filter_map(|entry| entry.transaction.as_ref())
            .map(|tx| tx.size.max(0) as u32)
            .sum();
        Ok(wire::GetMempoolInfoResponse {
            size: state.mempool.len() as u32,
            bytes,
        })
    }

    async fn get_mempool(
        &self,
        request: wire::GetMempoolRequest,
    ) -> Result<wire::GetMempoolResponse, ClientError> {
        use wire::get_mempool_response::{transaction_data::TxidsOrTxs, TransactionData};

        let full = request.full_transactions;
        self.enter(NodeRequest::GetMempool(request)).await?;

        let transaction_data = self
            .state
            .lock()
            .mempool
            .iter()
            .map(|entry| {
                let data = if full {
                    TxidsOrTxs::Transaction(entry.clone())
                } else {
                    let hash = entry
                        .transaction
                        .as_ref()
                        .map(|tx| tx.hash.clone())
                        .unwrap_or_default();
                    TxidsOrTxs::TransactionHash(hash)
                };
                TransactionData {
                    txids_or_txs: Some(data),
                }
            })
            .collect();

        Ok(wire::GetMempoolResponse { transaction_data })
    }

    async fn get_transaction(
        &self,
        request: wire::GetTransactionRequest,
    ) -> Result<wire::GetTransactionResponse, ClientError> {
        let hash = request.hash.clone();
        self.enter(NodeRequest::GetTransaction(request)).await?;
        Ok(wire::GetTransactionResponse {
            transaction: Some(samples::transaction(hash)),
        })
    }

    async fn get_raw_transaction(
        &self,
        request: wire::GetRawTransactionRequest,
    ) -> Result<wire::GetRawTransactionResponse, ClientError> {
        self.enter(NodeRequest::GetRawTransaction(request)).await?;
        Ok(wire::GetRawTransactionResponse {
            transaction: self.state.lock().raw_transaction.clone(),
        })
    }

    async fn get_address_transactions(
        &self,
        request: wire::GetAddressTransactionsRequest,
    ) -> Result<wire::GetAddressTransactionsResponse, ClientError> {
        self.enter(NodeRequest::GetAddressTransactions(request)).await?;
        Ok(wire::GetAddressTransactionsResponse {
            confirmed_transactions: vec![samples::transaction(vec![0xc1; 32])],
            unconfirmed_transactions: self.state.lock().mempool.clone(),
        })
    }

    async fn get_raw_address_transactions(
        &self,
        request: wire::GetRawAddressTransactionsRequest,
    ) -> Result<wire::GetRawAddressTransactionsResponse, ClientError> {
        self.enter(NodeRequest::GetRawAddressTransactions(request))
            .await?;
        Ok(wire::GetRawAddressTransactionsResponse {
            confirmed_transactions: vec![self.state.lock().raw_transaction.clone()],
            unconfirmed_transactions: Vec::new(),
        })
    }

    async fn get_unspent_output(
        &self,
        request: wire::GetUnspentOutputRequest,
    ) -> Result<wire::GetUnspentOutputResponse, ClientError> {
        let output = samples::unspent_output(request.hash.clone(), request.index);
        self.enter(NodeRequest::GetUnspentOutput(request)).await?;
        Ok(wire::GetUnspentOutputResponse {
            outpoint: output.outpoint,
            pubkey_script: output.pubkey_script,
            value: output.value,
            is_coinbase: output.is_coinbase,
            block_height: output.block_height,
        })
    }

    async fn get_address_unspent_outputs(
        &self,
        request: wire::GetAddressUnspentOutputsRequest,
    ) -> Result<wire::GetAddressUnspentOutputsResponse, ClientError> {
        self.enter(NodeRequest::GetAddressUnspentOutputs(request))
            .await?;
        Ok(wire::GetAddressUnspentOutputsResponse {
            outputs: self.state.lock().unspent.clone(),
        })
    }

    async fn submit_transaction(
        &self,
        request: wire::SubmitTransactionRequest,
    ) -> Result<wire::SubmitTransactionResponse, ClientError> {
        // Not a real txid: the reversed payload keeps replies distinguishable.
        let hash = request.transaction.iter().rev().copied().collect();
        self.enter(NodeRequest::SubmitTransaction(request)).await?;
        Ok(wire::SubmitTransactionResponse { hash })
    }

    async fn subscribe_blocks(
        &self,
        request: wire::SubscribeBlocksRequest,
    ) -> Result<PushStream<wire::BlockNotification>, ClientError> {
        self.enter(NodeRequest::SubscribeBlocks(request)).await?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().block_streams.push(tx);
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }

    async fn subscribe_transactions(
        &self,
        request: wire::SubscribeTransactionsRequest,
    ) -> Result<PushStream<wire::TransactionNotification>, ClientError> {
        self.enter(NodeRequest::SubscribeTransactions(request))
            .await?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().transaction_streams.push(tx);
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
}
