//! # BCHD Client
//!
//! Query facade over one [`Connection`]: builds the wire request, issues the
//! call, and maps the reply into domain values.
//!
//! Node rejections pass through unchanged as [`ClientError::Remote`].

use async_trait::async_trait;
use tracing::debug;

use super::connection::Connection;
use super::requests;
use super::subscription::Subscription;
use crate::config::ClientConfig;
use crate::domain::{
    mapper, Block, BlockEvent, BlockHeader, BlockInformation, BlockSelector, Blockchain,
    ClientError, Hash, MempoolInformation, MerkleProof, Outpoint, RawTransactionSet,
    SubmittedTransaction, Transaction, TransactionEvent, TransactionSelector, TransactionSet,
    UnconfirmedTransaction, UnspentOutput,
};
use crate::ports::BchdApi;
use crate::wire;

/// Typed client for a bchd node.
#[derive(Debug, Clone)]
pub struct BchdClient {
    connection: Connection,
}

impl BchdClient {
    /// Connect to the node described by `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(Connection::open(config).await?))
    }

    /// Build a client over an existing connection.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Close the underlying connection.
    pub async fn close(&self) -> Result<(), ClientError> {
        self.connection.close().await
    }

    /// Idle block subscription; register consumers, then call `open`.
    pub fn block_subscription(&self) -> Subscription<BlockEvent> {
        Subscription::new(self.connection.clone())
    }

    /// Idle mempool transaction subscription.
    pub fn transaction_subscription(&self) -> Subscription<TransactionEvent> {
        Subscription::new(self.connection.clone())
    }

    /// Open a block subscription delivering to `consumer`.
    pub async fn subscribe_blocks<F>(
        &self,
        consumer: F,
    ) -> Result<Subscription<BlockEvent>, ClientError>
    where
        F: Fn(&BlockEvent) + Send + Sync + 'static,
    {
        let subscription = self.block_subscription();
        subscription.on_event(consumer);
        subscription.open().await?;
        Ok(subscription)
    }

    /// Open a transaction subscription delivering to `consumer`.
    pub async fn subscribe_transactions<F>(
        &self,
        consumer: F,
    ) -> Result<Subscription<TransactionEvent>, ClientError>
    where
        F: Fn(&TransactionEvent) + Send + Sync + 'static,
    {
        let subscription = self.transaction_subscription();
        subscription.on_event(consumer);
        subscription.open().await?;
        Ok(subscription)
    }

    async fn mempool(&self, full_transactions: bool) -> Result<wire::GetMempoolResponse, ClientError> {
        self.connection
            .call(
                "GetMempool",
                |t| t.get_mempool(requests::mempool(full_transactions)),
            )
            .await
    }
}

#[async_trait]
impl BchdApi for BchdClient {
    async fn get_blockchain(&self) -> Result<Blockchain, ClientError> {
        let reply = self
            .connection
            .call(
                "GetBlockchainInfo",
                |t| t.get_blockchain_info(wire::GetBlockchainInfoRequest {}),
            )
            .await?;
        Blockchain::try_from(reply)
    }

    async fn get_block_header(&self, selector: BlockSelector) -> Result<BlockHeader, ClientError> {
        Ok(self.get_block_information(selector).await?.header)
    }

    async fn get_block_information(
        &self,
        selector: BlockSelector,
    ) -> Result<BlockInformation, ClientError> {
        let reply = self
            .connection
            .call("GetBlockInfo", |t| t.get_block_info(requests::block_info(selector)))
            .await?;
        BlockInformation::try_from(reply)
    }

    async fn get_block(&self, selector: BlockSelector) -> Result<Block, ClientError> {
        let reply = self
            .connection
            .call("GetBlock", |t| t.get_block(requests::block(selector)))
            .await?;
        Block::try_from(reply)
    }

    async fn get_raw_block(&self, selector: BlockSelector) -> Result<Vec<u8>, ClientError> {
        let reply = self
            .connection
            .call("GetRawBlock", |t| t.get_raw_block(requests::raw_block(selector)))
            .await?;
        Ok(reply.block)
    }

    async fn get_block_filter(&self, selector: BlockSelector) -> Result<Vec<u8>, ClientError> {
        let reply = self
            .connection
            .call(
                "GetBlockFilter",
                |t| t.get_block_filter(requests::block_filter(selector)),
            )
            .await?;
        Ok(reply.filter)
    }

    async fn get_headers(
        &self,
        locators: Vec<Hash>,
        stop: Option<Hash>,
    ) -> Result<Vec<BlockHeader>, ClientError> {
        let reply = self
            .connection
            .call("GetHeaders", |t| t.get_headers(requests::headers(locators, stop)))
            .await?;
        Ok(mapper::headers(&reply))
    }

    async fn get_headers_above(&self, height: i32) -> Result<Vec<BlockHeader>, ClientError> {
        let anchor = self.get_block(BlockSelector::Height(height)).await?;
        debug!(height, anchor = %anchor.hash, "Fetching headers above anchor");
        self.get_headers(vec![anchor.hash], None).await
    }

    async fn get_merkle_proof(&self, transaction_hash: Hash) -> Result<MerkleProof, ClientError> {
        let reply = self
            .connection
            .call(
                "GetMerkleProof",
                |t| t.get_merkle_proof(requests::merkle_proof(transaction_hash)),
            )
            .await?;
        MerkleProof::try_from(reply)
    }

    async fn get_mempool_information(&self) -> Result<MempoolInformation, ClientError> {
        let reply = self
            .connection
            .call(
                "GetMempoolInfo",
                |t| t.get_mempool_info(wire::GetMempoolInfoRequest {}),
            )
            .await?;
        Ok(MempoolInformation::from(reply))
    }

    async fn get_mempool_transaction_hashes(&self) -> Result<Vec<Hash>, ClientError> {
        mapper::mempool_hashes(self.mempool(false).await?)
    }

    async fn get_mempool_transactions(&self) -> Result<Vec<UnconfirmedTransaction>, ClientError> {
        mapper::mempool_transactions(self.mempool(true).await?)
    }

    async fn get_transaction(&self, hash: Hash) -> Result<Transaction, ClientError> {
        let reply = self
            .connection
            .call("GetTransaction", |t| t.get_transaction(requests::transaction(hash)))
            .await?;
        Transaction::try_from(reply)
    }

    async fn get_raw_transaction(&self, hash: Hash) -> Result<Vec<u8>, ClientError> {
        let reply = self
            .connection
            .call(
                "GetRawTransaction",
                |t| t.get_raw_transaction(requests::raw_transaction(hash)),
            )
            .await?;
        Ok(reply.transaction)
    }

    async fn get_transactions(
        &self,
        selector: TransactionSelector,
    ) -> Result<TransactionSet, ClientError> {
        let reply = self
            .connection
            .call(
                "GetAddressTransactions",
                |t| t.get_address_transactions(requests::address_transactions(selector)),
            )
            .await?;
        TransactionSet::try_from(reply)
    }

    async fn get_raw_transactions(
        &self,
        selector: TransactionSelector,
    ) -> Result<RawTransactionSet, ClientError> {
        let reply = self
            .connection
            .call(
                "GetRawAddressTransactions",
                |t| t.get_raw_address_transactions(requests::raw_address_transactions(selector)),
            )
            .await?;
        Ok(RawTransactionSet::from(reply))
    }

    async fn get_unspent_output(
        &self,
        outpoint: Outpoint,
        include_unconfirmed: bool,
    ) -> Result<UnspentOutput, ClientError> {
        let reply = self
            .connection
            .call(
                "GetUnspentOutput",
                |t| t.get_unspent_output(requests::unspent_output(
                    outpoint,
                    include_unconfirmed,
                )),
            )
            .await?;
        UnspentOutput::try_from(reply)
    }

    async fn get_unspent_outputs(
        &self,
        address: String,
        include_unconfirmed: bool,
    ) -> Result<Vec<UnspentOutput>, ClientError> {
        let reply = self
            .connection
            .call(
                "GetAddressUnspentOutputs",
                |t| t.get_address_unspent_outputs(requests::address_unspent_outputs(
                    address,
                    include_unconfirmed,
                )),
            )
            .await?;
        mapper::unspent_outputs(reply)
    }

    async fn submit_transaction(
        &self,
        raw_transaction: Vec<u8>,
    ) -> Result<SubmittedTransaction, ClientError> {
        let reply = self
            .connection
            .call(
                "SubmitTransaction",
                |t| t.submit_transaction(requests::submit_transaction(raw_transaction)),
            )
            .await?;
        Ok(SubmittedTransaction::from(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{codes, Network};
    use crate::ports::{MockNodeTransport, NodeRequest};
    use crate::wire::samples;
    use std::sync::Arc;
    use std::time::Duration;

    fn setup() -> (Arc<MockNodeTransport>, BchdClient) {
        let mock = Arc::new(MockNodeTransport::new());
        let connection = Connection::with_transport(mock.clone(), &ClientConfig::for_testing());
        (mock, BchdClient::new(connection))
    }

    #[tokio::test]
    async fn test_get_blockchain() {
        let (_mock, client) = setup();

        let chain = client.get_blockchain().await.unwrap();
        assert_eq!(chain.network, Network::Regtest);
        assert_eq!(chain.last_block_height, 650_000);
    }

    #[tokio::test]
    async fn test_block_by_height_sends_height_only() {
        let (mock, client) = setup();

        let block = client.get_block(BlockSelector::Height(600_000)).await.unwrap();
        assert_eq!(block.height, 600_000);
        assert_eq!(block.transaction_hashes.len(), 2);

        match &mock.requests()[0] {
            NodeRequest::GetBlock(request) => {
                assert_eq!(request.hash_or_height, Some(wire::HashOrHeight::Height(600_000)));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_block_information_by_hash_echoes_hash() {
        let (mock, client) = setup();
        let hash = Hash::from(vec![0xab; 32]);

        let info = client
            .get_block_information(BlockSelector::Hash(hash.clone()))
            .await
            .unwrap();
        assert_eq!(info.hash, hash);

        match &mock.requests()[0] {
            NodeRequest::GetBlockInfo(request) => {
                assert_eq!(request.hash_or_height, Some(wire::HashOrHeight::Hash(vec![0xab; 32])));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_block_header_comes_from_block_info() {
        let (mock, client) = setup();

        let header = client.get_block_header(BlockSelector::Height(10)).await.unwrap();
        let info = client.get_block_information(BlockSelector::Height(10)).await.unwrap();
        assert_eq!(header, info.header);
        assert_eq!(mock.request_count("GetBlockInfo"), 2);
    }

    #[tokio::test]
    async fn test_remote_rejection_passes_through() {
        let (mock, client) = setup();
        let rejection = ClientError::remote(codes::NOT_FOUND, "transaction not found");
        mock.fail("GetTransaction", rejection.clone());

        let result = client.get_transaction(Hash::from(vec![1; 32])).await;
        assert_eq!(result, Err(rejection));
    }

    #[tokio::test]
    async fn test_headers_above_anchors_on_block_hash() {
        let (mock, client) = setup();
        mock.set_headers(vec![
            samples::block_info(vec![0x11; 32], 101),
            samples::block_info(vec![0x12; 32], 102),
        ]);

        let headers = client.get_headers_above(100).await.unwrap();
        assert_eq!(headers.len(), 2);

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        match &requests[1] {
            NodeRequest::GetHeaders(request) => {
                assert_eq!(request.block_locator_hashes, vec![samples::hash_for_height(100)]);
                assert!(request.stop_hash.is_empty());
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_headers_above_stops_at_first_failure() {
        let (mock, client) = setup();
        let rejection = ClientError::remote(codes::NOT_FOUND, "block not found");
        mock.fail("GetBlock", rejection.clone());

        assert_eq!(client.get_headers_above(999_999).await, Err(rejection));
        assert_eq!(mock.request_count("GetHeaders"), 0);
    }

    #[tokio::test]
    async fn test_mempool_hashes_and_entries() {
        let (mock, client) = setup();
        mock.set_mempool(vec![
            samples::mempool_transaction(vec![0x21; 32]),
            samples::mempool_transaction(vec![0x22; 32]),
        ]);

        let hashes = client.get_mempool_transaction_hashes().await.unwrap();
        assert_eq!(hashes, vec![Hash::from(vec![0x21; 32]), Hash::from(vec![0x22; 32])]);

        let entries = client.get_mempool_transactions().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].transaction.hash, Hash::from(vec![0x22; 32]));

        let info = client.get_mempool_information().await.unwrap();
        assert_eq!(info.transaction_count, 2);
    }

    #[tokio::test]
    async fn test_unspent_output_echoes_outpoint() {
        let (mock, client) = setup();
        let outpoint = Outpoint::new(Hash::from(vec![0x31; 32]), 3);

        let output = client.get_unspent_output(outpoint.clone(), true).await.unwrap();
        assert_eq!(output.outpoint, outpoint);

        match &mock.requests()[0] {
            NodeRequest::GetUnspentOutput(request) => assert!(request.include_mempool),
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_address_transactions_split_by_confirmation() {
        let (mock, client) = setup();
        mock.set_mempool(vec![samples::mempool_transaction(vec![0x41; 32])]);

        let set = client
            .get_transactions(TransactionSelector::Address("qq...".to_string()))
            .await
            .unwrap();
        assert_eq!(set.confirmed.len(), 1);
        assert_eq!(set.unconfirmed.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_returns_node_hash() {
        let (_mock, client) = setup();

        let submitted = client.submit_transaction(vec![1, 2, 3]).await.unwrap();
        assert_eq!(submitted.hash, Hash::from(vec![3, 2, 1]));
    }

    #[tokio::test]
    async fn test_concurrent_calls_keep_replies_apart() {
        let (_mock, client) = setup();

        let calls = (0u8..16).map(|i| {
            let client = client.clone();
            async move {
                let hash = Hash::from(vec![i; 32]);
                let tx = client.get_transaction(hash.clone()).await.unwrap();
                (hash, tx.hash)
            }
        });

        for (asked, answered) in futures::future::join_all(calls).await {
            assert_eq!(asked, answered);
        }
    }

    #[tokio::test]
    async fn test_close_fails_outstanding_query() {
        let (mock, client) = setup();
        mock.stall("GetRawBlock");

        let caller = client.clone();
        let pending =
            tokio::spawn(async move { caller.get_raw_block(BlockSelector::Height(1)).await });
        while mock.request_count("GetRawBlock") == 0 {
            tokio::task::yield_now().await;
        }

        client.close().await.unwrap();
        let result = tokio::time::timeout(Duration::from_secs(1), pending)
            .await
            .expect("query did not resolve")
            .unwrap();
        assert_eq!(result, Err(ClientError::ConnectionClosed));
        assert_eq!(
            client.get_blockchain().await,
            Err(ClientError::ConnectionClosed)
        );
    }

    #[tokio::test]
    async fn test_subscribe_blocks_delivers_to_consumer() {
        let (mock, client) = setup();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let subscription = client
            .subscribe_blocks(move |event: &BlockEvent| {
                let _ = tx.send(event.block.height);
            })
            .await
            .unwrap();

        mock.push_block(samples::block_notification(vec![0x51; 32], 700_000));
        let height = tokio::time::timeout(Duration::from_millis(100), rx.recv())
            .await
            .unwrap();
        assert_eq!(height, Some(700_000));
        assert!(subscription.cancel());
    }
}
