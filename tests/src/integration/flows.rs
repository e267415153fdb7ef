//! # Integration Test Flows
//!
//! End-to-end usage of `BchdClient` against the in-memory node, the way an
//! application drives it.
//!
//! ## Flows Tested:
//!
//! 1. **Tip follower**: chain summary, then block pushes resolved into full blocks
//! 2. **Wallet sync**: address history, unspent outputs, broadcast
//! 3. **Mempool watcher**: snapshot plus live mempool pushes
//! 4. **Shutdown**: closing the client with queries and subscriptions live

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use bchd_client::wire::samples;
    use bchd_client::{
        BchdApi, BchdClient, BlockSelector, ClientConfig, ClientError, CloseReason, Connection,
        Hash, MockNodeTransport, Network, Outpoint, TransactionSelector,
    };
    use futures::StreamExt;
    use parking_lot::Mutex;
    use tokio::time::timeout;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn create_client() -> (Arc<MockNodeTransport>, BchdClient) {
        let node = Arc::new(MockNodeTransport::new());
        let connection = Connection::with_transport(node.clone(), &ClientConfig::for_testing());
        (node, BchdClient::new(connection))
    }

    /// The facade seen through its port, as application code would hold it.
    fn as_api(client: &BchdClient) -> Arc<dyn BchdApi> {
        Arc::new(client.clone())
    }

    // =============================================================================
    // TIP FOLLOWER
    // =============================================================================

    #[tokio::test]
    async fn test_tip_follower_resolves_pushed_blocks() {
        let (node, client) = create_client();
        let api = as_api(&client);

        let chain = api.get_blockchain().await.unwrap();
        assert_eq!(chain.network, Network::Regtest);

        let subscription = client.block_subscription();
        let mut events = subscription.events();
        subscription.open().await.unwrap();

        let tip = chain.last_block_height;
        for height in tip + 1..=tip + 3 {
            node.push_block(samples::block_notification(
                samples::hash_for_height(height),
                height,
            ));
        }

        let mut heights = Vec::new();
        while heights.len() < 3 {
            let event = timeout(Duration::from_secs(1), events.next())
                .await
                .expect("block push not delivered")
                .expect("subscription ended early");
            let block = api
                .get_block(BlockSelector::Hash(event.block.hash.clone()))
                .await
                .unwrap();
            assert_eq!(block.hash, event.block.hash);
            heights.push(event.block.height);
        }
        assert_eq!(heights, vec![tip + 1, tip + 2, tip + 3]);

        let headers = api.get_headers_above(tip).await.unwrap();
        assert!(headers.is_empty());
        assert_eq!(node.request_count("GetHeaders"), 1);

        assert!(subscription.cancel());
        client.close().await.unwrap();
    }

    // =============================================================================
    // WALLET SYNC
    // =============================================================================

    #[tokio::test]
    async fn test_wallet_sync_and_broadcast() {
        let (node, client) = create_client();
        let address = "bitcoincash:qr95sy3j9xwd2ap32xkykttr4cvcu7as4y0qverfuy".to_string();
        node.set_unspent_outputs(vec![
            samples::unspent_output(vec![0xa1; 32], 0),
            samples::unspent_output(vec![0xa2; 32], 1),
        ]);
        node.set_mempool(vec![samples::mempool_transaction(vec![0xa3; 32])]);

        let history = client
            .get_transactions(TransactionSelector::Address(address.clone()))
            .await
            .unwrap();
        assert_eq!(history.confirmed.len(), 1);
        assert_eq!(history.unconfirmed[0].transaction.hash, Hash::from(vec![0xa3; 32]));

        let outputs = client.get_unspent_outputs(address, true).await.unwrap();
        assert_eq!(
            outputs.iter().map(|o| o.outpoint.clone()).collect::<Vec<_>>(),
            vec![
                Outpoint::new(vec![0xa1; 32], 0),
                Outpoint::new(vec![0xa2; 32], 1),
            ]
        );

        let spent = client.get_unspent_output(outputs[0].outpoint.clone(), true).await.unwrap();
        assert_eq!(spent.value, outputs[0].value);

        let proof = client
            .get_merkle_proof(history.confirmed[0].hash.clone())
            .await
            .unwrap();
        assert_eq!(proof.hashes[0], history.confirmed[0].hash);

        let submitted = client.submit_transaction(vec![0xde, 0xad]).await.unwrap();
        assert_eq!(submitted.hash, Hash::from(vec![0xad, 0xde]));
    }

    // =============================================================================
    // MEMPOOL WATCHER
    // =============================================================================

    #[tokio::test]
    async fn test_mempool_watcher_sees_snapshot_then_pushes() {
        let (node, client) = create_client();
        node.set_mempool(vec![
            samples::mempool_transaction(vec![0xb1; 32]),
            samples::mempool_transaction(vec![0xb2; 32]),
        ]);

        let seen: Arc<Mutex<Vec<Hash>>> = Arc::new(Mutex::new(
            client.get_mempool_transaction_hashes().await.unwrap(),
        ));
        let subscription = {
            let seen = seen.clone();
            client
                .subscribe_transactions(move |event| {
                    seen.lock().push(event.transaction.transaction.hash.clone())
                })
                .await
                .unwrap()
        };
        let mut events = subscription.events();

        node.push_transaction(samples::transaction_notification(vec![0xb3; 32]));
        timeout(Duration::from_secs(1), events.next())
            .await
            .expect("transaction push not delivered");

        assert_eq!(
            *seen.lock(),
            vec![
                Hash::from(vec![0xb1; 32]),
                Hash::from(vec![0xb2; 32]),
                Hash::from(vec![0xb3; 32]),
            ]
        );

        let info = client.get_mempool_information().await.unwrap();
        assert_eq!(info.transaction_count, 2);
    }

    // =============================================================================
    // SHUTDOWN
    // =============================================================================

    #[tokio::test]
    async fn test_shutdown_with_live_work() {
        let (node, client) = create_client();
        node.stall("GetRawTransaction");

        let blocks = client.subscribe_blocks(|_| {}).await.unwrap();
        let transactions = client.subscribe_transactions(|_| {}).await.unwrap();

        let caller = client.clone();
        let query = tokio::spawn(async move {
            caller.get_raw_transaction(Hash::from(vec![0xc4; 32])).await
        });
        while node.request_count("GetRawTransaction") == 0 {
            tokio::task::yield_now().await;
        }

        client.close().await.unwrap();

        assert_eq!(query.await.unwrap(), Err(ClientError::ConnectionClosed));
        assert_eq!(blocks.closed().await, CloseReason::ConnectionClosed);
        assert_eq!(transactions.closed().await, CloseReason::ConnectionClosed);
        assert_eq!(node.open_streams(), 0);
        assert_eq!(
            client.get_block_information(BlockSelector::Height(1)).await,
            Err(ClientError::ConnectionClosed)
        );
    }
}
