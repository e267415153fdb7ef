//! # Telemetry Integration
//!
//! Client activity as it shows up in the Prometheus registry and the tracing
//! pipeline of `bchd-telemetry`.
//!
//! Counters are process-global and other tests run concurrently, so checks
//! compare lower bounds of deltas.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use bchd_client::wire::{self, samples};
    use bchd_client::{
        codes, BchdApi, BchdClient, ClientConfig, ClientError, Connection, MockNodeTransport,
    };
    use bchd_telemetry::{
        init_telemetry, TelemetryConfig, RPC_CALLS, SUBSCRIPTION_CLOSURES, SUBSCRIPTION_EVENTS,
        SUBSCRIPTION_SKIPPED,
    };

    fn create_client() -> (Arc<MockNodeTransport>, BchdClient) {
        let node = Arc::new(MockNodeTransport::new());
        let connection = Connection::with_transport(node.clone(), &ClientConfig::for_testing());
        (node, BchdClient::new(connection))
    }

    /// The only test in this crate that installs the global subscriber.
    #[tokio::test]
    async fn test_init_telemetry_exposes_client_metrics() {
        let guard = init_telemetry(TelemetryConfig::for_testing()).expect("telemetry init");

        let (_node, client) = create_client();
        client.get_blockchain().await.unwrap();
        client.close().await.unwrap();

        let text = guard.metrics().encode().unwrap();
        assert!(text.contains("bchd_client_rpc_calls_total"));
        assert!(text.contains("bchd_client_rpc_duration_seconds"));
        assert!(text.contains("method=\"GetBlockchainInfo\""));
    }

    #[tokio::test]
    async fn test_call_outcomes_are_counted() {
        let (node, client) = create_client();
        node.fail(
            "GetRawBlock",
            ClientError::remote(codes::NOT_FOUND, "block not found"),
        );

        let ok_before = RPC_CALLS.with_label_values(&["GetMempoolInfo", "ok"]).get();
        let rejected_before = RPC_CALLS
            .with_label_values(&["GetRawBlock", "remote_error"])
            .get();

        client.get_mempool_information().await.unwrap();
        assert!(client
            .get_raw_block(bchd_client::BlockSelector::Height(5))
            .await
            .is_err());

        assert!(RPC_CALLS.with_label_values(&["GetMempoolInfo", "ok"]).get() - ok_before >= 1.0);
        assert!(
            RPC_CALLS
                .with_label_values(&["GetRawBlock", "remote_error"])
                .get()
                - rejected_before
                >= 1.0
        );
    }

    #[tokio::test]
    async fn test_subscription_metrics_follow_lifecycle() {
        let (node, client) = create_client();
        let delivered_before = SUBSCRIPTION_EVENTS.with_label_values(&["transactions"]).get();
        let skipped_before = SUBSCRIPTION_SKIPPED.with_label_values(&["transactions"]).get();
        let cancelled_before = SUBSCRIPTION_CLOSURES
            .with_label_values(&["transactions", "cancelled"])
            .get();

        let subscription = client.transaction_subscription();
        let mut events = subscription.events();
        subscription.open().await.unwrap();

        node.push_transaction(wire::TransactionNotification {
            r#type: wire::transaction_notification::Type::Unconfirmed as i32,
            transaction: None,
        });
        node.push_transaction(samples::transaction_notification(vec![0xd1; 32]));
        tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .unwrap()
            .unwrap();
        subscription.cancel();

        assert!(SUBSCRIPTION_EVENTS.with_label_values(&["transactions"]).get() - delivered_before >= 1.0);
        assert!(SUBSCRIPTION_SKIPPED.with_label_values(&["transactions"]).get() - skipped_before >= 1.0);
        assert!(
            SUBSCRIPTION_CLOSURES
                .with_label_values(&["transactions", "cancelled"])
                .get()
                - cancelled_before
                >= 1.0
        );
    }

    #[test]
    fn test_client_config_loads_from_json() {
        let json = r#"{
            "host": "bchd.greyh.at",
            "port": 8335,
            "tls": true,
            "connect_timeout_secs": 5,
            "request_timeout_secs": 20,
            "concurrency_limit": 32,
            "shutdown_grace_secs": 3
        }"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint_uri(), "https://bchd.greyh.at:8335");
        assert_eq!(config.shutdown_grace(), Duration::from_secs(3));
    }
}
