//! # gRPC Adapter
//!
//! [`NodeTransport`] over a tonic channel to a bchd node.
//!
//! One channel carries every call; HTTP/2 multiplexes concurrent requests and
//! the endpoint's concurrency limit bounds them.
//!
//! Subscribe calls return at once. A bchd node sends no response headers
//! until its first push, so the stream awaits them on first poll and a
//! rejection arrives as the stream's first item.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::Duration;
use tonic::codec::Streaming;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Response, Status};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::domain::ClientError;
use crate::ports::{NodeTransport, PushStream};
use crate::wire::{self, BchrpcClient};

/// Node transport backed by a tonic channel.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    client: BchrpcClient,
    endpoint: String,
}

/// Map a call rejection into a [`ClientError::Remote`].
pub fn status_to_error(status: Status) -> ClientError {
    ClientError::remote(status.code() as i32, status.message())
}

fn stream_error(status: Status) -> ClientError {
    ClientError::StreamFailed(format!(
        "{}: {}",
        crate::domain::codes::name(status.code() as i32),
        status.message()
    ))
}

fn reply<T>(result: Result<Response<T>, Status>) -> Result<T, ClientError> {
    result.map(Response::into_inner).map_err(status_to_error)
}

fn push_stream<T, F>(opening: F) -> PushStream<T>
where
    T: Send + 'static,
    F: Future<Output = Result<Response<Streaming<T>>, Status>> + Send + 'static,
{
    stream::once(opening)
        .map(|opened| match opened {
            Ok(response) => response
                .into_inner()
                .map(|item| item.map_err(stream_error))
                .boxed(),
            Err(status) => stream::iter([Err(status_to_error(status))]).boxed(),
        })
        .flatten()
        .boxed()
}

impl GrpcTransport {
    /// Build the endpoint described by `config`.
    pub fn endpoint(config: &ClientConfig) -> Result<Endpoint, ClientError> {
        let uri = config.endpoint_uri();
        let mut endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", uri, e)))?
            .connect_timeout(config.connect_timeout())
            .concurrency_limit(config.concurrency_limit);

        if config.tls {
            let tls = ClientTlsConfig::new()
                .with_native_roots()
                .domain_name(config.host.clone());
            endpoint = endpoint
                .tls_config(tls)
                .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", uri, e)))?;
        }

        Ok(endpoint)
    }

    /// Connect eagerly; fails if the node cannot be reached within the
    /// connect timeout.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let uri = config.endpoint_uri();
        let channel = Self::endpoint(config)?
            .connect()
            .await
            .map_err(|e| ClientError::ConnectionFailed {
                endpoint: uri.clone(),
                reason: e.to_string(),
            })?;

        info!(endpoint = %uri, tls = config.tls, "Connected to bchd");
        Ok(Self::from_channel(channel, uri).with_request_timeout(config.request_timeout()))
    }

    /// Wrap an already established channel.
    pub fn from_channel(channel: Channel, endpoint: impl Into<String>) -> Self {
        Self {
            client: BchrpcClient::new(channel),
            endpoint: endpoint.into(),
        }
    }

    /// Bound unary calls by `timeout`. Subscriptions are not affected.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_request_timeout(timeout);
        self
    }

    fn client(&self) -> BchrpcClient {
        self.client.clone()
    }
}

#[async_trait]
impl NodeTransport for GrpcTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_blockchain_info(
        &self,
        request: wire::GetBlockchainInfoRequest,
    ) -> Result<wire::GetBlockchainInfoResponse, ClientError> {
        reply(self.client().get_blockchain_info(request).await)
    }

    async fn get_block_info(
        &self,
        request: wire::GetBlockInfoRequest,
    ) -> Result<wire::GetBlockInfoResponse, ClientError> {
        reply(self.client().get_block_info(request).await)
    }

    async fn get_block(
        &self,
        request: wire::GetBlockRequest,
    ) -> Result<wire::GetBlockResponse, ClientError> {
        reply(self.client().get_block(request).await)
    }

    async fn get_raw_block(
        &self,
        request: wire::GetRawBlockRequest,
    ) -> Result<wire::GetRawBlockResponse, ClientError> {
        reply(self.client().get_raw_block(request).await)
    }

    async fn get_block_filter(
        &self,
        request: wire::GetBlockFilterRequest,
    ) -> Result<wire::GetBlockFilterResponse, ClientError> {
        reply(self.client().get_block_filter(request).await)
    }

    async fn get_headers(
        &self,
        request: wire::GetHeadersRequest,
    ) -> Result<wire::GetHeadersResponse, ClientError> {
        reply(self.client().get_headers(request).await)
    }

    async fn get_merkle_proof(
        &self,
        request: wire::GetMerkleProofRequest,
    ) -> Result<wire::GetMerkleProofResponse, ClientError> {
        reply(self.client().get_merkle_proof(request).await)
    }

    async fn get_mempool_info(
        &self,
        request: wire::GetMempoolInfoRequest,
    ) -> Result<wire::GetMempoolInfoResponse, ClientError> {
        reply(self.client().get_mempool_info(request).await)
    }

    async fn get_mempool(
        &self,
        request: wire::GetMempoolRequest,
    ) -> Result<wire::GetMempoolResponse, ClientError> {
        reply(self.client().get_mempool(request).await)
    }

    async fn get_transaction(
        &self,
        request: wire::GetTransactionRequest,
    ) -> Result<wire::GetTransactionResponse, ClientError> {
        reply(self.client().get_transaction(request).await)
    }

    async fn get_raw_transaction(
        &self,
        request: wire::GetRawTransactionRequest,
    ) -> Result<wire::GetRawTransactionResponse, ClientError> {
        reply(self.client().get_raw_transaction(request).await)
    }

    async fn get_address_transactions(
        &self,
        request: wire::GetAddressTransactionsRequest,
    ) -> Result<wire::GetAddressTransactionsResponse, ClientError> {
        reply(self.client().get_address_transactions(request).await)
    }

    async fn get_raw_address_transactions(
        &self,
        request: wire::GetRawAddressTransactionsRequest,
    ) -> Result<wire::GetRawAddressTransactionsResponse, ClientError> {
        reply(self.client().get_raw_address_transactions(request).await)
    }

    async fn get_unspent_output(
        &self,
        request: wire::GetUnspentOutputRequest,
    ) -> Result<wire::GetUnspentOutputResponse, ClientError> {
        reply(self.client().get_unspent_output(request).await)
    }

    async fn get_address_unspent_outputs(
        &self,
        request: wire::GetAddressUnspentOutputsRequest,
    ) -> Result<wire::GetAddressUnspentOutputsResponse, ClientError> {
        reply(self.client().get_address_unspent_outputs(request).await)
    }

    async fn submit_transaction(
        &self,
        request: wire::SubmitTransactionRequest,
    ) -> Result<wire::SubmitTransactionResponse, ClientError> {
        reply(self.client().submit_transaction(request).await)
    }

    async fn subscribe_blocks(
        &self,
        request: wire::SubscribeBlocksRequest,
    ) -> Result<PushStream<wire::BlockNotification>, ClientError> {
        let mut client = self.client();
        debug!(endpoint = %self.endpoint, "Requesting block stream");
        Ok(push_stream(async move { client.subscribe_blocks(request).await }))
    }

    async fn subscribe_transactions(
        &self,
        request: wire::SubscribeTransactionsRequest,
    ) -> Result<PushStream<wire::TransactionNotification>, ClientError> {
        let mut client = self.client();
        debug!(endpoint = %self.endpoint, "Requesting transaction stream");
        Ok(push_stream(async move {
            client.subscribe_transactions(request).await
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{Connection, Subscription, SubscriptionState};
    use crate::domain::{codes, BlockEvent};
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    /// Accepts connections and never writes a byte, like a node that has
    /// nothing to push yet.
    async fn silent_node() -> (ClientConfig, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let task = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        let config = ClientConfig {
            port,
            request_timeout_secs: 1,
            ..ClientConfig::for_testing()
        };
        (config, task)
    }

    fn lazy_transport(config: &ClientConfig) -> GrpcTransport {
        let channel = GrpcTransport::endpoint(config).unwrap().connect_lazy();
        GrpcTransport::from_channel(channel, config.endpoint_uri())
            .with_request_timeout(config.request_timeout())
    }

    #[test]
    fn test_status_maps_to_remote_error() {
        let err = status_to_error(Status::not_found("block not found"));
        assert_eq!(err, ClientError::remote(codes::NOT_FOUND, "block not found"));
    }

    #[test]
    fn test_stream_error_names_code() {
        let err = stream_error(Status::unavailable("connection reset"));
        assert_eq!(
            err,
            ClientError::StreamFailed("UNAVAILABLE: connection reset".to_string())
        );
    }

    #[test]
    fn test_plaintext_endpoint_builds() {
        let endpoint = GrpcTransport::endpoint(&ClientConfig::for_testing()).unwrap();
        assert_eq!(endpoint.uri().host(), Some("127.0.0.1"));
        assert_eq!(endpoint.uri().port_u16(), Some(18335));
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let config = ClientConfig {
            host: "bad host".to_string(),
            ..ClientConfig::for_testing()
        };
        assert!(matches!(
            GrpcTransport::endpoint(&config),
            Err(ClientError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_node_fails_to_connect() {
        // Port 1 on loopback is reserved and refuses connections.
        let config = ClientConfig {
            port: 1,
            ..ClientConfig::for_testing()
        };
        let result = GrpcTransport::connect(&config).await;
        assert!(matches!(result, Err(ClientError::ConnectionFailed { .. })));
    }

    #[tokio::test]
    async fn test_unary_request_carries_deadline() {
        let (config, node) = silent_node().await;
        let transport = lazy_transport(&config);

        let request = transport
            .client
            .unary_request(wire::GetBlockchainInfoRequest {});
        assert!(request.metadata().get("grpc-timeout").is_some());

        let plain = GrpcTransport::from_channel(
            GrpcTransport::endpoint(&config).unwrap().connect_lazy(),
            config.endpoint_uri(),
        );
        let request = plain.client.unary_request(wire::GetBlockchainInfoRequest {});
        assert!(request.metadata().get("grpc-timeout").is_none());
        node.abort();
    }

    #[tokio::test]
    async fn test_unanswered_unary_call_hits_deadline() {
        let (config, node) = silent_node().await;
        let transport = lazy_transport(&config);

        let result = timeout(
            Duration::from_secs(5),
            transport.get_blockchain_info(wire::GetBlockchainInfoRequest {}),
        )
        .await
        .expect("unary deadline was not enforced");

        assert!(matches!(
            result,
            Err(ClientError::Remote { code: codes::DEADLINE_EXCEEDED, .. })
        ));
        node.abort();
    }

    #[tokio::test]
    async fn test_subscribe_does_not_wait_for_headers() {
        let (config, node) = silent_node().await;
        let transport = lazy_transport(&config);

        let mut stream = timeout(
            Duration::from_millis(500),
            transport.subscribe_blocks(wire::SubscribeBlocksRequest::default()),
        )
        .await
        .expect("subscribe waited for response headers")
        .unwrap();

        // Quiet for longer than the unary deadline: no item, no error.
        assert!(timeout(Duration::from_millis(1_500), stream.next())
            .await
            .is_err());
        node.abort();
    }

    #[tokio::test]
    async fn test_subscription_opens_against_quiet_node() {
        let (config, node) = silent_node().await;
        let connection = Connection::with_transport(Arc::new(lazy_transport(&config)), &config);
        let subscription = Subscription::<BlockEvent>::new(connection.clone());

        timeout(Duration::from_millis(500), subscription.open())
            .await
            .expect("open waited for the first push")
            .unwrap();
        assert_eq!(subscription.state(), SubscriptionState::Open);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(subscription.state(), SubscriptionState::Open);

        assert!(subscription.cancel());
        connection.close().await.unwrap();
        node.abort();
    }
}
