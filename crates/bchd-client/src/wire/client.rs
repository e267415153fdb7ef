//! Client stub for the `pb.bchrpc` service.
//!
//! Mirrors what `tonic-build` emits for a client: a `Grpc<Channel>` wrapper
//! with one method per RPC. Methods take `&mut self`; callers clone the stub
//! per call, which is cheap and shares the underlying channel.
//!
//! The request deadline covers unary calls only. Server streams stay open
//! until the node ends them or the caller drops them.

use std::time::Duration;

use tonic::codec::{ProstCodec, Streaming};
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Response, Status};

use super::messages::*;

/// Generated-style client for the bchrpc service.
#[derive(Debug, Clone)]
pub struct BchrpcClient {
    inner: tonic::client::Grpc<Channel>,
    request_timeout: Option<Duration>,
}

macro_rules! unary_rpcs {
    ($($name:ident($req:ty) -> $resp:ty => $path:literal;)*) => {
        $(
            #[allow(missing_docs)]
            pub async fn $name(&mut self, request: $req) -> Result<Response<$resp>, Status> {
                self.unary(request, $path).await
            }
        )*
    };
}

impl BchrpcClient {
    /// Wrap an established channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
            request_timeout: None,
        }
    }

    /// Bound every unary call by `timeout`.
    ///
    /// The deadline is sent to the node as `grpc-timeout` and also enforced
    /// locally, so a node that never answers still releases the caller.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub(crate) fn unary_request<Req>(&self, message: Req) -> Request<Req> {
        let mut request = Request::new(message);
        if let Some(timeout) = self.request_timeout {
            request.set_timeout(timeout);
        }
        request
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {}", e)))
    }

    async fn unary<Req, Resp>(
        &mut self,
        request: Req,
        path: &'static str,
    ) -> Result<Response<Resp>, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let request = self.unary_request(request);
        let deadline = self.request_timeout;
        let call = async {
            self.ready().await?;
            let codec = ProstCodec::<Req, Resp>::default();
            self.inner
                .unary(request, PathAndQuery::from_static(path), codec)
                .await
        };

        match deadline {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .unwrap_or_else(|_| Err(Status::deadline_exceeded("Timeout expired"))),
            None => call.await,
        }
    }

    async fn server_streaming<Req, Resp>(
        &mut self,
        request: Req,
        path: &'static str,
    ) -> Result<Response<Streaming<Resp>>, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.ready().await?;
        let codec = ProstCodec::<Req, Resp>::default();
        self.inner
            .server_streaming(Request::new(request), PathAndQuery::from_static(path), codec)
            .await
    }

    unary_rpcs! {
        get_mempool_info(GetMempoolInfoRequest) -> GetMempoolInfoResponse
            => "/pb.bchrpc/GetMempoolInfo";
        get_mempool(GetMempoolRequest) -> GetMempoolResponse
            => "/pb.bchrpc/GetMempool";
        get_blockchain_info(GetBlockchainInfoRequest) -> GetBlockchainInfoResponse
            => "/pb.bchrpc/GetBlockchainInfo";
        get_block_info(GetBlockInfoRequest) -> GetBlockInfoResponse
            => "/pb.bchrpc/GetBlockInfo";
        get_block(GetBlockRequest) -> GetBlockResponse
            => "/pb.bchrpc/GetBlock";
        get_raw_block(GetRawBlockRequest) -> GetRawBlockResponse
            => "/pb.bchrpc/GetRawBlock";
        get_block_filter(GetBlockFilterRequest) -> GetBlockFilterResponse
            => "/pb.bchrpc/GetBlockFilter";
        get_headers(GetHeadersRequest) -> GetHeadersResponse
            => "/pb.bchrpc/GetHeaders";
        get_transaction(GetTransactionRequest) -> GetTransactionResponse
            => "/pb.bchrpc/GetTransaction";
        get_raw_transaction(GetRawTransactionRequest) -> GetRawTransactionResponse
            => "/pb.bchrpc/GetRawTransaction";
        get_address_transactions(GetAddressTransactionsRequest) -> GetAddressTransactionsResponse
            => "/pb.bchrpc/GetAddressTransactions";
        get_raw_address_transactions(GetRawAddressTransactionsRequest) -> GetRawAddressTransactionsResponse
            => "/pb.bchrpc/GetRawAddressTransactions";
        get_address_unspent_outputs(GetAddressUnspentOutputsRequest) -> GetAddressUnspentOutputsResponse
            => "/pb.bchrpc/GetAddressUnspentOutputs";
        get_unspent_output(GetUnspentOutputRequest) -> GetUnspentOutputResponse
            => "/pb.bchrpc/GetUnspentOutput";
        get_merkle_proof(GetMerkleProofRequest) -> GetMerkleProofResponse
            => "/pb.bchrpc/GetMerkleProof";
        submit_transaction(SubmitTransactionRequest) -> SubmitTransactionResponse
            => "/pb.bchrpc/SubmitTransaction";
    }

    /// Open the block notification stream.
    pub async fn subscribe_blocks(
        &mut self,
        request: SubscribeBlocksRequest,
    ) -> Result<Response<Streaming<BlockNotification>>, Status> {
        self.server_streaming(request, "/pb.bchrpc/SubscribeBlocks")
            .await
    }

    /// Open the transaction notification stream.
    pub async fn subscribe_transactions(
        &mut self,
        request: SubscribeTransactionsRequest,
    ) -> Result<Response<Streaming<TransactionNotification>>, Status> {
        self.server_streaming(request, "/pb.bchrpc/SubscribeTransactions")
            .await
    }
}
