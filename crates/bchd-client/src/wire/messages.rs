//! Protobuf messages of the `pb.bchrpc` service.
//!
//! Field tags follow `bchrpc.proto`. Only the messages and fields used by the
//! client are declared; unknown fields on the wire are skipped by prost.

// =============================================================================
// SHARED SELECTORS
// =============================================================================

/// `oneof hash_or_height` shared by the block-addressed requests.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum HashOrHeight {
    #[prost(bytes, tag = "1")]
    Hash(::prost::alloc::vec::Vec<u8>),
    #[prost(int32, tag = "2")]
    Height(i32),
}

/// `oneof start_block` of the address transaction requests.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum StartBlock {
    #[prost(bytes, tag = "4")]
    Hash(::prost::alloc::vec::Vec<u8>),
    #[prost(int32, tag = "5")]
    Height(i32),
}

// =============================================================================
// CORE CHAIN MESSAGES
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockInfo {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(int32, tag = "2")]
    pub height: i32,
    #[prost(int32, tag = "3")]
    pub version: i32,
    #[prost(bytes = "vec", tag = "4")]
    pub previous_block: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    pub merkle_root: ::prost::alloc::vec::Vec<u8>,
    #[prost(int64, tag = "6")]
    pub timestamp: i64,
    #[prost(uint32, tag = "7")]
    pub bits: u32,
    #[prost(uint32, tag = "8")]
    pub nonce: u32,
    #[prost(int32, tag = "9")]
    pub confirmations: i32,
    #[prost(double, tag = "10")]
    pub difficulty: f64,
    #[prost(bytes = "vec", tag = "11")]
    pub next_block_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(int32, tag = "12")]
    pub size: i32,
    #[prost(int64, tag = "13")]
    pub median_time: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Block {
    #[prost(message, optional, tag = "1")]
    pub info: ::core::option::Option<BlockInfo>,
    #[prost(message, repeated, tag = "2")]
    pub transaction_data: ::prost::alloc::vec::Vec<block::TransactionData>,
}

pub mod block {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TransactionData {
        #[prost(oneof = "transaction_data::TxidsOrTxs", tags = "1, 2")]
        pub txids_or_txs: ::core::option::Option<transaction_data::TxidsOrTxs>,
    }

    pub mod transaction_data {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum TxidsOrTxs {
            #[prost(bytes, tag = "1")]
            TransactionHash(::prost::alloc::vec::Vec<u8>),
            #[prost(message, tag = "2")]
            Transaction(super::super::Transaction),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(int32, tag = "2")]
    pub version: i32,
    #[prost(message, repeated, tag = "3")]
    pub inputs: ::prost::alloc::vec::Vec<transaction::Input>,
    #[prost(message, repeated, tag = "4")]
    pub outputs: ::prost::alloc::vec::Vec<transaction::Output>,
    #[prost(uint32, tag = "5")]
    pub lock_time: u32,
    #[prost(int32, tag = "8")]
    pub size: i32,
    #[prost(int64, tag = "9")]
    pub timestamp: i64,
    #[prost(int32, tag = "10")]
    pub confirmations: i32,
    #[prost(int32, tag = "11")]
    pub block_height: i32,
    #[prost(bytes = "vec", tag = "12")]
    pub block_hash: ::prost::alloc::vec::Vec<u8>,
}

pub mod transaction {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Input {
        #[prost(uint32, tag = "1")]
        pub index: u32,
        #[prost(message, optional, tag = "2")]
        pub outpoint: ::core::option::Option<input::Outpoint>,
        #[prost(bytes = "vec", tag = "3")]
        pub signature_script: ::prost::alloc::vec::Vec<u8>,
        #[prost(uint32, tag = "4")]
        pub sequence: u32,
        #[prost(int64, tag = "5")]
        pub value: i64,
        #[prost(bytes = "vec", tag = "6")]
        pub previous_script: ::prost::alloc::vec::Vec<u8>,
        #[prost(string, tag = "7")]
        pub address: ::prost::alloc::string::String,
    }

    pub mod input {
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Outpoint {
            #[prost(bytes = "vec", tag = "1")]
            pub hash: ::prost::alloc::vec::Vec<u8>,
            #[prost(uint32, tag = "2")]
            pub index: u32,
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Output {
        #[prost(uint32, tag = "1")]
        pub index: u32,
        #[prost(int64, tag = "2")]
        pub value: i64,
        #[prost(bytes = "vec", tag = "3")]
        pub pubkey_script: ::prost::alloc::vec::Vec<u8>,
        #[prost(string, tag = "4")]
        pub address: ::prost::alloc::string::String,
        #[prost(string, tag = "5")]
        pub script_class: ::prost::alloc::string::String,
        #[prost(string, tag = "6")]
        pub disassembled_script: ::prost::alloc::string::String,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MempoolTransaction {
    #[prost(message, optional, tag = "1")]
    pub transaction: ::core::option::Option<Transaction>,
    #[prost(int64, tag = "2")]
    pub added_time: i64,
    #[prost(int32, tag = "3")]
    pub added_height: i32,
    #[prost(int64, tag = "4")]
    pub fee: i64,
    #[prost(int64, tag = "5")]
    pub fee_per_kb: i64,
    #[prost(double, tag = "6")]
    pub starting_priority: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnspentOutput {
    #[prost(message, optional, tag = "1")]
    pub outpoint: ::core::option::Option<transaction::input::Outpoint>,
    #[prost(bytes = "vec", tag = "2")]
    pub pubkey_script: ::prost::alloc::vec::Vec<u8>,
    #[prost(int64, tag = "3")]
    pub value: i64,
    #[prost(bool, tag = "4")]
    pub is_coinbase: bool,
    #[prost(int32, tag = "5")]
    pub block_height: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionFilter {
    #[prost(string, repeated, tag = "1")]
    pub addresses: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "2")]
    pub outpoints: ::prost::alloc::vec::Vec<transaction::input::Outpoint>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub data_elements: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
    #[prost(bool, tag = "4")]
    pub all_transactions: bool,
}

// =============================================================================
// MEMPOOL
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMempoolInfoRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMempoolInfoResponse {
    #[prost(uint32, tag = "1")]
    pub size: u32,
    #[prost(uint32, tag = "2")]
    pub bytes: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMempoolRequest {
    #[prost(bool, tag = "1")]
    pub full_transactions: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMempoolResponse {
    #[prost(message, repeated, tag = "1")]
    pub transaction_data: ::prost::alloc::vec::Vec<get_mempool_response::TransactionData>,
}

pub mod get_mempool_response {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TransactionData {
        #[prost(oneof = "transaction_data::TxidsOrTxs", tags = "1, 2")]
        pub txids_or_txs: ::core::option::Option<transaction_data::TxidsOrTxs>,
    }

    pub mod transaction_data {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum TxidsOrTxs {
            #[prost(bytes, tag = "1")]
            TransactionHash(::prost::alloc::vec::Vec<u8>),
            #[prost(message, tag = "2")]
            Transaction(super::super::MempoolTransaction),
        }
    }
}

// =============================================================================
// BLOCKCHAIN / BLOCKS
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockchainInfoRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockchainInfoResponse {
    #[prost(enumeration = "get_blockchain_info_response::BitcoinNet", tag = "1")]
    pub bitcoin_net: i32,
    #[prost(int32, tag = "2")]
    pub best_height: i32,
    #[prost(bytes = "vec", tag = "3")]
    pub best_block_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(double, tag = "4")]
    pub difficulty: f64,
    #[prost(int64, tag = "5")]
    pub median_time: i64,
    #[prost(bool, tag = "6")]
    pub tx_index: bool,
    #[prost(bool, tag = "7")]
    pub addr_index: bool,
}

pub mod get_blockchain_info_response {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum BitcoinNet {
        Mainnet = 0,
        Regtest = 1,
        Testnet3 = 2,
        Simnet = 3,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockInfoRequest {
    #[prost(oneof = "HashOrHeight", tags = "1, 2")]
    pub hash_or_height: ::core::option::Option<HashOrHeight>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockInfoResponse {
    #[prost(message, optional, tag = "1")]
    pub info: ::core::option::Option<BlockInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockRequest {
    #[prost(oneof = "HashOrHeight", tags = "1, 2")]
    pub hash_or_height: ::core::option::Option<HashOrHeight>,
    #[prost(bool, tag = "3")]
    pub full_transactions: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockResponse {
    #[prost(message, optional, tag = "1")]
    pub block: ::core::option::Option<Block>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetRawBlockRequest {
    #[prost(oneof = "HashOrHeight", tags = "1, 2")]
    pub hash_or_height: ::core::option::Option<HashOrHeight>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetRawBlockResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub block: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockFilterRequest {
    #[prost(oneof = "HashOrHeight", tags = "1, 2")]
    pub hash_or_height: ::core::option::Option<HashOrHeight>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlockFilterResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub filter: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetHeadersRequest {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub block_locator_hashes: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", tag = "2")]
    pub stop_hash: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetHeadersResponse {
    #[prost(message, repeated, tag = "1")]
    pub headers: ::prost::alloc::vec::Vec<BlockInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMerkleProofRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub transaction_hash: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMerkleProofResponse {
    #[prost(message, optional, tag = "1")]
    pub block: ::core::option::Option<BlockInfo>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub hashes: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", tag = "3")]
    pub flags: ::prost::alloc::vec::Vec<u8>,
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetTransactionRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetTransactionResponse {
    #[prost(message, optional, tag = "1")]
    pub transaction: ::core::option::Option<Transaction>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetRawTransactionRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetRawTransactionResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub transaction: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAddressTransactionsRequest {
    #[prost(string, tag = "1")]
    pub address: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub nb_skip: u32,
    #[prost(uint32, tag = "3")]
    pub nb_fetch: u32,
    #[prost(oneof = "StartBlock", tags = "4, 5")]
    pub start_block: ::core::option::Option<StartBlock>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAddressTransactionsResponse {
    #[prost(message, repeated, tag = "1")]
    pub confirmed_transactions: ::prost::alloc::vec::Vec<Transaction>,
    #[prost(message, repeated, tag = "2")]
    pub unconfirmed_transactions: ::prost::alloc::vec::Vec<MempoolTransaction>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetRawAddressTransactionsRequest {
    #[prost(string, tag = "1")]
    pub address: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub nb_skip: u32,
    #[prost(uint32, tag = "3")]
    pub nb_fetch: u32,
    #[prost(oneof = "StartBlock", tags = "4, 5")]
    pub start_block: ::core::option::Option<StartBlock>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetRawAddressTransactionsResponse {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub confirmed_transactions: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub unconfirmed_transactions: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAddressUnspentOutputsRequest {
    #[prost(string, tag = "1")]
    pub address: ::prost::alloc::string::String,
    #[prost(bool, tag = "2")]
    pub include_mempool: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAddressUnspentOutputsResponse {
    #[prost(message, repeated, tag = "1")]
    pub outputs: ::prost::alloc::vec::Vec<UnspentOutput>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUnspentOutputRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub index: u32,
    #[prost(bool, tag = "3")]
    pub include_mempool: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetUnspentOutputResponse {
    #[prost(message, optional, tag = "1")]
    pub outpoint: ::core::option::Option<transaction::input::Outpoint>,
    #[prost(bytes = "vec", tag = "2")]
    pub pubkey_script: ::prost::alloc::vec::Vec<u8>,
    #[prost(int64, tag = "3")]
    pub value: i64,
    #[prost(bool, tag = "4")]
    pub is_coinbase: bool,
    #[prost(int32, tag = "5")]
    pub block_height: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubmitTransactionRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub transaction: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubmitTransactionResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubscribeTransactionsRequest {
    #[prost(message, optional, tag = "1")]
    pub subscribe: ::core::option::Option<TransactionFilter>,
    #[prost(message, optional, tag = "2")]
    pub unsubscribe: ::core::option::Option<TransactionFilter>,
    #[prost(bool, tag = "3")]
    pub include_mempool: bool,
    #[prost(bool, tag = "4")]
    pub include_in_block: bool,
    #[prost(bool, tag = "5")]
    pub serialize_tx: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubscribeBlocksRequest {
    #[prost(bool, tag = "1")]
    pub full_block: bool,
    #[prost(bool, tag = "2")]
    pub full_transactions: bool,
    #[prost(bool, tag = "3")]
    pub serialize_block: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockNotification {
    #[prost(enumeration = "block_notification::Type", tag = "1")]
    pub r#type: i32,
    #[prost(oneof = "block_notification::Block", tags = "2, 3, 4")]
    pub block: ::core::option::Option<block_notification::Block>,
}

pub mod block_notification {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Connected = 0,
        Disconnected = 1,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Block {
        #[prost(message, tag = "2")]
        BlockInfo(super::BlockInfo),
        #[prost(message, tag = "3")]
        MarshaledBlock(super::Block),
        #[prost(bytes, tag = "4")]
        SerializedBlock(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionNotification {
    #[prost(enumeration = "transaction_notification::Type", tag = "1")]
    pub r#type: i32,
    #[prost(oneof = "transaction_notification::Transaction", tags = "2, 3, 4")]
    pub transaction: ::core::option::Option<transaction_notification::Transaction>,
}

pub mod transaction_notification {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Unconfirmed = 0,
        Confirmed = 1,
    }

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Transaction {
        #[prost(message, tag = "2")]
        ConfirmedTransaction(super::Transaction),
        #[prost(message, tag = "3")]
        UnconfirmedTransaction(super::MempoolTransaction),
        #[prost(bytes, tag = "4")]
        SerializedTransaction(::prost::alloc::vec::Vec<u8>),
    }
}
