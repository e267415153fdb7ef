//! # BCHD Client
//!
//! Typed client for the `bchrpc` gRPC service of a bchd node.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Callers work with domain values only:
//! - Chain, block, transaction, mempool and unspent output queries
//! - Block and mempool transaction push subscriptions with cancellable handles
//! - One connection per client, closed explicitly, shared by concurrent calls
//!
//! ## Failure Surface
//!
//! | Failure | Error |
//! |---------|-------|
//! | Node unreachable at open | `ClientError::ConnectionFailed` |
//! | Node rejects a call | `ClientError::Remote` with the gRPC status code |
//! | Reply missing a required part | `ClientError::MalformedReply` |
//! | Reply with an unknown enum value | `ClientError::UnexpectedValue` |
//! | Call on or during close | `ClientError::ConnectionClosed` |
//! | Push stream breaks | `CloseReason::StreamFailed` on the subscription |
//!
//! ## Module Structure
//!
//! ```text
//! bchd-client/
//! ├── domain/          # Entities, selectors, errors, wire-to-domain mapper
//! ├── ports/           # BchdApi (inbound) + NodeTransport (outbound)
//! ├── adapters/        # GrpcTransport over a tonic channel
//! ├── application/     # Connection, BchdClient, Subscription
//! ├── wire/            # Protobuf messages and the bchrpc client
//! └── config.rs        # ClientConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod wire;

// Re-exports
pub use adapters::GrpcTransport;
pub use application::{
    BchdClient, CloseReason, Connection, ConsumerId, EventStream, PushEvent, Subscription,
    SubscriptionState,
};
pub use config::{ClientConfig, DEFAULT_PORT};
pub use domain::{
    codes, Block, BlockEvent, BlockEventKind, BlockHeader, BlockInformation, BlockSelector,
    Blockchain, ClientError, Hash, Input, MempoolInformation, MerkleProof, Network, Outpoint,
    Output, RawTransactionSet, SubmittedTransaction, Transaction, TransactionEvent,
    TransactionSelector, TransactionSet, UnconfirmedTransaction, UnspentOutput,
};
pub use ports::{BchdApi, MockNodeTransport, NodeRequest, NodeTransport, PushStream};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
