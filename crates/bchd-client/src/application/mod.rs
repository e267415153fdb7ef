//! # Application Module
//!
//! The connection handle, the query facade built on it, and the
//! subscription bridge for server pushes.

pub mod connection;
pub(crate) mod requests;
pub mod service;
pub mod subscription;

pub use connection::Connection;
pub use service::BchdClient;
pub use subscription::{
    CloseReason, ConsumerId, EventStream, PushEvent, Subscription, SubscriptionState,
};
