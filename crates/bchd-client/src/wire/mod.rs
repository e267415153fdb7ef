//! # Wire Stub
//!
//! Protobuf messages and the tonic client for the subset of `pb.bchrpc`
//! this crate speaks. Nothing outside the gRPC adapter, the request builders
//! and the mapper should touch these types.

#![allow(missing_docs)]

mod client;
mod messages;
pub mod samples;

pub use client::BchrpcClient;
pub use messages::*;
