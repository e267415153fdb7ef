//! # Adapters Module
//!
//! Outbound port implementations.

pub mod grpc;

pub use grpc::GrpcTransport;
