//! # Domain Errors
//!
//! Error types for the BCHD client.
//!
//! Every failure surfaces as a [`ClientError`]. The enum is `Clone` and
//! `PartialEq` so a terminal stream status can be stored in a subscription's
//! close reason and compared in tests.

use thiserror::Error;

/// gRPC status codes carried by [`ClientError::Remote`].
pub mod codes {
    /// Not an error; returned on success.
    pub const OK: i32 = 0;
    /// The operation was cancelled, typically by the caller.
    pub const CANCELLED: i32 = 1;
    /// Unknown error.
    pub const UNKNOWN: i32 = 2;
    /// The client specified an invalid argument.
    pub const INVALID_ARGUMENT: i32 = 3;
    /// The deadline expired before the operation could complete.
    pub const DEADLINE_EXCEEDED: i32 = 4;
    /// A requested entity was not found.
    pub const NOT_FOUND: i32 = 5;
    /// The entity the client tried to create already exists.
    pub const ALREADY_EXISTS: i32 = 6;
    /// The caller lacks permission for the operation.
    pub const PERMISSION_DENIED: i32 = 7;
    /// A resource, such as a per-user quota, has been exhausted.
    pub const RESOURCE_EXHAUSTED: i32 = 8;
    /// The system is not in a state required for the operation.
    pub const FAILED_PRECONDITION: i32 = 9;
    /// The operation was aborted.
    pub const ABORTED: i32 = 10;
    /// The operation was attempted past the valid range.
    pub const OUT_OF_RANGE: i32 = 11;
    /// The operation is not implemented or not enabled on the node.
    pub const UNIMPLEMENTED: i32 = 12;
    /// Internal error on the node.
    pub const INTERNAL: i32 = 13;
    /// The service is currently unavailable.
    pub const UNAVAILABLE: i32 = 14;
    /// Unrecoverable data loss or corruption.
    pub const DATA_LOSS: i32 = 15;
    /// The request lacks valid authentication credentials.
    pub const UNAUTHENTICATED: i32 = 16;

    /// Canonical name of a status code, as used in logs.
    pub fn name(code: i32) -> &'static str {
        match code {
            OK => "OK",
            CANCELLED => "CANCELLED",
            UNKNOWN => "UNKNOWN",
            INVALID_ARGUMENT => "INVALID_ARGUMENT",
            DEADLINE_EXCEEDED => "DEADLINE_EXCEEDED",
            NOT_FOUND => "NOT_FOUND",
            ALREADY_EXISTS => "ALREADY_EXISTS",
            PERMISSION_DENIED => "PERMISSION_DENIED",
            RESOURCE_EXHAUSTED => "RESOURCE_EXHAUSTED",
            FAILED_PRECONDITION => "FAILED_PRECONDITION",
            ABORTED => "ABORTED",
            OUT_OF_RANGE => "OUT_OF_RANGE",
            UNIMPLEMENTED => "UNIMPLEMENTED",
            INTERNAL => "INTERNAL",
            UNAVAILABLE => "UNAVAILABLE",
            DATA_LOSS => "DATA_LOSS",
            UNAUTHENTICATED => "UNAUTHENTICATED",
            _ => "UNRECOGNIZED",
        }
    }
}

fn code_name(code: &i32) -> &'static str {
    codes::name(*code)
}

/// BCHD client error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The channel to the node could not be established.
    #[error("Failed to connect to {endpoint}: {reason}")]
    ConnectionFailed {
        /// Endpoint URI that was dialed
        endpoint: String,
        /// Transport error text
        reason: String,
    },

    /// Host/port did not form a valid endpoint URI.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The node rejected a call.
    #[error("Remote error {} ({code}): {message}", code_name(.code))]
    Remote {
        /// gRPC status code, see [`codes`]
        code: i32,
        /// Status message from the node
        message: String,
    },

    /// A push stream terminated with a transport error.
    #[error("Push stream failed: {0}")]
    StreamFailed(String),

    /// Close did not drain in-flight work within the grace period.
    #[error("Shutdown failed: {0}")]
    ShutdownFailed(String),

    /// The connection handle was closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// A reply lacked a nested message the mapper requires.
    #[error("Malformed reply: missing {field}")]
    MalformedReply {
        /// Wire field that was absent
        field: &'static str,
    },

    /// A reply carried an enum value the client does not know.
    #[error("Malformed reply: unexpected value {value} for {field}")]
    UnexpectedValue {
        /// Wire field holding the value
        field: &'static str,
        /// Raw value received
        value: i32,
    },

    /// Client configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation not allowed in the subscription's current state.
    #[error("Invalid subscription state: {0}")]
    SubscriptionState(String),
}

impl ClientError {
    /// Build a [`ClientError::Remote`] from a status code and message.
    pub fn remote(code: i32, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
        }
    }

    /// Build a [`ClientError::MalformedReply`] for a missing field.
    pub fn missing(field: &'static str) -> Self {
        Self::MalformedReply { field }
    }

    /// Build a [`ClientError::UnexpectedValue`] for an out-of-range enum.
    pub fn unexpected(field: &'static str, value: i32) -> Self {
        Self::UnexpectedValue { field, value }
    }

    /// Metric label for the outcome of a call that failed with this error.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote_error",
            Self::ConnectionClosed => "closed",
            Self::MalformedReply { .. } | Self::UnexpectedValue { .. } => "malformed",
            Self::StreamFailed(_) => "stream_failed",
            _ => "failed",
        }
    }
}
