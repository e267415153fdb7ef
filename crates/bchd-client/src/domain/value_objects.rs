//! # Value Objects
//!
//! Identifiers and selectors shared by queries and entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque byte-string identifier (block hash, transaction hash).
///
/// Bytes are kept exactly as the node sent them; no length check is done
/// locally and malformed identifiers are rejected by the node.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash(Vec<u8>);

impl Hash {
    /// Wrap raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes as received.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// True for the empty hash (e.g. `next_block_hash` at the tip).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hex of the bytes in reversed order, the form block explorers show.
    pub fn to_display_hex(&self) -> String {
        let reversed: Vec<u8> = self.0.iter().rev().copied().collect();
        hex::encode(reversed)
    }
}

impl From<Vec<u8>> for Hash {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Hash {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Hash {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(&self.0))
    }
}

/// Reference to one output of a prior transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outpoint {
    /// Hash of the transaction holding the output
    pub hash: Hash,
    /// Output index within that transaction
    pub index: u32,
}

impl Outpoint {
    /// Create an outpoint.
    pub fn new(hash: impl Into<Hash>, index: u32) -> Self {
        Self {
            hash: hash.into(),
            index,
        }
    }
}

impl fmt::Display for Outpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}

/// Selects a block by hash or by height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockSelector {
    /// Block hash
    Hash(Hash),
    /// Block height
    Height(i32),
}

impl From<Hash> for BlockSelector {
    fn from(hash: Hash) -> Self {
        Self::Hash(hash)
    }
}

impl From<i32> for BlockSelector {
    fn from(height: i32) -> Self {
        Self::Height(height)
    }
}

impl fmt::Display for BlockSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash(hash) => write!(f, "hash {}", hash),
            Self::Height(height) => write!(f, "height {}", height),
        }
    }
}

/// Selects the transactions of a block or of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionSelector {
    /// Transactions of the block with this hash
    BlockHash(Hash),
    /// Transactions of the block at this height
    BlockHeight(i32),
    /// Transactions paying to or spending from this address
    Address(String),
}

impl fmt::Display for TransactionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockHash(hash) => write!(f, "block hash {}", hash),
            Self::BlockHeight(height) => write!(f, "block height {}", height),
            Self::Address(address) => write!(f, "address {}", address),
        }
    }
}

/// Network the node runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    /// Main network
    Mainnet,
    /// Regression test network
    Regtest,
    /// Public test network
    Testnet3,
    /// Simulation network
    Simnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mainnet => "mainnet",
            Self::Regtest => "regtest",
            Self::Testnet3 => "testnet3",
            Self::Simnet => "simnet",
        };
        f.write_str(name)
    }
}

/// Whether a block notification attaches or detaches a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockEventKind {
    /// Block joined the main chain
    Connected,
    /// Block left the main chain (reorganization)
    Disconnected,
}
