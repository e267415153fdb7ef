//! Request builders.
//!
//! Translate the facade's typed selectors into wire requests. Exactly one
//! selector field is populated per request.

use crate::domain::{BlockSelector, Hash, Outpoint, TransactionSelector};
use crate::wire;

fn hash_or_height(selector: BlockSelector) -> wire::HashOrHeight {
    match selector {
        BlockSelector::Hash(hash) => wire::HashOrHeight::Hash(hash.into_bytes()),
        BlockSelector::Height(height) => wire::HashOrHeight::Height(height),
    }
}

/// Address and start block of a transaction selector.
fn address_and_start(selector: TransactionSelector) -> (String, Option<wire::StartBlock>) {
    match selector {
        TransactionSelector::BlockHash(hash) => {
            (String::new(), Some(wire::StartBlock::Hash(hash.into_bytes())))
        }
        TransactionSelector::BlockHeight(height) => {
            (String::new(), Some(wire::StartBlock::Height(height)))
        }
        TransactionSelector::Address(address) => (address, None),
    }
}

pub fn block_info(selector: BlockSelector) -> wire::GetBlockInfoRequest {
    wire::GetBlockInfoRequest {
        hash_or_height: Some(hash_or_height(selector)),
    }
}

/// Block request listing transaction hashes only.
pub fn block(selector: BlockSelector) -> wire::GetBlockRequest {
    wire::GetBlockRequest {
        hash_or_height: Some(hash_or_height(selector)),
        full_transactions: false,
    }
}

pub fn raw_block(selector: BlockSelector) -> wire::GetRawBlockRequest {
    wire::GetRawBlockRequest {
        hash_or_height: Some(hash_or_height(selector)),
    }
}

pub fn block_filter(selector: BlockSelector) -> wire::GetBlockFilterRequest {
    wire::GetBlockFilterRequest {
        hash_or_height: Some(hash_or_height(selector)),
    }
}

/// Headers request; an absent stop hash asks for as many as the node sends.
pub fn headers(locators: Vec<Hash>, stop: Option<Hash>) -> wire::GetHeadersRequest {
    wire::GetHeadersRequest {
        block_locator_hashes: locators.into_iter().map(Hash::into_bytes).collect(),
        stop_hash: stop.map(Hash::into_bytes).unwrap_or_default(),
    }
}

pub fn merkle_proof(transaction_hash: Hash) -> wire::GetMerkleProofRequest {
    wire::GetMerkleProofRequest {
        transaction_hash: transaction_hash.into_bytes(),
    }
}

pub fn mempool(full_transactions: bool) -> wire::GetMempoolRequest {
    wire::GetMempoolRequest { full_transactions }
}

pub fn transaction(hash: Hash) -> wire::GetTransactionRequest {
    wire::GetTransactionRequest {
        hash: hash.into_bytes(),
    }
}

pub fn raw_transaction(hash: Hash) -> wire::GetRawTransactionRequest {
    wire::GetRawTransactionRequest {
        hash: hash.into_bytes(),
    }
}

pub fn address_transactions(selector: TransactionSelector) -> wire::GetAddressTransactionsRequest {
    let (address, start_block) = address_and_start(selector);
    wire::GetAddressTransactionsRequest {
        address,
        nb_skip: 0,
        nb_fetch: 0,
        start_block,
    }
}

pub fn raw_address_transactions(
    selector: TransactionSelector,
) -> wire::GetRawAddressTransactionsRequest {
    let (address, start_block) = address_and_start(selector);
    wire::GetRawAddressTransactionsRequest {
        address,
        nb_skip: 0,
        nb_fetch: 0,
        start_block,
    }
}

pub fn unspent_output(outpoint: Outpoint, include_unconfirmed: bool) -> wire::GetUnspentOutputRequest {
    wire::GetUnspentOutputRequest {
        hash: outpoint.hash.into_bytes(),
        index: outpoint.index,
        include_mempool: include_unconfirmed,
    }
}

pub fn address_unspent_outputs(
    address: String,
    include_unconfirmed: bool,
) -> wire::GetAddressUnspentOutputsRequest {
    wire::GetAddressUnspentOutputsRequest {
        address,
        include_mempool: include_unconfirmed,
    }
}

pub fn submit_transaction(raw_transaction: Vec<u8>) -> wire::SubmitTransactionRequest {
    wire::SubmitTransactionRequest {
        transaction: raw_transaction,
    }
}

/// Block notifications carrying block info only.
pub fn subscribe_blocks() -> wire::SubscribeBlocksRequest {
    wire::SubscribeBlocksRequest {
        full_block: false,
        full_transactions: false,
        serialize_block: false,
    }
}

/// Every transaction entering the mempool.
pub fn subscribe_transactions() -> wire::SubscribeTransactionsRequest {
    wire::SubscribeTransactionsRequest {
        subscribe: Some(wire::TransactionFilter {
            all_transactions: true,
            ..Default::default()
        }),
        unsubscribe: None,
        include_mempool: true,
        include_in_block: false,
        serialize_tx: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_selector_sets_only_height() {
        let request = block(BlockSelector::Height(650_000));
        assert_eq!(request.hash_or_height, Some(wire::HashOrHeight::Height(650_000)));
        assert!(!request.full_transactions);
    }

    #[test]
    fn test_hash_selector_sets_only_hash() {
        let request = raw_block(BlockSelector::Hash(Hash::from(vec![7; 32])));
        assert_eq!(request.hash_or_height, Some(wire::HashOrHeight::Hash(vec![7; 32])));
    }

    #[test]
    fn test_address_selector_leaves_start_block_empty() {
        let request = address_transactions(TransactionSelector::Address("qq...".to_string()));
        assert_eq!(request.address, "qq...");
        assert!(request.start_block.is_none());
    }

    #[test]
    fn test_block_selectors_leave_address_empty() {
        let request = raw_address_transactions(TransactionSelector::BlockHeight(12));
        assert!(request.address.is_empty());
        assert_eq!(request.start_block, Some(wire::StartBlock::Height(12)));
    }

    #[test]
    fn test_headers_without_stop_hash() {
        let request = headers(vec![Hash::from(vec![1; 32])], None);
        assert_eq!(request.block_locator_hashes, vec![vec![1; 32]]);
        assert!(request.stop_hash.is_empty());
    }

    #[test]
    fn test_transaction_subscription_asks_for_everything() {
        let request = subscribe_transactions();
        assert!(request.include_mempool);
        assert!(request.subscribe.unwrap().all_transactions);
    }
}
