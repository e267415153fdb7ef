//! # Domain Mapper
//!
//! Pure conversions from wire replies and push messages into domain entities.
//!
//! Rules:
//! - bytes are copied verbatim, repeated fields keep wire order
//! - an absent repeated field maps to an empty vector
//! - an absent nested message the entity needs is a
//!   [`ClientError::MalformedReply`], never a default value
//! - an enum value outside the known set is a [`ClientError::UnexpectedValue`]

use super::entities::*;
use super::errors::ClientError;
use super::value_objects::{BlockEventKind, Hash, Network, Outpoint};
use crate::wire;

// =============================================================================
// BLOCKS
// =============================================================================

impl From<&wire::BlockInfo> for BlockHeader {
    fn from(info: &wire::BlockInfo) -> Self {
        Self {
            version: info.version,
            previous_block_hash: Hash::from(info.previous_block.clone()),
            merkle_root: Hash::from(info.merkle_root.clone()),
            timestamp: info.timestamp,
            target_bits: info.bits,
            nonce: info.nonce,
        }
    }
}

impl From<wire::BlockInfo> for BlockInformation {
    fn from(info: wire::BlockInfo) -> Self {
        let header = BlockHeader::from(&info);
        Self {
            hash: Hash::from(info.hash),
            height: info.height,
            header,
            confirmations: info.confirmations,
            difficulty: info.difficulty,
            next_block_hash: Hash::from(info.next_block_hash),
            size: info.size,
            median_time: info.median_time,
        }
    }
}

impl TryFrom<wire::GetBlockInfoResponse> for BlockInformation {
    type Error = ClientError;

    fn try_from(reply: wire::GetBlockInfoResponse) -> Result<Self, Self::Error> {
        reply
            .info
            .map(BlockInformation::from)
            .ok_or(ClientError::missing("info"))
    }
}

impl TryFrom<wire::Block> for Block {
    type Error = ClientError;

    fn try_from(block: wire::Block) -> Result<Self, Self::Error> {
        let info = block.info.ok_or(ClientError::missing("block.info"))?;

        let transaction_hashes = block
            .transaction_data
            .into_iter()
            .map(|data| {
                use wire::block::transaction_data::TxidsOrTxs;
                match data.txids_or_txs {
                    Some(TxidsOrTxs::TransactionHash(hash)) => Ok(Hash::from(hash)),
                    Some(TxidsOrTxs::Transaction(tx)) => Ok(Hash::from(tx.hash)),
                    None => Err(ClientError::missing("block.transaction_data")),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let header = BlockHeader::from(&info);
        Ok(Self {
            hash: Hash::from(info.hash),
            height: info.height,
            header,
            transaction_hashes,
            confirmations: info.confirmations,
            difficulty: info.difficulty,
            median_time: info.median_time,
            size: info.size,
            next_block_hash: Hash::from(info.next_block_hash),
        })
    }
}

impl TryFrom<wire::GetBlockResponse> for Block {
    type Error = ClientError;

    fn try_from(reply: wire::GetBlockResponse) -> Result<Self, Self::Error> {
        Block::try_from(reply.block.ok_or(ClientError::missing("block"))?)
    }
}

impl TryFrom<wire::GetBlockchainInfoResponse> for Blockchain {
    type Error = ClientError;

    fn try_from(reply: wire::GetBlockchainInfoResponse) -> Result<Self, Self::Error> {
        use wire::get_blockchain_info_response::BitcoinNet;

        let network = match BitcoinNet::try_from(reply.bitcoin_net) {
            Ok(BitcoinNet::Mainnet) => Network::Mainnet,
            Ok(BitcoinNet::Regtest) => Network::Regtest,
            Ok(BitcoinNet::Testnet3) => Network::Testnet3,
            Ok(BitcoinNet::Simnet) => Network::Simnet,
            Err(_) => return Err(ClientError::unexpected("bitcoin_net", reply.bitcoin_net)),
        };

        Ok(Self {
            network,
            last_block_height: reply.best_height,
            last_block_hash: Hash::from(reply.best_block_hash),
            difficulty: reply.difficulty,
            last_eleven_blocks_median_time: reply.median_time,
            has_full_transaction_index: reply.tx_index,
            has_address_index: reply.addr_index,
        })
    }
}

/// Headers of a `GetHeaders` reply, in wire order.
pub fn headers(reply: &wire::GetHeadersResponse) -> Vec<BlockHeader> {
    reply.headers.iter().map(BlockHeader::from).collect()
}

impl TryFrom<wire::GetMerkleProofResponse> for MerkleProof {
    type Error = ClientError;

    fn try_from(reply: wire::GetMerkleProofResponse) -> Result<Self, Self::Error> {
        let block = reply.block.ok_or(ClientError::missing("block"))?;
        Ok(Self {
            header: BlockHeader::from(&block),
            block_hash: Hash::from(block.hash),
            hashes: reply.hashes.into_iter().map(Hash::from).collect(),
            flags: reply.flags,
        })
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

fn outpoint(
    outpoint: Option<wire::transaction::input::Outpoint>,
    field: &'static str,
) -> Result<Outpoint, ClientError> {
    let outpoint = outpoint.ok_or(ClientError::missing(field))?;
    Ok(Outpoint {
        hash: Hash::from(outpoint.hash),
        index: outpoint.index,
    })
}

impl TryFrom<wire::transaction::Input> for Input {
    type Error = ClientError;

    fn try_from(input: wire::transaction::Input) -> Result<Self, Self::Error> {
        Ok(Self {
            index: input.index,
            outpoint: outpoint(input.outpoint, "transaction.input.outpoint")?,
            value: input.value,
            address: input.address,
            previous_locking_script: input.previous_script,
            unlocking_script: input.signature_script,
            sequence: input.sequence,
        })
    }
}

impl From<wire::transaction::Output> for Output {
    fn from(output: wire::transaction::Output) -> Self {
        Self {
            index: output.index,
            value: output.value,
            address: output.address,
            script_class: output.script_class,
            locking_script: output.pubkey_script,
        }
    }
}

impl TryFrom<wire::Transaction> for Transaction {
    type Error = ClientError;

    fn try_from(tx: wire::Transaction) -> Result<Self, Self::Error> {
        let inputs = tx
            .inputs
            .into_iter()
            .map(Input::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            hash: Hash::from(tx.hash),
            version: tx.version,
            inputs,
            outputs: tx.outputs.into_iter().map(Output::from).collect(),
            lock_time: tx.lock_time,
            size: tx.size,
            timestamp: tx.timestamp,
            confirmations: tx.confirmations,
            block_hash: Hash::from(tx.block_hash),
            block_height: tx.block_height,
        })
    }
}

impl TryFrom<wire::GetTransactionResponse> for Transaction {
    type Error = ClientError;

    fn try_from(reply: wire::GetTransactionResponse) -> Result<Self, Self::Error> {
        Transaction::try_from(reply.transaction.ok_or(ClientError::missing("transaction"))?)
    }
}

impl TryFrom<wire::MempoolTransaction> for UnconfirmedTransaction {
    type Error = ClientError;

    fn try_from(entry: wire::MempoolTransaction) -> Result<Self, Self::Error> {
        let transaction = Transaction::try_from(
            entry
                .transaction
                .ok_or(ClientError::missing("mempool_transaction.transaction"))?,
        )?;

        Ok(Self {
            transaction,
            added_time: entry.added_time,
            added_height: entry.added_height,
            fee: entry.fee,
            fee_per_kb: entry.fee_per_kb,
            starting_priority: entry.starting_priority,
        })
    }
}

impl TryFrom<wire::GetAddressTransactionsResponse> for TransactionSet {
    type Error = ClientError;

    fn try_from(reply: wire::GetAddressTransactionsResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            confirmed: reply
                .confirmed_transactions
                .into_iter()
                .map(Transaction::try_from)
                .collect::<Result<_, _>>()?,
            unconfirmed: reply
                .unconfirmed_transactions
                .into_iter()
                .map(UnconfirmedTransaction::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl From<wire::GetRawAddressTransactionsResponse> for RawTransactionSet {
    fn from(reply: wire::GetRawAddressTransactionsResponse) -> Self {
        Self {
            confirmed: reply.confirmed_transactions,
            unconfirmed: reply.unconfirmed_transactions,
        }
    }
}

impl From<wire::SubmitTransactionResponse> for SubmittedTransaction {
    fn from(reply: wire::SubmitTransactionResponse) -> Self {
        Self {
            hash: Hash::from(reply.hash),
        }
    }
}

// =============================================================================
// UNSPENT OUTPUTS
// =============================================================================

impl TryFrom<wire::UnspentOutput> for UnspentOutput {
    type Error = ClientError;

    fn try_from(output: wire::UnspentOutput) -> Result<Self, Self::Error> {
        Ok(Self {
            outpoint: outpoint(output.outpoint, "unspent_output.outpoint")?,
            value: output.value,
            locking_script: output.pubkey_script,
            block_height: output.block_height,
            is_coinbase: output.is_coinbase,
        })
    }
}

impl TryFrom<wire::GetUnspentOutputResponse> for UnspentOutput {
    type Error = ClientError;

    fn try_from(reply: wire::GetUnspentOutputResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            outpoint: outpoint(reply.outpoint, "outpoint")?,
            value: reply.value,
            locking_script: reply.pubkey_script,
            block_height: reply.block_height,
            is_coinbase: reply.is_coinbase,
        })
    }
}

/// Outputs of a `GetAddressUnspentOutputs` reply, in wire order.
pub fn unspent_outputs(
    reply: wire::GetAddressUnspentOutputsResponse,
) -> Result<Vec<UnspentOutput>, ClientError> {
    reply
        .outputs
        .into_iter()
        .map(UnspentOutput::try_from)
        .collect()
}

// =============================================================================
// MEMPOOL
// =============================================================================

impl From<wire::GetMempoolInfoResponse> for MempoolInformation {
    fn from(reply: wire::GetMempoolInfoResponse) -> Self {
        Self {
            transaction_count: reply.size,
            size_in_bytes: reply.bytes,
        }
    }
}

/// Transaction hashes of a `GetMempool` reply.
///
/// Accepts either entry shape; a full entry contributes its transaction's hash.
pub fn mempool_hashes(reply: wire::GetMempoolResponse) -> Result<Vec<Hash>, ClientError> {
    use wire::get_mempool_response::transaction_data::TxidsOrTxs;

    reply
        .transaction_data
        .into_iter()
        .map(|data| match data.txids_or_txs {
            Some(TxidsOrTxs::TransactionHash(hash)) => Ok(Hash::from(hash)),
            Some(TxidsOrTxs::Transaction(entry)) => entry
                .transaction
                .map(|tx| Hash::from(tx.hash))
                .ok_or(ClientError::missing("mempool_transaction.transaction")),
            None => Err(ClientError::missing("transaction_data")),
        })
        .collect()
}

/// Full entries of a `GetMempool` reply requested with `full_transactions`.
pub fn mempool_transactions(
    reply: wire::GetMempoolResponse,
) -> Result<Vec<UnconfirmedTransaction>, ClientError> {
    use wire::get_mempool_response::transaction_data::TxidsOrTxs;

    reply
        .transaction_data
        .into_iter()
        .map(|data| match data.txids_or_txs {
            Some(TxidsOrTxs::Transaction(entry)) => UnconfirmedTransaction::try_from(entry),
            _ => Err(ClientError::missing("transaction_data.transaction")),
        })
        .collect()
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

impl TryFrom<wire::BlockNotification> for BlockEvent {
    type Error = ClientError;

    fn try_from(notification: wire::BlockNotification) -> Result<Self, Self::Error> {
        use wire::block_notification::{Block as Payload, Type};

        let kind = match Type::try_from(notification.r#type) {
            Ok(Type::Connected) => BlockEventKind::Connected,
            Ok(Type::Disconnected) => BlockEventKind::Disconnected,
            Err(_) => {
                return Err(ClientError::unexpected(
                    "block_notification.type",
                    notification.r#type,
                ))
            }
        };

        let info = match notification.block {
            Some(Payload::BlockInfo(info)) => info,
            Some(Payload::MarshaledBlock(block)) => block
                .info
                .ok_or(ClientError::missing("block_notification.marshaled_block.info"))?,
            Some(Payload::SerializedBlock(_)) | None => {
                return Err(ClientError::missing("block_notification.block_info"))
            }
        };

        Ok(Self {
            kind,
            block: BlockInformation::from(info),
        })
    }
}

impl TryFrom<wire::TransactionNotification> for TransactionEvent {
    type Error = ClientError;

    fn try_from(notification: wire::TransactionNotification) -> Result<Self, Self::Error> {
        use wire::transaction_notification::Transaction as Payload;

        match notification.transaction {
            Some(Payload::UnconfirmedTransaction(entry)) => Ok(Self {
                transaction: UnconfirmedTransaction::try_from(entry)?,
            }),
            _ => Err(ClientError::missing(
                "transaction_notification.unconfirmed_transaction",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::samples::*;
    use proptest::prelude::*;

    fn hash_entry(hash: Vec<u8>) -> wire::block::TransactionData {
        wire::block::TransactionData {
            txids_or_txs: Some(wire::block::transaction_data::TxidsOrTxs::TransactionHash(hash)),
        }
    }

    #[test]
    fn test_block_preserves_fields() {
        let reply = wire::GetBlockResponse {
            block: Some(wire::Block {
                info: Some(block_info(vec![0xaa; 32], 650_000)),
                transaction_data: vec![hash_entry(vec![1; 32]), hash_entry(vec![2; 32])],
            }),
        };

        let block = Block::try_from(reply).unwrap();

        assert_eq!(block.hash, Hash::from(vec![0xaa; 32]));
        assert_eq!(block.height, 650_000);
        assert_eq!(block.header.version, 0x2000_0000);
        assert_eq!(block.header.previous_block_hash, Hash::from(vec![0x11; 32]));
        assert_eq!(block.header.merkle_root, Hash::from(vec![0x22; 32]));
        assert_eq!(block.header.timestamp, 1_600_000_000);
        assert_eq!(block.header.target_bits, 0x1802_7a3b);
        assert_eq!(block.header.nonce, 2_083_236_893);
        assert_eq!(block.confirmations, 12);
        assert_eq!(block.difficulty, 123_456.789);
        assert_eq!(block.median_time, 1_599_999_000);
        assert_eq!(block.size, 2_048);
        assert_eq!(block.next_block_hash, Hash::from(vec![0x33; 32]));
        assert_eq!(
            block.transaction_hashes,
            vec![Hash::from(vec![1; 32]), Hash::from(vec![2; 32])]
        );
        assert!(!block.is_tip());
    }

    #[test]
    fn test_block_without_info_is_malformed() {
        let reply = wire::GetBlockResponse {
            block: Some(wire::Block {
                info: None,
                transaction_data: vec![],
            }),
        };
        assert_eq!(
            Block::try_from(reply),
            Err(ClientError::MalformedReply { field: "block.info" })
        );
    }

    #[test]
    fn test_empty_reply_is_malformed() {
        assert_eq!(
            Block::try_from(wire::GetBlockResponse::default()),
            Err(ClientError::missing("block"))
        );
    }

    #[test]
    fn test_tip_block_has_empty_next_hash() {
        let mut info = block_info(vec![0xaa; 32], 1);
        info.next_block_hash.clear();
        let block = Block::try_from(wire::Block {
            info: Some(info),
            transaction_data: vec![],
        })
        .unwrap();
        assert!(block.is_tip());
        assert!(block.transaction_hashes.is_empty());
    }

    #[test]
    fn test_blockchain_info() {
        let reply = wire::GetBlockchainInfoResponse {
            bitcoin_net: wire::get_blockchain_info_response::BitcoinNet::Testnet3 as i32,
            best_height: 1_400_000,
            best_block_hash: vec![9; 32],
            difficulty: 1.0,
            median_time: 1_600_000_000,
            tx_index: true,
            addr_index: false,
        };

        let chain = Blockchain::try_from(reply).unwrap();
        assert_eq!(chain.network, Network::Testnet3);
        assert_eq!(chain.last_block_height, 1_400_000);
        assert_eq!(chain.last_eleven_blocks_median_time, 1_600_000_000);
        assert!(chain.has_full_transaction_index);
        assert!(!chain.has_address_index);
    }

    #[test]
    fn test_unknown_network_is_malformed() {
        let reply = wire::GetBlockchainInfoResponse {
            bitcoin_net: 42,
            ..Default::default()
        };
        assert_eq!(
            Blockchain::try_from(reply),
            Err(ClientError::unexpected("bitcoin_net", 42))
        );
    }

    #[test]
    fn test_unknown_block_notification_type_is_malformed() {
        let notification = wire::BlockNotification {
            r#type: 7,
            ..block_notification(vec![1; 32], 1)
        };
        let err = BlockEvent::try_from(notification).unwrap_err();
        assert_eq!(err, ClientError::unexpected("block_notification.type", 7));
        assert!(err.to_string().contains("unexpected value 7"));
    }

    #[test]
    fn test_transaction_maps_inputs_and_outputs() {
        let tx = Transaction::try_from(transaction(vec![5; 32])).unwrap();

        assert_eq!(tx.hash, Hash::from(vec![5; 32]));
        let input = &tx.inputs[0];
        assert_eq!(input.outpoint, Outpoint::new(vec![0x44; 32], 3));
        assert_eq!(input.unlocking_script, vec![0x47, 0x30]);
        assert_eq!(input.previous_locking_script, vec![0x76, 0xa9]);
        assert_eq!(input.sequence, u32::MAX);

        let output = &tx.outputs[0];
        assert_eq!(output.script_class, "pubkeyhash");
        assert_eq!(output.locking_script, vec![0x76, 0xa9, 0x14]);
        assert!(tx.block_hash.is_empty());
    }

    #[test]
    fn test_input_without_outpoint_is_malformed() {
        let mut wire_tx = transaction(vec![5; 32]);
        wire_tx.inputs[0].outpoint = None;
        assert_eq!(
            Transaction::try_from(wire_tx),
            Err(ClientError::missing("transaction.input.outpoint"))
        );
    }

    #[test]
    fn test_mempool_entry() {
        let entry = UnconfirmedTransaction::try_from(mempool_transaction(vec![6; 32])).unwrap();
        assert_eq!(entry.fee, 1_000);
        assert_eq!(entry.fee_per_kb, 4_424);
        assert_eq!(entry.added_height, 650_000);
        assert_eq!(entry.transaction.hash, Hash::from(vec![6; 32]));
    }

    #[test]
    fn test_mempool_hashes_accept_both_shapes() {
        use wire::get_mempool_response::{transaction_data::TxidsOrTxs, TransactionData};

        let reply = wire::GetMempoolResponse {
            transaction_data: vec![
                TransactionData {
                    txids_or_txs: Some(TxidsOrTxs::TransactionHash(vec![1; 32])),
                },
                TransactionData {
                    txids_or_txs: Some(TxidsOrTxs::Transaction(mempool_transaction(vec![2; 32]))),
                },
            ],
        };

        let hashes = mempool_hashes(reply.clone()).unwrap();
        assert_eq!(hashes, vec![Hash::from(vec![1; 32]), Hash::from(vec![2; 32])]);

        // Hash-only entries cannot become full transactions.
        assert!(mempool_transactions(reply).is_err());
    }

    #[test]
    fn test_unspent_output() {
        let reply = wire::GetUnspentOutputResponse {
            outpoint: Some(wire::transaction::input::Outpoint {
                hash: vec![8; 32],
                index: 1,
            }),
            pubkey_script: vec![0xa9],
            value: 546,
            is_coinbase: true,
            block_height: 100,
        };

        let utxo = UnspentOutput::try_from(reply).unwrap();
        assert_eq!(utxo.outpoint, Outpoint::new(vec![8; 32], 1));
        assert_eq!(utxo.value, 546);
        assert!(utxo.is_coinbase);
    }

    #[test]
    fn test_merkle_proof() {
        let reply = wire::GetMerkleProofResponse {
            block: Some(block_info(vec![0xbb; 32], 10)),
            hashes: vec![vec![1; 32], vec![2; 32], vec![3; 32]],
            flags: vec![0b1011],
        };

        let proof = MerkleProof::try_from(reply).unwrap();
        assert_eq!(proof.block_hash, Hash::from(vec![0xbb; 32]));
        assert_eq!(proof.hashes.len(), 3);
        assert_eq!(proof.hashes[2], Hash::from(vec![3; 32]));
        assert_eq!(proof.flags, vec![0b1011]);
    }

    #[test]
    fn test_block_notification_kinds() {
        use wire::block_notification::{Block as Payload, Type};

        let connected = wire::BlockNotification {
            r#type: Type::Connected as i32,
            block: Some(Payload::BlockInfo(block_info(vec![1; 32], 7))),
        };
        let event = BlockEvent::try_from(connected).unwrap();
        assert_eq!(event.kind, BlockEventKind::Connected);
        assert_eq!(event.block.height, 7);

        let disconnected = wire::BlockNotification {
            r#type: Type::Disconnected as i32,
            block: Some(Payload::MarshaledBlock(wire::Block {
                info: Some(block_info(vec![2; 32], 8)),
                transaction_data: vec![],
            })),
        };
        let event = BlockEvent::try_from(disconnected).unwrap();
        assert_eq!(event.kind, BlockEventKind::Disconnected);
        assert_eq!(event.block.hash, Hash::from(vec![2; 32]));
    }

    #[test]
    fn test_serialized_block_notification_is_not_mapped() {
        let notification = wire::BlockNotification {
            r#type: 0,
            block: Some(wire::block_notification::Block::SerializedBlock(vec![0; 80])),
        };
        assert!(BlockEvent::try_from(notification).is_err());
    }

    #[test]
    fn test_confirmed_transaction_notification_is_not_mapped() {
        use wire::transaction_notification::{Transaction as Payload, Type};

        let notification = wire::TransactionNotification {
            r#type: Type::Confirmed as i32,
            transaction: Some(Payload::ConfirmedTransaction(transaction(vec![1; 32]))),
        };
        assert_eq!(
            TransactionEvent::try_from(notification),
            Err(ClientError::missing(
                "transaction_notification.unconfirmed_transaction"
            ))
        );
    }

    proptest! {
        #[test]
        fn prop_block_mapping_preserves_hash_order(
            hashes in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..40), 0..50),
            height in any::<i32>(),
            nonce in any::<u32>(),
        ) {
            let mut info = block_info(vec![0xcc; 32], height);
            info.nonce = nonce;
            let block = wire::Block {
                info: Some(info),
                transaction_data: hashes.iter().cloned().map(hash_entry).collect(),
            };

            let mapped = Block::try_from(block).unwrap();

            prop_assert_eq!(mapped.height, height);
            prop_assert_eq!(mapped.header.nonce, nonce);
            let mapped_bytes: Vec<Vec<u8>> = mapped
                .transaction_hashes
                .into_iter()
                .map(Hash::into_bytes)
                .collect();
            prop_assert_eq!(mapped_bytes, hashes);
        }

        #[test]
        fn prop_headers_keep_wire_order(heights in prop::collection::vec(any::<i32>(), 0..30)) {
            let reply = wire::GetHeadersResponse {
                headers: heights
                    .iter()
                    .map(|h| {
                        let mut info = block_info(vec![], *h);
                        info.timestamp = i64::from(*h);
                        info
                    })
                    .collect(),
            };

            let mapped = headers(&reply);
            let timestamps: Vec<i64> = mapped.iter().map(|h| h.timestamp).collect();
            let expected: Vec<i64> = heights.iter().map(|h| i64::from(*h)).collect();
            prop_assert_eq!(timestamps, expected);
        }
    }
}
