//! # Domain Mapper Benchmarks
//!
//! Cost of turning wire replies into domain values, the per-call work the
//! client adds on top of the transport.
//!
//! | Reply | Shape |
//! |-------|-------|
//! | GetBlock | block info + N transaction hashes |
//! | GetMempool | N full mempool entries |
//! | BlockNotification | one block info push |

use bchd_client::domain::mapper;
use bchd_client::wire::{self, samples};
use bchd_client::{Block, BlockEvent};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn block_reply(transactions: usize) -> wire::GetBlockResponse {
    let transaction_data = (0..transactions)
        .map(|i| wire::block::TransactionData {
            txids_or_txs: Some(wire::block::transaction_data::TxidsOrTxs::TransactionHash(
                (i as u32).to_le_bytes().repeat(8),
            )),
        })
        .collect();

    wire::GetBlockResponse {
        block: Some(wire::Block {
            info: Some(samples::block_info(vec![0xaa; 32], 650_000)),
            transaction_data,
        }),
    }
}

fn mempool_reply(entries: usize) -> wire::GetMempoolResponse {
    use wire::get_mempool_response::{transaction_data::TxidsOrTxs, TransactionData};

    wire::GetMempoolResponse {
        transaction_data: (0..entries)
            .map(|i| TransactionData {
                txids_or_txs: Some(TxidsOrTxs::Transaction(samples::mempool_transaction(
                    (i as u32).to_le_bytes().repeat(8),
                ))),
            })
            .collect(),
    }
}

fn bench_block_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapper-block");

    for size in [1, 100, 2_000, 20_000] {
        let reply = block_reply(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("get_block", size), &reply, |b, reply| {
            b.iter(|| black_box(Block::try_from(reply.clone()).is_ok()))
        });
    }

    group.finish();
}

fn bench_mempool_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapper-mempool");

    for size in [10, 1_000, 10_000] {
        let reply = mempool_reply(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("mempool_transactions", size),
            &reply,
            |b, reply| b.iter(|| black_box(mapper::mempool_transactions(reply.clone()).is_ok())),
        );
        group.bench_with_input(BenchmarkId::new("mempool_hashes", size), &reply, |b, reply| {
            b.iter(|| black_box(mapper::mempool_hashes(reply.clone()).is_ok()))
        });
    }

    group.finish();
}

fn bench_notification_mapping(c: &mut Criterion) {
    let notification = samples::block_notification(vec![0xbb; 32], 650_001);

    c.bench_function("mapper-block-notification", |b| {
        b.iter(|| black_box(BlockEvent::try_from(notification.clone()).is_ok()))
    });
}

criterion_group!(
    benches,
    bench_block_mapping,
    bench_mempool_mapping,
    bench_notification_mapping
);
criterion_main!(benches);
