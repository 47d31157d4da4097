use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use harvest_ledger::TokenLedger;
use harvest_pool::StakingPool;
use harvest_types::{tokens, AccountId, PoolParams, Timestamp};

fn account(n: u32) -> AccountId {
    AccountId::new(format!("user_{n:06}"))
}

fn params() -> PoolParams {
    PoolParams {
        reward_per_second: tokens(1),
        start_time: Timestamp::new(1_000),
        end_time: Timestamp::new(1_000_000),
        lock_duration_secs: 300,
    }
}

fn populated_pool(stakers: u32) -> StakingPool {
    let mut staked = TokenLedger::new();
    for i in 0..stakers {
        staked.mint(&account(i), tokens(1_000)).unwrap();
    }
    let mut pool = StakingPool::new(staked, TokenLedger::new(), params()).unwrap();
    for i in 0..stakers {
        pool.deposit(&account(i), tokens(1_000), Timestamp::new(1_000 + i as u64))
            .unwrap();
    }
    pool
}

fn bench_pending_reward(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_pending_reward");

    for staker_count in [1u32, 100, 10_000] {
        let pool = populated_pool(staker_count);
        let now = Timestamp::new(500_000);

        group.bench_with_input(
            BenchmarkId::new("pending_reward", staker_count),
            &staker_count,
            |b, _| {
                b.iter(|| black_box(pool.pending_reward(black_box(&account(0)), 0, black_box(now))));
            },
        );
    }

    group.finish();
}

fn bench_deposit_withdraw_cycle(c: &mut Criterion) {
    c.bench_function("pool_deposit_withdraw_cycle", |b| {
        b.iter_batched(
            || {
                let mut staked = TokenLedger::new();
                staked.mint(&account(0), tokens(1_000)).unwrap();
                let mut pool = StakingPool::new(staked, TokenLedger::new(), params()).unwrap();
                pool.add_reward_tokens(tokens(1_000)).unwrap();
                pool
            },
            |mut pool| {
                let id = pool
                    .deposit(&account(0), tokens(1_000), Timestamp::new(1_000))
                    .unwrap();
                let payout = pool
                    .withdraw(&account(0), tokens(1_000), id, Timestamp::new(1_300))
                    .unwrap();
                black_box(payout);
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_pending_reward, bench_deposit_withdraw_cycle);
criterion_main!(benches);
