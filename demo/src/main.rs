//! harvest demo — a complete stake/withdraw lifecycle on a simulated clock.

use anyhow::Context;
use clap::Parser;
use harvest_ledger::TokenLedger;
use harvest_nullables::NullClock;
use harvest_pool::StakingPool;
use harvest_types::{format_tokens, tokens, AccountId, PoolParams, Timestamp};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harvest-demo", about = "Staking pool demo scenario")]
struct Cli {
    /// Amount to stake, in whole tokens.
    #[arg(long, env = "HARVEST_STAKE_TOKENS")]
    stake_tokens: Option<u64>,

    /// Reward distributed per second, in whole tokens.
    #[arg(long, env = "HARVEST_REWARD_PER_SECOND")]
    reward_per_second: Option<u64>,

    /// Mining window length in seconds.
    #[arg(long, env = "HARVEST_WINDOW_SECS")]
    window_secs: Option<u64>,

    /// Lock duration in seconds for each deposit.
    #[arg(long, env = "HARVEST_LOCK_SECS")]
    lock_secs: Option<u64>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    stake_tokens: u64,
    reward_per_second: u64,
    window_secs: u64,
    lock_secs: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            stake_tokens: 1000,
            reward_per_second: 1,
            window_secs: 300,
            lock_secs: 300,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let file_config = if let Some(ref path) = cli.config {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg: DemoConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        tracing::info!("loaded config from {}", path.display());
        cfg
    } else {
        DemoConfig::default()
    };

    let config = DemoConfig {
        stake_tokens: cli.stake_tokens.unwrap_or(file_config.stake_tokens),
        reward_per_second: cli.reward_per_second.unwrap_or(file_config.reward_per_second),
        window_secs: cli.window_secs.unwrap_or(file_config.window_secs),
        lock_secs: cli.lock_secs.unwrap_or(file_config.lock_secs),
    };

    run_scenario(&config)
}

fn run_scenario(config: &DemoConfig) -> anyhow::Result<()> {
    let staker = AccountId::new("Ux123");
    let clock = NullClock::at(Timestamp::now().as_secs());

    let mut usd = TokenLedger::new();
    usd.mint(&staker, tokens(config.stake_tokens))?;

    let start = clock.now();
    let end = start.saturating_add_secs(config.window_secs);
    let params = PoolParams {
        reward_per_second: tokens(config.reward_per_second),
        start_time: start,
        end_time: end,
        lock_duration_secs: config.lock_secs,
    };
    tracing::info!(
        start = %start,
        end = %end,
        lock = config.lock_secs,
        rate = %format_tokens(params.reward_per_second),
        "pool opened"
    );
    let mut pool = StakingPool::new(usd, TokenLedger::new(), params)?;

    let reward_supply = tokens(config.reward_per_second) * config.window_secs as u128;
    pool.add_reward_tokens(reward_supply)?;
    tracing::info!(supply = %format_tokens(reward_supply), "reward supply added");

    let id = pool.deposit(&staker, tokens(config.stake_tokens), clock.now())?;
    tracing::info!(
        staker = %staker,
        deposit_id = id,
        amount = %format_tokens(tokens(config.stake_tokens)),
        "deposited"
    );
    tracing::debug!(user = ?pool.user_info(&staker), "user info");
    tracing::debug!(deposit = ?pool.deposit_info(&staker, id), "deposit info");

    // Wait out the lock on the simulated clock.
    clock.advance(config.lock_secs);
    let pending = pool.pending_reward(&staker, id, clock.now()).unwrap_or(0);
    tracing::info!(pending = %format_tokens(pending), "pending reward at unlock");

    let payout = pool.withdraw(&staker, tokens(config.stake_tokens), id, clock.now())?;
    tracing::info!(payout = %format_tokens(payout), "withdrawn");

    println!(
        "staked balance: {}",
        format_tokens(pool.staked_ledger().balance_of(&staker))
    );
    println!(
        "reward balance: {}",
        format_tokens(pool.reward_ledger().balance_of(&staker))
    );
    let summary = pool.summary();
    println!(
        "pool after run: {} staker(s), {} staked, {} rewards undistributed",
        summary.stakers,
        format_tokens(summary.total_staking),
        format_tokens(summary.total_rewards)
    );
    Ok(())
}
