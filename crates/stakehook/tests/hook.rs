use std::{thread, time::Duration};

use stakehook::{
    stakehook_model::{
        test::{TestBank, TestClock, TestOracle},
        FundingParams, TickRange, U256,
    },
    Error, HookConfig, HookOutcome, LifecycleEvent, LiquidityAmount, PoolStatus, RewardsHook,
};

type Hook = RewardsHook<
    &'static str,
    &'static str,
    &'static str,
    TestBank<&'static str, &'static str>,
    TestOracle<&'static str, &'static str>,
    TestClock,
>;

const MANAGER: &str = "manager";

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup(treasury: u128) -> Hook {
    init_tracing();
    let mut bank = TestBank::default();
    bank.mint(&"RWD", &"treasury", treasury);
    RewardsHook::new(
        HookConfig::builder().pool_manager(MANAGER).build(),
        bank,
        TestOracle::default(),
        TestClock::new(1_000),
    )
}

type Event = LifecycleEvent<&'static str, &'static str, &'static str>;

fn initialize(pool: &'static str, amount: u128, duration: u64) -> Event {
    LifecycleEvent::PoolInitialized {
        pool,
        funder: "treasury",
        init: FundingParams::builder()
            .reward_token("RWD")
            .amount(amount)
            .duration(duration)
            .build(),
    }
}

fn added(pool: &'static str, account: &'static str, amount: u128) -> Event {
    LifecycleEvent::LiquidityAdded {
        pool,
        account,
        amount: LiquidityAmount::Flat(amount),
    }
}

#[test]
fn test_unauthorized_sender_is_rejected() -> stakehook::Result<()> {
    let hook = setup(1_000);
    assert_eq!(
        hook.handle(&"mallory", initialize("pool", 1_000, 100)),
        Err(Error::Unauthorized)
    );
    assert_eq!(hook.status(&"pool")?, PoolStatus::Uninitialized);
    assert_eq!(hook.with_bank(|bank| bank.balance(&"RWD", &"treasury"))?, 1_000);

    hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    hook.handle(&MANAGER, added("pool", "alice", 10))?;
    assert_eq!(
        hook.handle(
            &"alice",
            LifecycleEvent::RewardClaimed {
                pool: "pool",
                account: "alice"
            }
        ),
        Err(Error::Unauthorized)
    );
    Ok(())
}

#[test]
fn test_event_dispatch() -> stakehook::Result<()> {
    let hook = setup(1_000);

    let outcome = hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    let HookOutcome::Funded(report) = outcome else {
        panic!("expected funding");
    };
    assert_eq!(report.reward_rate(), 10);
    assert_eq!(report.finish_at(), 1_100);
    assert_eq!(hook.reward_token(&"pool")?, Some("RWD"));

    let outcome = hook.handle(&MANAGER, added("pool", "alice", 10))?;
    assert!(matches!(outcome, HookOutcome::StakeChanged(ref report) if report.balance() == 10));

    hook.clock().move_forward(Duration::from_secs(30));
    assert_eq!(
        hook.handle(&MANAGER, LifecycleEvent::SwapExecuted { pool: "pool" })?,
        HookOutcome::Ignored
    );
    assert_eq!(hook.earned(&"pool", &"alice")?, 300);

    let outcome = hook.handle(
        &MANAGER,
        LifecycleEvent::LiquidityRemoved {
            pool: "pool",
            account: "alice",
            amount: LiquidityAmount::Flat(4),
        },
    )?;
    assert!(matches!(outcome, HookOutcome::StakeChanged(ref report) if report.balance() == 6));
    assert_eq!(hook.total_staked(&"pool")?, 6);

    let claim = LifecycleEvent::RewardClaimed {
        pool: "pool",
        account: "alice",
    };
    let HookOutcome::Claimed(report) = hook.handle(&MANAGER, claim.clone())? else {
        panic!("expected a claim");
    };
    assert_eq!(report.amount(), 300);
    let HookOutcome::Claimed(report) = hook.handle(&MANAGER, claim)? else {
        panic!("expected a claim");
    };
    assert_eq!(report.amount(), 0);
    assert_eq!(hook.with_bank(|bank| bank.balance(&"RWD", &"alice"))?, 300);
    Ok(())
}

#[test]
fn test_second_initialization_fails() -> stakehook::Result<()> {
    let hook = setup(2_000);
    hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    assert_eq!(
        hook.handle(&MANAGER, initialize("pool", 1_000, 50)),
        Err(Error::Model(stakehook::stakehook_model::Error::AlreadyInitialized))
    );
    assert_eq!(hook.program(&"pool")?.duration(), 100);
    assert_eq!(hook.with_bank(|bank| bank.vault(&"RWD"))?, 1_000);
    Ok(())
}

#[test]
fn test_failed_payout_leaves_ledger_untouched() -> stakehook::Result<()> {
    let hook = setup(1_000);
    hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    hook.handle(&MANAGER, added("pool", "alice", 10))?;
    hook.clock().move_forward(Duration::from_secs(50));

    let before = hook.ledger(&"pool")?;
    hook.with_bank_mut(|bank| bank.freeze(true))?;
    let result = hook.on_claim(&"pool", &"alice");
    assert!(matches!(
        result,
        Err(Error::Model(stakehook::stakehook_model::Error::Transfer(_)))
    ));
    let after = hook.ledger(&"pool")?;
    assert_eq!(before.program(), after.program());
    assert_eq!(before.stake(&"alice"), after.stake(&"alice"));
    assert_eq!(hook.earned(&"pool", &"alice")?, 500);

    hook.with_bank_mut(|bank| bank.freeze(false))?;
    assert_eq!(hook.on_claim(&"pool", &"alice")?.amount(), 500);
    Ok(())
}

#[test]
fn test_range_liquidity_is_synced_from_oracle() -> stakehook::Result<()> {
    let hook = setup(1_000);
    hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    let range = TickRange::new(-60, 60)?;

    hook.oracle().set_liquidity(&"pool", &"alice", range, 40);
    let outcome = hook.handle(
        &MANAGER,
        LifecycleEvent::LiquidityAdded {
            pool: "pool",
            account: "alice",
            amount: LiquidityAmount::Range(range),
        },
    )?;
    assert!(matches!(outcome, HookOutcome::StakeChanged(ref report) if report.delta() == 40));

    // Delivering the same event again finds nothing to reconcile.
    let outcome = hook.handle(
        &MANAGER,
        LifecycleEvent::LiquidityAdded {
            pool: "pool",
            account: "alice",
            amount: LiquidityAmount::Range(range),
        },
    )?;
    assert_eq!(outcome, HookOutcome::Unchanged);

    hook.oracle().set_liquidity(&"pool", &"alice", range, 15);
    let report = hook
        .sync_stake(&"pool", &"alice", &range)?
        .expect("stake should change");
    assert_eq!(report.previous_balance(), 40);
    assert_eq!(report.balance(), 15);
    assert_eq!(hook.staked_balance(&"pool", &"alice")?, 15);

    hook.oracle().set_unavailable(true);
    assert!(matches!(
        hook.sync_stake(&"pool", &"alice", &range),
        Err(Error::Model(stakehook::stakehook_model::Error::Oracle(_)))
    ));
    assert_eq!(hook.staked_balance(&"pool", &"alice")?, 15);
    Ok(())
}

#[test]
fn test_checkpoint_pool_skips_zero_stake_time() -> stakehook::Result<()> {
    let hook = setup(1_000);
    hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    hook.clock().move_forward(Duration::from_secs(50));
    let report = hook.checkpoint_pool(&"pool")?;
    assert_eq!(report.reward_per_token(), U256::ZERO);
    assert_eq!(hook.program(&"pool")?.updated_at(), 1_050);

    hook.handle(&MANAGER, added("pool", "alice", 10))?;
    hook.clock().move_forward(Duration::from_secs(500));
    assert_eq!(hook.status(&"pool")?, PoolStatus::Depleted);
    assert_eq!(hook.earned(&"pool", &"alice")?, 500);
    Ok(())
}

#[test]
fn test_pools_are_independent_under_concurrency() -> stakehook::Result<()> {
    const POOLS: [&str; 4] = ["a", "b", "c", "d"];
    const ACCOUNTS: [&str; 3] = ["alice", "bob", "carol"];

    let hook = setup(4_000);
    for pool in POOLS {
        hook.handle(&MANAGER, initialize(pool, 1_000, 100))?;
    }

    thread::scope(|scope| {
        let mut handles = Vec::new();
        for pool in POOLS {
            for account in ACCOUNTS {
                let hook = &hook;
                handles.push(scope.spawn(move || -> stakehook::Result<()> {
                    for _ in 0..50 {
                        hook.on_stake_increase(&pool, &account, 3)?;
                        hook.on_stake_decrease(&pool, &account, 1)?;
                    }
                    Ok(())
                }));
            }
        }
        handles
            .into_iter()
            .try_for_each(|handle| handle.join().expect("staking thread panicked"))
    })?;

    for pool in POOLS {
        assert_eq!(hook.total_staked(&pool)?, 300);
        for account in ACCOUNTS {
            assert_eq!(hook.staked_balance(&pool, &account)?, 100);
        }
    }

    hook.clock().move_forward(Duration::from_secs(100));
    let claimed = thread::scope(|scope| {
        let mut handles = Vec::new();
        for pool in POOLS {
            for account in ACCOUNTS {
                let hook = &hook;
                handles.push(scope.spawn(move || hook.on_claim(&pool, &account)));
            }
        }
        handles
            .into_iter()
            .map(|handle| -> stakehook::Result<u128> {
                Ok(handle.join().expect("claiming thread panicked")?.amount())
            })
            .sum::<stakehook::Result<u128>>()
    })?;
    assert_eq!(claimed, 4 * 999);
    assert_eq!(hook.with_bank(|bank| bank.vault(&"RWD"))?, 4);

    for pool in POOLS {
        let program = hook.program(&pool)?;
        assert!(program.total_claimed() <= program.distributable()?);
        assert!(program.distributable()? - program.total_claimed() <= 3);
    }
    Ok(())
}

#[test]
fn test_ranges_of_one_account_add_up() -> stakehook::Result<()> {
    let hook = setup(1_000);
    hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    hook.handle(&MANAGER, added("pool", "alice", 7))?;
    let narrow = TickRange::new(-60, 60)?;
    let wide = TickRange::new(-600, 600)?;

    hook.oracle().set_liquidity(&"pool", &"alice", narrow, 100);
    hook.sync_stake(&"pool", &"alice", &narrow)?;
    hook.oracle().set_liquidity(&"pool", &"alice", wide, 50);
    let report = hook
        .sync_stake(&"pool", &"alice", &wide)?
        .expect("stake should change");
    assert_eq!(report.delta(), 50);
    assert_eq!(hook.staked_balance(&"pool", &"alice")?, 157);

    // Removing liquidity from one range leaves the other untouched.
    hook.oracle().set_liquidity(&"pool", &"alice", narrow, 0);
    let outcome = hook.handle(
        &MANAGER,
        LifecycleEvent::LiquidityRemoved {
            pool: "pool",
            account: "alice",
            amount: LiquidityAmount::Range(narrow),
        },
    )?;
    assert!(matches!(outcome, HookOutcome::StakeChanged(ref report) if report.delta() == 100));
    assert_eq!(hook.staked_balance(&"pool", &"alice")?, 57);
    assert_eq!(hook.total_staked(&"pool")?, 57);
    assert_eq!(hook.sync_stake(&"pool", &"alice", &wide)?, None);
    Ok(())
}

#[test]
fn test_unavailable_oracle_rejects_range_event() -> stakehook::Result<()> {
    let hook = setup(1_000);
    hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    hook.handle(&MANAGER, added("pool", "alice", 10))?;
    hook.clock().move_forward(Duration::from_secs(20));
    let range = TickRange::new(-60, 60)?;
    hook.oracle().set_liquidity(&"pool", &"alice", range, 40);

    let before = hook.ledger(&"pool")?;
    hook.oracle().set_unavailable(true);
    let result = hook.handle(
        &MANAGER,
        LifecycleEvent::LiquidityAdded {
            pool: "pool",
            account: "alice",
            amount: LiquidityAmount::Range(range),
        },
    );
    assert!(matches!(
        result,
        Err(Error::Model(stakehook::stakehook_model::Error::Oracle(_)))
    ));
    let after = hook.ledger(&"pool")?;
    assert_eq!(before.program(), after.program());
    assert_eq!(before.stake(&"alice"), after.stake(&"alice"));

    // Once the oracle is back, the same event goes through.
    hook.oracle().set_unavailable(false);
    let outcome = hook.handle(
        &MANAGER,
        LifecycleEvent::LiquidityAdded {
            pool: "pool",
            account: "alice",
            amount: LiquidityAmount::Range(range),
        },
    )?;
    assert!(matches!(outcome, HookOutcome::StakeChanged(ref report) if report.balance() == 50));
    Ok(())
}

#[test]
fn test_failed_initialization_can_be_retried() -> stakehook::Result<()> {
    let hook = setup(1_000);
    assert!(hook.handle(&MANAGER, initialize("pool", 5_000, 100)).is_err());
    assert!(hook.handle(&MANAGER, initialize("pool", 0, 100)).is_err());
    assert!(hook.pools()?.is_empty());

    let outcome = hook.handle(&MANAGER, initialize("pool", 1_000, 100))?;
    assert!(matches!(outcome, HookOutcome::Funded(ref report) if report.reward_rate() == 10));
    assert_eq!(hook.pools()?, vec!["pool"]);
    Ok(())
}
