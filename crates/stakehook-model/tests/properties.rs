use stakehook_model::{test::funded_pool, Bank, PoolRewards, SCALE, U256};

const DURATION: u64 = 10_000;
const FUNDING: u128 = 1_000_000_007;

type Pool = PoolRewards<&'static str, &'static str>;

/// A fixed schedule of stake changes and claims over the whole program.
fn replay(pool: &mut Pool, mut on_step: impl FnMut(&Pool, u64)) -> stakehook_model::Result<u128> {
    let mut bank = stakehook_model::test::TestBank::default();
    bank.mint(&"RWD", &"funder", FUNDING);
    bank.transfer_in(&"RWD", &"funder", FUNDING)?;

    let accounts = ["alice", "bob", "carol"];
    let mut claimed = 0;
    for step in 0..120u64 {
        let now = step * 97;
        let account = &accounts[(step % 3) as usize];
        match step % 5 {
            0 | 1 => {
                pool.increase_stake(account, u128::from(step % 11 + 1) * 1_000, now)?
                    .execute()?;
            }
            2 => {
                let balance = pool.balance_of(account);
                if balance > 1 {
                    pool.decrease_stake(account, balance / 2, now)?.execute()?;
                } else {
                    pool.checkpoint(Some(account), now).execute()?;
                }
            }
            3 => {
                claimed += pool.claim(account, now)?.execute(&mut bank)?.amount();
            }
            _ => {
                pool.checkpoint(None, now).execute()?;
            }
        }
        on_step(pool, now);
    }
    Ok(claimed)
}

#[test]
fn test_reward_per_token_is_monotonic() -> stakehook_model::Result<()> {
    let mut pool = funded_pool(FUNDING, DURATION, 0)?;
    let mut last = U256::ZERO;
    let mut last_updated_at = 0;
    replay(&mut pool, |pool, _| {
        let stored = pool.program().reward_per_token_stored();
        assert!(stored >= last);
        assert!(pool.program().updated_at() >= last_updated_at);
        last = stored;
        last_updated_at = pool.program().updated_at();
    })?;
    assert!(pool.program().updated_at() <= pool.program().finish_at());
    Ok(())
}

#[test]
fn test_rewards_never_exceed_distributable() -> stakehook_model::Result<()> {
    let mut pool = funded_pool(FUNDING, DURATION, 0)?;
    let claimed = replay(&mut pool, |pool, now| {
        let outstanding: u128 = pool
            .stakes()
            .map(|(account, _)| pool.earned(account, now).unwrap())
            .sum();
        let distributable = pool.program().distributable().unwrap();
        assert!(pool.program().total_claimed() + outstanding <= distributable);
        let staked: u128 = pool.stakes().map(|(_, stake)| stake.balance()).sum();
        assert_eq!(staked, pool.total_staked());
    })?;
    assert_eq!(claimed, pool.program().total_claimed());
    assert!(claimed <= pool.program().funded_amount());
    Ok(())
}

#[test]
fn test_equal_stakes_earn_equally() -> stakehook_model::Result<()> {
    let mut pool = funded_pool(FUNDING, DURATION, 0)?;
    pool.increase_stake(&"alice", 3 * SCALE, 10)?.execute()?;
    pool.increase_stake(&"bob", 3 * SCALE, 10)?.execute()?;
    for now in (10..=DURATION + 50).step_by(333) {
        pool.increase_stake(&"carol", 17, now)?.execute()?;
        assert_eq!(pool.earned(&"alice", now)?, pool.earned(&"bob", now)?);
    }
    Ok(())
}

#[test]
fn test_earned_is_non_decreasing_without_claims() -> stakehook_model::Result<()> {
    let mut pool = funded_pool(FUNDING, DURATION, 0)?;
    pool.increase_stake(&"alice", 5_000, 0)?.execute()?;
    let mut last: u128 = 0;
    for now in (0..=DURATION + 1_000).step_by(250) {
        if now % 1_000 == 0 {
            pool.increase_stake(&"bob", 1_000, now)?.execute()?;
        }
        let earned = pool.earned(&"alice", now)?;
        assert!(earned >= last);
        last = earned;
    }
    Ok(())
}
