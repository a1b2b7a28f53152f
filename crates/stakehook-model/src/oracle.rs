use std::{fmt, sync::Arc};

/// A half-open tick range `[lower, upper)` of a concentrated-liquidity position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(i32, i32)", into = "(i32, i32)")
)]
pub struct TickRange {
    lower: i32,
    upper: i32,
}

impl TickRange {
    /// Create a new [`TickRange`].
    pub fn new(lower: i32, upper: i32) -> crate::Result<Self> {
        if lower >= upper {
            return Err(crate::Error::InvalidArgument(
                "tick range lower bound must be below upper bound",
            ));
        }
        Ok(Self { lower, upper })
    }

    /// Get lower tick.
    pub fn lower(&self) -> i32 {
        self.lower
    }

    /// Get upper tick.
    pub fn upper(&self) -> i32 {
        self.upper
    }
}

impl TryFrom<(i32, i32)> for TickRange {
    type Error = crate::Error;

    fn try_from((lower, upper): (i32, i32)) -> Result<Self, Self::Error> {
        Self::new(lower, upper)
    }
}

impl From<TickRange> for (i32, i32) {
    fn from(range: TickRange) -> Self {
        (range.lower, range.upper)
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

/// Position oracle.
///
/// The authoritative source of how much liquidity an account has staked in a
/// pool for a given range.
pub trait PositionOracle<P, A> {
    /// Get the staked liquidity of `account` in `pool` for `range`.
    fn staked_amount(&self, pool: &P, account: &A, range: &TickRange) -> crate::Result<u128>;
}

impl<P, A, O: PositionOracle<P, A> + ?Sized> PositionOracle<P, A> for &O {
    fn staked_amount(&self, pool: &P, account: &A, range: &TickRange) -> crate::Result<u128> {
        (**self).staked_amount(pool, account, range)
    }
}

impl<P, A, O: PositionOracle<P, A> + ?Sized> PositionOracle<P, A> for Arc<O> {
    fn staked_amount(&self, pool: &P, account: &A, range: &TickRange) -> crate::Result<u128> {
        (**self).staked_amount(pool, account, range)
    }
}
