pub use ruint::aliases::U256;

/// Perform Mul-Div calculation with bigger range num type.
pub trait MulDiv: num_traits::Unsigned + Sized {
    /// Calculates floor(self * numerator / denominator) with full precision.
    ///
    /// Returns `None` if the `denominator` is zero or overflow.
    fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self>;

    /// Same as [`MulDiv::checked_mul_div`] but reports the failure reason.
    fn mul_div(&self, numerator: &Self, denominator: &Self) -> crate::Result<Self> {
        if denominator.is_zero() {
            return Err(crate::Error::DividedByZero);
        }
        self.checked_mul_div(numerator, denominator)
            .ok_or(crate::Error::Overflow)
    }
}

impl MulDiv for u64 {
    #[allow(clippy::arithmetic_side_effects)]
    fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        if *denominator == 0 {
            return None;
        }
        let x = *self as u128;
        let numerator = *numerator as u128;
        let denominator = *denominator as u128;
        let ans = x * numerator / denominator;
        ans.try_into().ok()
    }
}

impl MulDiv for u128 {
    #[allow(clippy::arithmetic_side_effects)]
    fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        if *denominator == 0 {
            return None;
        }
        let x = U256::from(*self);
        let numerator = U256::from(*numerator);
        let denominator = U256::from(*denominator);
        let ans = x * numerator / denominator;
        ans.try_into().ok()
    }
}

impl MulDiv for U256 {
    fn checked_mul_div(&self, numerator: &Self, denominator: &Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        self.checked_mul(*numerator)?.checked_div(*denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_floors() {
        assert_eq!(7u64.checked_mul_div(&3, &2), Some(10));
        assert_eq!(7u128.checked_mul_div(&3, &2), Some(10));
        assert_eq!(1u128.checked_mul_div(&1, &0), None);
    }

    #[test]
    fn mul_div_u128_wide_intermediate() {
        // (u128::MAX * 10^18) does not fit in u128 but the quotient does.
        let scale = 1_000_000_000_000_000_000u128;
        assert_eq!(u128::MAX.checked_mul_div(&scale, &scale), Some(u128::MAX));
        assert_eq!(u128::MAX.checked_mul_div(&2, &1), None);
    }

    #[test]
    fn mul_div_u256() {
        let x = U256::from(u128::MAX);
        let scale = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(
            x.checked_mul_div(&scale, &U256::from(1u8)),
            Some(x * scale)
        );
        assert_eq!(U256::MAX.checked_mul_div(&U256::from(2u8), &U256::from(2u8)), None);
        assert_eq!(x.mul_div(&x, &U256::ZERO), Err(crate::Error::DividedByZero));
    }

    #[test]
    fn mul_div_reports_reason() {
        assert_eq!(1u128.mul_div(&1, &0), Err(crate::Error::DividedByZero));
        assert_eq!(u128::MAX.mul_div(&2, &1), Err(crate::Error::Overflow));
    }
}
