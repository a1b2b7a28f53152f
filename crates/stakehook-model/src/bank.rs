/// Token transfer primitive.
///
/// Each call either moves the full `amount` or fails without moving
/// anything; the enclosing operation is aborted on failure.
pub trait Bank<T, A> {
    /// Pull `amount` of `token` from `from` into the reward vault.
    fn transfer_in(&mut self, token: &T, from: &A, amount: u128) -> crate::Result<()>;

    /// Push `amount` of `token` from the reward vault to `to`.
    fn transfer_out(&mut self, token: &T, to: &A, amount: u128) -> crate::Result<()>;
}

impl<T, A, B: Bank<T, A> + ?Sized> Bank<T, A> for &mut B {
    fn transfer_in(&mut self, token: &T, from: &A, amount: u128) -> crate::Result<()> {
        (**self).transfer_in(token, from, amount)
    }

    fn transfer_out(&mut self, token: &T, to: &A, amount: u128) -> crate::Result<()> {
        (**self).transfer_out(token, to, amount)
    }
}
