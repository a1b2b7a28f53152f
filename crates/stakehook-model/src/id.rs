use std::{fmt, hash::Hash};

/// Identifier of a pool, an account or a token.
///
/// The zero identifier stands for "unset": a zero reward token is rejected at
/// funding, and a checkpoint for the zero account only updates the
/// program-global fields.
pub trait Identifier: Clone + Eq + Hash + fmt::Debug {
    /// Returns whether this is the zero identifier.
    fn is_zero(&self) -> bool;
}

impl Identifier for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Identifier for &str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Identifier for u64 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Identifier for u32 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Identifier for [u8; 32] {
    fn is_zero(&self) -> bool {
        self.iter().all(|b| *b == 0)
    }
}
