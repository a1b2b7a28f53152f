use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

/// Time source, in UNIX seconds.
///
/// Must be non-decreasing. Callers read it once per event and use that value
/// for every formula evaluated while handling the event.
pub trait Clock {
    /// Get the current timestamp.
    fn now(&self) -> crate::Result<u64>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> crate::Result<u64> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> crate::Result<u64> {
        (**self).now()
    }
}

/// Clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> crate::Result<u64> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .map_err(|err| crate::Error::Clock(err.to_string()))
    }
}
