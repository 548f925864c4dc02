use crate::services::clock::Clock;
use parking_lot::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub mod key_directory_context;
pub mod keys;
pub mod mock_audit_service;
pub mod token_fixtures;

/// A clock that only moves when told to.
pub struct FixedClock(Mutex<SystemTime>);

impl FixedClock {
    pub fn at_unix_seconds(seconds: u64) -> Self {
        FixedClock(Mutex::new(UNIX_EPOCH + Duration::from_secs(seconds)))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        *self.0.lock()
    }
}
