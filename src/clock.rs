// File: ./src/clock.rs
//! Time source used to stamp tasks that carry no explicit `dtstamp`.
//!
//! Parsing code never reads the wall clock directly; it receives a `Clock`
//! so that tests can pin the stamp with `FixedClock`.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

// --- Production Implementation ---

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// --- Test Implementation ---

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
