// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeedbackId(i64);

impl FeedbackId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for FeedbackId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of identifiers for records created locally. Injected into the
/// controller so tests can substitute a deterministic sequence.
pub trait IdSource {
    fn next_id(&mut self) -> FeedbackId;
}

/// Wall-clock based id source. Mixes the nanosecond timestamp with a
/// per-instance counter so two ids minted in the same instant still differ.
#[derive(Debug, Clone, Default)]
pub struct ClockIds {
    counter: i64,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for ClockIds {
    fn next_id(&mut self) -> FeedbackId {
        self.counter = self.counter.wrapping_add(1);
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos() as i64;
        let mut mixed = nanos ^ self.counter.wrapping_shl(17);
        mixed ^= mixed >> 13;
        mixed ^= mixed << 7;
        FeedbackId::new(mixed & i64::MAX)
    }
}
