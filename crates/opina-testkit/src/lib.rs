// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use opina_app::{FeedbackId, FeedbackRecord, IdSource};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const OPENERS: [&str; 8] = [
    "Loved the onboarding flow",
    "The search feature saves me time",
    "Ran into a snag with the export",
    "Checkout was quick and painless",
    "The mobile layout needs work",
    "Support got back to me fast",
    "Dark mode is a welcome addition",
    "Sync across devices just works",
];

const FOLLOWUPS: [&str; 8] = [
    "and I would recommend it to a colleague.",
    "but the settings page is hard to find.",
    "so I signed up for the annual plan.",
    "though it took a refresh to show up.",
    "which made my week noticeably easier.",
    "and the docs covered everything I needed.",
    "but notifications arrive a little late.",
    "so the whole team switched over.",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Monotonically increasing ids for tests and fixtures.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: i64,
}

impl SequentialIds {
    pub fn new(start: i64) -> Self {
        Self { next: start }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> FeedbackId {
        let id = FeedbackId::new(self.next);
        self.next += 1;
        id
    }
}

/// Deterministic generator of feedback entries. Every generated record
/// satisfies the form's minimum lengths, so fixtures can round-trip through
/// validation without special cases.
#[derive(Debug, Clone)]
pub struct FeedbackFaker {
    rng: DeterministicRng,
}

impl FeedbackFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn name(&mut self) -> String {
        format!(
            "{} {}",
            self.pick(&FIRST_NAMES),
            self.pick(&LAST_NAMES).chars().next().unwrap_or('X'),
        )
    }

    pub fn message(&mut self) -> String {
        format!("{} {}", self.pick(&OPENERS), self.pick(&FOLLOWUPS))
    }

    pub fn record(&mut self, ids: &mut impl IdSource) -> FeedbackRecord {
        let mut record = FeedbackRecord::new(ids.next_id(), self.name(), self.message());
        record.created_at = Some(self.timestamp());
        record
    }

    /// RFC 3339 timestamp within the reference year, the shape the remote
    /// service stamps on records.
    pub fn timestamp(&mut self) -> String {
        let start = midnight_utc(REFERENCE_YEAR, Month::January, 1);
        let offset_seconds = (self.rng.next_u64() % (364 * 24 * 60 * 60)) as i64;
        let moment = start + Duration::seconds(offset_seconds);
        moment.format(&Rfc3339).unwrap_or_else(|_| moment.to_string())
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

fn midnight_utc(year: i32, month: Month, day: u8) -> OffsetDateTime {
    let date = Date::from_calendar_date(year, month, day).expect("valid calendar date");
    let midnight = Time::from_hms(0, 0, 0).expect("valid midnight");
    date.with_time(midnight).assume_utc()
}
