// Test fixtures - reusable test data
// Provides consistent events, frames and ranges across integration tests

#![allow(dead_code)]

use calendar_panel::models::event::Event;
use calendar_panel::models::time_range::TimeRange;
use calendar_panel::utils::date::Instant;
use chrono::{DateTime, Duration};

/// Route `log` output to the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse an RFC 3339 timestamp
pub fn at(value: &str) -> Instant {
    DateTime::parse_from_rfc3339(value).unwrap()
}

pub fn range(from: &str, to: &str) -> TimeRange {
    TimeRange::new(at(from), at(to))
}

/// Sample events for testing
pub mod events {
    use super::*;

    /// Event without an end
    pub fn point(text: &str, start: &str) -> Event {
        Event::new(text, at(start))
    }

    pub fn spanning(text: &str, start: &str, end: &str) -> Event {
        Event::builder()
            .text(text)
            .start(at(start))
            .end(at(end))
            .build()
            .unwrap()
    }

    /// `count` events of `days` days each, starting one day apart from 2020-01-01
    pub fn staggered(count: usize, days: i64) -> Vec<Event> {
        let first = at("2020-01-01T15:06:02Z");
        (0..count)
            .map(|i| {
                let start = first + Duration::days(i as i64);
                Event::builder()
                    .text(format!("event {:03}", i))
                    .start(start)
                    .end(start + Duration::days(days - 1))
                    .build()
                    .unwrap()
            })
            .collect()
    }
}

/// Sample data frames for testing
pub mod frames {
    use calendar_panel::models::frame::{DataFrame, Field, FieldType, FieldValue};

    /// Deployments table with text, start, end and color columns
    pub fn deployments() -> DataFrame {
        DataFrame::new(vec![
            Field::new(
                "time",
                FieldType::Time,
                [1_672_574_400_000_i64, 1_672_660_800_000, 1_672_747_200_000],
            ),
            Field::new(
                "time_end",
                FieldType::Time,
                [
                    FieldValue::Number(1_672_660_800_000.0),
                    FieldValue::Null,
                    FieldValue::Number(1_672_750_800_000.0),
                ],
            ),
            Field::new("service", FieldType::String, ["api", "web", "worker"]),
            Field::new("status", FieldType::String, ["green", "#FF0000", "not a color!"]),
        ])
    }
}
