use std::ptr;

use calendar_panel::models::event::Event;
use calendar_panel::services::alignment::{align, align_with, AlignStrategy, AlignedDayMap};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use crate::fixtures::at;

const TWENTY_DAYS_MIN: i64 = 20 * 24 * 60;
const FIVE_DAYS_MIN: i64 = 5 * 24 * 60;

fn event_strategy() -> impl Strategy<Value = Event> {
    (
        "[a-d]{1,3}",
        0..TWENTY_DAYS_MIN,
        proptest::option::of(0..FIVE_DAYS_MIN),
    )
        .prop_map(|(text, start_min, length_min)| {
            let start = at("2021-03-01T00:00:00Z") + Duration::minutes(start_min);
            let builder = Event::builder().text(text).start(start);
            match length_min {
                Some(length) => builder.end(start + Duration::minutes(length)),
                None => builder,
            }
            .build()
            .unwrap()
        })
}

/// Events that all start on the same day, so first-fit never collides.
fn same_day_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(
        ("[a-d]{1,3}", 0..(24 * 60 - 1i64), proptest::option::of(0..FIVE_DAYS_MIN)),
        1..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(text, start_min, length_min)| {
                let start = at("2021-03-01T00:00:00Z") + Duration::minutes(start_min);
                let builder = Event::builder().text(text).start(start);
                match length_min {
                    Some(length) => builder.end(start + Duration::minutes(length)),
                    None => builder,
                }
                .build()
                .unwrap()
            })
            .collect()
    })
}

fn slot_of(days: &AlignedDayMap<'_>, day: NaiveDate, event: &Event) -> Option<usize> {
    days.get(&day)?
        .iter()
        .position(|slot| slot.is_some_and(|placed| ptr::eq(placed, event)))
}

fn days_touched(event: &Event) -> Vec<NaiveDate> {
    let first = event.start.date_naive();
    let last = event
        .end_instant()
        .map(|end| end.date_naive())
        .unwrap_or(first)
        .max(first);
    first.iter_days().take_while(|day| *day <= last).collect()
}

fn assert_span_coverage(days: &AlignedDayMap<'_>, events: &[Event]) -> Result<(), TestCaseError> {
    for event in events {
        let touched = days_touched(event);
        let slot = slot_of(days, touched[0], event);
        prop_assert!(slot.is_some(), "{} missing on its start day", event.text);
        for day in touched {
            prop_assert_eq!(slot_of(days, day, event), slot);
        }
    }
    Ok(())
}

proptest! {
    /// Property: alignment is a pure function of its input
    #[test]
    fn prop_align_is_idempotent(events in prop::collection::vec(event_strategy(), 0..40)) {
        let first = serde_json::to_value(align(&events)).unwrap();
        let second = serde_json::to_value(align(&events)).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: input order does not change the result
    #[test]
    fn prop_align_ignores_input_order(mut events in prop::collection::vec(event_strategy(), 0..30)) {
        // events with equal (start, text) keep their input order
        events.sort_by(|a, b| (a.start, &a.text).cmp(&(b.start, &b.text)));
        events.dedup_by(|a, b| a.start == b.start && a.text == b.text);
        let mut reversed = events.clone();
        reversed.reverse();
        prop_assert_eq!(
            serde_json::to_value(align(&events)).unwrap(),
            serde_json::to_value(align(&reversed)).unwrap()
        );
    }

    /// Property: strict placement keeps every event on one slot across all its days
    #[test]
    fn prop_strict_span_coverage(events in prop::collection::vec(event_strategy(), 0..40)) {
        let days = align_with(&events, AlignStrategy::Strict);
        assert_span_coverage(&days, &events)?;
    }

    /// Property: first-fit keeps span coverage when events share a start day
    #[test]
    fn prop_first_fit_span_coverage_same_day(events in same_day_events()) {
        let days = align(&events);
        assert_span_coverage(&days, &events)?;
    }

    /// Property: an event without an end shows up only on its start day
    #[test]
    fn prop_point_events_stay_on_start_day(events in prop::collection::vec(event_strategy(), 0..40)) {
        let days = align(&events);
        for event in events.iter().filter(|event| event.end_instant().is_none()) {
            let keys: Vec<NaiveDate> = days
                .iter()
                .filter(|(_, slots)| {
                    slots.iter().any(|slot| slot.is_some_and(|placed| ptr::eq(placed, event)))
                })
                .map(|(day, _)| *day)
                .collect();
            prop_assert_eq!(keys, vec![event.start.date_naive()]);
        }
    }

    /// Property: on a shared start day, earlier-sorted events get lower slots
    /// and later ones never reuse them on any day the earlier event touches
    #[test]
    fn prop_slot_stability(events in prop::collection::vec(event_strategy(), 0..40)) {
        let days = align(&events);
        for a in &events {
            for b in &events {
                if ptr::eq(a, b) || a.start.date_naive() != b.start.date_naive() {
                    continue;
                }
                if (a.start, &a.text) >= (b.start, &b.text) {
                    continue;
                }
                let day = a.start.date_naive();
                let (slot_a, slot_b) = (slot_of(&days, day, a), slot_of(&days, day, b));
                prop_assert!(slot_a.is_some() && slot_b.is_some());
                prop_assert!(slot_a <= slot_b);
                for touched in days_touched(a) {
                    if let Some(slot_b_there) = slot_of(&days, touched, b) {
                        prop_assert_ne!(Some(slot_b_there), slot_a);
                    }
                }
            }
        }
    }

    /// Property: equal starts are ordered by text
    #[test]
    fn prop_equal_starts_ordered_by_text(
        first in "[a-z]{1,6}",
        second in "[a-z]{1,6}",
        minute in 0..TWENTY_DAYS_MIN,
    ) {
        prop_assume!(first != second);
        let start = at("2021-03-01T00:00:00Z") + Duration::minutes(minute);
        let events = vec![Event::new(second.clone(), start), Event::new(first.clone(), start)];

        let days = align(&events);
        let slots = &days[&start.date_naive()];
        let texts: Vec<&str> = slots.iter().flatten().map(|event| event.text.as_str()).collect();

        let mut expected = vec![first.as_str(), second.as_str()];
        expected.sort();
        prop_assert_eq!(texts, expected);
    }
}
