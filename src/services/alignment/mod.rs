//! Event alignment engine.
//!
//! Produces, for every calendar day touched by an event, a slot-ordered list
//! of event references. A multi-day event keeps the same slot index on every
//! day it spans so that the grid can draw it as one continuous bar.
//!
//! Slots are claimed greedily in `(start, text)` order. With
//! [`AlignStrategy::FirstFit`] the slot is the first free one on the event's
//! start day only, so an event can still land on a slot that a different,
//! earlier-starting event already holds on a later day. That collision is
//! kept as-is; [`AlignStrategy::Strict`] checks every spanned day instead.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use log::debug;

use crate::models::event::{Event, EventEnd};
use crate::utils::date;

pub use crate::models::settings::AlignStrategy;

/// Day → slots. `None` is a filler keeping a lower lane reserved.
pub type AlignedDayMap<'a> = BTreeMap<NaiveDate, Vec<Option<&'a Event>>>;

/// Align events with first-fit slot assignment.
pub fn align(events: &[Event]) -> AlignedDayMap<'_> {
    align_with(events, AlignStrategy::FirstFit)
}

pub fn align_with(events: &[Event], strategy: AlignStrategy) -> AlignedDayMap<'_> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.text.cmp(&b.text)));

    let mut days = AlignedDayMap::new();
    for event in sorted {
        let span = spanned_days(event);
        let offset = match strategy {
            AlignStrategy::FirstFit => first_free_slot(days.get(&span[0])),
            AlignStrategy::Strict => lowest_slot_free_on_all(&days, &span),
        };

        for day in span {
            place(days.entry(day).or_default(), offset, event);
        }
    }

    debug!(
        "Aligned {} events into {} days ({:?})",
        events.len(),
        days.len(),
        strategy
    );
    days
}

/// `YYYY-MM-DD` keys of an aligned map, in calendar order.
pub fn day_keys(days: &AlignedDayMap<'_>) -> Vec<String> {
    days.keys().map(|day| date::day_key(*day)).collect()
}

/// Split a day's slots into the part that fits `budget` rows and the number
/// of events hidden behind "+N more".
pub fn truncate_day<'d, 'e>(
    slots: &'d [Option<&'e Event>],
    budget: usize,
) -> (&'d [Option<&'e Event>], usize) {
    let visible = budget.min(slots.len());
    let hidden = slots[visible..].iter().filter(|slot| slot.is_some()).count();
    (&slots[..visible], hidden)
}

/// Every day the event occupies, starting with its start day.
fn spanned_days(event: &Event) -> Vec<NaiveDate> {
    let first = event.start.date_naive();
    let count = match event.end {
        EventEnd::At(end) => date::span_days(event.start, end),
        EventEnd::Unknown | EventEnd::Open => 1,
    };
    (0..count).map(|offset| first + Duration::days(offset)).collect()
}

fn first_free_slot(slots: Option<&Vec<Option<&Event>>>) -> usize {
    slots.map_or(0, |slots| {
        slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(slots.len())
    })
}

fn lowest_slot_free_on_all(days: &AlignedDayMap<'_>, span: &[NaiveDate]) -> usize {
    (0..)
        .find(|slot| {
            span.iter().all(|day| {
                days.get(day)
                    .and_then(|slots| slots.get(*slot))
                    .map_or(true, Option::is_none)
            })
        })
        .unwrap_or_default()
}

fn place<'a>(slots: &mut Vec<Option<&'a Event>>, offset: usize, event: &'a Event) {
    if slots.len() <= offset {
        slots.resize(offset + 1, None);
    }
    slots[offset] = Some(event);
}
