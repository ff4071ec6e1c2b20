//! Interval selection state.
//!
//! Tracks the multi-day range a user builds by clicking day cells, with a
//! held modifier key switching clicks from "replace" to "extend".

use log::debug;

use crate::models::time_range::TimeRange;
use crate::services::range::{apply_range_request, TimeRangeHost};
use crate::utils::date::{self, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSelection {
    selection: Option<TimeRange>,
    extending: bool,
}

impl IntervalSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<TimeRange> {
        self.selection
    }

    pub fn is_extending(&self) -> bool {
        self.extending
    }

    /// Driven by the modifier key: `true` while it is held.
    pub fn set_extending(&mut self, extending: bool) {
        self.extending = extending;
    }

    pub fn clear(&mut self) {
        self.selection = None;
    }

    /// Handle a click on `day`.
    ///
    /// Without the modifier, clicking the selection's first day toggles it
    /// off and any other day replaces it. With the modifier, clicking the
    /// first day toggles off; otherwise a click before the current end moves
    /// the start, and a click after the current start moves the end. Both
    /// checks use the selection as it was before the click, so a click
    /// inside the range applies both and collapses it onto that day.
    pub fn on_time_selection(&mut self, day: Instant) {
        let clicked = date::start_of_day(day);

        let Some(current) = self.selection else {
            self.selection = Some(single_day(day));
            return;
        };

        if clicked == current.from {
            debug!("Selection toggled off at {}", clicked);
            self.selection = None;
            return;
        }

        if !self.extending {
            self.selection = Some(single_day(day));
            return;
        }

        let mut next = current;
        if clicked < current.to {
            next.from = clicked;
        }
        if clicked > current.from {
            next.to = date::end_of_day(day);
        }
        self.selection = Some(next);
    }

    /// Forward the selection to the host as its new time range and clear it.
    pub fn apply<H: TimeRangeHost + ?Sized>(&mut self, host: &mut H) -> Option<TimeRange> {
        let range = self.selection.take()?;
        apply_range_request(host, range);
        Some(range)
    }
}

fn single_day(day: Instant) -> TimeRange {
    TimeRange::new(date::start_of_day(day), date::end_of_day(day))
}
