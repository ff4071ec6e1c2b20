//! Calendar range state machine.
//!
//! Owns the anchor date and active view, derives the visible period from
//! them, and decides when the host's time range has to follow a navigation.
//! Requests made here are optimistic: the anchor moves immediately and the
//! host's answer is reconciled in [`CalendarRange::on_host_range_changed`].

use chrono::Duration;
use log::{debug, info};

use crate::models::locale::LocaleContext;
use crate::models::time_range::TimeRange;
use crate::models::ui::{resolve_view, ViewKind};
use crate::utils::date::{self, Instant};

/// Toolbar and drill-down navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateAction {
    Prev,
    Next,
    Today,
    /// Drill down into a date picked from a coarser view
    Date,
}

/// Whether the host range is known to match what this calendar asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Local,
    /// A range change was requested and the host has not answered yet
    Syncing(TimeRange),
}

/// Host side of the time-range filter.
#[cfg_attr(test, mockall::automock)]
pub trait TimeRangeHost {
    fn change_time_range(&mut self, range: TimeRange);

    /// Currently pinned auto-refresh interval, e.g. `"5m"`.
    fn refresh(&self) -> Option<String>;

    fn set_refresh(&mut self, refresh: Option<String>);
}

/// Ask the host for `range`, restoring a pinned refresh interval that the
/// range change would otherwise reset.
pub fn apply_range_request<H: TimeRangeHost + ?Sized>(host: &mut H, range: TimeRange) {
    let pinned = host.refresh();
    host.change_time_range(range);
    if let Some(refresh) = pinned {
        debug!("Re-applying pinned refresh {}", refresh);
        host.set_refresh(Some(refresh));
    }
}

#[derive(Debug, Clone)]
pub struct CalendarRange {
    locale: LocaleContext,
    host_range: TimeRange,
    view: ViewKind,
    anchor: Instant,
    sync: SyncState,
}

impl CalendarRange {
    pub fn new(host_range: TimeRange, default_view: ViewKind, locale: LocaleContext) -> Self {
        let anchor = anchor_for(&host_range, default_view);
        Self {
            locale,
            host_range,
            view: default_view,
            anchor,
            sync: SyncState::Local,
        }
    }

    pub fn anchor_date(&self) -> Instant {
        self.anchor
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn host_range(&self) -> TimeRange {
        self.host_range
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync
    }

    pub fn locale(&self) -> &LocaleContext {
        &self.locale
    }

    /// Visible period derived from the anchor and view.
    pub fn period(&self) -> TimeRange {
        period_for(self.anchor, self.view, &self.locale)
    }

    /// Navigate to `target`. Returns the range the host should switch to when
    /// the new period is not covered by the current host range.
    pub fn on_navigate(
        &mut self,
        target: Instant,
        current_view: ViewKind,
        action: NavigateAction,
    ) -> Option<TimeRange> {
        self.on_navigate_within(target, current_view, action, &ViewKind::ALL)
    }

    /// [`on_navigate`](Self::on_navigate) limited to the `configured` views:
    /// a drill-down target outside them falls back via [`resolve_view`].
    pub fn on_navigate_within(
        &mut self,
        target: Instant,
        current_view: ViewKind,
        action: NavigateAction,
        configured: &[ViewKind],
    ) -> Option<TimeRange> {
        let view = match action {
            NavigateAction::Date => resolve_view(drill_down(current_view), configured),
            NavigateAction::Prev | NavigateAction::Next | NavigateAction::Today => current_view,
        };
        debug!("Navigate {:?} from {} to {} ({})", action, current_view, target, view);
        self.move_to(target, view)
    }

    /// Toolbar step relative to the anchor; `Today` jumps to `now`.
    pub fn step(&mut self, action: NavigateAction, now: Instant) -> Option<TimeRange> {
        let target = match action {
            NavigateAction::Prev => shift(self.anchor, self.view, -1),
            NavigateAction::Next => shift(self.anchor, self.view, 1),
            NavigateAction::Today => now,
            NavigateAction::Date => self.anchor,
        };
        self.on_navigate(target, self.view, action)
    }

    pub fn on_change_view(&mut self, view: ViewKind) -> Option<TimeRange> {
        debug!("Change view {} -> {}", self.view, view);
        self.move_to(self.anchor, view)
    }

    /// Apply a time range reported by the host. Returns `true` when the
    /// calendar re-anchored to it.
    pub fn on_host_range_changed(&mut self, range: TimeRange) -> bool {
        let previous = std::mem::replace(&mut self.sync, SyncState::Local);
        self.host_range = range;

        if previous == SyncState::Syncing(range) {
            debug!("Host accepted requested range {} - {}", range.from, range.to);
            return false;
        }

        if !is_out_of_range(&self.period(), &range, self.view) {
            return false;
        }

        self.anchor = anchor_for(&range, self.view);
        info!(
            "Calendar re-anchored to host range {} - {} ({})",
            range.from, range.to, self.view
        );
        true
    }

    fn move_to(&mut self, target: Instant, view: ViewKind) -> Option<TimeRange> {
        let period = period_for(target, view, &self.locale);
        self.view = view;
        self.anchor = anchor_for(&period, view);

        if !is_out_of_range(&period, &self.host_range, view) {
            return None;
        }

        debug!("Requesting host range {} - {}", period.from, period.to);
        self.sync = SyncState::Syncing(period);
        Some(period)
    }
}

/// Period of `view` containing `date`.
pub fn period_for(date: Instant, view: ViewKind, locale: &LocaleContext) -> TimeRange {
    let unit = view.unit();
    TimeRange::new(date::start_of(date, unit, locale), date::end_of(date, unit, locale))
}

/// Agenda pages start at the period start; every other view is anchored
/// in the middle of its period.
pub fn anchor_for(period: &TimeRange, view: ViewKind) -> Instant {
    match view {
        ViewKind::Agenda => period.from,
        _ => period.middle(),
    }
}

/// Day view only needs its start inside the host range; every other view
/// must be fully contained.
pub fn is_out_of_range(candidate: &TimeRange, host: &TimeRange, view: ViewKind) -> bool {
    match view {
        ViewKind::Day => candidate.from < host.from || candidate.from > host.to,
        _ => candidate.from < host.from || candidate.to > host.to,
    }
}

/// Target view when drilling into a date.
pub fn drill_down(current_view: ViewKind) -> ViewKind {
    match current_view {
        ViewKind::Year => ViewKind::Week,
        _ => ViewKind::Day,
    }
}

fn shift(anchor: Instant, view: ViewKind, steps: i32) -> Instant {
    match view {
        ViewKind::Day => anchor + Duration::days(i64::from(steps)),
        ViewKind::Week | ViewKind::WorkWeek => anchor + Duration::weeks(i64::from(steps)),
        ViewKind::Month | ViewKind::Agenda => shift_months(anchor, steps),
        ViewKind::Year => shift_months(anchor, steps * 12),
    }
}

fn shift_months(anchor: Instant, months: i32) -> Instant {
    let date = date::shift_months(anchor.date_naive(), months);
    date::localize(date.and_time(anchor.time()), *anchor.offset())
}
