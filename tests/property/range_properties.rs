use calendar_panel::models::locale::LocaleContext;
use calendar_panel::models::time_range::TimeRange;
use calendar_panel::models::ui::ViewKind;
use calendar_panel::services::range::{is_out_of_range, period_for, CalendarRange, NavigateAction};
use calendar_panel::services::selection::IntervalSelection;
use calendar_panel::utils::date::Instant;
use chrono::Duration;
use proptest::prelude::*;

use crate::fixtures::at;

const YEAR_MIN: i64 = 365 * 24 * 60;

fn instant(minutes: i64) -> Instant {
    at("2022-01-01T00:00:00Z") + Duration::minutes(minutes)
}

fn view_strategy() -> impl Strategy<Value = ViewKind> {
    prop::sample::select(ViewKind::ALL.to_vec())
}

fn range_strategy() -> impl Strategy<Value = TimeRange> {
    (0..YEAR_MIN, 0..YEAR_MIN).prop_map(|(a, b)| {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        TimeRange::new(instant(from), instant(to))
    })
}

proptest! {
    /// Property: a day only needs its start inside the host range
    #[test]
    fn prop_day_view_checks_start_only(candidate in range_strategy(), host in range_strategy()) {
        let outside = candidate.from < host.from || candidate.from > host.to;
        prop_assert_eq!(is_out_of_range(&candidate, &host, ViewKind::Day), outside);
    }

    /// Property: every other view needs full containment
    #[test]
    fn prop_other_views_need_containment(
        candidate in range_strategy(),
        host in range_strategy(),
        view in view_strategy(),
    ) {
        prop_assume!(view != ViewKind::Day);
        let contained = candidate.from >= host.from && candidate.to <= host.to;
        prop_assert_eq!(is_out_of_range(&candidate, &host, view), !contained);
    }

    /// Property: a navigation request is exactly the target's period, and is
    /// only issued when that period is out of range
    #[test]
    fn prop_navigation_requests_target_period(
        host in range_strategy(),
        target in (0..YEAR_MIN).prop_map(instant),
        view in view_strategy(),
    ) {
        let locale = LocaleContext::default();
        let mut calendar = CalendarRange::new(host, view, locale.clone());
        let period = period_for(target, view, &locale);

        let request = calendar.on_navigate(target, view, NavigateAction::Next);
        if is_out_of_range(&period, &host, view) {
            prop_assert_eq!(request, Some(period));
        } else {
            prop_assert_eq!(request, None);
        }
        prop_assert_eq!(calendar.period(), period);
    }

    /// Property: the visible period always contains its anchor
    #[test]
    fn prop_period_contains_anchor(host in range_strategy(), view in view_strategy()) {
        let calendar = CalendarRange::new(host, view, LocaleContext::default());
        prop_assert!(calendar.period().contains(calendar.anchor_date()));
    }

    /// Property: clicking the selection's first day twice clears it, with or
    /// without the modifier
    #[test]
    fn prop_second_click_on_start_clears(minute in 0..YEAR_MIN, extending in any::<bool>()) {
        let day = instant(minute);
        let mut selection = IntervalSelection::new();
        selection.on_time_selection(day);
        selection.set_extending(extending);
        selection.on_time_selection(day);
        prop_assert_eq!(selection.selection(), None);
    }

    /// Property: with the modifier held the selection stays ordered
    #[test]
    fn prop_extended_selection_is_ordered(
        clicks in prop::collection::vec(0..YEAR_MIN, 1..8),
    ) {
        let mut selection = IntervalSelection::new();
        selection.on_time_selection(instant(clicks[0]));
        selection.set_extending(true);
        for minute in &clicks[1..] {
            selection.on_time_selection(instant(*minute));
            if let Some(range) = selection.selection() {
                prop_assert!(range.from <= range.to);
            }
        }
    }
}
