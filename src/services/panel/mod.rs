//! Calendar panel session.
//!
//! Owns the state of one rendered panel and recomputes the event list from
//! scratch whenever data, annotations or the visible window change.

use chrono::NaiveDate;
use log::debug;

use crate::models::annotation::AnnotationRecord;
use crate::models::event::Event;
use crate::models::frame::DataFrame;
use crate::models::locale::LocaleContext;
use crate::models::settings::{Settings, SettingsError};
use crate::models::time_range::TimeRange;
use crate::models::ui::{resolve_view, ViewKind};
use crate::services::alignment::{align_with, truncate_day, AlignedDayMap};
use crate::services::annotations::{
    annotations_to_events, AnnotationQuery, AnnotationStore, FetchTicket,
};
use crate::services::mapper::{DefaultDisplay, DisplayProcessor, FieldMapper};
use crate::services::range::{apply_range_request, CalendarRange, NavigateAction, TimeRangeHost};
use crate::services::selection::IntervalSelection;
use crate::services::variables::{resolve_time_range, VariableLookup};
use crate::utils::date::Instant;

pub struct CalendarPanel<D = DefaultDisplay> {
    settings: Settings,
    locale: LocaleContext,
    range: CalendarRange,
    selection: IntervalSelection,
    annotations: AnnotationStore,
    display: D,
    frames: Vec<DataFrame>,
    events: Vec<Event>,
}

impl CalendarPanel<DefaultDisplay> {
    pub fn new(settings: Settings, host_range: TimeRange) -> Result<Self, SettingsError> {
        Self::with_display(settings, host_range, DefaultDisplay)
    }
}

impl<D: DisplayProcessor> CalendarPanel<D> {
    pub fn with_display(
        settings: Settings,
        host_range: TimeRange,
        display: D,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let locale = settings.locale()?;
        let view = resolve_view(settings.default_view, &settings.views);
        let range = CalendarRange::new(host_range, view, locale.clone());

        Ok(Self {
            settings,
            locale,
            range,
            selection: IntervalSelection::new(),
            annotations: AnnotationStore::new(),
            display,
            frames: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Host range taken from the configured runtime variables, if any.
    pub fn variable_time_range<L: VariableLookup + ?Sized>(&self, variables: &L) -> Option<TimeRange> {
        let names = self.settings.time_range_variables.as_ref()?;
        resolve_time_range(variables, names, &self.locale)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn locale(&self) -> &LocaleContext {
        &self.locale
    }

    pub fn range(&self) -> &CalendarRange {
        &self.range
    }

    pub fn selection(&self) -> &IntervalSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut IntervalSelection {
        &mut self.selection
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// `false` when no views are configured and the grid should show a
    /// message instead.
    pub fn has_views(&self) -> bool {
        !self.settings.views.is_empty()
    }

    /// Replace the data snapshot.
    pub fn set_data(&mut self, frames: Vec<DataFrame>) {
        self.frames = frames;
        self.recompute();
    }

    /// Query for the annotations of the current host range, paired with a
    /// ticket for [`complete_annotations`](Self::complete_annotations).
    /// `None` when annotations are disabled.
    pub fn begin_annotation_fetch(&mut self) -> Option<(FetchTicket, AnnotationQuery)> {
        if !self.settings.annotations.enabled {
            return None;
        }
        let query = AnnotationQuery::from_options(&self.settings.annotations, self.range.host_range());
        Some((self.annotations.begin(), query))
    }

    /// Store a fetch result. Stale results are dropped and leave the events untouched.
    pub fn complete_annotations(
        &mut self,
        ticket: FetchTicket,
        records: Option<Vec<AnnotationRecord>>,
    ) -> bool {
        if !self.annotations.complete(ticket, records) {
            return false;
        }
        self.recompute();
        true
    }

    pub fn aligned(&self) -> AlignedDayMap<'_> {
        align_with(&self.events, self.settings.align_strategy)
    }

    /// Slots of `day` that fit the configured row budget, and how many
    /// events are left for "+N more".
    pub fn visible_day<'d, 'e>(
        &self,
        days: &'d AlignedDayMap<'e>,
        day: NaiveDate,
    ) -> (&'d [Option<&'e Event>], usize) {
        match days.get(&day) {
            Some(slots) => truncate_day(slots, self.settings.max_entries_per_day),
            None => (&[], 0),
        }
    }

    pub fn navigate<H: TimeRangeHost + ?Sized>(
        &mut self,
        host: &mut H,
        target: Instant,
        action: NavigateAction,
    ) -> Option<TimeRange> {
        let view = self.range.view();
        let request = self
            .range
            .on_navigate_within(target, view, action, &self.settings.views);
        self.after_range_move(host, request)
    }

    pub fn step<H: TimeRangeHost + ?Sized>(
        &mut self,
        host: &mut H,
        action: NavigateAction,
        now: Instant,
    ) -> Option<TimeRange> {
        let request = self.range.step(action, now);
        self.after_range_move(host, request)
    }

    pub fn change_view<H: TimeRangeHost + ?Sized>(
        &mut self,
        host: &mut H,
        view: ViewKind,
    ) -> Option<TimeRange> {
        let view = resolve_view(view, &self.settings.views);
        let request = self.range.on_change_view(view);
        self.after_range_move(host, request)
    }

    /// The host reported a (possibly new) time range.
    pub fn on_host_range_changed(&mut self, range: TimeRange) {
        if self.range.on_host_range_changed(range) {
            self.recompute();
        }
    }

    fn after_range_move<H: TimeRangeHost + ?Sized>(
        &mut self,
        host: &mut H,
        request: Option<TimeRange>,
    ) -> Option<TimeRange> {
        if let Some(range) = request {
            apply_range_request(host, range);
        }
        // missing end values are clipped to the visible week
        self.recompute();
        request
    }

    fn recompute(&mut self) {
        let mapper = FieldMapper::new(&self.settings.fields, &self.locale, self.range.anchor_date())
            .with_default_color(self.settings.default_color.clone())
            .with_display(&self.display);

        let mut events = mapper.map_frames(&self.frames);
        events.extend(annotations_to_events(
            self.annotations.records(),
            &self.settings.annotations,
            &self.locale,
        ));

        debug!(
            "Recomputed {} events ({} frames, {} annotations)",
            events.len(),
            self.frames.len(),
            self.annotations.records().len()
        );
        self.events = events;
    }
}
