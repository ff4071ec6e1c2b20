//! Field-to-event mapping.
//!
//! Turns host data frames into normalized [`Event`]s using the configured
//! column roles. Frames lacking a text or start column produce no events.

use chrono::FixedOffset;
use log::debug;

use crate::models::event::{Event, EventEnd, Link, DEFAULT_EVENT_COLOR};
use crate::models::frame::{DataFrame, Field, FieldType, FieldValue};
use crate::models::locale::LocaleContext;
use crate::models::settings::FieldConfig;
use crate::utils::date::{self, Instant, TimeUnit};

/// Host display helper used for colors, links and text rendering.
pub trait DisplayProcessor {
    /// Display color for the cell at `row`, if the field yields one.
    fn color(&self, field: &Field, row: usize) -> Option<String>;

    fn links(&self, _field: &Field, _row: usize) -> Vec<Link> {
        Vec::new()
    }

    fn text(&self, value: &FieldValue) -> Option<String> {
        value.to_text()
    }
}

impl<D: DisplayProcessor + ?Sized> DisplayProcessor for &D {
    fn color(&self, field: &Field, row: usize) -> Option<String> {
        (**self).color(field, row)
    }

    fn links(&self, field: &Field, row: usize) -> Vec<Link> {
        (**self).links(field, row)
    }

    fn text(&self, value: &FieldValue) -> Option<String> {
        (**self).text(value)
    }
}

/// Uses string cells that look like colors verbatim and provides no links.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDisplay;

impl DisplayProcessor for DefaultDisplay {
    fn color(&self, field: &Field, row: usize) -> Option<String> {
        field
            .value(row)
            .as_str()
            .map(str::trim)
            .filter(|value| is_color(value))
            .map(str::to_string)
    }
}

/// Hex colors (`#RGB`, `#RRGGBB`, `#RRGGBBAA`) or named theme tokens such as `dark-green`.
pub fn is_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    !value.is_empty()
        && value.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub struct FieldMapper<'a, D = DefaultDisplay> {
    config: &'a FieldConfig,
    locale: &'a LocaleContext,
    visible_week_end: Instant,
    default_color: String,
    display: D,
}

impl<'a> FieldMapper<'a, DefaultDisplay> {
    /// `anchor` is the calendar's current anchor date; rows with a missing
    /// end value are clipped to the end of the week containing it.
    pub fn new(config: &'a FieldConfig, locale: &'a LocaleContext, anchor: Instant) -> Self {
        Self {
            config,
            locale,
            visible_week_end: date::end_of(anchor, TimeUnit::Week, locale),
            default_color: DEFAULT_EVENT_COLOR.to_string(),
            display: DefaultDisplay,
        }
    }
}

impl<'a, D: DisplayProcessor> FieldMapper<'a, D> {
    pub fn with_display<E: DisplayProcessor>(self, display: E) -> FieldMapper<'a, E> {
        FieldMapper {
            config: self.config,
            locale: self.locale,
            visible_week_end: self.visible_week_end,
            default_color: self.default_color,
            display,
        }
    }

    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self
    }

    pub fn map_frames(&self, frames: &[DataFrame]) -> Vec<Event> {
        frames.iter().flat_map(|frame| self.map_frame(frame)).collect()
    }

    pub fn map_frame(&self, frame: &DataFrame) -> Vec<Event> {
        let offset = self.locale.offset;

        let Some(text_field) = resolve_field(frame, self.config.text_field.as_deref(), FieldType::String)
        else {
            debug!("Skipping frame {:?}: no text field", frame.name);
            return Vec::new();
        };

        let Some(start_field) = resolve_field(frame, self.config.time_field.as_deref(), FieldType::Time)
        else {
            debug!("Skipping frame {:?}: no start time field", frame.name);
            return Vec::new();
        };

        let end_field = self
            .config
            .end_time_field
            .as_deref()
            .and_then(|name| frame.field(name));
        let description_field = self.optional_field(frame, &self.config.description_field);
        let location_field = self.optional_field(frame, &self.config.location_field);
        let color_field = self.optional_field(frame, &self.config.color_field);
        let label_fields: Vec<&Field> = self
            .config
            .label_fields
            .iter()
            .filter_map(|name| frame.field(name))
            .collect();

        let mut events = Vec::with_capacity(frame.len());
        for row in 0..frame.len() {
            let Some(start) = to_instant(start_field.value(row), offset) else {
                debug!("Skipping row {} of {:?}: unparseable start", row, frame.name);
                continue;
            };

            let end = match end_field {
                None => EventEnd::Unknown,
                Some(field) => EventEnd::At(
                    to_instant(field.value(row), offset).unwrap_or(self.visible_week_end),
                ),
            };

            let color = color_field
                .and_then(|field| self.display.color(field, row))
                .unwrap_or_else(|| self.default_color.clone());

            events.push(Event {
                text: self.display.text(text_field.value(row)).unwrap_or_default(),
                start,
                end,
                description: description_field.and_then(|field| self.cell_text(field, row)),
                location: location_field.and_then(|field| self.cell_text(field, row)),
                labels: label_fields
                    .iter()
                    .filter_map(|field| self.cell_text(field, row))
                    .collect(),
                color,
                links: self.display.links(text_field, row),
            });
        }

        debug!("Mapped {} events from frame {:?}", events.len(), frame.name);
        events
    }

    fn optional_field<'f>(&self, frame: &'f DataFrame, name: &Option<String>) -> Option<&'f Field> {
        name.as_deref().and_then(|name| frame.field(name))
    }

    fn cell_text(&self, field: &Field, row: usize) -> Option<String> {
        self.display
            .text(field.value(row))
            .filter(|text| !text.is_empty())
    }
}

/// Configured column by name, or the first column of `fallback` type.
fn resolve_field<'f>(frame: &'f DataFrame, name: Option<&str>, fallback: FieldType) -> Option<&'f Field> {
    match name {
        Some(name) => frame.field(name),
        None => frame.first_of_type(fallback),
    }
}

/// Numbers are epoch milliseconds; strings go through the timestamp parser.
fn to_instant(value: &FieldValue, offset: FixedOffset) -> Option<Instant> {
    match value {
        FieldValue::Number(millis) if millis.is_finite() => {
            date::from_epoch_millis(*millis as i64, offset)
        }
        FieldValue::String(text) => date::parse_instant(text, offset),
        _ => None,
    }
}
